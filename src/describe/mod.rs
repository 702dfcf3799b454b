//! Description generators
//!
//! A [`DescriptionGenerator`] turns a module's text into a short description.
//! Implementations must only emit text taken from their input and must never
//! exceed the requested length. Both built-in strategies are extractive:
//!
//! - [`LeadSentences`]: the opening sentences of the text
//! - [`FrequencySentences`]: the sentences carrying the most frequent terms

mod frequency;
mod lead;
pub mod sentences;

pub use frequency::FrequencySentences;
pub use lead::LeadSentences;

use crate::config::{DescriptionConfig, DescriptionStrategy};
use std::sync::Arc;

/// Produces a bounded description from a block of text
///
/// Implementations are shared across threads and injected into module
/// inference, so a model-backed generator can replace the heuristics without
/// touching the rest of the pipeline.
pub trait DescriptionGenerator: Send + Sync {
    /// Returns a description of at most `max_length` characters built only
    /// from `text`. Empty input yields an empty description.
    fn generate(&self, text: &str, max_length: usize) -> String;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Builds the generator selected in the configuration
pub fn generator_for(config: &DescriptionConfig) -> Arc<dyn DescriptionGenerator> {
    match config.strategy {
        DescriptionStrategy::Lead => Arc::new(LeadSentences::new(config.max_sentences)),
        DescriptionStrategy::Frequency => Arc::new(FrequencySentences::new(config.max_sentences)),
    }
}

/// Joins selected sentences while they fit in `max_length` characters
///
/// Falls back to a word-boundary cut of the first candidate when not even one
/// sentence fits.
pub(crate) fn fit_sentences(candidates: &[&str], max_length: usize) -> String {
    let mut out = String::new();
    let mut used = 0;

    for sentence in candidates {
        let len = sentence.chars().count();
        let needed = if out.is_empty() { len } else { len + 1 };
        if used + needed > max_length {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(sentence);
        used += needed;
    }

    if out.is_empty() {
        if let Some(first) = candidates.first() {
            return sentences::truncate_at_word(first, max_length).to_string();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_for_strategy() {
        let mut config = DescriptionConfig::default();
        assert_eq!(generator_for(&config).name(), "lead");

        config.strategy = DescriptionStrategy::Frequency;
        assert_eq!(generator_for(&config).name(), "frequency");
    }

    #[test]
    fn test_fit_sentences_skips_too_long() {
        let out = fit_sentences(&["Short one.", "This sentence is far too long to fit.", "Tiny."], 20);
        assert_eq!(out, "Short one. Tiny.");
    }

    #[test]
    fn test_fit_sentences_word_fallback() {
        let out = fit_sentences(&["A single sentence that is much too long."], 17);
        assert_eq!(out, "A single sentence");
    }

    #[test]
    fn test_fit_sentences_empty() {
        assert_eq!(fit_sentences(&[], 50), "");
    }
}
