use super::sentences::{split_sentences, truncate_at_word};
use super::DescriptionGenerator;

/// Uses the opening sentences of the text
///
/// Sentences are taken in order until the next one would overflow the length
/// budget or `max_sentences` is reached. If even the first sentence is too
/// long it is cut at a word boundary.
#[derive(Debug, Clone)]
pub struct LeadSentences {
    max_sentences: usize,
}

impl LeadSentences {
    pub fn new(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
        }
    }
}

impl Default for LeadSentences {
    fn default() -> Self {
        Self::new(3)
    }
}

impl DescriptionGenerator for LeadSentences {
    fn generate(&self, text: &str, max_length: usize) -> String {
        let sentences = split_sentences(text);
        let Some(first) = sentences.first() else {
            return String::new();
        };

        let mut out = String::new();
        for sentence in sentences.iter().take(self.max_sentences) {
            let extra = if out.is_empty() { 0 } else { 1 };
            if out.chars().count() + extra + sentence.chars().count() > max_length {
                break;
            }
            if extra == 1 {
                out.push(' ');
            }
            out.push_str(sentence);
        }

        if out.is_empty() {
            truncate_at_word(first, max_length).to_string()
        } else {
            out
        }
    }

    fn name(&self) -> &'static str {
        "lead"
    }
}
