use super::sentences::split_sentences;
use super::{fit_sentences, DescriptionGenerator};
use std::collections::HashMap;

/// Words ignored when scoring sentences
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "do", "does", "each", "for", "from", "has", "have", "how", "if", "in",
    "into", "is", "it", "its", "may", "more", "most", "no", "not", "of", "on", "one", "or",
    "other", "our", "out", "so", "some", "such", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "to", "up", "use", "used", "using", "was", "we", "were",
    "what", "when", "which", "while", "will", "with", "you", "your",
];

/// Picks the sentences whose terms are most frequent across the whole text
///
/// Each sentence scores the mean frequency of its non-stop-word terms. The best
/// sentences that fit the budget are emitted in their original order. Ties go
/// to the earlier sentence, so output is deterministic.
#[derive(Debug, Clone)]
pub struct FrequencySentences {
    max_sentences: usize,
}

impl FrequencySentences {
    pub fn new(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
        }
    }
}

impl Default for FrequencySentences {
    fn default() -> Self {
        Self::new(3)
    }
}

fn terms(sentence: &str) -> impl Iterator<Item = String> + '_ {
    sentence
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 1)
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
}

impl DescriptionGenerator for FrequencySentences {
    fn generate(&self, text: &str, max_length: usize) -> String {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return String::new();
        }

        let mut frequencies: HashMap<String, usize> = HashMap::new();
        for sentence in &sentences {
            for term in terms(sentence) {
                *frequencies.entry(term).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(usize, f64)> = sentences
            .iter()
            .enumerate()
            .map(|(idx, sentence)| {
                let scores: Vec<usize> = terms(sentence)
                    .map(|t| frequencies.get(&t).copied().unwrap_or(0))
                    .collect();
                let score = if scores.is_empty() {
                    0.0
                } else {
                    scores.iter().sum::<usize>() as f64 / scores.len() as f64
                };
                (idx, score)
            })
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        // Pick the best sentences that fit, then restore document order
        let mut chosen: Vec<usize> = Vec::new();
        let mut used = 0;
        for (idx, _) in &ranked {
            if chosen.len() == self.max_sentences {
                break;
            }
            let len = sentences[*idx].chars().count();
            let needed = if chosen.is_empty() { len } else { len + 1 };
            if used + needed <= max_length {
                chosen.push(*idx);
                used += needed;
            }
        }
        chosen.sort_unstable();

        let picked: Vec<&str> = if chosen.is_empty() {
            vec![sentences[ranked[0].0]]
        } else {
            chosen.iter().map(|idx| sentences[*idx]).collect()
        };

        fit_sentences(&picked, max_length)
    }

    fn name(&self) -> &'static str {
        "frequency"
    }
}
