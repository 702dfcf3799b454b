//! Sentence splitting and length-bounded truncation
//!
//! All lengths are counted in characters, not bytes. Every function returns
//! slices of its input.

/// Splits text into trimmed sentences
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of the
/// text, and at every line break (extracted pages keep one block per line).
///
/// # Example
///
/// ```
/// use doc_atlas::describe::sentences::split_sentences;
///
/// let parts = split_sentences("Install it. Then run v1.2 now!\nDone");
/// assert_eq!(parts, vec!["Install it.", "Then run v1.2 now!", "Done"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();

    for line in text.lines() {
        let mut start = 0;
        let mut chars = line.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                let end = idx + c.len_utf8();
                push_trimmed(&mut sentences, &line[start..end]);
                start = end;
            }
        }

        push_trimmed(&mut sentences, &line[start..]);
    }

    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let candidate = candidate.trim();
    if !candidate.is_empty() {
        sentences.push(candidate);
    }
}

/// Returns the longest prefix of `text` within `max_chars` that ends on a
/// sentence boundary, or a word-boundary cut when the first sentence is
/// already too long
pub fn truncate_at_sentence(text: &str, max_chars: usize) -> &str {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text;
    }

    let limit = byte_offset(text, max_chars);
    let head = &text[..limit];

    let boundary = head
        .char_indices()
        .filter(|(idx, c)| {
            let next = text[idx + c.len_utf8()..].chars().next();
            (matches!(c, '.' | '!' | '?') && next.map_or(true, char::is_whitespace)) || *c == '\n'
        })
        .map(|(idx, c)| idx + c.len_utf8())
        .last();

    match boundary {
        Some(end) => text[..end].trim_end(),
        None => truncate_at_word(text, max_chars),
    }
}

/// Cuts `text` to at most `max_chars`, backing up to the last whitespace so
/// no word is split; a single over-long word is cut hard
pub fn truncate_at_word(text: &str, max_chars: usize) -> &str {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text;
    }

    let limit = byte_offset(text, max_chars);
    // The cut is clean if the next character is whitespace
    if text[limit..].starts_with(char::is_whitespace) {
        return text[..limit].trim_end();
    }

    match text[..limit].rfind(char::is_whitespace) {
        Some(space) if space > 0 => text[..space].trim_end(),
        _ => &text[..limit],
    }
}

/// Byte offset of the character at position `chars`, or the text length
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_decimals_and_urls() {
        let parts = split_sentences("Version 2.5 is out. See example.com for notes.");
        assert_eq!(parts, vec!["Version 2.5 is out.", "See example.com for notes."]);
    }

    #[test]
    fn test_split_on_lines() {
        let parts = split_sentences("Heading-like line\n\nBody text here. More");
        assert_eq!(parts, vec!["Heading-like line", "Body text here.", "More"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_sentences("  \n ").is_empty());
    }

    #[test]
    fn test_truncate_at_sentence() {
        let text = "First sentence. Second sentence. Third sentence.";
        assert_eq!(truncate_at_sentence(text, 35), "First sentence. Second sentence.");
        assert_eq!(truncate_at_sentence(text, 16), "First sentence.");
        assert_eq!(truncate_at_sentence(text, 100), text);
    }

    #[test]
    fn test_truncate_at_sentence_falls_back_to_words() {
        let text = "One very long opening sentence without a stop";
        assert_eq!(truncate_at_sentence(text, 14), "One very long");
    }

    #[test]
    fn test_truncate_at_word() {
        assert_eq!(truncate_at_word("alpha beta gamma", 10), "alpha beta");
        assert_eq!(truncate_at_word("alpha beta gamma", 12), "alpha beta");
        assert_eq!(truncate_at_word("alphabetagamma", 5), "alpha");
        assert_eq!(truncate_at_word("short", 10), "short");
    }

    #[test]
    fn test_multibyte_lengths() {
        let text = "Überblick über die Änderungen.";
        let cut = truncate_at_word(text, 9);
        assert_eq!(cut, "Überblick");
        assert!(cut.chars().count() <= 9);
    }
}
