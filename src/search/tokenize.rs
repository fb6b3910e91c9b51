// src/search/tokenize.rs

//! Splitting text into search tokens

/// Common words that are never indexed or searched for
pub const STOP_WORDS: &[&str] = &[
    "about", "all", "also", "and", "any", "application", "are", "but", "can", "for", "from",
    "get", "has", "have", "into", "its", "like", "more", "not", "only", "other", "our", "out",
    "program", "such", "that", "the", "their", "them", "this", "use", "using", "was", "will",
    "with", "you", "your",
];

/// Characters that mark markup or placeholders rather than words
const REJECT_CHARS: &[char] = &['<', '>', '(', ')'];

/// Split free text into lowercase words
///
/// Words break on whitespace and punctuation except `-`. A hyphenated word
/// is emitted whole and then once per part, so "x-plane" yields "x-plane",
/// "x" and "plane".
pub fn split_words(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut words = Vec::new();
    for word in lower.split(|c: char| c.is_whitespace() || (c.is_ascii_punctuation() && c != '-')) {
        let word = word.trim_matches('-');
        if word.is_empty() {
            continue;
        }
        words.push(word.to_string());
        if word.contains('-') {
            words.extend(
                word.split('-')
                    .filter(|part| !part.is_empty())
                    .map(str::to_string),
            );
        }
    }
    words
}

/// Whether a word may become a token at all
pub fn is_indexable(word: &str, min_length: usize) -> bool {
    word.chars().count() >= min_length && !word.contains(REJECT_CHARS)
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Plain text of a description, with markup tags removed
pub fn strip_markup(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}
