// Text Processing Service
// Sentence boundaries, counting and final spacing cleanup

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// Failures raised by pluggable text-analysis steps (splitters, taggers).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextError {
    #[error("sentence segmentation failed: {0}")]
    Segmentation(String),
    #[error("part-of-speech tagging failed: {0}")]
    Tagging(String),
}

// Dot-ending abbreviations that never close a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "etc", "vs", "cf", "al", "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st",
    "fig", "eq", "inc", "ltd", "corp", "approx", "vol", "pp", "p",
];

fn space_before_punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+([.,;:!?])").expect("space before punct regex"))
}

fn space_after_open_paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([ \t]+").expect("open paren regex"))
}

fn space_before_close_paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+\)").expect("close paren regex"))
}

fn multi_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]{2,}").expect("multi space regex"))
}

fn backtick_quote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"``[ \t]*(.+?)[ \t]*''").expect("backtick quote regex"))
}

/// Final cleanup applied after rewriting.
///
/// Only horizontal whitespace is touched, so the number of lines never changes.
pub fn normalize_spacing(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let s = space_before_punct_re().replace_all(text, "$1");
    let s = space_after_open_paren_re().replace_all(&s, "(");
    let s = space_before_close_paren_re().replace_all(&s, ")");
    let s = multi_space_re().replace_all(&s, " ");
    let s = backtick_quote_re().replace_all(&s, "\"$1\"");
    s.into_owned()
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count sentences line by line, so a line without closing punctuation
/// still counts as one sentence.
pub fn count_sentences(text: &str) -> usize {
    text.lines()
        .filter(|ln| !ln.trim().is_empty())
        .map(|ln| split_sentences_advanced(ln).len())
        .sum()
}

/// Count lines the way `split('\n')` does: an empty string is one line.
pub fn count_lines(text: &str) -> usize {
    text.split('\n').count()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceOffset {
    pub text: String,
    /// UTF-8 byte offset of the trimmed sentence.
    pub start: usize,
    /// UTF-8 byte offset (end-exclusive) of the trimmed sentence.
    pub end: usize,
}

/// Splits a line of text into sentences.
pub trait SentenceSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>, TextError>;
}

/// Punctuation-driven splitter with decimal, quote and abbreviation guards.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSentenceSplitter;

impl SentenceSplitter for RuleSentenceSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>, TextError> {
        Ok(split_sentences_advanced(text)
            .into_iter()
            .map(|s| s.text)
            .collect())
    }
}

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?' | '…' | '。' | '！' | '？')
}

fn is_cjk_terminator(ch: char) -> bool {
    matches!(ch, '。' | '！' | '？')
}

fn is_closer(ch: char) -> bool {
    matches!(ch, ')' | ']' | '\'' | '\u{2019}')
}

fn is_decimal_point(chars: &[(usize, char)], i: usize) -> bool {
    i > 0
        && i + 1 < chars.len()
        && chars[i - 1].1.is_ascii_digit()
        && chars[i + 1].1.is_ascii_digit()
}

fn is_abbreviation_before(chars: &[(usize, char)], dot: usize) -> bool {
    let mut k = dot;
    while k > 0 && (chars[k - 1].1.is_alphabetic() || chars[k - 1].1 == '.') {
        k -= 1;
    }
    let word: String = chars[k..dot].iter().map(|(_, c)| *c).collect();
    if word.is_empty() {
        return false;
    }
    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        if first.is_uppercase() {
            return true;
        }
    }
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.trim_end_matches('.'))
}

fn next_word_starts_lowercase(chars: &[(usize, char)], from: usize) -> bool {
    chars[from..]
        .iter()
        .map(|(_, c)| *c)
        .find(|c| !c.is_whitespace())
        .map(|c| c.is_lowercase())
        .unwrap_or(false)
}

fn push_sentence(text: &str, start: usize, end: usize, out: &mut Vec<SentenceOffset>) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    out.push(SentenceOffset {
        text: trimmed.to_string(),
        start: start + lead,
        end: start + lead + trimmed.len(),
    });
}

/// Sentence splitting with offset tracking
pub fn split_sentences_advanced(text: &str) -> Vec<SentenceOffset> {
    let mut sentences = Vec::new();
    if text.trim().is_empty() {
        return sentences;
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut current_start = 0usize;
    let mut in_quote = false;
    let mut i = 0usize;

    while i < chars.len() {
        let ch = chars[i].1;
        match ch {
            '"' => in_quote = !in_quote,
            '\u{201c}' => in_quote = true,
            '\u{201d}' => in_quote = false,
            _ => {}
        }

        if !is_terminator(ch) || in_quote || (ch == '.' && is_decimal_point(&chars, i)) {
            i += 1;
            continue;
        }

        // Absorb runs like "?!" or ".)" into the current sentence.
        let mut j = i + 1;
        while j < chars.len() && (is_terminator(chars[j].1) || is_closer(chars[j].1)) {
            j += 1;
        }

        let at_end = j >= chars.len();
        let followed_by_space = at_end || chars[j].1.is_whitespace();
        if !followed_by_space && !is_cjk_terminator(ch) {
            i = j;
            continue;
        }
        if ch == '.'
            && !at_end
            && (is_abbreviation_before(&chars, i) || next_word_starts_lowercase(&chars, j))
        {
            i = j;
            continue;
        }

        let end = if at_end { text.len() } else { chars[j].0 };
        push_sentence(text, current_start, end, &mut sentences);
        current_start = end;
        i = j;
    }

    if current_start < text.len() {
        push_sentence(text, current_start, text.len(), &mut sentences);
    }

    sentences
}
