// Part-of-Speech Tagger
// Tokenizes a sentence losslessly and tags word tokens with a coarse word class

use super::citation_guard::PLACEHOLDER_MARKER;
use super::synonyms::dictionary_class;
use crate::services::text_processor::TextError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Adjective,
    Noun,
    Verb,
    Adverb,
    Other,
}

impl PartOfSpeech {
    /// Open word classes whose members may be swapped for a synonym.
    pub fn is_content(&self) -> bool {
        !matches!(self, PartOfSpeech::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Placeholder,
    Whitespace,
    Punctuation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub pos: PartOfSpeech,
}

impl Token {
    fn untagged(text: &str, kind: TokenKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
            pos: PartOfSpeech::Other,
        }
    }
}

/// Concatenate token texts back into a sentence.
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// Produces tagged tokens whose texts concatenate back to the input exactly.
pub trait PosTagger {
    fn tag(&self, sentence: &str) -> Result<Vec<Token>, TextError>;
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\[\[REF_\d+\]\]|[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|\s+|.")
            .expect("tagger token regex")
    })
}

// Determiners, pronouns, prepositions, conjunctions, auxiliaries and particles.
const CLOSED_CLASS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every", "no",
    "all", "both", "either", "neither", "i", "me", "my", "mine", "you", "your", "yours", "he",
    "him", "his", "she", "her", "hers", "it", "its", "we", "us", "our", "ours", "they", "them",
    "their", "theirs", "who", "whom", "whose", "which", "what", "of", "in", "on", "at", "by",
    "for", "with", "from", "to", "into", "onto", "over", "under", "about", "above", "below",
    "between", "through", "during", "without", "within", "across", "against", "among", "and",
    "or", "but", "nor", "so", "yet", "if", "because", "although", "though", "while", "whereas",
    "unless", "since", "than", "as", "is", "am", "are", "was", "were", "be", "been", "being",
    "do", "does", "did", "have", "has", "had", "will", "would", "shall", "should", "can",
    "cannot", "could", "may", "might", "must", "not", "there", "here", "then",
];

fn is_closed_class(lower: &str) -> bool {
    CLOSED_CLASS.contains(&lower)
}

fn guess_by_suffix(lower: &str) -> PartOfSpeech {
    let n = lower.chars().count();
    if n > 4 && lower.ends_with("ly") {
        return PartOfSpeech::Adverb;
    }
    const ADJECTIVE: &[&str] = &["ous", "ful", "ive", "able", "ible", "ical", "less", "ish", "ic", "al"];
    const VERB: &[&str] = &["ize", "ise", "ify", "ate", "ed", "ing"];
    if n > 4 && ADJECTIVE.iter().any(|s| lower.ends_with(s)) {
        return PartOfSpeech::Adjective;
    }
    if n > 4 && VERB.iter().any(|s| lower.ends_with(s)) {
        return PartOfSpeech::Verb;
    }
    PartOfSpeech::Noun
}

/// Lexicon-and-suffix tagger for English.
///
/// Closed-class words and numerals are `Other`; words the synonym dictionary knows keep
/// their dictionary class; everything else is guessed from its ending.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn classify(word: &str) -> PartOfSpeech {
        if word.chars().any(|c| c.is_numeric()) {
            return PartOfSpeech::Other;
        }
        let lower = word.to_lowercase();
        if is_closed_class(&lower) {
            return PartOfSpeech::Other;
        }
        dictionary_class(&lower).unwrap_or_else(|| guess_by_suffix(&lower))
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, sentence: &str) -> Result<Vec<Token>, TextError> {
        let tokens = token_re()
            .find_iter(sentence)
            .map(|m| {
                let text = m.as_str();
                if text.starts_with(PLACEHOLDER_MARKER) {
                    Token::untagged(text, TokenKind::Placeholder)
                } else if text.chars().all(char::is_whitespace) {
                    Token::untagged(text, TokenKind::Whitespace)
                } else if text.chars().next().map(char::is_alphanumeric).unwrap_or(false) {
                    Token {
                        text: text.to_string(),
                        kind: TokenKind::Word,
                        pos: Self::classify(text),
                    }
                } else {
                    Token::untagged(text, TokenKind::Punctuation)
                }
            })
            .collect();
        Ok(tokens)
    }
}
