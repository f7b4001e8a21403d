// Contraction Expander
// Rewrites contracted forms ("can't", "we're") into their full forms

use regex::Regex;
use std::sync::OnceLock;

const WHOLE_CONTRACTIONS: &[(&str, &str)] = &[
    ("can't", "cannot"),
    ("won't", "will not"),
    ("shan't", "shall not"),
    ("ain't", "is not"),
    ("i'm", "i am"),
    ("it's", "it is"),
    ("we're", "we are"),
    ("they're", "they are"),
    ("you're", "you are"),
    ("he's", "he is"),
    ("she's", "she is"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("what's", "what is"),
    ("who's", "who is"),
    ("let's", "let us"),
    ("didn't", "did not"),
    ("doesn't", "does not"),
    ("don't", "do not"),
    ("couldn't", "could not"),
    ("shouldn't", "should not"),
    ("wouldn't", "would not"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("weren't", "were not"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("hadn't", "had not"),
];

// Tried in order; the first suffix that matches wins.
// "'s" always expands to "is" (possessives included).
const SUFFIX_CONTRACTIONS: &[(&str, &str)] = &[
    ("n't", " not"),
    ("'re", " are"),
    ("'s", " is"),
    ("'ll", " will"),
    ("'ve", " have"),
    ("'d", " would"),
    ("'m", " am"),
];

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9_']+").expect("contraction token regex"))
}

/// Copy the leading-capital shape of `original` onto `replacement`.
pub fn match_leading_case(original: &str, replacement: &str) -> String {
    let starts_upper = original.chars().next().map(char::is_uppercase).unwrap_or(false);
    if !starts_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn expand_whole(token: &str, lower: &str) -> Option<String> {
    WHOLE_CONTRACTIONS
        .iter()
        .find(|(contracted, _)| *contracted == lower)
        .map(|(_, full)| match_leading_case(token, full))
}

/// The suffix entry `lower` ends with, unless `lower` is that bare suffix.
fn suffix_of(lower: &str) -> Option<&'static (&'static str, &'static str)> {
    SUFFIX_CONTRACTIONS
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix) && lower != *suffix)
}

/// Expand a single token, or `None` when it is not a contraction.
///
/// Stacked forms ("can't've") expand fully in one pass: suffixes are peeled off
/// right to left until the remaining base is a whole contraction or no suffix matches.
pub fn expand_token(token: &str) -> Option<String> {
    // ASCII lowering keeps byte offsets aligned with `token`.
    let lower = token.to_ascii_lowercase();
    let mut end = token.len();
    let mut peeled: Vec<&str> = Vec::new();

    let base = loop {
        if let Some(full) = expand_whole(&token[..end], &lower[..end]) {
            break full;
        }
        match suffix_of(&lower[..end]) {
            Some((suffix, expansion)) => {
                peeled.push(expansion);
                end -= suffix.len();
            }
            None if peeled.is_empty() => return None,
            None => break token[..end].to_string(),
        }
    };

    let mut out = base;
    for expansion in peeled.iter().rev() {
        out.push_str(expansion);
    }
    Some(out)
}

/// Expand every contraction in `text`; everything else passes through untouched.
pub fn expand(text: &str) -> String {
    if !text.contains('\'') {
        return text.to_string();
    }
    token_re()
        .replace_all(text, |caps: &regex::Captures| {
            let token = &caps[0];
            expand_token(token).unwrap_or_else(|| token.to_string())
        })
        .into_owned()
}
