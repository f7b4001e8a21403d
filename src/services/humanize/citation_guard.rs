// Citation Guard
// Hides parenthetical author-year citations behind placeholders during rewriting
//
// Recognised shape, e.g. "(Smith & Jones, 2019)" or "(Lee et al., 2020, pp. 4-9)":
//   '(' name-chars+ ',' ws* year(4 digits) [',' ws* p|pp '.' ws* digits ['-' digits]] ws* ')'
// where name-chars are ASCII letters, '&', '-', ',', '.', and whitespace.
// The scanner is linear in the length of each candidate, with no backtracking.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[\s*\[\s*REF_(\d+)\s*\]\s*\]").expect("placeholder regex")
    })
}

/// Placeholder text for the `n`-th (1-based) citation.
pub fn placeholder(n: usize) -> String {
    format!("[[REF_{}]]", n)
}

/// Marker shared by every placeholder; tokens containing it are never rewritten.
pub const PLACEHOLDER_MARKER: &str = "[[REF_";

/// Placeholder → original citation, valid for a single humanize call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationMap {
    originals: Vec<String>,
}

impl CitationMap {
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Original citation recorded for a canonical placeholder such as `[[REF_2]]`.
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        let n: usize = placeholder
            .strip_prefix(PLACEHOLDER_MARKER)?
            .strip_suffix("]]")?
            .parse()
            .ok()?;
        self.by_index(n)
    }

    fn by_index(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.originals.get(i))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.originals
            .iter()
            .enumerate()
            .map(|(i, s)| (placeholder(i + 1), s.as_str()))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '&' | '-' | ',' | '.') || c.is_whitespace()
}

fn skip_whitespace(chars: &[(usize, char)], mut k: usize) -> usize {
    while k < chars.len() && chars[k].1.is_whitespace() {
        k += 1;
    }
    k
}

fn skip_digits(chars: &[(usize, char)], mut k: usize) -> usize {
    while k < chars.len() && chars[k].1.is_ascii_digit() {
        k += 1;
    }
    k
}

fn expect_char(chars: &[(usize, char)], k: usize, c: char) -> Option<usize> {
    (k < chars.len() && chars[k].1 == c).then_some(k + 1)
}

fn match_close(chars: &[(usize, char)], k: usize) -> Option<usize> {
    expect_char(chars, skip_whitespace(chars, k), ')')
}

// ", p. 12" / ", pp. 12-19"
fn match_page(chars: &[(usize, char)], k: usize) -> Option<usize> {
    let k = expect_char(chars, k, ',')?;
    let k = expect_char(chars, skip_whitespace(chars, k), 'p')?;
    let k = expect_char(chars, k, 'p').unwrap_or(k);
    let k = skip_whitespace(chars, expect_char(chars, k, '.')?);
    let end = skip_digits(chars, k);
    if end == k {
        return None;
    }
    if let Some(after_dash) = expect_char(chars, end, '-') {
        let range_end = skip_digits(chars, after_dash);
        if range_end > after_dash {
            return Some(range_end);
        }
    }
    Some(end)
}

/// Char index just past the closing paren of a citation opening at `open`.
fn match_citation_at(chars: &[(usize, char)], open: usize) -> Option<usize> {
    let mut name_end = open + 1;
    while name_end < chars.len() && is_name_char(chars[name_end].1) {
        name_end += 1;
    }

    // The separating comma is the last one in the name run, followed only by whitespace.
    let mut p = name_end;
    while p > open + 1 && chars[p - 1].1.is_whitespace() {
        p -= 1;
    }
    if p < open + 3 || chars[p - 1].1 != ',' {
        return None;
    }

    let mut year_end = name_end;
    for _ in 0..4 {
        if year_end < chars.len() && chars[year_end].1.is_ascii_digit() {
            year_end += 1;
        } else {
            return None;
        }
    }

    if let Some(close) = match_page(chars, year_end).and_then(|k| match_close(chars, k)) {
        return Some(close);
    }
    match_close(chars, year_end)
}

/// Byte ranges of every citation, left to right, non-overlapping.
pub fn find_citations(text: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut found = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i].1 == '(' {
            if let Some(end) = match_citation_at(&chars, i) {
                let end_byte = chars.get(end).map(|(b, _)| *b).unwrap_or(text.len());
                found.push((chars[i].0, end_byte));
                i = end;
                continue;
            }
        }
        i += 1;
    }

    found
}

/// Replace each citation with `[[REF_<n>]]` and remember what it was.
pub fn protect(text: &str) -> (String, CitationMap) {
    let ranges = find_citations(text);
    let mut map = CitationMap::default();
    if ranges.is_empty() {
        return (text.to_string(), map);
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for (start, end) in ranges {
        out.push_str(&text[cursor..start]);
        map.originals.push(text[start..end].to_string());
        out.push_str(&placeholder(map.originals.len()));
        cursor = end;
    }
    out.push_str(&text[cursor..]);

    debug!(citations = map.len(), "citations.protected");
    (out, map)
}

/// Put the recorded citations back. Placeholders without a mapping are left as they are.
pub fn restore(text: &str, map: &CitationMap) -> String {
    placeholder_re()
        .replace_all(text, |caps: &regex::Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|n| map.by_index(n))
                .map(str::to_string)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
