// Highlight Reconciler
// Merges independently sourced AI / plagiarism spans into one non-overlapping segmentation
//
// Interval sweep: every distinct span boundary is a cut point; each elementary interval
// takes the combined type of the spans covering it (Mixed > Plagiarism > AI), the max
// confidence, and the union of sources. Touching intervals of equal type are coalesced.

use crate::models::{push_unique, Span, SpanKind};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("invalid span #{index} [{start}, {end}): {reason}")]
    InvalidSpan {
        index: usize,
        start: usize,
        end: usize,
        reason: String,
    },
}

impl ReconcileError {
    fn invalid(index: usize, span: &Span, reason: impl Into<String>) -> Self {
        ReconcileError::InvalidSpan {
            index,
            start: span.start,
            end: span.end,
            reason: reason.into(),
        }
    }
}

/// Chars `from..to` of `s`, or `None` when `s` is too short.
fn char_slice(s: &str, from: usize, to: usize) -> Option<&str> {
    if from > to {
        return None;
    }
    let mut indices = s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len()));
    let start = indices.nth(from)?;
    let end = if to == from { start } else { indices.nth(to - from - 1)? };
    Some(&s[start..end])
}

/// A validated input span plus the text its offsets are read against.
struct Source<'a> {
    index: usize,
    span: &'a Span,
    view: &'a str,
}

impl<'a> Source<'a> {
    fn covers(&self, a: usize, b: usize) -> bool {
        self.span.start <= a && self.span.end >= b
    }

    fn slice(&self, a: usize, b: usize) -> Option<&'a str> {
        char_slice(self.view, a - self.span.start, b - self.span.start)
    }
}

fn validate<'a>(text: &'a str, text_len: usize, spans: &'a [Span]) -> Result<Vec<Source<'a>>, ReconcileError> {
    let mut sources = Vec::with_capacity(spans.len());
    for (index, span) in spans.iter().enumerate() {
        if span.start >= span.end {
            return Err(ReconcileError::invalid(index, span, "start must be before end"));
        }
        if span.end > text_len {
            return Err(ReconcileError::invalid(
                index,
                span,
                format!("end exceeds text length {}", text_len),
            ));
        }
        // Spans without their own text are read against the analyzed text.
        let view = if span.text.is_empty() {
            char_slice(text, span.start, span.end).unwrap_or_default()
        } else {
            span.text.as_str()
        };
        if view.chars().count() < span.len() {
            return Err(ReconcileError::invalid(index, span, "span text is shorter than its range"));
        }
        if span.kind != SpanKind::Clean {
            sources.push(Source { index, span, view });
        }
    }
    Ok(sources)
}

fn combined_kind(covering: &[&Source]) -> SpanKind {
    let has_ai = covering.iter().any(|s| s.span.kind.flags_ai());
    let has_plagiarism = covering.iter().any(|s| s.span.kind.flags_plagiarism());
    match (has_ai, has_plagiarism) {
        (true, true) => SpanKind::Mixed,
        (_, true) => SpanKind::Plagiarism,
        _ => SpanKind::Ai,
    }
}

/// Reconcile `spans` over `text` into sorted, non-overlapping, coalesced segments.
///
/// Offsets are char offsets into `text`. Uncovered regions are omitted (implicitly clean);
/// input spans of kind `Clean` are ignored and `Mixed` inputs count as both flags.
pub fn reconcile(text: &str, spans: &[Span]) -> Result<Vec<Span>, ReconcileError> {
    if spans.is_empty() {
        return Ok(Vec::new());
    }

    let text_len = text.chars().count();
    let sources = validate(text, text_len, spans)?;

    let points: Vec<usize> = sources
        .iter()
        .flat_map(|s| [s.span.start, s.span.end])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut merged: Vec<Span> = Vec::new();

    for window in points.windows(2) {
        let (a, b) = (window[0], window[1]);
        let covering: Vec<&Source> = sources.iter().filter(|s| s.covers(a, b)).collect();
        let Some(first) = covering.first() else {
            continue;
        };

        let segment_text = first
            .slice(a, b)
            .ok_or_else(|| ReconcileError::invalid(first.index, first.span, "span text is shorter than its range"))?;
        for other in &covering[1..] {
            if other.slice(a, b) != Some(segment_text) {
                return Err(ReconcileError::invalid(
                    other.index,
                    other.span,
                    format!("text disagrees with span #{} over [{}, {})", first.index, a, b),
                ));
            }
        }

        let kind = combined_kind(&covering);
        let confidence = covering
            .iter()
            .map(|s| s.span.confidence)
            .fold(f64::NEG_INFINITY, f64::max);

        match merged.last_mut() {
            Some(prev) if prev.kind == kind && prev.end == a => {
                prev.end = b;
                prev.text.push_str(segment_text);
                prev.confidence = prev.confidence.max(confidence);
                for s in &covering {
                    for src in &s.span.sources {
                        push_unique(&mut prev.sources, src.clone());
                    }
                }
            }
            _ => {
                let mut span = Span::new(kind, a, b, segment_text, confidence);
                for s in &covering {
                    for src in &s.span.sources {
                        push_unique(&mut span.sources, src.clone());
                    }
                }
                merged.push(span);
            }
        }
    }

    debug!(input = spans.len(), output = merged.len(), "highlights.reconciled");
    Ok(merged)
}
