// Analysis Report
// Turns raw detector / plagiarism responses into typed spans and a summary report

use super::reconciler::{reconcile, ReconcileError};
use crate::models::{AiDetectionResponse, AnalysisReport, PlagiarismResponse, Span, SpanKind};
use tracing::warn;

fn to_offset(value: i64, index: usize, start: i64, end: i64) -> Result<usize, ReconcileError> {
    usize::try_from(value).map_err(|_| ReconcileError::InvalidSpan {
        index,
        start: start.max(0) as usize,
        end: end.max(0) as usize,
        reason: "negative offset".to_string(),
    })
}

/// AI-typed spans from the detection service's flagged lines.
pub fn ai_spans(response: &AiDetectionResponse) -> Result<Vec<Span>, ReconcileError> {
    response
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let start = to_offset(line.start, i, line.start, line.end)?;
            let end = to_offset(line.end, i, line.start, line.end)?;
            Ok(Span::new(SpanKind::Ai, start, end, line.text.clone(), line.confidence))
        })
        .collect()
}

/// Plagiarism-typed spans; missing confidence counts as certain.
pub fn plagiarism_spans(response: &PlagiarismResponse) -> Result<Vec<Span>, ReconcileError> {
    response
        .highlights
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let start = to_offset(h.start, i, h.start, h.end)?;
            let end = to_offset(h.end, i, h.start, h.end)?;
            let span = Span::new(SpanKind::Plagiarism, start, end, h.text.clone(), h.confidence.unwrap_or(1.0));
            Ok(span.with_sources(h.sources.iter().flatten().cloned()))
        })
        .collect()
}

fn percentage(fraction: f64) -> u32 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Share of `text` flagged as AI, from the raw (unmerged) AI spans.
pub fn ai_content_percentage(text: &str, ai: &[Span]) -> u32 {
    let text_len = text.chars().count();
    if ai.is_empty() || text_len == 0 {
        return 0;
    }
    let flagged: usize = ai.iter().map(Span::len).sum();
    percentage(flagged as f64 / text_len as f64)
}

pub fn summarize(ai_percentage: u32) -> String {
    if ai_percentage >= 50 {
        format!("High likelihood of AI-generated content ({}%).", ai_percentage)
    } else if ai_percentage > 0 {
        format!("Some AI content detected ({}%).", ai_percentage)
    } else {
        "Content appears human-written.".to_string()
    }
}

/// Spans of one service, kept only if they reconcile against `text` on their own.
fn checked_side(
    text: &str,
    side: &'static str,
    spans: Result<Vec<Span>, ReconcileError>,
) -> Option<Vec<Span>> {
    match spans.and_then(|s| reconcile(text, &s).map(|_| s)) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(side, error = %e, "report.side_dropped");
            None
        }
    }
}

/// Build the report from whichever service responses are available.
///
/// Never fails: a side whose spans do not fit `text` is dropped like an unreachable
/// service, and if the two sides disagree on the text they cover, only the
/// plagiarism highlights are kept.
pub fn build_report(
    text: &str,
    ai: Option<&AiDetectionResponse>,
    plagiarism: Option<&PlagiarismResponse>,
) -> AnalysisReport {
    let ai_highlights = ai
        .and_then(|resp| checked_side(text, "ai", ai_spans(resp)))
        .unwrap_or_default();
    let plagiarism = plagiarism
        .and_then(|resp| checked_side(text, "plagiarism", plagiarism_spans(resp)).map(|s| (resp, s)));

    let ai_content_percentage = ai_content_percentage(text, &ai_highlights);
    let plagiarism_percentage = plagiarism
        .as_ref()
        .map(|(resp, _)| percentage(resp.effective_score()))
        .unwrap_or(0);
    let plagiarism_highlights = plagiarism.map(|(_, s)| s).unwrap_or_default();

    let mut all = ai_highlights;
    all.extend(plagiarism_highlights.iter().cloned());
    let highlights = match reconcile(text, &all) {
        Ok(h) => h,
        Err(e) => {
            warn!(error = %e, "report.sides_disagree, keeping plagiarism highlights");
            reconcile(text, &plagiarism_highlights).unwrap_or_default()
        }
    };

    AnalysisReport {
        request_id: uuid::Uuid::new_v4().to_string(),
        ai_content_percentage,
        plagiarism_percentage,
        original_percentage: 100 - ai_content_percentage,
        highlights,
        summary: summarize(ai_content_percentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "The first sentence is here. The second one follows it.";

    fn ai_response(json: &str) -> AiDetectionResponse {
        serde_json::from_str(json).unwrap()
    }

    fn plagiarism_response(json: &str) -> PlagiarismResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_report_without_services() {
        let report = build_report(TEXT, None, None);
        assert_eq!(report.ai_content_percentage, 0);
        assert_eq!(report.original_percentage, 100);
        assert_eq!(report.plagiarism_percentage, 0);
        assert!(report.highlights.is_empty());
        assert_eq!(report.summary, "Content appears human-written.");
        assert!(!report.request_id.is_empty());
    }

    #[test]
    fn test_report_merges_both_services() {
        let ai = ai_response(
            r#"{"lines":[{"text":"The first sentence is here.","start":0,"end":27,"confidence":0.93}]}"#,
        );
        let plag = plagiarism_response(
            r#"{"plagiarism_score":0.236,"highlights":[{"start":10,"end":35,"text":"sentence is here. The sec","sources":["https://example.org/a"]}]}"#,
        );
        let report = build_report(TEXT, Some(&ai), Some(&plag));

        assert_eq!(report.ai_content_percentage, 50);
        assert_eq!(report.original_percentage, 50);
        assert_eq!(report.plagiarism_percentage, 24);
        assert_eq!(report.summary, "High likelihood of AI-generated content (50%).");

        let kinds: Vec<SpanKind> = report.highlights.iter().map(|h| h.kind).collect();
        assert_eq!(kinds, vec![SpanKind::Ai, SpanKind::Mixed, SpanKind::Plagiarism]);
        assert_eq!(report.highlights[1].text, "sentence is here.");
        assert_eq!(report.highlights[2].confidence, 1.0);
        assert_eq!(report.highlights[2].sources, vec!["https://example.org/a".to_string()]);
    }

    #[test]
    fn test_some_ai_summary() {
        let ai = ai_response(r#"{"lines":[{"text":"The","start":0,"end":3,"confidence":0.6}]}"#);
        let report = build_report(TEXT, Some(&ai), None);
        assert_eq!(report.ai_content_percentage, 6);
        assert_eq!(report.summary, "Some AI content detected (6%).");
    }

    #[test]
    fn test_ai_percentage_is_capped() {
        let spans = vec![
            Span::new(SpanKind::Ai, 0, 4, "abcd", 1.0),
            Span::new(SpanKind::Ai, 0, 4, "abcd", 1.0),
        ];
        assert_eq!(ai_content_percentage("abcd", &spans), 100);
    }

    #[test]
    fn test_negative_offsets_are_invalid() {
        let ai = ai_response(r#"{"lines":[{"text":"x","start":-1,"end":3,"confidence":0.6}]}"#);
        assert!(matches!(ai_spans(&ai), Err(ReconcileError::InvalidSpan { index: 0, .. })));
    }

    #[test]
    fn test_score_alias() {
        let plag = plagiarism_response(r#"{"score":0.5,"highlights":[]}"#);
        let report = build_report(TEXT, None, Some(&plag));
        assert_eq!(report.plagiarism_percentage, 50);
    }

    const PLAG_SECOND: &str = r#"{"score":0.4,"highlights":[{"start":28,"end":54,"text":"The second one follows it.","sources":["S"]}]}"#;

    #[test]
    fn test_out_of_range_ai_side_is_dropped() {
        let ai = ai_response(r#"{"lines":[{"text":"","start":0,"end":999,"confidence":0.9}]}"#);
        let plag = plagiarism_response(PLAG_SECOND);
        let report = build_report(TEXT, Some(&ai), Some(&plag));

        assert_eq!(report.ai_content_percentage, 0);
        assert_eq!(report.plagiarism_percentage, 40);
        assert_eq!(report.highlights.len(), 1);
        assert_eq!(report.highlights[0].kind, SpanKind::Plagiarism);
        assert_eq!(report.highlights[0].text, "The second one follows it.");
    }

    #[test]
    fn test_negative_plagiarism_side_is_dropped() {
        let ai = ai_response(
            r#"{"lines":[{"text":"The first sentence is here.","start":0,"end":27,"confidence":0.93}]}"#,
        );
        let plag = plagiarism_response(r#"{"score":0.9,"highlights":[{"start":-4,"end":2,"text":"Th"}]}"#);
        let report = build_report(TEXT, Some(&ai), Some(&plag));

        assert_eq!(report.plagiarism_percentage, 0);
        assert_eq!(report.ai_content_percentage, 50);
        assert_eq!(report.highlights.len(), 1);
        assert_eq!(report.highlights[0].kind, SpanKind::Ai);
    }

    #[test]
    fn test_disagreeing_sides_keep_plagiarism_highlights() {
        let ai = ai_response(
            r#"{"lines":[{"text":"XXX second one follows it.","start":28,"end":54,"confidence":0.7}]}"#,
        );
        let plag = plagiarism_response(PLAG_SECOND);
        let report = build_report(TEXT, Some(&ai), Some(&plag));

        assert_eq!(report.highlights.len(), 1);
        assert_eq!(report.highlights[0].kind, SpanKind::Plagiarism);
        assert_eq!(report.highlights[0].sources, vec!["S".to_string()]);
        assert_eq!(report.ai_content_percentage, 48);
    }
}
