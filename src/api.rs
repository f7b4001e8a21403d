// Async entry points for host applications
// analyze_text: both detection services in parallel -> reconciled report
// humanize_text: humanize pipeline under a deadline, falling back to the input

use crate::models::{AnalysisReport, HumanizeRequest, HumanizeResponse};
use crate::services::analysis::build_report;
use crate::services::config_store::AppConfig;
use crate::services::detectors::DetectorClient;
use crate::services::humanize::{Humanizer, StdRandom};
use crate::services::text_processor::{count_sentences, count_words};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Run AI detection and the plagiarism check concurrently and merge the results.
///
/// A failing service, or one whose spans do not fit `text`, is logged and
/// contributes nothing; a report is always produced.
pub async fn analyze_text(config: &AppConfig, text: &str) -> AnalysisReport {
    let client = DetectorClient::from_config(config);
    analyze_with(&client, text).await
}

pub async fn analyze_with(client: &DetectorClient, text: &str) -> AnalysisReport {
    let start = Instant::now();
    let (ai, plagiarism) = tokio::join!(client.detect_ai(text), client.check_plagiarism(text));

    let ai = ai
        .map_err(|e| warn!(url = client.detection_url(), error = %e, "analyze.ai_detection_failed"))
        .ok();
    let plagiarism = plagiarism
        .map_err(|e| warn!(url = client.plagiarism_url(), error = %e, "analyze.plagiarism_failed"))
        .ok();

    let report = build_report(text, ai.as_ref(), plagiarism.as_ref());
    info!(
        request_id = %report.request_id,
        chars = text.chars().count(),
        highlights = report.highlights.len(),
        ai_pct = report.ai_content_percentage,
        plagiarism_pct = report.plagiarism_percentage,
        elapsed_ms = start.elapsed().as_millis() as i64,
        "analyze.done"
    );
    report
}

/// Humanize on a blocking thread, bounded by `timeouts.humanizeSecs`.
///
/// Any pipeline error, panic or timeout yields the original text unchanged.
pub async fn humanize_text(config: &AppConfig, request: HumanizeRequest) -> HumanizeResponse {
    let deadline = Duration::from_secs(config.timeouts.humanize_secs);
    let original = request.text.clone();

    let task = tokio::task::spawn_blocking(move || {
        Humanizer::default().handle(&request, &mut StdRandom::from_entropy())
    });

    match tokio::time::timeout(deadline, task).await {
        Ok(Ok(Ok(response))) => response,
        Ok(Ok(Err(e))) => {
            warn!(error = %e, "humanize.failed, returning original text");
            unchanged(original)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "humanize.task_aborted, returning original text");
            unchanged(original)
        }
        Err(_) => {
            warn!(timeout_secs = deadline.as_secs(), "humanize.timeout, returning original text");
            unchanged(original)
        }
    }
}

fn unchanged(text: String) -> HumanizeResponse {
    let words = count_words(&text);
    let sentences = count_sentences(&text);
    HumanizeResponse {
        humanized_text: text,
        orig_word_count: words,
        orig_sentence_count: sentences,
        new_word_count: words,
        new_sentence_count: sentences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HumanizeParameters;

    fn unreachable_config() -> AppConfig {
        // Port 9 (discard) on loopback refuses connections without touching the network.
        AppConfig {
            detection_api_url: "http://127.0.0.1:9/detect".to_string(),
            plagiarism_api_url: "http://127.0.0.1:9/plagiarism".to_string(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_analyze_tolerates_failed_services() {
        let report = analyze_text(&unreachable_config(), "Plain text.").await;
        assert_eq!(report.ai_content_percentage, 0);
        assert_eq!(report.original_percentage, 100);
        assert_eq!(report.plagiarism_percentage, 0);
        assert!(report.highlights.is_empty());
        assert_eq!(report.summary, "Content appears human-written.");
    }

    #[tokio::test]
    async fn test_humanize_text_expands_contractions() {
        let request = HumanizeRequest::new("We can't stop.", HumanizeParameters::new(0.0, 0.0));
        let response = humanize_text(&AppConfig::default(), request).await;
        assert_eq!(response.humanized_text, "We cannot stop.");
        assert_eq!(response.orig_word_count, 3);
        assert_eq!(response.new_word_count, 3);
    }

    #[tokio::test]
    async fn test_humanize_text_keeps_citations() {
        let text = "Results (Smith, 2020) are important.";
        let request = HumanizeRequest::new(text, HumanizeParameters::new(1.0, 1.0));
        let response = humanize_text(&AppConfig::default(), request).await;
        assert!(response.humanized_text.contains("(Smith, 2020)"));
    }

    #[test]
    fn test_unchanged_counts() {
        let r = unchanged("One two. Three.".to_string());
        assert_eq!(r.humanized_text, "One two. Three.");
        assert_eq!(r.orig_word_count, 3);
        assert_eq!(r.new_sentence_count, 2);
    }
}
