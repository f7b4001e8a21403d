// Analysis Module
// - reconciler: merges AI and plagiarism spans into non-overlapping typed highlights
// - report: builds the analysis report from detector responses

pub mod reconciler;
pub mod report;

pub use reconciler::{reconcile, ReconcileError};
pub use report::{ai_content_percentage, ai_spans, build_report, plagiarism_spans, summarize};
