// RephraseAI Data Models
// Shared by the humanizer, the highlight reconciler and the service glue

use serde::{Deserialize, Serialize};

// ============ Spans ============

/// Annotation type of a highlighted region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Ai,
    Plagiarism,
    Mixed,
    Clean,
}

impl SpanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Ai => "ai",
            SpanKind::Plagiarism => "plagiarism",
            SpanKind::Mixed => "mixed",
            SpanKind::Clean => "clean",
        }
    }

    /// True when this kind carries an AI-authorship flag (plain or mixed).
    pub fn flags_ai(&self) -> bool {
        matches!(self, SpanKind::Ai | SpanKind::Mixed)
    }

    /// True when this kind carries a plagiarism flag (plain or mixed).
    pub fn flags_plagiarism(&self) -> bool {
        matches!(self, SpanKind::Plagiarism | SpanKind::Mixed)
    }
}

/// A typed, confidence-scored range over a text.
///
/// `start`/`end` are half-open char offsets into the analyzed text and
/// `text` is the slice they cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "type")]
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl Span {
    pub fn new(kind: SpanKind, start: usize, end: usize, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            kind,
            start,
            end,
            text: text.into(),
            confidence,
            sources: Vec::new(),
        }
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for s in sources {
            push_unique(&mut self.sources, s.into());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append `item` unless it is already present, keeping first-seen order.
pub fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.iter().any(|s| *s == item) {
        list.push(item);
    }
}

// ============ Humanize ============

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeParameters {
    pub synonym_intensity: f64,
    pub transition_frequency: f64,
}

impl HumanizeParameters {
    /// Build parameters with both probabilities clamped to [0, 1] (NaN maps to 0).
    pub fn new(synonym_intensity: f64, transition_frequency: f64) -> Self {
        Self {
            synonym_intensity: clamp_unit(synonym_intensity),
            transition_frequency: clamp_unit(transition_frequency),
        }
    }

    pub fn clamped(self) -> Self {
        Self::new(self.synonym_intensity, self.transition_frequency)
    }
}

impl Default for HumanizeParameters {
    fn default() -> Self {
        Self::new(default_intensity(), default_intensity())
    }
}

fn clamp_unit(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Humanize invocation as received on the stdin command surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_intensity", alias = "synonymIntensity")]
    pub p_syn: f64,
    #[serde(default = "default_intensity", alias = "transitionFrequency")]
    pub p_trans: f64,
    #[serde(default = "default_true")]
    pub preserve_linebreaks: bool,
}

impl HumanizeRequest {
    pub fn new(text: impl Into<String>, params: HumanizeParameters) -> Self {
        Self {
            text: text.into(),
            p_syn: params.synonym_intensity,
            p_trans: params.transition_frequency,
            preserve_linebreaks: true,
        }
    }

    pub fn parameters(&self) -> HumanizeParameters {
        HumanizeParameters::new(self.p_syn, self.p_trans)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanizeResponse {
    #[serde(alias = "humanizedText")]
    pub humanized_text: String,
    pub orig_word_count: usize,
    pub orig_sentence_count: usize,
    pub new_word_count: usize,
    pub new_sentence_count: usize,
}

// ============ External Detection Services ============

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequest<'a> {
    pub text: &'a str,
}

/// One AI-flagged line reported by the detection service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedLine {
    #[serde(default)]
    pub text: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiDetectionResponse {
    #[serde(default)]
    pub lines: Vec<DetectedLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlagiarismHighlight {
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlagiarismResponse {
    #[serde(default)]
    pub plagiarism_score: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub highlights: Vec<PlagiarismHighlight>,
}

impl PlagiarismResponse {
    /// `plagiarism_score`, falling back to `score`, falling back to 0.
    pub fn effective_score(&self) -> f64 {
        self.plagiarism_score.or(self.score).unwrap_or(0.0)
    }
}

// ============ Analysis Report ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub request_id: String,
    pub ai_content_percentage: u32,
    pub plagiarism_percentage: u32,
    pub original_percentage: u32,
    pub highlights: Vec<Span>,
    pub summary: String,
}

// ============ Default Value Functions ============

fn default_true() -> bool { true }
fn default_intensity() -> f64 { 0.2 }
