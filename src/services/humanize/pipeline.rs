// Humanize Pipeline
// protect citations -> rewrite -> restore citations -> normalize spacing

use super::citation_guard;
use super::pos_tagger::{LexiconTagger, PosTagger};
use super::random::{RandomSource, StdRandom};
use super::rewriter::Rewriter;
use crate::models::{HumanizeParameters, HumanizeRequest, HumanizeResponse};
use crate::services::text_processor::{
    count_sentences, count_words, normalize_spacing, RuleSentenceSplitter, SentenceSplitter,
    TextError,
};
use tracing::debug;

/// Humanizer with pluggable sentence splitter and tagger.
///
/// Holds no per-call state; each call owns its citation map, so one instance can be
/// shared across threads.
pub struct Humanizer {
    splitter: Box<dyn SentenceSplitter + Send + Sync>,
    tagger: Box<dyn PosTagger + Send + Sync>,
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new(Box::new(RuleSentenceSplitter), Box::new(LexiconTagger))
    }
}

impl Humanizer {
    pub fn new(
        splitter: Box<dyn SentenceSplitter + Send + Sync>,
        tagger: Box<dyn PosTagger + Send + Sync>,
    ) -> Self {
        Self { splitter, tagger }
    }

    fn rewriter(&self) -> Rewriter<'_> {
        Rewriter::new(self.splitter.as_ref(), self.tagger.as_ref())
    }

    /// Humanize `text`, keeping its line structure.
    pub fn humanize(
        &self,
        text: &str,
        params: HumanizeParameters,
        rng: &mut dyn RandomSource,
    ) -> Result<String, TextError> {
        self.run(text, params, rng, true)
    }

    /// Humanize `text` as one sentence stream; line breaks collapse to spaces.
    pub fn humanize_flat(
        &self,
        text: &str,
        params: HumanizeParameters,
        rng: &mut dyn RandomSource,
    ) -> Result<String, TextError> {
        self.run(text, params, rng, false)
    }

    fn run(
        &self,
        text: &str,
        params: HumanizeParameters,
        rng: &mut dyn RandomSource,
        preserve_linebreaks: bool,
    ) -> Result<String, TextError> {
        let params = params.clamped();
        let (protected, citations) = citation_guard::protect(text);

        let rewriter = self.rewriter();
        let rewritten = if preserve_linebreaks {
            rewriter.rewrite_text(&protected, params, rng)?
        } else {
            rewriter.rewrite_flat(&protected, params, rng)?
        };

        let restored = citation_guard::restore(&rewritten, &citations);
        let out = normalize_spacing(&restored);
        debug!(
            in_chars = text.len(),
            out_chars = out.len(),
            citations = citations.len(),
            synonym_intensity = params.synonym_intensity,
            transition_frequency = params.transition_frequency,
            "humanize.done"
        );
        Ok(out)
    }

    /// Serve a humanize request, with before/after word and sentence counts.
    pub fn handle(
        &self,
        request: &HumanizeRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<HumanizeResponse, TextError> {
        let params = request.parameters();
        let humanized_text = if request.preserve_linebreaks {
            self.humanize(&request.text, params, rng)?
        } else {
            self.humanize_flat(&request.text, params, rng)?
        };

        Ok(HumanizeResponse {
            orig_word_count: count_words(&request.text),
            orig_sentence_count: count_sentences(&request.text),
            new_word_count: count_words(&humanized_text),
            new_sentence_count: count_sentences(&humanized_text),
            humanized_text,
        })
    }
}

/// Humanize with the built-in splitter and tagger and an entropy-seeded generator.
///
/// The built-in steps cannot fail; should they ever, the original text is returned.
pub fn humanize(text: &str, params: HumanizeParameters) -> String {
    Humanizer::default()
        .humanize(text, params, &mut StdRandom::from_entropy())
        .unwrap_or_else(|_| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanize::random::FixedRandom;
    use crate::services::humanize::transitions::ACADEMIC_TRANSITIONS;
    use crate::services::text_processor::count_lines;
    use proptest::prelude::*;

    fn zero() -> HumanizeParameters {
        HumanizeParameters::new(0.0, 0.0)
    }

    #[test]
    fn test_zero_intensity_only_expands_contractions() {
        assert_eq!(humanize("I can't do it.", zero()), "I cannot do it.");
    }

    #[test]
    fn test_zero_intensity_normalizes_spacing() {
        let out = humanize("It isn't  clear ( really ) .", zero());
        assert_eq!(out, "It is not clear (really).");
    }

    #[test]
    fn test_full_transition_frequency() {
        let out = Humanizer::default()
            .humanize("The results were clear.", HumanizeParameters::new(0.0, 1.0), &mut FixedRandom(0.0))
            .unwrap();
        assert!(ACADEMIC_TRANSITIONS.iter().any(|t| out.starts_with(t)), "got {out}");
        assert!(out.ends_with("The results were clear."));
    }

    #[test]
    fn test_citations_survive_full_intensity() {
        let text = "The important results (Smith et al., 2020, pp. 4-5) show a clear effect (Lee & Park, 2019).";
        let out = Humanizer::default()
            .humanize(text, HumanizeParameters::new(1.0, 1.0), &mut FixedRandom(0.0))
            .unwrap();
        assert!(out.contains("(Smith et al., 2020, pp. 4-5)"), "got {out}");
        assert!(out.contains("(Lee & Park, 2019)"), "got {out}");
        assert!(out.contains("significant"));
    }

    #[test]
    fn test_line_structure_is_kept() {
        let text = "Title line\n\nIt's a big problem. We can't ignore it.\n\n\nEnd.";
        let out = Humanizer::default()
            .humanize(text, HumanizeParameters::new(1.0, 1.0), &mut FixedRandom(0.0))
            .unwrap();
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_flat_mode_joins_lines() {
        let out = Humanizer::default()
            .humanize_flat("One.\n\nTwo.", zero(), &mut FixedRandom(0.0))
            .unwrap();
        assert_eq!(out, "One. Two.");
    }

    #[test]
    fn test_handle_reports_counts() {
        let req = HumanizeRequest::new("We don't know. It works.", zero());
        let resp = Humanizer::default().handle(&req, &mut FixedRandom(0.0)).unwrap();
        assert_eq!(resp.humanized_text, "We do not know. It works.");
        assert_eq!(resp.orig_word_count, 5);
        assert_eq!(resp.new_word_count, 6);
        assert_eq!(resp.orig_sentence_count, 2);
        assert_eq!(resp.new_sentence_count, 2);
    }

    struct BrokenSplitter;

    impl SentenceSplitter for BrokenSplitter {
        fn split(&self, _text: &str) -> Result<Vec<String>, TextError> {
            Err(TextError::Segmentation("no model".to_string()))
        }
    }

    #[test]
    fn test_splitter_failure_surfaces() {
        let h = Humanizer::new(Box::new(BrokenSplitter), Box::new(LexiconTagger));
        let err = h.humanize("Some text.", zero(), &mut FixedRandom(0.0)).unwrap_err();
        assert_eq!(err, TextError::Segmentation("no model".to_string()));
    }

    #[test]
    fn test_leading_indentation_is_not_kept() {
        // Sentences are trimmed by the splitter, so line indentation goes with them.
        assert_eq!(humanize("    Indented line here.", zero()), "Indented line here.");
        assert_eq!(humanize("  A.\n\tB.", zero()), "A.\nB.");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(humanize("", HumanizeParameters::new(1.0, 1.0)), "");
    }

    proptest! {
        #[test]
        fn prop_line_count_preserved(
            text in "[A-Za-z' .,!?()\n\t]{0,80}",
            p in 0.0f64..=1.0,
            q in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let out = Humanizer::default()
                .humanize(&text, HumanizeParameters::new(p, q), &mut StdRandom::seeded(seed))
                .unwrap();
            prop_assert_eq!(count_lines(&out), count_lines(&text));
        }

        #[test]
        fn prop_citation_text_is_byte_identical(
            before in "[A-Za-z ]{0,30}",
            after in "[A-Za-z ]{0,30}",
        ) {
            let citation = "(Smith et al., 2020, pp. 4-5)";
            let text = format!("{} {} {}.", before, citation, after);
            let out = Humanizer::default()
                .humanize(&text, HumanizeParameters::new(1.0, 1.0), &mut FixedRandom(0.0))
                .unwrap();
            prop_assert!(out.contains(citation));
        }
    }
}
