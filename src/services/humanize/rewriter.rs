// Sentence/Line Rewriter
// Applies contraction expansion, synonym substitution and transition injection
// sentence by sentence while keeping the line layout intact

use super::contractions;
use super::pos_tagger::PosTagger;
use super::random::RandomSource;
use super::synonyms;
use super::transitions;
use crate::models::HumanizeParameters;
use crate::services::text_processor::{SentenceSplitter, TextError};

pub struct Rewriter<'a> {
    splitter: &'a dyn SentenceSplitter,
    tagger: &'a dyn PosTagger,
}

impl<'a> Rewriter<'a> {
    pub fn new(splitter: &'a dyn SentenceSplitter, tagger: &'a dyn PosTagger) -> Self {
        Self { splitter, tagger }
    }

    /// Rewrite one sentence.
    ///
    /// Contractions are expanded first because the synonym dictionary is keyed on
    /// expanded forms.
    pub fn rewrite_line(
        &self,
        line: &str,
        params: HumanizeParameters,
        rng: &mut dyn RandomSource,
    ) -> Result<String, TextError> {
        let expanded = contractions::expand(line);
        let substituted = synonyms::substitute(&expanded, params.synonym_intensity, self.tagger, rng)?;
        Ok(transitions::inject(&substituted, params.transition_frequency, rng))
    }

    /// Split into sentences, rewrite each, and rejoin with single spaces.
    pub fn rewrite_flat(
        &self,
        text: &str,
        params: HumanizeParameters,
        rng: &mut dyn RandomSource,
    ) -> Result<String, TextError> {
        let sentences = self.splitter.split(text)?;
        let mut out = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            out.push(self.rewrite_line(sentence, params, rng)?);
        }
        Ok(out.join(" "))
    }

    /// Rewrite line by line. Blank lines come back empty; the line count never changes.
    pub fn rewrite_text(
        &self,
        text: &str,
        params: HumanizeParameters,
        rng: &mut dyn RandomSource,
    ) -> Result<String, TextError> {
        let mut lines = Vec::new();
        for line in text.split('\n') {
            if line.trim().is_empty() {
                lines.push(String::new());
            } else {
                lines.push(self.rewrite_flat(line, params, rng)?);
            }
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanize::pos_tagger::LexiconTagger;
    use crate::services::humanize::random::FixedRandom;
    use crate::services::text_processor::RuleSentenceSplitter;

    fn rewriter() -> Rewriter<'static> {
        Rewriter::new(&RuleSentenceSplitter, &LexiconTagger)
    }

    #[test]
    fn test_rewrite_line_order() {
        // "don't" must expand before "need" can be looked up as its own word.
        let out = rewriter()
            .rewrite_line("We don't need it.", HumanizeParameters::new(1.0, 0.0), &mut FixedRandom(0.0))
            .unwrap();
        assert_eq!(out, "We do not require it.");
    }

    #[test]
    fn test_rewrite_text_keeps_blank_lines() {
        let text = "First line here.\n   \n\nSecond one. Third one.\n";
        let out = rewriter()
            .rewrite_text(text, HumanizeParameters::new(0.0, 0.0), &mut FixedRandom(0.0))
            .unwrap();
        assert_eq!(out, "First line here.\n\n\nSecond one. Third one.\n");
    }

    #[test]
    fn test_transition_applies_per_sentence() {
        let out = rewriter()
            .rewrite_flat("It rose. It fell.", HumanizeParameters::new(0.0, 1.0), &mut FixedRandom(0.0))
            .unwrap();
        assert_eq!(out, "Moreover, It rose. Moreover, It fell.");
    }

    #[test]
    fn test_flat_joins_lines() {
        let out = rewriter()
            .rewrite_flat("One.\nTwo.", HumanizeParameters::new(0.0, 0.0), &mut FixedRandom(0.0))
            .unwrap();
        assert_eq!(out, "One. Two.");
    }
}
