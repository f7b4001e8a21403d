// Synonym Substitution Engine
// Swaps eligible content words for a dictionary synonym with probability `intensity`

use super::citation_guard::PLACEHOLDER_MARKER;
use super::contractions::match_leading_case;
use super::pos_tagger::{join_tokens, PartOfSpeech, PosTagger, TokenKind};
use super::random::RandomSource;
use crate::services::text_processor::TextError;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::pos_tagger::PartOfSpeech::{Adjective, Adverb, Noun, Verb};

// Keyed on lowercase, contraction-expanded forms.
const SYNONYMS: &[(&str, PartOfSpeech, &[&str])] = &[
    ("important", Adjective, &["significant", "crucial", "essential"]),
    ("big", Adjective, &["large", "substantial", "considerable"]),
    ("small", Adjective, &["minor", "modest", "limited"]),
    ("good", Adjective, &["favorable", "sound", "positive"]),
    ("bad", Adjective, &["poor", "unfavorable", "adverse"]),
    ("clear", Adjective, &["evident", "apparent", "obvious"]),
    ("different", Adjective, &["distinct", "dissimilar", "varied"]),
    ("main", Adjective, &["primary", "principal", "central"]),
    ("new", Adjective, &["novel", "recent", "emerging"]),
    ("hard", Adjective, &["difficult", "challenging", "demanding"]),
    ("easy", Adjective, &["straightforward", "simple", "manageable"]),
    ("many", Adjective, &["numerous", "several", "various"]),
    ("whole", Adjective, &["entire", "complete", "full"]),
    ("key", Adjective, &["central", "pivotal", "fundamental"]),
    ("common", Adjective, &["widespread", "frequent", "prevalent"]),
    ("quick", Adjective, &["rapid", "swift", "prompt"]),
    ("strong", Adjective, &["robust", "powerful", "solid"]),
    ("weak", Adjective, &["limited", "fragile", "modest"]),
    ("useful", Adjective, &["valuable", "beneficial", "helpful"]),
    ("necessary", Adjective, &["required", "essential", "needed"]),
    ("result", Noun, &["outcome", "finding", "consequence"]),
    ("results", Noun, &["outcomes", "findings", "consequences"]),
    ("problem", Noun, &["issue", "difficulty", "challenge"]),
    ("problems", Noun, &["issues", "difficulties", "challenges"]),
    ("method", Noun, &["approach", "technique", "procedure"]),
    ("methods", Noun, &["approaches", "techniques", "procedures"]),
    ("idea", Noun, &["notion", "concept", "thought"]),
    ("ideas", Noun, &["notions", "concepts", "thoughts"]),
    ("study", Noun, &["investigation", "analysis", "inquiry"]),
    ("goal", Noun, &["aim", "objective", "target"]),
    ("part", Noun, &["portion", "component", "element"]),
    ("way", Noun, &["manner", "means", "approach"]),
    ("effect", Noun, &["impact", "influence", "consequence"]),
    ("change", Noun, &["shift", "alteration", "modification"]),
    ("people", Noun, &["individuals", "persons", "participants"]),
    ("research", Noun, &["inquiry", "scholarship", "investigation"]),
    ("evidence", Noun, &["proof", "support", "data"]),
    ("benefit", Noun, &["advantage", "gain", "merit"]),
    ("show", Verb, &["demonstrate", "indicate", "reveal"]),
    ("shows", Verb, &["demonstrates", "indicates", "reveals"]),
    ("showed", Verb, &["demonstrated", "indicated", "revealed"]),
    ("use", Verb, &["utilize", "employ", "apply"]),
    ("used", Verb, &["utilized", "employed", "applied"]),
    ("uses", Verb, &["utilizes", "employs", "applies"]),
    ("help", Verb, &["assist", "aid", "support"]),
    ("helps", Verb, &["assists", "aids", "supports"]),
    ("make", Verb, &["create", "produce", "generate"]),
    ("get", Verb, &["obtain", "acquire", "gain"]),
    ("need", Verb, &["require", "demand", "call for"]),
    ("start", Verb, &["begin", "commence", "initiate"]),
    ("find", Verb, &["discover", "identify", "determine"]),
    ("found", Verb, &["discovered", "identified", "observed"]),
    ("think", Verb, &["believe", "consider", "suppose"]),
    ("look", Verb, &["examine", "inspect", "review"]),
    ("improve", Verb, &["enhance", "strengthen", "refine"]),
    ("increase", Verb, &["raise", "boost", "expand"]),
    ("reduce", Verb, &["decrease", "lower", "diminish"]),
    ("suggest", Verb, &["propose", "imply", "indicate"]),
    ("suggests", Verb, &["proposes", "implies", "indicates"]),
    ("explain", Verb, &["clarify", "describe", "account for"]),
    ("try", Verb, &["attempt", "endeavor", "seek"]),
    ("also", Adverb, &["additionally", "likewise", "furthermore"]),
    ("very", Adverb, &["highly", "extremely", "remarkably"]),
    ("often", Adverb, &["frequently", "commonly", "regularly"]),
    ("quickly", Adverb, &["rapidly", "swiftly", "promptly"]),
    ("mostly", Adverb, &["largely", "mainly", "primarily"]),
    ("clearly", Adverb, &["evidently", "plainly", "obviously"]),
    ("really", Adverb, &["truly", "genuinely", "indeed"]),
    ("usually", Adverb, &["typically", "generally", "normally"]),
];

struct Entry {
    class: PartOfSpeech,
    alternatives: &'static [&'static str],
}

fn dictionary() -> &'static HashMap<&'static str, Entry> {
    static MAP: OnceLock<HashMap<&'static str, Entry>> = OnceLock::new();
    MAP.get_or_init(|| {
        SYNONYMS
            .iter()
            .map(|(word, class, alternatives)| {
                (*word, Entry { class: *class, alternatives: *alternatives })
            })
            .collect()
    })
}

/// Synonyms for a lowercase word, in dictionary order.
pub fn synonyms_for(lower: &str) -> Option<&'static [&'static str]> {
    dictionary().get(lower).map(|e| e.alternatives)
}

/// Word class recorded for a dictionary word.
pub fn dictionary_class(lower: &str) -> Option<PartOfSpeech> {
    dictionary().get(lower).map(|e| e.class)
}

/// Replace eligible words of `sentence` with probability `intensity`.
///
/// A word is eligible when it is tagged with a content class and has a dictionary
/// entry; tokens carrying a citation placeholder are never touched.
pub fn substitute(
    sentence: &str,
    intensity: f64,
    tagger: &dyn PosTagger,
    rng: &mut dyn RandomSource,
) -> Result<String, TextError> {
    let mut tokens = tagger.tag(sentence)?;
    let mut replaced = 0usize;

    for token in tokens.iter_mut() {
        if token.kind != TokenKind::Word
            || token.text.contains(PLACEHOLDER_MARKER)
            || !token.pos.is_content()
        {
            continue;
        }
        let Some(options) = synonyms_for(&token.text.to_lowercase()) else {
            continue;
        };
        if options.is_empty() || rng.next_unit() >= intensity {
            continue;
        }
        let choice = options[rng.pick(options.len())];
        token.text = match_leading_case(&token.text, choice);
        replaced += 1;
    }

    if replaced == 0 {
        return Ok(sentence.to_string());
    }
    Ok(join_tokens(&tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::humanize::pos_tagger::{LexiconTagger, Token};
    use crate::services::humanize::random::{FixedRandom, StdRandom};

    #[test]
    fn test_zero_intensity_is_identity() {
        let s = "The important results show a clear effect.";
        let out = substitute(s, 0.0, &LexiconTagger, &mut FixedRandom(0.0)).unwrap();
        assert_eq!(out, s);
    }

    #[test]
    fn test_full_intensity_uses_first_synonym_with_low_draws() {
        let s = "The important results show a clear effect.";
        let out = substitute(s, 1.0, &LexiconTagger, &mut FixedRandom(0.0)).unwrap();
        assert_eq!(out, "The significant outcomes demonstrate a evident impact.");
    }

    #[test]
    fn test_capitalization_is_kept() {
        let out = substitute("Important work.", 1.0, &LexiconTagger, &mut FixedRandom(0.0)).unwrap();
        assert_eq!(out, "Significant work.");
    }

    #[test]
    fn test_high_draws_never_fire_below_one() {
        let s = "Many people use clear methods.";
        let out = substitute(s, 0.9, &LexiconTagger, &mut FixedRandom(0.95)).unwrap();
        assert_eq!(out, s);
    }

    #[test]
    fn test_placeholders_and_closed_class_untouched() {
        let s = "[[REF_1]] and the [[REF_2]]";
        let out = substitute(s, 1.0, &LexiconTagger, &mut FixedRandom(0.0)).unwrap();
        assert_eq!(out, s);
    }

    #[test]
    fn test_replacement_is_a_known_synonym() {
        let mut rng = StdRandom::seeded(3);
        for _ in 0..20 {
            let out = substitute("results", 1.0, &LexiconTagger, &mut rng).unwrap();
            assert!(synonyms_for("results").unwrap().contains(&out.as_str()));
        }
    }

    struct NounlessTagger;

    impl PosTagger for NounlessTagger {
        fn tag(&self, sentence: &str) -> Result<Vec<Token>, TextError> {
            let mut tokens = LexiconTagger.tag(sentence)?;
            for t in tokens.iter_mut() {
                t.pos = PartOfSpeech::Other;
            }
            Ok(tokens)
        }
    }

    #[test]
    fn test_pos_gating() {
        let s = "important results";
        let out = substitute(s, 1.0, &NounlessTagger, &mut FixedRandom(0.0)).unwrap();
        assert_eq!(out, s);
    }

    struct FailingTagger;

    impl PosTagger for FailingTagger {
        fn tag(&self, _sentence: &str) -> Result<Vec<Token>, TextError> {
            Err(TextError::Tagging("model unavailable".to_string()))
        }
    }

    #[test]
    fn test_tagger_failure_propagates() {
        let err = substitute("x", 0.5, &FailingTagger, &mut FixedRandom(0.0)).unwrap_err();
        assert!(matches!(err, TextError::Tagging(_)));
    }

    #[test]
    fn test_dictionary_keys_are_lowercase_content_words() {
        for (word, class, alternatives) in SYNONYMS {
            assert_eq!(*word, word.to_lowercase());
            assert!(class.is_content());
            assert!(!alternatives.is_empty());
        }
    }
}
