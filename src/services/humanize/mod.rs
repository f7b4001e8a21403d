// Humanize Module
// Rule-based rewriting that lowers detectable AI/formal patterns:
// - citation_guard: protects author-year citations behind placeholders
// - contractions: expands contracted forms
// - pos_tagger: lossless tokenizer with coarse word classes
// - synonyms: probabilistic dictionary substitution, gated by word class
// - transitions: probabilistic academic sentence openers
// - rewriter: per-sentence / per-line orchestration
// - pipeline: protect -> rewrite -> restore -> normalize
// - random: injectable random source

pub mod citation_guard;
pub mod contractions;
pub mod pos_tagger;
pub mod synonyms;
pub mod transitions;
pub mod rewriter;
pub mod pipeline;
pub mod random;

pub use citation_guard::{protect, restore, CitationMap};
pub use contractions::expand as expand_contractions;
pub use pipeline::{humanize, Humanizer};
pub use pos_tagger::{LexiconTagger, PartOfSpeech, PosTagger, Token, TokenKind};
pub use random::{FixedRandom, RandomSource, StdRandom};
pub use rewriter::Rewriter;
pub use synonyms::substitute as substitute_synonyms;
pub use transitions::{inject as inject_transition, ACADEMIC_TRANSITIONS};
