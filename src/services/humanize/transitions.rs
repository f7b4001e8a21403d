// Transition Injector
// Occasionally opens a sentence with an academic connective

use super::random::RandomSource;

pub const ACADEMIC_TRANSITIONS: &[&str] = &[
    "Moreover,",
    "Additionally,",
    "Furthermore,",
    "Hence,",
    "Therefore,",
    "Consequently,",
    "Nonetheless,",
    "Nevertheless,",
    "In contrast,",
    "On the other hand,",
    "In addition,",
    "As a result,",
];

/// True when the trimmed sentence already opens with a transition (comma optional).
pub fn starts_with_transition(sentence: &str) -> bool {
    let trimmed = sentence.trim();
    ACADEMIC_TRANSITIONS
        .iter()
        .any(|t| trimmed.starts_with(t.trim_end_matches(',')))
}

/// Prefix `sentence` with a random transition with probability `frequency`.
pub fn inject(sentence: &str, frequency: f64, rng: &mut dyn RandomSource) -> String {
    if sentence.trim().is_empty() || starts_with_transition(sentence) {
        return sentence.to_string();
    }
    if rng.next_unit() >= frequency {
        return sentence.to_string();
    }

    let transition = ACADEMIC_TRANSITIONS[rng.pick(ACADEMIC_TRANSITIONS.len())];
    if sentence.contains(transition) {
        return sentence.to_string();
    }
    format!("{} {}", transition, sentence)
}
