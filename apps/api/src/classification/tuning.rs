//! Matching constants. Every threshold and bonus the matcher uses lives here.

use serde::Serialize;

/// Broad occupational nouns that trigger generic-term disambiguation.
pub const GENERIC_TERMS: &[&str] = &[
    "mechanic",
    "technician",
    "operator",
    "worker",
    "assistant",
    "aide",
    "supervisor",
    "helper",
    "laborer",
    "attendant",
];

/// (generic term, lowercase category fragment, bonus). Unlisted pairings score 0.
pub const DOMAIN_BONUSES: &[(&str, &str, f64)] = &[
    ("mechanic", "automotive", 2.0),
    ("mechanic", "agricultur", -1.0),
    ("technician", "electronic", 1.5),
    ("technician", "electrical", 1.5),
];

/// Terms marking a title as human-resources / management context.
/// Multi-word terms match as phrases, single words as whole words.
pub const HR_TERMS: &[&str] = &[
    "human resources",
    "human resource",
    "hr",
    "executive",
    "manager",
    "administrator",
    "supervisor",
    "officer",
    "recruiter",
    "recruitment",
    "personnel",
];

/// Weights and thresholds for the tiered matcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTuning {
    pub version: &'static str,
    /// Minimum composite score for the general fuzzy search.
    pub fuzzy_threshold: f64,
    /// Minimum composite score when re-matching an exact hit that has no codes.
    pub rematch_threshold: f64,
    pub overlap_weight: f64,
    pub exact_word_weight: f64,
    /// Added once per record keyword found in the original title.
    pub keyword_bonus: f64,
    pub substring_bonus: f64,
    pub semantic_both_hr: f64,
    pub semantic_both_non_hr: f64,
    pub semantic_query_hr_only: f64,
    pub semantic_candidate_hr_only: f64,
    /// Query words shorter than this only count as overlap on a whole-word match.
    pub min_partial_word_len: usize,
}

impl MatchTuning {
    pub const V1: MatchTuning = MatchTuning {
        version: "v1",
        fuzzy_threshold: 0.7,
        rematch_threshold: 0.3,
        overlap_weight: 0.5,
        exact_word_weight: 0.5,
        keyword_bonus: 0.5,
        substring_bonus: 0.3,
        semantic_both_hr: 2.0,
        semantic_both_non_hr: 1.0,
        semantic_query_hr_only: -3.0,
        semantic_candidate_hr_only: -2.0,
        min_partial_word_len: 3,
    };

    /// Overrides the acceptance thresholds, keeping every other constant.
    pub fn with_thresholds(mut self, fuzzy: Option<f64>, rematch: Option<f64>) -> Self {
        if let Some(fuzzy) = fuzzy {
            self.fuzzy_threshold = fuzzy;
        }
        if let Some(rematch) = rematch {
            self.rematch_threshold = rematch;
        }
        self
    }

    /// Semantic adjustment for a (query, candidate) HR-context pairing.
    pub fn semantic_adjustment(&self, query_hr: bool, candidate_hr: bool) -> f64 {
        match (query_hr, candidate_hr) {
            (true, true) => self.semantic_both_hr,
            (false, false) => self.semantic_both_non_hr,
            (true, false) => self.semantic_query_hr_only,
            (false, true) => self.semantic_candidate_hr_only,
        }
    }
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self::V1
    }
}

pub fn is_generic_term(key: &str) -> bool {
    GENERIC_TERMS.contains(&key)
}

/// Bonus for pairing a generic term with a candidate's category.
pub fn domain_bonus(term: &str, category: &str) -> f64 {
    let category = category.to_lowercase();
    DOMAIN_BONUSES
        .iter()
        .find(|(t, fragment, _)| *t == term && category.contains(fragment))
        .map(|(_, _, bonus)| *bonus)
        .unwrap_or(0.0)
}

/// True if a simplified (lowercase, punctuation-collapsed) text is HR context.
pub fn is_hr_context(simplified: &str) -> bool {
    let words: Vec<&str> = simplified.split_whitespace().collect();
    let padded = format!(" {simplified} ");
    HR_TERMS.iter().any(|term| {
        if term.contains(' ') {
            padded.contains(&format!(" {term} "))
        } else {
            words.contains(term)
        }
    })
}
