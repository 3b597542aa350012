//! Matcher / Classifier — maps a raw job title to a taxonomy record.
//!
//! Tiers, first success wins:
//! 1. Exact: normalized title is an index key (re-matched if the hit carries no codes)
//! 2. GenericDisambiguation: normalized title is a bare generic term
//! 3. Fuzzy: composite lexical + semantic score over every non-generic key
//! 4. Unknown: terminal fallback, never an error
//!
//! `classify` is pure and read-only; one `TitleClassifier` is shared by all request tasks.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classification::index::{IndexRecord, NormalizedIndex};
use crate::classification::normalize::{normalize, simplify, words};
use crate::classification::tuning::{domain_bonus, is_generic_term, is_hr_context, MatchTuning};

pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    GenericDisambiguation,
    Fuzzy,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub original_title: String,
    pub mapped_title: String,
    pub category: String,
    pub qualification_codes: Vec<String>,
    pub match_tier: MatchTier,
    /// Composite score (Fuzzy) or specificity (GenericDisambiguation).
    pub score: Option<f64>,
}

impl ClassificationResult {
    fn from_record(raw: &str, record: &IndexRecord, tier: MatchTier, score: Option<f64>) -> Self {
        Self {
            original_title: raw.to_string(),
            mapped_title: record.canonical_title.clone(),
            category: record.category.clone(),
            qualification_codes: record.qualification_codes.clone(),
            match_tier: tier,
            score,
        }
    }

    fn unknown(raw: &str) -> Self {
        Self {
            original_title: raw.to_string(),
            mapped_title: raw.to_string(),
            category: UNKNOWN_CATEGORY.to_string(),
            qualification_codes: Vec::new(),
            match_tier: MatchTier::Unknown,
            score: None,
        }
    }
}

/// Per-call view of the query, computed once and reused for every candidate.
struct Query<'q> {
    key: &'q str,
    words: Vec<&'q str>,
    /// Simplified original title padded with spaces, for whole-word phrase checks.
    padded: String,
    is_hr: bool,
}

/// A scored fuzzy candidate. Field order mirrors the tie-break order.
#[derive(Debug, Clone)]
struct FuzzyCandidate<'a> {
    key: &'a str,
    record: &'a IndexRecord,
    semantic: f64,
    keyword_bonus: f64,
    substring: bool,
    overlap_count: usize,
    score: f64,
}

impl FuzzyCandidate<'_> {
    /// `Greater` means `self` is the better match.
    fn rank(&self, other: &Self) -> Ordering {
        self.semantic
            .total_cmp(&other.semantic)
            .then(self.keyword_bonus.total_cmp(&other.keyword_bonus))
            .then(self.substring.cmp(&other.substring))
            .then(self.overlap_count.cmp(&other.overlap_count))
            .then(self.score.total_cmp(&other.score))
            .then(other.key.cmp(self.key))
    }
}

pub struct TitleClassifier {
    index: NormalizedIndex,
    tuning: MatchTuning,
}

impl TitleClassifier {
    pub fn new(index: NormalizedIndex, tuning: MatchTuning) -> Self {
        Self { index, tuning }
    }

    pub fn index(&self) -> &NormalizedIndex {
        &self.index
    }

    pub fn tuning(&self) -> &MatchTuning {
        &self.tuning
    }

    /// Classifies a raw job title. Accepts any string and always returns a result.
    pub fn classify(&self, raw: &str) -> ClassificationResult {
        let result = self.classify_inner(raw);
        debug!(
            "Classified '{}' as {:?} -> '{}' ({})",
            raw, result.match_tier, result.mapped_title, result.category
        );
        result
    }

    fn classify_inner(&self, raw: &str) -> ClassificationResult {
        let key = normalize(raw);
        if key.is_empty() {
            return ClassificationResult::unknown(raw);
        }
        let query = Query {
            key: &key,
            words: words(&key),
            padded: format!(" {} ", simplify(raw)),
            is_hr: is_hr_context(&simplify(raw)),
        };

        // Tier 1: exact
        if let Some(record) = self.index.get(&key) {
            if !record.qualification_codes.is_empty() {
                return ClassificationResult::from_record(raw, record, MatchTier::Exact, None);
            }
            let rematch = self.fuzzy_search(&query, self.tuning.rematch_threshold, |k, r| {
                k != key && !r.qualification_codes.is_empty()
            });
            return match rematch {
                Some(c) => {
                    ClassificationResult::from_record(raw, c.record, MatchTier::Fuzzy, Some(c.score))
                }
                None => ClassificationResult::from_record(raw, record, MatchTier::Exact, None),
            };
        }

        // Tier 2: generic term
        if is_generic_term(&key) {
            if let Some((record, specificity)) = self.disambiguate_generic(&key) {
                return ClassificationResult::from_record(
                    raw,
                    record,
                    MatchTier::GenericDisambiguation,
                    Some(specificity),
                );
            }
        }

        // Tier 3: fuzzy
        if let Some(c) = self.fuzzy_search(&query, self.tuning.fuzzy_threshold, |k, _| {
            !is_generic_term(k)
        }) {
            return ClassificationResult::from_record(raw, c.record, MatchTier::Fuzzy, Some(c.score));
        }

        // Tier 4: unknown
        ClassificationResult::unknown(raw)
    }

    /// Picks the most specific key containing `term`. Ties keep the first key in sorted order.
    fn disambiguate_generic(&self, term: &str) -> Option<(&IndexRecord, f64)> {
        let mut best: Option<(&IndexRecord, f64)> = None;
        for (key, record) in self.index.iter() {
            if key == term || !key.contains(term) {
                continue;
            }
            let specificity = words(key).len() as f64 + domain_bonus(term, &record.category);
            match best {
                Some((_, top)) if specificity <= top => {}
                _ => best = Some((record, specificity)),
            }
        }
        best
    }

    /// Scores every key passing `eligible` and returns the best accepted candidate.
    fn fuzzy_search<'a>(
        &'a self,
        query: &Query<'_>,
        threshold: f64,
        eligible: impl Fn(&str, &IndexRecord) -> bool,
    ) -> Option<FuzzyCandidate<'a>> {
        self.index
            .iter()
            .filter(|(key, record)| eligible(*key, *record))
            .filter_map(|(key, record)| self.score_candidate(query, key, record))
            .filter(|c| c.score >= threshold)
            .fold(None, |best: Option<FuzzyCandidate<'a>>, c| match best {
                Some(b) if c.rank(&b) != Ordering::Greater => Some(b),
                _ => Some(c),
            })
    }

    /// Composite score for one candidate, or `None` when the candidate shares no
    /// lexical evidence with the query (no overlapping word, keyword or substring).
    fn score_candidate<'a>(
        &self,
        query: &Query<'_>,
        key: &'a str,
        record: &'a IndexRecord,
    ) -> Option<FuzzyCandidate<'a>> {
        let key_words = words(key);
        let t = &self.tuning;

        let exact_count = query.words.iter().filter(|w| key_words.contains(*w)).count();
        let overlap_count = query
            .words
            .iter()
            .filter(|w| {
                key_words.contains(*w)
                    || (w.chars().count() >= t.min_partial_word_len && key.contains(**w))
            })
            .count();

        let keyword_hits = record
            .keywords
            .iter()
            .map(|kw| simplify(kw))
            .filter(|kw| !kw.is_empty() && query.padded.contains(&format!(" {kw} ")))
            .count();

        let substring = key.contains(query.key) || query.key.contains(key);

        if overlap_count == 0 && keyword_hits == 0 && !substring {
            return None;
        }

        let total = query.words.len() as f64;
        let candidate_hr = is_hr_context(&simplify(&format!("{key} {}", record.category)));
        let semantic = t.semantic_adjustment(query.is_hr, candidate_hr);
        let keyword_bonus = keyword_hits as f64 * t.keyword_bonus;
        let substring_bonus = if substring { t.substring_bonus } else { 0.0 };

        let score = t.overlap_weight * (overlap_count as f64 / total)
            + t.exact_word_weight * (exact_count as f64 / total)
            + keyword_bonus
            + substring_bonus
            + semantic;

        Some(FuzzyCandidate {
            key,
            record,
            semantic,
            keyword_bonus,
            substring,
            overlap_count,
            score,
        })
    }
}
