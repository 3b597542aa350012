//! Taxonomy Index Builder — flattens the taxonomy tree into a normalized-title index.
//!
//! Built once at startup and never mutated. Key collisions are resolved by
//! `VariantKind` precedence, so the result does not depend on traversal order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::classification::normalize::normalize;
use crate::classification::taxonomy::{dedup_preserving_order, Taxonomy, TaxonomyNode};

/// Where an index record's title came from in the taxonomy tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Main,
    Alternate,
    Specialized,
    SpecializedAlternate,
}

impl VariantKind {
    /// Collision precedence: Specialized > SpecializedAlternate > Main > Alternate.
    pub fn precedence(self) -> u8 {
        match self {
            VariantKind::Specialized => 3,
            VariantKind::SpecializedAlternate => 2,
            VariantKind::Main => 1,
            VariantKind::Alternate => 0,
        }
    }
}

/// The flattened, matchable unit stored under a normalized title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRecord {
    pub category: String,
    /// Title of the owning role or specialized variant.
    pub canonical_title: String,
    /// The literal title string this record was keyed from.
    pub matched_title: String,
    /// Description of the owning role; specialized variants share it.
    pub description: String,
    pub qualification_codes: Vec<String>,
    pub keywords: Vec<String>,
    pub variant_kind: VariantKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexStats {
    pub records: usize,
    pub collisions_discarded: usize,
    pub categories: usize,
    pub roles: usize,
    pub specialized_variants: usize,
}

/// Immutable mapping from normalized title to its winning record, in sorted key order.
#[derive(Debug, Clone)]
pub struct NormalizedIndex {
    records: BTreeMap<String, IndexRecord>,
    stats: IndexStats,
}

impl NormalizedIndex {
    pub fn get(&self, key: &str) -> Option<&IndexRecord> {
        self.records.get(key)
    }

    /// Iterates `(key, record)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }
}

/// Walks the taxonomy once and builds the normalized index.
pub fn build_index(taxonomy: &Taxonomy) -> NormalizedIndex {
    let mut builder = IndexBuilder::default();

    taxonomy.walk(|node| match node {
        TaxonomyNode::Category(category) => {
            debug!("Indexing category '{}' ({} roles)", category.name, category.roles.len());
        }
        TaxonomyNode::Role(role) => {
            // A role without codes of its own inherits the union of its variants' codes.
            let codes = if role.qualification_codes.is_empty() {
                dedup_preserving_order(
                    role.specialized_variants
                        .iter()
                        .flat_map(|v| v.qualification_codes.iter().cloned()),
                )
            } else {
                role.qualification_codes.clone()
            };
            let template = IndexRecord {
                category: role.category.clone(),
                canonical_title: role.family_title.clone(),
                matched_title: role.family_title.clone(),
                description: role.description.clone(),
                qualification_codes: codes,
                keywords: role.keywords.clone(),
                variant_kind: VariantKind::Main,
            };
            builder.emit_with_alternates(template, &role.alternate_titles, VariantKind::Alternate);
        }
        TaxonomyNode::Specialized { role, variant } => {
            let template = IndexRecord {
                category: role.category.clone(),
                canonical_title: variant.title.clone(),
                matched_title: variant.title.clone(),
                description: role.description.clone(),
                qualification_codes: variant.qualification_codes.clone(),
                keywords: variant.keywords.clone(),
                variant_kind: VariantKind::Specialized,
            };
            builder.emit_with_alternates(
                template,
                &variant.alternate_titles,
                VariantKind::SpecializedAlternate,
            );
        }
    });

    let stats = IndexStats {
        records: builder.records.len(),
        collisions_discarded: builder.collisions_discarded,
        categories: taxonomy.categories.len(),
        roles: taxonomy.role_count(),
        specialized_variants: taxonomy.variant_count(),
    };

    info!(
        "Taxonomy index built: {} records ({} collisions discarded) from {} categories, {} roles, {} specialized variants",
        stats.records,
        stats.collisions_discarded,
        stats.categories,
        stats.roles,
        stats.specialized_variants
    );

    NormalizedIndex {
        records: builder.records,
        stats,
    }
}

#[derive(Default)]
struct IndexBuilder {
    records: BTreeMap<String, IndexRecord>,
    collisions_discarded: usize,
}

impl IndexBuilder {
    /// Emits the entry's own record plus one record per alternate title.
    fn emit_with_alternates(
        &mut self,
        own: IndexRecord,
        alternate_titles: &[String],
        alternate_kind: VariantKind,
    ) {
        for alternate in alternate_titles {
            let record = IndexRecord {
                matched_title: alternate.clone(),
                variant_kind: alternate_kind,
                ..own.clone()
            };
            self.insert(record);
        }
        self.insert(own);
    }

    fn insert(&mut self, record: IndexRecord) {
        let key = normalize(&record.matched_title);
        if key.is_empty() {
            return;
        }

        match self.records.get(&key) {
            None => {
                self.records.insert(key, record);
            }
            Some(existing) => {
                self.collisions_discarded += 1;
                if outranks(&record, existing) {
                    debug!(
                        "Index key '{key}': {:?} '{}' replaces {:?} '{}'",
                        record.variant_kind,
                        record.canonical_title,
                        existing.variant_kind,
                        existing.canonical_title
                    );
                    self.records.insert(key, record);
                } else {
                    debug!(
                        "Index key '{key}': keeping {:?} '{}', discarding {:?} '{}'",
                        existing.variant_kind,
                        existing.canonical_title,
                        record.variant_kind,
                        record.canonical_title
                    );
                }
            }
        }
    }
}

/// True if `candidate` should replace `existing` under the same key.
/// Higher precedence wins; equal precedence falls back to a total order on the
/// record's identity so the winner never depends on insertion order.
fn outranks(candidate: &IndexRecord, existing: &IndexRecord) -> bool {
    let by_precedence = candidate
        .variant_kind
        .precedence()
        .cmp(&existing.variant_kind.precedence());
    match by_precedence {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => identity(candidate) < identity(existing),
    }
}

fn identity(record: &IndexRecord) -> (&str, &str, &str) {
    (
        record.category.as_str(),
        record.canonical_title.as_str(),
        record.matched_title.as_str(),
    )
}
