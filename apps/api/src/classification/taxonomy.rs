//! Taxonomy model: the category → role → specialized-variant tree.
//!
//! The on-disk document is a JSON object keyed by category, then by role title.
//! It is parsed and validated in one step; a structurally invalid document never
//! produces a partial `Taxonomy`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Failed to read taxonomy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Taxonomy document is not valid: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid taxonomy structure at {path}: {reason}")]
    Structure { path: String, reason: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Document shape (serde)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct RoleDoc {
    #[serde(default)]
    description: String,
    #[serde(default)]
    qualifications: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    alternate_titles: Vec<String>,
    #[serde(default)]
    specialized_titles: Vec<SpecializedDoc>,
}

#[derive(Debug, Clone, Deserialize)]
struct SpecializedDoc {
    #[serde(default)]
    title: String,
    #[serde(default)]
    qualifications: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    alternate_titles: Vec<String>,
}

type TaxonomyDoc = BTreeMap<String, BTreeMap<String, RoleDoc>>;

// ────────────────────────────────────────────────────────────────────────────
// Validated tree
// ────────────────────────────────────────────────────────────────────────────

/// A specialized form of a role. Owned by exactly one `TaxonomyEntry`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecializedVariant {
    pub title: String,
    pub qualification_codes: Vec<String>,
    pub keywords: Vec<String>,
    pub alternate_titles: Vec<String>,
}

/// A role (job family) within a category.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyEntry {
    pub category: String,
    pub family_title: String,
    pub description: String,
    pub qualification_codes: Vec<String>,
    pub keywords: Vec<String>,
    pub alternate_titles: Vec<String>,
    pub specialized_variants: Vec<SpecializedVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub roles: Vec<TaxonomyEntry>,
}

/// The full occupational taxonomy. Categories and roles are sorted by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    pub categories: Vec<Category>,
}

/// Name and role count of a category, as listed by the taxonomy endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub roles: usize,
}

/// One node of the taxonomy tree, as visited by [`Taxonomy::walk`].
#[derive(Debug, Clone, Copy)]
pub enum TaxonomyNode<'a> {
    Category(&'a Category),
    Role(&'a TaxonomyEntry),
    Specialized {
        role: &'a TaxonomyEntry,
        variant: &'a SpecializedVariant,
    },
}

impl Taxonomy {
    /// Reads and validates a taxonomy JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TaxonomyError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parses and validates a taxonomy JSON document.
    pub fn from_json(raw: &str) -> Result<Self, TaxonomyError> {
        let doc: TaxonomyDoc = serde_json::from_str(raw)?;
        Self::from_doc(doc)
    }

    fn from_doc(doc: TaxonomyDoc) -> Result<Self, TaxonomyError> {
        if doc.is_empty() {
            return Err(structure("$", "taxonomy contains no categories"));
        }

        let mut categories = Vec::with_capacity(doc.len());
        for (category_name, roles_doc) in doc {
            let category_name = category_name.trim().to_string();
            if category_name.is_empty() {
                return Err(structure("$", "category name is blank"));
            }

            let mut roles = Vec::with_capacity(roles_doc.len());
            for (family_title, role) in roles_doc {
                let family_title = family_title.trim().to_string();
                if family_title.is_empty() {
                    return Err(structure(&category_name, "role title is blank"));
                }
                roles.push(build_entry(&category_name, family_title, role)?);
            }

            categories.push(Category {
                name: category_name,
                roles,
            });
        }

        Ok(Taxonomy { categories })
    }

    /// Visits every node depth-first: category, then each role followed by its variants.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(TaxonomyNode<'a>)) {
        for category in &self.categories {
            visit(TaxonomyNode::Category(category));
            for role in &category.roles {
                visit(TaxonomyNode::Role(role));
                for variant in &role.specialized_variants {
                    visit(TaxonomyNode::Specialized { role, variant });
                }
            }
        }
    }

    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .map(|c| CategorySummary {
                name: c.name.clone(),
                roles: c.roles.len(),
            })
            .collect()
    }

    pub fn role_count(&self) -> usize {
        self.categories.iter().map(|c| c.roles.len()).sum()
    }

    pub fn variant_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.roles)
            .map(|r| r.specialized_variants.len())
            .sum()
    }
}

fn build_entry(
    category: &str,
    family_title: String,
    role: RoleDoc,
) -> Result<TaxonomyEntry, TaxonomyError> {
    let mut specialized_variants = Vec::with_capacity(role.specialized_titles.len());
    for (i, variant) in role.specialized_titles.into_iter().enumerate() {
        let title = variant.title.trim().to_string();
        if title.is_empty() {
            return Err(structure(
                &format!("{category}.{family_title}.specialized_titles[{i}]"),
                "specialized title is missing or blank",
            ));
        }
        specialized_variants.push(SpecializedVariant {
            title,
            qualification_codes: dedup_preserving_order(variant.qualifications),
            keywords: dedup_preserving_order(variant.keywords),
            alternate_titles: dedup_preserving_order(variant.alternate_titles),
        });
    }

    Ok(TaxonomyEntry {
        category: category.to_string(),
        family_title,
        description: role.description,
        qualification_codes: dedup_preserving_order(role.qualifications),
        keywords: dedup_preserving_order(role.keywords),
        alternate_titles: dedup_preserving_order(role.alternate_titles),
        specialized_variants,
    })
}

/// Trims entries and drops blanks and repeats, keeping first-seen order.
pub fn dedup_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|seen| seen == item) {
            out.push(item.to_string());
        }
    }
    out
}

fn structure(path: &str, reason: &str) -> TaxonomyError {
    TaxonomyError::Structure {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
