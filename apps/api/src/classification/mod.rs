// Job title classification engine.
// Implements: title normalization, taxonomy index building, tiered matching.
// The index is built once at startup; `TitleClassifier::classify` is read-only afterwards.

pub mod handlers;
pub mod index;
pub mod matcher;
pub mod normalize;
pub mod taxonomy;
pub mod tuning;

#[cfg(test)]
pub mod fixtures;
