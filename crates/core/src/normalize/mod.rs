//! Model normalization.
//!
//! Schema nodes are reconciled one at a time, parents first:
//! 1. Null variants are stripped from oneOf/anyOf alternatives
//! 2. Inheritance: enum reconciliation, discriminator default, parent members
//! 3. allOf flattening and the categorized property lists
//! 4. Properties of oneOf/anyOf alternatives are removed from the composite
//! 5. Imports are collected and every list is ordered
//!
//! Discriminator tags are assigned afterwards, once every node is final.

mod discriminator;
mod schema;

pub use discriminator::resolve_discriminators;
pub use schema::{assign_model_imports, normalize_schema, strip_duplicates};
