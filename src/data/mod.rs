//! Data loading and external game content
//!
//! Loads the mutation catalog from external RON data, with hardcoded
//! defaults as fallback.

pub mod loader;

pub use loader::{load_mutation_catalog, parse_mutations, CatalogError};
