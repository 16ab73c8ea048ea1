//! Mutation meta-progression
//!
//! Catalog definitions and the selection/spend flow.

pub mod catalog;
pub mod selection;

pub use catalog::{
    default_mutation_defs, MutationCatalog, MutationCategory, MutationDef, MutationKind,
};
pub use selection::{
    mutation_choices, spend_mutation_point, SelectionState, CHOICE_COUNT,
};
