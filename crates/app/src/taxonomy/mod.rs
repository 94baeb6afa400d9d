//! Category taxonomy: mapping tables, set reconciliation and category setup.

pub mod mappings;
pub mod reconcile;
pub mod setup;

pub use mappings::{CategoryMapping, MappingError, MappingTable};
pub use reconcile::{CategoryChange, reconcile_categories};
pub use setup::{EnsureOutcome, EnsuredCategory, ensure_category};
