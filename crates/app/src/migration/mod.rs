//! Category migration

mod reconciler;
mod report;
mod target;

pub use reconciler::{Reconciler, ReconcilerConfig};
pub use report::{MappingOutcome, MappingReport, MigrationReport, ProductFailure};
pub use target::{MigrationTarget, ParseTargetError};
