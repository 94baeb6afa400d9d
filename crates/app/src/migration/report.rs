//! Migration run reports.

use tracing::{info, warn};

use crate::{
    catalog::{CatalogError, ProductId},
    taxonomy::CategoryMapping,
};

/// A product whose category write failed.
#[derive(Debug)]
pub struct ProductFailure {
    pub product: ProductId,
    pub error: CatalogError,
}

/// How a mapping's run ended.
#[derive(Debug, Default)]
pub enum MappingOutcome {
    /// Every page was listed.
    #[default]
    Completed,

    /// Listing a page failed; later pages were not visited.
    Aborted { page: u32, error: CatalogError },
}

/// Counters for one mapping.
#[derive(Debug)]
pub struct MappingReport {
    pub mapping: CategoryMapping,

    /// Walks over the listing, each starting from page 1.
    pub passes: u32,

    /// Pages successfully listed, across all passes.
    pub pages: u32,

    /// Products returned by the listing.
    pub seen: usize,

    /// Products whose categories were rewritten.
    pub updated: usize,

    /// Products that already had the target categories.
    pub unchanged: usize,

    /// Products that would have been rewritten in a dry run.
    pub planned: usize,

    pub failed: Vec<ProductFailure>,

    pub outcome: MappingOutcome,
}

impl MappingReport {
    pub(crate) fn new(mapping: CategoryMapping) -> Self {
        Self {
            mapping,
            passes: 0,
            pages: 0,
            seen: 0,
            updated: 0,
            unchanged: 0,
            planned: 0,
            failed: Vec::new(),
            outcome: MappingOutcome::Completed,
        }
    }

    /// Whether listing stopped early.
    pub fn is_aborted(&self) -> bool {
        matches!(self.outcome, MappingOutcome::Aborted { .. })
    }
}

/// Counters for a whole run, one entry per mapping in run order.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub mappings: Vec<MappingReport>,
}

impl MigrationReport {
    /// Products rewritten across all mappings.
    pub fn updated(&self) -> usize {
        self.mappings.iter().map(|report| report.updated).sum()
    }

    /// Products whose write failed across all mappings.
    pub fn failed_products(&self) -> impl Iterator<Item = &ProductFailure> {
        self.mappings.iter().flat_map(|report| &report.failed)
    }

    /// Mappings whose listing stopped early.
    pub fn aborted(&self) -> impl Iterator<Item = &MappingReport> {
        self.mappings.iter().filter(|report| report.is_aborted())
    }

    /// Whether any mapping was aborted.
    pub fn has_aborted_mappings(&self) -> bool {
        self.aborted().next().is_some()
    }

    /// Emit one summary event for the run.
    pub fn log_summary(&self) {
        let failed = self.failed_products().count();
        let aborted = self.aborted().count();

        if failed == 0 && aborted == 0 {
            info!(
                mappings = self.mappings.len(),
                updated = self.updated(),
                "category migration finished"
            );
        } else {
            warn!(
                mappings = self.mappings.len(),
                updated = self.updated(),
                failed,
                aborted,
                "category migration finished with failures"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    fn status_error() -> CatalogError {
        CatalogError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        }
    }

    #[test]
    fn totals_span_all_mappings() {
        let mut first = MappingReport::new(CategoryMapping::new(631, 731));
        first.updated = 4;
        first.failed.push(ProductFailure {
            product: ProductId::new(9),
            error: status_error(),
        });

        let mut second = MappingReport::new(CategoryMapping::new(632, 732));
        second.updated = 2;
        second.outcome = MappingOutcome::Aborted {
            page: 3,
            error: status_error(),
        };

        let report = MigrationReport {
            mappings: vec![first, second],
        };

        assert_eq!(report.updated(), 6);
        assert_eq!(report.failed_products().count(), 1);
        assert_eq!(
            report.aborted().map(|mapping| mapping.mapping.old.get()).collect::<Vec<_>>(),
            [632]
        );
        assert!(report.has_aborted_mappings());
    }

    #[test]
    fn empty_report_has_no_failures() {
        let report = MigrationReport::default();

        assert_eq!(report.updated(), 0);
        assert!(!report.has_aborted_mappings());
    }
}
