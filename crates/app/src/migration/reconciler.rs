//! Paginated category reconciliation against the remote catalog.

use std::{collections::HashSet, sync::Arc, time::Duration};

use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::{
    catalog::{CatalogClient, CategoryId, Product, ProductId},
    migration::report::{MappingOutcome, MappingReport, MigrationReport, ProductFailure},
    taxonomy::{CategoryMapping, reconcile_categories},
};

/// Pagination and pacing settings for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Products requested per listing page. A shorter page ends the mapping.
    pub per_page: u32,

    /// Pause after every product write.
    pub item_delay: Duration,

    /// Pause between two mappings.
    pub mapping_delay: Duration,

    /// Compute changes without writing them.
    pub dry_run: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            per_page: 100,
            item_delay: Duration::from_millis(200),
            mapping_delay: Duration::from_millis(1_000),
            dry_run: false,
        }
    }
}

/// Moves products between categories, one request at a time.
///
/// The remote catalog is the only state: each run lists what is currently assigned to the old
/// category and rewrites it, so re-running after a partial failure is safe.
#[derive(Clone)]
pub struct Reconciler {
    client: Arc<dyn CatalogClient>,
    legacy_parents: Vec<CategoryId>,
    config: ReconcilerConfig,
}

impl Reconciler {
    #[must_use]
    pub fn new(
        client: Arc<dyn CatalogClient>,
        legacy_parents: Vec<CategoryId>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            client,
            legacy_parents,
            config,
        }
    }

    /// Apply every mapping in order.
    ///
    /// A mapping whose listing fails is recorded as aborted and the run moves on to the next.
    pub async fn run(&self, mappings: &[CategoryMapping]) -> MigrationReport {
        let mut report = MigrationReport::default();

        for (index, mapping) in mappings.iter().enumerate() {
            if index > 0 {
                pause(self.config.mapping_delay).await;
            }

            report.mappings.push(self.migrate_mapping(mapping).await);
        }

        report
    }

    /// Apply a single mapping to every product currently listed under its old category.
    pub async fn migrate_mapping(&self, mapping: &CategoryMapping) -> MappingReport {
        let span = info_span!(
            "migrate_mapping",
            mapping.old = %mapping.old,
            mapping.new = %mapping.new,
            mapping.label = mapping.label.as_deref().unwrap_or_default(),
        );

        self.paginate(mapping).instrument(span).await
    }

    async fn paginate(&self, mapping: &CategoryMapping) -> MappingReport {
        let mut report = MappingReport::new(mapping.clone());
        let mut settled = HashSet::new();

        info!(dry_run = self.config.dry_run, "starting mapping");

        // Every write drops a product out of the listing, so later page numbers skip what
        // shifted forward. Start over from page 1 until a pass writes nothing.
        loop {
            let updated_before = report.updated;

            report.passes += 1;
            self.run_pass(mapping, &mut settled, &mut report).await;

            if report.is_aborted() {
                return report;
            }

            if self.config.dry_run || report.updated == updated_before {
                break;
            }

            debug!(pass = report.passes, "products left the listing, rescanning from page 1");
        }

        info!(
            passes = report.passes,
            pages = report.pages,
            seen = report.seen,
            updated = report.updated,
            unchanged = report.unchanged,
            planned = report.planned,
            failed = report.failed.len(),
            "finished mapping"
        );

        report
    }

    /// One walk over the listing. Products already handled in an earlier pass are skipped.
    async fn run_pass(
        &self,
        mapping: &CategoryMapping,
        settled: &mut HashSet<ProductId>,
        report: &mut MappingReport,
    ) {
        let per_page = self.config.per_page;
        let mut page = 1;

        loop {
            let products = match self.client.list_products(mapping.old, page, per_page).await {
                Ok(products) => products,
                Err(error) => {
                    error!(page, %error, "listing failed, skipping the rest of this mapping");

                    report.outcome = MappingOutcome::Aborted { page, error };

                    return;
                }
            };

            report.pages += 1;

            debug!(pass = report.passes, page, count = products.len(), "listed page");

            if products.is_empty() {
                return;
            }

            for product in &products {
                if settled.insert(product.id) {
                    self.migrate_product(mapping, product, report).await;
                }
            }

            if products.len() < usize::try_from(per_page).unwrap_or(usize::MAX) {
                return;
            }

            page += 1;
        }
    }

    async fn migrate_product(
        &self,
        mapping: &CategoryMapping,
        product: &Product,
        report: &mut MappingReport,
    ) {
        report.seen += 1;

        let change = reconcile_categories(
            &product.category_ids(),
            mapping.old,
            mapping.new,
            &self.legacy_parents,
        );

        if !change.changed {
            report.unchanged += 1;
            debug!(product.id = %product.id, "categories already up to date");
            return;
        }

        if self.config.dry_run {
            report.planned += 1;
            info!(
                product.id = %product.id,
                product.name = %product.name,
                categories = ?change.categories,
                "would update categories"
            );
            return;
        }

        match self
            .client
            .update_product_categories(product.id, &change.categories)
            .await
        {
            Ok(_) => {
                report.updated += 1;
                info!(
                    product.id = %product.id,
                    product.name = %product.name,
                    updated = report.updated,
                    "updated categories"
                );
            }
            Err(error) => {
                warn!(product.id = %product.id, %error, "failed to update categories");
                report.failed.push(ProductFailure {
                    product: product.id,
                    error,
                });
            }
        }

        pause(self.config.item_delay).await;
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
