use std::{path::PathBuf, sync::Arc, time::Duration};

use caleta_app::{
    migration::{MigrationTarget, Reconciler, ReconcilerConfig},
    taxonomy::MappingTable,
};
use clap::Args;
use tracing::{error, info};

use super::store::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct MigrateArgs {
    /// Category id to migrate on its own, or `extra` for the additional batch.
    /// Runs the primary batch when omitted.
    target: Option<MigrationTarget>,

    /// Mapping table to use instead of the bundled one
    #[arg(long, env = "CALETA_MAPPINGS")]
    mappings: Option<PathBuf>,

    /// Log the changes without writing them
    #[arg(long)]
    dry_run: bool,

    /// Products requested per page
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=100))]
    per_page: u32,

    /// Pause after each product write, in milliseconds
    #[arg(long, default_value_t = 200)]
    item_delay_ms: u64,

    /// Pause between mappings, in milliseconds
    #[arg(long, default_value_t = 1_000)]
    mapping_delay_ms: u64,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: MigrateArgs) -> Result<(), String> {
    let table = match &args.mappings {
        Some(path) => MappingTable::from_path(path),
        None => MappingTable::builtin(),
    }
    .map_err(|error| format!("failed to load mapping table: {error}"))?;

    let target = args.target.unwrap_or_default();
    let mappings = target
        .select(&table)
        .map_err(|error| format!("invalid migration target: {error}"))?;

    let client = args.store.connect()?;

    let reconciler = Reconciler::new(
        Arc::new(client),
        table.legacy_parents.clone(),
        ReconcilerConfig {
            per_page: args.per_page,
            item_delay: Duration::from_millis(args.item_delay_ms),
            mapping_delay: Duration::from_millis(args.mapping_delay_ms),
            dry_run: args.dry_run,
        },
    );

    info!(%target, mappings = mappings.len(), dry_run = args.dry_run, "starting category migration");

    let report = reconciler.run(&mappings).await;

    report.log_summary();

    for failure in report.failed_products() {
        error!(product.id = %failure.product, error = %failure.error, "product left unmigrated");
    }

    if report.has_aborted_mappings() {
        let aborted: Vec<String> = report
            .aborted()
            .map(|mapping| mapping.mapping.old.to_string())
            .collect();

        return Err(format!(
            "listing failed for categories {}; re-run them once the store is reachable",
            aborted.join(", ")
        ));
    }

    Ok(())
}
