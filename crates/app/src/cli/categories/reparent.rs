use caleta_app::catalog::{CatalogClient, CategoryId};
use clap::Args;
use tracing::info;

use crate::cli::store::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct ReparentCategoryArgs {
    /// Category to move
    #[arg(long)]
    id: CategoryId,

    /// New parent category id; top level when omitted
    #[arg(long)]
    parent: Option<CategoryId>,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: ReparentCategoryArgs) -> Result<(), String> {
    if args.parent == Some(args.id) {
        return Err("a category cannot be its own parent".to_string());
    }

    let client = args.store.connect()?;

    let category = client
        .reparent_category(args.id, args.parent)
        .await
        .map_err(|error| format!("failed to reparent category {}: {error}", args.id))?;

    info!(
        category.id = %category.id,
        category.slug = %category.slug,
        category.parent = category.parent,
        "category reparented"
    );

    Ok(())
}
