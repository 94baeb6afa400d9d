use caleta_app::{
    catalog::{CategoryId, NewCategory, normalize_slug},
    taxonomy::{EnsureOutcome, ensure_category},
};
use clap::Args;
use tracing::info;

use crate::cli::store::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct EnsureCategoryArgs {
    /// Category display name
    #[arg(long)]
    name: String,

    /// Category slug
    #[arg(long)]
    slug: String,

    /// Parent category id; top level when omitted
    #[arg(long)]
    parent: Option<CategoryId>,

    #[command(flatten)]
    store: StoreArgs,
}

pub(crate) async fn run(args: EnsureCategoryArgs) -> Result<(), String> {
    let slug = normalize_slug(&args.slug);

    if slug.is_empty() {
        return Err("slug cannot be empty".to_string());
    }

    let client = args.store.connect()?;

    let wanted = NewCategory {
        name: args.name,
        slug,
        parent: args.parent.map_or(0, CategoryId::get),
    };

    let ensured = ensure_category(&client, &wanted)
        .await
        .map_err(|error| format!("failed to ensure category `{}`: {error}", wanted.slug))?;

    let outcome = match ensured.outcome {
        EnsureOutcome::Created => "created",
        EnsureOutcome::Reparented => "reparented",
        EnsureOutcome::Unchanged => "unchanged",
    };

    info!(
        category.id = %ensured.category.id,
        category.slug = %ensured.category.slug,
        category.parent = ensured.category.parent,
        outcome,
        "category ensured"
    );

    Ok(())
}
