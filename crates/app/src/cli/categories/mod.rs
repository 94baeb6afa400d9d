use clap::{Args, Subcommand};

mod ensure;
mod reparent;

#[derive(Debug, Args)]
pub(crate) struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Debug, Subcommand)]
enum CategoriesSubcommand {
    /// Create a category unless its slug already exists, then fix its parent
    Ensure(ensure::EnsureCategoryArgs),

    /// Move a category under another parent
    Reparent(reparent::ReparentCategoryArgs),
}

pub(crate) async fn run(command: CategoriesCommand) -> Result<(), String> {
    match command.command {
        CategoriesSubcommand::Ensure(args) => ensure::run(args).await,
        CategoriesSubcommand::Reparent(args) => reparent::run(args).await,
    }
}
