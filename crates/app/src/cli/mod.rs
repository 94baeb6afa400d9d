use clap::{Parser, Subcommand};
use caleta_app::observability::LoggingConfig;

mod categories;
mod migrate;
mod store;

#[derive(Debug, Parser)]
#[command(name = "caleta-app", about = "Caleta catalog maintenance CLI", long_about = None)]
pub(crate) struct Cli {
    /// Logging output settings.
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Move products from legacy categories to their replacements
    Migrate(migrate::MigrateArgs),

    /// Create or reparent product categories
    Categories(categories::CategoriesCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Migrate(args) => migrate::run(args).await,
            Commands::Categories(command) => categories::run(command).await,
        }
    }
}
