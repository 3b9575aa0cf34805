mod query;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use demandpulse_core::datasets;

#[derive(Debug, Parser)]
#[command(name = "demandpulse")]
#[command(about = "Product sentiment analytics from social posts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch and score posts for the selected products.
    Query(query::QueryArgs),
    /// List the selectable store locations.
    Locations,
    /// List the selectable countries.
    Countries,
    /// List the default products.
    Products,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = demandpulse_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Query(args) => query::run(&config, args).await?,
        Commands::Locations => {
            for location in datasets::load_locations(&config.cities_path)? {
                println!("{location}");
            }
        }
        Commands::Countries => {
            for country in datasets::load_countries(&config.countries_path)? {
                println!("{country}");
            }
        }
        Commands::Products => {
            for product in demandpulse_core::products::load_products(&config.products_path)? {
                println!("{product}");
            }
        }
    }

    Ok(())
}
