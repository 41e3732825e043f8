mod catalog;
mod crawl;
mod import;
mod resolve;
mod toll;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bcdb")]
#[command(about = "Incremental brand catalog builder")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve seeds, crawl brand pages, and merge new brands into the catalog
    Crawl {
        /// Seed list to use instead of `BCDB_SEEDS_PATH`
        #[arg(long)]
        seeds: Option<PathBuf>,

        /// Keep the previously saved toll snapshot instead of refreshing it
        #[arg(long)]
        skip_toll: bool,
    },
    /// Merge every brand from the category listing page into the catalog
    Import {
        /// Listing page to use instead of `BCDB_LISTING_URL`
        #[arg(long)]
        url: Option<String>,
    },
    /// Refresh only the toll snapshot, keeping catalog items as they are
    Toll,
    /// Print the candidate URLs the seed resolver finds, without crawling
    Resolve {
        /// Seed list to use instead of `BCDB_SEEDS_PATH`
        #[arg(long)]
        seeds: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = bcdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let today = chrono::Local::now().date_naive();
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Crawl { seeds, skip_toll }) => {
            let seeds = catalog::load_seed_list(&config, seeds.as_deref())?;
            let summary = crawl::run_crawl(&config, &seeds, skip_toll, today).await?;
            summary.print(&config.catalog_path);
        }
        Some(Commands::Import { url }) => {
            let url = url.unwrap_or_else(|| config.listing_url.clone());
            let summary = import::run_import(&config, &url, today).await?;
            summary.print(&config.catalog_path);
        }
        Some(Commands::Toll) => {
            let toll = toll::run_toll_refresh(&config, today).await?;
            toll::print_snapshot(&toll);
        }
        Some(Commands::Resolve { seeds }) => {
            let seeds = catalog::load_seed_list(&config, seeds.as_deref())?;
            let candidates = resolve::run_resolve(&config, &seeds).await?;
            resolve::print_candidates(&candidates);
        }
        None => println!("bcdb: no command given; see `bcdb --help`"),
    }

    Ok(())
}

#[cfg(test)]
mod test_support;
