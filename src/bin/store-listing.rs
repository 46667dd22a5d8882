//! store-listing CLI - fetch or parse a store listing and print it as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use store_listing::{parse_listing, Envelope, FetcherConfig, ListingFetcher, ListingQuery};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "store-listing")]
#[command(about = "Fetch a public store listing and normalize it into JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log extraction details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a listing from the store
    Fetch {
        /// Package or bundle identifier, e.g. com.example.app
        identifier: String,
    },
    /// Run extraction on a saved listing page
    Parse {
        /// Saved HTML page
        file: PathBuf,

        /// Identifier to report in errors
        #[arg(long, default_value = "local")]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let record = match cli.command {
        Command::Fetch { identifier } => {
            let config = match &cli.config {
                Some(path) => FetcherConfig::load(path)
                    .with_context(|| format!("loading config from {}", path.display()))?,
                None => FetcherConfig::default(),
            };
            let fetcher = ListingFetcher::with_config(config)?;
            fetcher
                .fetch(&ListingQuery::new(identifier.as_str()))
                .await
                .with_context(|| format!("fetching listing for {identifier}"))?
        }
        Command::Parse { file, id } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            parse_listing(&id, &html)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&Envelope { data: record })?);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "store_listing=debug" } else { "store_listing=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
