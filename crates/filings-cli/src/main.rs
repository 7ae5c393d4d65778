//! Command-line interface for nse-filings
//!
//! Configuration comes from the environment (see `filings_utils::config::vars`);
//! flags override it.
//!
//! ```bash
//! # Serve the HTTP API with a SQLite store
//! FILINGS_STORE_URL=sqlite://filings.db filings serve --port 5000
//!
//! # One-off scrape for a symbol, saved when a store is configured
//! filings scrape --symbol INFY --from-date 01-10-2025 --to-date 21-10-2025
//!
//! # Today's announcements, also saved as CSV
//! filings scrape --today --csv announcements.csv
//! ```

mod export;
mod table;

use anyhow::{Context, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use filings_core::{DocumentStore, FetchQuery, Fetcher, Ingestor};
use filings_nse::{ListingSnapshot, NseClient, new_listings};
use filings_server::AppState;
use filings_store::open_store;
use filings_utils::{AppConfig, StoreConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "filings")]
#[command(about = "NSE corporate announcements scraper", long_about = None)]
struct Cli {
    /// Document store connection string (memory://, sqlite::memory:, sqlite://<path>)
    #[arg(long, global = true)]
    store_url: Option<String>,

    /// Collection (table) holding company documents
    #[arg(long, global = true)]
    collection: Option<String>,

    /// Override the NSE site root
    #[arg(long, global = true)]
    nse_base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch announcements once and print them
    Scrape(ScrapeArgs),
    /// Show persisted documents
    Inspect {
        /// Company to show; lists all companies when omitted
        company: Option<String>,
    },
    /// Report symbols newly added to the F&O securities list
    NewListings {
        #[arg(long, default_value = "nse_stock_list.json")]
        snapshot: PathBuf,
    },
    /// Download an announcement attachment
    Download {
        /// Absolute URL or path relative to the NSE site
        url: String,
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// Exchange segment, e.g. equities or sme
    #[arg(long)]
    index: Option<String>,
    /// DD-MM-YYYY
    #[arg(long)]
    from_date: Option<String>,
    /// DD-MM-YYYY
    #[arg(long)]
    to_date: Option<String>,
    /// Restrict to today's announcements
    #[arg(long, conflicts_with_all = ["from_date", "to_date"])]
    today: bool,
    #[arg(short, long)]
    symbol: Option<String>,
    /// Print raw records as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Also write the records to a CSV file
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
    /// Do not persist even when a store is configured
    #[arg(long)]
    no_save: bool,
}

impl ScrapeArgs {
    fn query(&self) -> filings_core::Result<FetchQuery> {
        let query = FetchQuery::parse(
            self.index.as_deref(),
            self.from_date.as_deref(),
            self.to_date.as_deref(),
            self.symbol.as_deref(),
        )?;

        if self.today {
            let today = Local::now().date_naive();
            return Ok(FetchQuery {
                from_date: Some(today),
                to_date: Some(today),
                ..query
            });
        }
        Ok(query)
    }
}

impl Cli {
    /// Environment configuration with flag overrides applied
    fn config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::from_env().context("invalid configuration")?;

        if let Some(url) = &self.store_url {
            let store = StoreConfig::new(url.as_str());
            config.store = Some(match config.store.take() {
                Some(existing) => store.with_collection(existing.collection),
                None => store,
            });
        }
        if let Some(collection) = &self.collection {
            match config.store.as_mut() {
                Some(store) => store.collection = collection.clone(),
                None => bail!("--collection needs a store (set --store-url or FILINGS_STORE_URL)"),
            }
        }
        if let Some(base_url) = &self.nse_base_url {
            config.nse.base_url = base_url.clone();
        }
        if let Commands::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

async fn require_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let Some(store_config) = &config.store else {
        bail!("no store configured (set --store-url or FILINGS_STORE_URL)");
    };
    Ok(open_store(store_config).await?)
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(config).await?;
    filings_server::serve(state, &config.server)
        .await
        .with_context(|| format!("server on {} failed", config.server.bind_addr()))
}

async fn scrape(config: &AppConfig, args: &ScrapeArgs) -> anyhow::Result<()> {
    let query = args.query()?;
    let client = NseClient::new(&config.nse)?;
    let records = client.fetch(&query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", table::records(&records));
        println!("{} announcements", records.len());
    }

    if let Some(path) = &args.csv {
        export::export_csv(path, &records)?;
        info!(path = %path.display(), rows = records.len(), "CSV written");
    }

    if args.no_save || config.store.is_none() {
        return Ok(());
    }

    let ingestor = Ingestor::new(require_store(config).await?);
    let report = ingestor.ingest_records(&records).await;
    if !args.json {
        println!("{}", table::report(&report));
    }
    for failure in &report.errors {
        eprintln!("failed to save {}: {}", failure.company, failure.error);
    }
    Ok(())
}

async fn inspect(config: &AppConfig, company: Option<String>) -> anyhow::Result<()> {
    let store = require_store(config).await?;

    if let Some(company) = company {
        let Some(doc) = store.find_document(&company).await? else {
            bail!("no document for company {company}");
        };
        println!("{} ({})", doc.company, doc.symbol.as_deref().unwrap_or("-"));
        println!("last updated {}", doc.last_updated.to_rfc3339());
        println!("{}", table::document(&doc));
        return Ok(());
    }

    let mut rows = Vec::new();
    for company in store.list_companies().await? {
        if let Some(doc) = store.find_document(&company).await? {
            rows.push((doc.company.clone(), doc.symbol.clone(), doc.len()));
        }
    }
    println!("{}", table::companies(&rows));
    println!("{} companies", rows.len());
    Ok(())
}

async fn new_listings_report(config: &AppConfig, snapshot: &Path) -> anyhow::Result<()> {
    let client = NseClient::new(&config.nse)?;
    let current = client.fno_symbols().await?;

    let previous = ListingSnapshot::load(snapshot)
        .await
        .map(|s| s.symbols)
        .unwrap_or_default();
    let added = new_listings(&previous, &current);

    if added.is_empty() {
        println!("No new listings ({} symbols tracked)", current.len());
    } else {
        println!("New listings:");
        for symbol in &added {
            println!("  {symbol}");
        }
    }

    ListingSnapshot::new(current).save(snapshot).await?;
    info!(path = %snapshot.display(), new = added.len(), "Snapshot updated");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    filings_utils::init_tracing();

    let cli = Cli::parse();
    let config = cli.config()?;

    match cli.command {
        Commands::Serve { .. } => serve(&config).await,
        Commands::Scrape(args) => scrape(&config, &args).await,
        Commands::Inspect { company } => inspect(&config, company).await,
        Commands::NewListings { snapshot } => new_listings_report(&config, &snapshot).await,
        Commands::Download { url, out } => {
            let client = NseClient::new(&config.nse)?;
            let bytes = client.download_attachment(&url, &out).await?;
            println!("Saved {} ({} bytes)", out.display(), bytes);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scrape() {
        let cli = Cli::try_parse_from([
            "filings",
            "scrape",
            "--symbol",
            "INFY",
            "--from-date",
            "01-10-2025",
            "--no-save",
        ])
        .unwrap();

        match cli.command {
            Commands::Scrape(args) => {
                assert_eq!(args.symbol.as_deref(), Some("INFY"));
                assert!(args.no_save);
                let query = args.query().unwrap();
                assert_eq!(query.symbol.as_deref(), Some("INFY"));
                assert!(query.from_date.is_some());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_scrape_today_and_csv() {
        let cli = Cli::try_parse_from([
            "filings", "scrape", "--today", "--symbol", "tcs", "--csv", "out.csv",
        ])
        .unwrap();

        let Commands::Scrape(args) = cli.command else {
            panic!("expected scrape");
        };
        assert_eq!(args.csv.as_deref(), Some(Path::new("out.csv")));

        let query = args.query().unwrap();
        let today = Local::now().date_naive();
        assert_eq!(query.from_date, Some(today));
        assert_eq!(query.to_date, Some(today));
        assert_eq!(query.symbol.as_deref(), Some("TCS"));
    }

    #[test]
    fn test_today_conflicts_with_dates() {
        assert!(
            Cli::try_parse_from(["filings", "scrape", "--today", "--from-date", "01-10-2025"])
                .is_err()
        );
    }

    #[test]
    fn test_global_store_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["filings", "inspect", "ACME", "--store-url", "memory://"])
            .unwrap();
        assert_eq!(cli.store_url.as_deref(), Some("memory://"));
    }

    #[test]
    fn test_download_requires_out() {
        assert!(Cli::try_parse_from(["filings", "download", "/corporate/x.pdf"]).is_err());
    }
}
