//! Malert CLI binary.
//!
//! Provides command-line access to the cached EDINET registries and to
//! filing retrieval for a single corporation.

mod render;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use malert_data::DataError;
use malert_data::edinet::EdinetClient;
use malert_data::registry::{CorporateMaster, DocumentIndex};
use malert_data::resolver::CorporateFilings;
use std::process;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "malert")]
#[command(about = "Malert: EDINET corporate filings fetcher", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List corporations from the corporate master
    List {
        /// Only show listed companies
        #[arg(long)]
        listed: bool,

        /// Directory holding the cached registry files
        #[arg(long, default_value = "cache")]
        cache_dir: String,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show corporate-master details for one corporation
    Show {
        /// Corporate number (JCN)
        jcn: String,

        /// Directory holding the cached registry files
        #[arg(long, default_value = "cache")]
        cache_dir: String,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Fetch and render every tabular filing for a corporation
    Fetch {
        /// Corporate number (JCN)
        jcn: String,

        /// Year of the cached document index
        #[arg(long, default_value = "2024")]
        year: i32,

        /// Month of the cached document index
        #[arg(long, default_value = "11")]
        month: u32,

        /// EDINET API subscription key (falls back to EDINET_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Directory holding the cached registry files
        #[arg(long, default_value = "cache")]
        cache_dir: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            listed,
            cache_dir,
            format,
        } => list_corporations(&cache_dir, listed, &format),
        Commands::Show {
            jcn,
            cache_dir,
            format,
        } => show_corporation(&cache_dir, &jcn, &format),
        Commands::Fetch {
            jcn,
            year,
            month,
            api_key,
            cache_dir,
        } => fetch_filings(&cache_dir, &jcn, year, month, api_key).await,
    }
}

fn list_corporations(
    cache_dir: &str,
    listed_only: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let master = CorporateMaster::load(cache_dir)?;

    let entries: Vec<_> = master
        .entries()
        .iter()
        .filter(|entry| !listed_only || entry.listed)
        .collect();

    if format.to_lowercase() == "json" {
        render::corporations_json(&entries)?;
    } else {
        render::corporations_text(&entries, master.len());
    }

    Ok(())
}

fn show_corporation(
    cache_dir: &str,
    jcn: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let master = CorporateMaster::load(cache_dir)?;

    let Some(entry) = master.find(jcn) else {
        println!(
            "Corporate number {} is not in the corporate master ({} companies).",
            jcn,
            master.len()
        );
        return Ok(());
    };

    if format.to_lowercase() == "json" {
        render::corporation_json(entry)?;
    } else {
        render::corporation_text(entry);
    }

    Ok(())
}

async fn fetch_filings(
    cache_dir: &str,
    jcn: &str,
    year: i32,
    month: u32,
    api_key: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(api_key) = api_key.or_else(|| std::env::var("EDINET_API_KEY").ok()) else {
        return Err("missing API key: pass --api-key or set EDINET_API_KEY".into());
    };

    let index = DocumentIndex::load(cache_dir, year, month)?;
    // The master enriches the info panel but is not required for fetching.
    let master = CorporateMaster::load(cache_dir).ok();

    render::fetch_banner(jcn);
    render::corporation_panel(jcn, master.as_ref().and_then(|m| m.find(jcn)), &index);

    let client = EdinetClient::new(api_key)?;

    let pending = index
        .entries_for(jcn)
        .iter()
        .filter(|entry| entry.has_csv_data)
        .count();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Fetching {} document(s) from EDINET...", pending));

    match CorporateFilings::fetch(&client, &index, jcn).await {
        Ok(filings) => {
            pb.finish_with_message(format!("Fetched {} document(s)", filings.len()));
            println!();
            render::filings(&filings);
            Ok(())
        }
        Err(DataError::UnknownCorporation(_)) => {
            pb.finish_and_clear();
            render::period_note(jcn, index.period());
            Ok(())
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            Err(e.into())
        }
    }
}
