//! Demo of the EDINET filing retrieval flow.
//!
//! This example demonstrates how to:
//! - Load the cached document index and corporate master
//! - Pick a corporation with indexed filings
//! - Fetch every tabular filing and summarize the extracted tables
//!
//! Run with: EDINET_API_KEY=... cargo run --example fetch_filings_demo

use malert_data::edinet::EdinetClient;
use malert_data::registry::{CorporateMaster, DocumentIndex};
use malert_data::resolver::CorporateFilings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("EDINET_API_KEY")?;

    println!("Loading registry caches...");
    let index = DocumentIndex::load("cache", 2024, 11)?;
    let master = CorporateMaster::load("cache")?;
    println!(
        "{} filings indexed, {} corporations known",
        index.len(),
        master.len()
    );

    // Pick the first corporation with at least one indexed filing
    let Some(corporation) = master
        .entries()
        .iter()
        .find(|entry| index.contains_jcn(&entry.jcn))
    else {
        println!("No indexed corporation found for this period");
        return Ok(());
    };

    println!("\n{} ({})", corporation.name, corporation.jcn);
    println!(
        "  listing: {}",
        if corporation.listed { "listed" } else { "unlisted" }
    );

    let client = EdinetClient::new(api_key)?;
    println!("\nFetching filings...");
    let filings = CorporateFilings::fetch(&client, &index, &corporation.jcn).await?;
    println!("Fetched {} filings", filings.len());

    for document in filings.documents() {
        println!("\nDocument ID: {}", document.doc_id);
        for table in document.tables.iter() {
            println!(
                "  {} ({} rows x {} columns)",
                table.name,
                table.data.height(),
                table.data.width()
            );
        }
    }

    Ok(())
}
