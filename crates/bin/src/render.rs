//! Terminal and JSON rendering for the Malert CLI.
//!
//! Keeps presentation formatting out of the command handlers in `main`.

use malert_data::registry::{CorporateMasterEntry, DocumentIndex};
use malert_data::resolver::CorporateFilings;
use serde_json::json;

/// Print the corporate master as an aligned text listing.
pub(crate) fn corporations_text(entries: &[&CorporateMasterEntry], total: usize) {
    println!("Corporate Master");
    println!("================\n");
    println!("Showing {} of {} companies\n", entries.len(), total);

    for entry in entries {
        let marker = if entry.listed { "listed  " } else { "        " };
        println!("  {:<14} {} {}", entry.jcn, marker, entry.name);
    }
}

/// Print the corporate master as a JSON document.
pub(crate) fn corporations_json(
    entries: &[&CorporateMasterEntry],
) -> Result<(), Box<dyn std::error::Error>> {
    let corporations: Vec<_> = entries
        .iter()
        .map(|entry| {
            json!({
                "jcn": entry.jcn,
                "name": entry.name,
                "listed": entry.listed,
            })
        })
        .collect();

    let output = json!({
        "count": corporations.len(),
        "corporations": corporations,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print every field of a single master entry.
pub(crate) fn corporation_text(entry: &CorporateMasterEntry) {
    println!("Corporate number: {}", entry.jcn);
    println!("Name:             {}", entry.name);
    println!(
        "Listing status:   {}",
        if entry.listed { "listed" } else { "unlisted" }
    );

    if !entry.extra.is_empty() {
        println!();
        for (field, value) in &entry.extra {
            println!("  {}: {}", field, value);
        }
    }
}

/// Print a single master entry as a JSON document, pass-through fields included.
pub(crate) fn corporation_json(
    entry: &CorporateMasterEntry,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut output = json!({
        "jcn": entry.jcn,
        "name": entry.name,
        "listed": entry.listed,
    });

    for (field, value) in &entry.extra {
        output[field.as_str()] = json!(value);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the banner that opens a fetch run.
pub(crate) fn fetch_banner(jcn: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{:^62}║", format!("EDINET FILINGS: {}", jcn));
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

/// Print the info panel shown before fetching starts.
pub(crate) fn corporation_panel(
    jcn: &str,
    entry: Option<&CorporateMasterEntry>,
    index: &DocumentIndex,
) {
    entry.map_or_else(
        || println!("Corporation:       (not in corporate master)"),
        |entry| {
            println!("Corporation:       {}", entry.name);
            println!(
                "Listing status:    {}",
                if entry.listed { "listed" } else { "unlisted" }
            );
        },
    );

    let (year, month) = index.period();
    println!("Corporate number:  {}", jcn);
    println!("Index period:      {:04}-{:02}", year, month);

    let indexed = index.entries_for(jcn);
    let tabular = indexed.iter().filter(|e| e.has_csv_data).count();
    println!(
        "Documents indexed: {} ({} with tabular data)\n",
        indexed.len(),
        tabular
    );
}

/// Explain why a corporation has no documents in the loaded index.
pub(crate) fn period_note(jcn: &str, period: (i32, u32)) {
    let (year, month) = period;
    println!(
        "No documents for corporate number {} in the {:04}-{:02} index.",
        jcn, year, month
    );
    println!();
    println!("EDINET indexes disclosures by submission period, so only filings");
    println!("submitted during the loaded month are discoverable. Rerun with");
    println!("--year/--month once the document list for another period is cached.");
}

/// Print every fetched document with one rendered table per contained file.
pub(crate) fn filings(filings: &CorporateFilings) {
    let mut total_tables = 0;

    for document in filings.documents() {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(
            "DOCUMENT {}  ({} table(s))",
            document.doc_id,
            document.tables.len()
        );
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        for table in document.tables.iter() {
            let (rows, cols) = table.data.shape();
            println!("{} ({} rows, {} columns)", table.name, rows, cols);
            println!("{}\n", table.data);
            total_tables += 1;
        }
    }

    println!(
        "Fetched {} document(s), {} table(s) total.",
        filings.len(),
        total_tables
    );
}
