//! Local registry caches: the monthly document index and the corporate
//! master list.
//!
//! Both caches are pre-materialized CSV files living under one cache
//! directory; loading is a pure read with no network access. Rows missing a
//! required field are dropped (an NA token in the cell counts as missing),
//! and corporate numbers (JCN) are normalized from their numeric source
//! form to canonical digit strings at load time.
//!
//! # Example
//!
//! ```no_run
//! use malert_data::registry::{CorporateMaster, DocumentIndex};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let index = DocumentIndex::load("cache", 2024, 11)?;
//!     let master = CorporateMaster::load("cache")?;
//!     println!(
//!         "{} filings indexed, {} corporations known",
//!         index.len(),
//!         master.len()
//!     );
//!     Ok(())
//! }
//! ```

use std::path::Path;

use crate::error::{DataError, Result};

pub mod corporations;
pub mod documents;

// Re-export main types
pub use corporations::{CorporateMaster, CorporateMasterEntry};
pub use documents::{DocumentIndex, DocumentIndexEntry};

/// Position of a required column in a header row.
///
/// Both cache files are consumed by header name rather than position, so a
/// missing required column fails the whole load instead of silently
/// misreading cells.
pub(crate) fn require_column(
    headers: &csv::StringRecord,
    name: &str,
    path: &Path,
) -> Result<usize> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| {
            DataError::Parse(format!(
                "Required column '{}' missing from {}",
                name,
                path.display()
            ))
        })
}

/// Cell values treated as missing, matching the NA tokens of the
/// pandas-based exporter that writes the registry caches. An empty cell is
/// the common rendering; the rest appear when the exporter spells NA out.
const NA_TOKENS: [&str; 19] = [
    "",
    "#N/A",
    "#N/A N/A",
    "#NA",
    "-1.#IND",
    "-1.#QNAN",
    "-NaN",
    "-nan",
    "1.#IND",
    "1.#QNAN",
    "<NA>",
    "N/A",
    "NA",
    "NULL",
    "NaN",
    "None",
    "n/a",
    "nan",
    "null",
];

/// Whether a raw cell holds no value.
pub(crate) fn is_missing(raw: &str) -> bool {
    NA_TOKENS.contains(&raw)
}

/// Normalizes a raw corporate-number cell to its canonical digit-string
/// form.
///
/// Plain digit strings pass through untouched, so a value that already
/// carries leading zeros keeps them. Values written in a numeric form
/// (`"6010001000001.0"`, `"6.010001000001e12"`) are parsed and re-rendered
/// as plain integers. Returns `None` for anything that is neither.
pub(crate) fn normalize_jcn(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return Some(raw.to_string());
    }
    let value = raw.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(format!("{}", value as i64))
}
