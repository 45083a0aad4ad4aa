//! Corporate master list loading.
//!
//! The master file carries one row per corporate entity known to the
//! disclosure system. Beyond the corporate number and name, its columns are
//! free-form and pass through opaquely; headers are the Japanese field names
//! of the source registry and are treated as opaque strings.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{DataError, Result};
use crate::registry::{is_missing, normalize_jcn, require_column};

/// File name of the corporate master cache.
const MASTER_FILE: &str = "basic_info.csv";
/// Corporate number column (filer corporate number).
const COL_JCN: &str = "提出者法人番号";
/// Corporate name column (filer name).
const COL_NAME: &str = "提出者名";
/// Listing-status column.
const COL_LISTING: &str = "上場区分";
/// Listing-status value marking a listed company.
const LISTED_VALUE: &str = "上場";

/// One row of the corporate master list.
#[derive(Debug, Clone)]
pub struct CorporateMasterEntry {
    /// Corporate number, normalized to a digit string
    pub jcn: String,
    /// Corporate name
    pub name: String,
    /// Whether the listing-status field marks this entity as listed
    pub listed: bool,
    /// Every remaining column as (header, value), in file column order
    pub extra: Vec<(String, String)>,
}

impl CorporateMasterEntry {
    /// Value of a pass-through column by its header name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(header, _)| header.as_str() == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The corporate master list.
///
/// Loaded once from the cache directory and read-only afterwards. Rows
/// missing the corporate number or name are dropped at load time.
#[derive(Debug, Clone)]
pub struct CorporateMaster {
    entries: Vec<CorporateMasterEntry>,
}

impl CorporateMaster {
    /// Load the corporate master list from the cache directory.
    ///
    /// Reads `{cache_dir}/basic_info.csv`. The first line of the file is a
    /// description written by the exporter, not data, and is skipped; the
    /// line after it is the header row. The first column is a row index and
    /// is ignored.
    ///
    /// # Errors
    /// Returns [`DataError::CacheNotFound`] if the file is absent,
    /// [`DataError::Parse`] if a required column is missing or a
    /// corporate-number cell is non-numeric, and [`DataError::Csv`] on
    /// malformed CSV.
    pub fn load(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let path = cache_dir.as_ref().join(MASTER_FILE);
        if !path.exists() {
            return Err(DataError::CacheNotFound { path });
        }

        let content = fs::read_to_string(&path)?;
        let body = content.split_once('\n').map_or("", |(_, rest)| rest);

        let mut reader = csv::Reader::from_reader(body.as_bytes());
        let headers = reader.headers()?.clone();
        let jcn_col = require_column(&headers, COL_JCN, &path)?;
        let name_col = require_column(&headers, COL_NAME, &path)?;
        let listing_col = headers.iter().position(|header| header == COL_LISTING);

        let mut total = 0usize;
        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            total += 1;

            let jcn_raw = record.get(jcn_col).unwrap_or("");
            let name = record.get(name_col).unwrap_or("");
            if is_missing(jcn_raw) || is_missing(name) {
                continue;
            }

            let jcn = normalize_jcn(jcn_raw).ok_or_else(|| {
                DataError::Parse(format!(
                    "Invalid corporate number '{}' in {}",
                    jcn_raw,
                    path.display()
                ))
            })?;
            let listed = listing_col.is_some_and(|col| record.get(col) == Some(LISTED_VALUE));

            let mut extra = Vec::new();
            for (col, header) in headers.iter().enumerate() {
                // Column 0 is the file's row index; the required columns
                // are surfaced as typed fields.
                if col == 0 || col == jcn_col || col == name_col {
                    continue;
                }
                extra.push((header.to_string(), record.get(col).unwrap_or("").to_string()));
            }

            entries.push(CorporateMasterEntry {
                jcn,
                name: name.to_string(),
                listed,
                extra,
            });
        }

        debug!(
            "loaded {} of {} master rows from {}",
            entries.len(),
            total,
            path.display()
        );
        Ok(Self { entries })
    }

    /// All retained entries, in file order.
    pub fn entries(&self) -> &[CorporateMasterEntry] {
        &self.entries
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the master list retained no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry of the given corporate number, if known.
    pub fn find(&self, jcn: &str) -> Option<&CorporateMasterEntry> {
        self.entries.iter().find(|entry| entry.jcn == jcn)
    }
}
