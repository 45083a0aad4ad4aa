//! In-memory extraction of filing archives.
//!
//! A fetched filing is a ZIP archive whose tabular entries are UTF-16,
//! tab-separated `.csv` files. Extraction never touches the filesystem: the
//! archive bytes are read from memory and every table is parsed straight
//! into a string-typed `DataFrame`.

use std::io::{Cursor, Read};

use encoding_rs::UTF_16LE;
use polars::prelude::*;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{DataError, Result};

/// One parsed tabular entry of a filing archive.
#[derive(Debug, Clone)]
pub struct FilingTable {
    /// Entry name within the archive, verbatim
    pub name: String,
    /// Parsed table; every column is read as strings
    pub data: DataFrame,
}

/// The tabular contents of one fetched filing, keyed by in-archive entry
/// name and ordered as the archive lists them.
///
/// Transient by design: a bundle lives for one fetch-and-render cycle and
/// is never persisted.
#[derive(Debug, Clone, Default)]
pub struct FilingTables {
    tables: Vec<FilingTable>,
}

impl FilingTables {
    /// Parse the tabular entries of a ZIP archive held in memory.
    ///
    /// Every entry whose name ends in `.csv` (case-insensitive) is decoded
    /// as UTF-16 text and parsed as tab-separated values with a header row;
    /// all other entries are silently skipped. An archive without tabular
    /// entries yields an empty bundle, which is not an error.
    ///
    /// # Errors
    /// Returns [`DataError::Zip`] on a malformed archive,
    /// [`DataError::Decode`] when an entry is not valid UTF-16 text, and
    /// [`DataError::Csv`] / [`DataError::Polars`] when an entry cannot be
    /// shaped into a table.
    pub fn from_zip_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut tables = Vec::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_string();
            if !name.to_lowercase().ends_with(".csv") {
                continue;
            }

            let mut raw = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut raw)?;
            let text =
                decode_utf16(&raw).ok_or_else(|| DataError::Decode { entry: name.clone() })?;
            let data = parse_tab_separated(&text)?;
            debug!(
                "parsed {} ({} rows x {} columns)",
                name,
                data.height(),
                data.width()
            );
            tables.push(FilingTable { name, data });
        }

        Ok(Self { tables })
    }

    /// Tables in archive order.
    pub fn iter(&self) -> impl Iterator<Item = &FilingTable> {
        self.tables.iter()
    }

    /// Table of one in-archive entry name.
    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.tables
            .iter()
            .find(|table| table.name == name)
            .map(|table| &table.data)
    }

    /// Entry names in archive order.
    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|table| table.name.as_str()).collect()
    }

    /// Number of tables in the bundle.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the bundle holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Decode archive-entry bytes as UTF-16 text.
///
/// EDINET payloads are UTF-16 with a BOM; the decoder honors a leading BOM
/// of either endianness and assumes little-endian when none is present.
fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (text, _, had_errors) = UTF_16LE.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// Parse tab-separated text with a header row into a string-typed frame.
///
/// Records shorter than the header row are padded with empty cells and
/// surplus fields of longer records are dropped, so ragged source files
/// still load.
fn parse_tab_separated(text: &str) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (col, values) in cells.iter_mut().enumerate() {
            values.push(record.get(col).unwrap_or("").to_string());
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(cells)
        .map(|(header, values)| Series::new(header.into(), values).into())
        .collect();
    Ok(DataFrame::new(columns)?)
}
