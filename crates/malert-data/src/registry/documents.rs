//! Monthly document index loading.
//!
//! EDINET publishes disclosure documents by submission date; a collaborator
//! process materializes one CSV per month under the cache directory. This
//! module loads such a file into a typed, immutable index keyed by corporate
//! number.

use std::path::Path;

use tracing::debug;

use crate::error::{DataError, Result};
use crate::registry::{is_missing, normalize_jcn, require_column};

/// Document identifier column in the index cache.
const COL_DOC_ID: &str = "docID";
/// Filer name column in the index cache.
const COL_FILER_NAME: &str = "filerName";
/// Corporate number column in the index cache.
const COL_JCN: &str = "JCN";
/// Tabular-content flag column in the index cache.
const COL_CSV_FLAG: &str = "csvFlag";

/// One filing row of the monthly document index.
#[derive(Debug, Clone)]
pub struct DocumentIndexEntry {
    /// Document identifier (opaque string, e.g. `S100XXXX`)
    pub doc_id: String,
    /// Name of the filing entity
    pub filer_name: String,
    /// Corporate number of the filing entity, normalized to a digit string
    pub jcn: String,
    /// Whether the filing's archive carries machine-readable CSV tables
    pub has_csv_data: bool,
}

/// The document index for one (year, month) period.
///
/// Loaded once from the cache directory and read-only afterwards. Rows
/// missing a document identifier, filer name, or corporate number are
/// dropped at load time; every retained entry has all three populated.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    entries: Vec<DocumentIndexEntry>,
    year: i32,
    month: u32,
}

impl DocumentIndex {
    /// Load the document index for one period from the cache directory.
    ///
    /// Reads `{cache_dir}/documents_list_{YYYY}-{MM}.csv`. The first column
    /// of the file is a row index and is ignored; the corporate-number
    /// column is normalized from its numeric source form to a canonical
    /// digit string.
    ///
    /// # Arguments
    /// * `cache_dir` - Directory holding the pre-materialized caches
    /// * `year` - Submission year of the period
    /// * `month` - Submission month of the period (1-12)
    ///
    /// # Errors
    /// Returns [`DataError::CacheNotFound`] if no cache file exists for the
    /// period, [`DataError::Parse`] if a required column is missing or a
    /// corporate-number cell is non-numeric, and [`DataError::Csv`] on
    /// malformed CSV.
    pub fn load(cache_dir: impl AsRef<Path>, year: i32, month: u32) -> Result<Self> {
        let path = cache_dir.as_ref().join(Self::cache_file_name(year, month));
        if !path.exists() {
            return Err(DataError::CacheNotFound { path });
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let headers = reader.headers()?.clone();
        let doc_id_col = require_column(&headers, COL_DOC_ID, &path)?;
        let filer_name_col = require_column(&headers, COL_FILER_NAME, &path)?;
        let jcn_col = require_column(&headers, COL_JCN, &path)?;
        let flag_col = require_column(&headers, COL_CSV_FLAG, &path)?;

        let mut total = 0usize;
        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            total += 1;

            let doc_id = record.get(doc_id_col).unwrap_or("");
            let filer_name = record.get(filer_name_col).unwrap_or("");
            let jcn_raw = record.get(jcn_col).unwrap_or("");
            if is_missing(doc_id) || is_missing(filer_name) || is_missing(jcn_raw) {
                continue;
            }

            let jcn = normalize_jcn(jcn_raw).ok_or_else(|| {
                DataError::Parse(format!(
                    "Invalid corporate number '{}' in {}",
                    jcn_raw,
                    path.display()
                ))
            })?;

            entries.push(DocumentIndexEntry {
                doc_id: doc_id.to_string(),
                filer_name: filer_name.to_string(),
                jcn,
                has_csv_data: flag_is_set(record.get(flag_col).unwrap_or("")),
            });
        }

        debug!(
            "loaded {} of {} index rows from {}",
            entries.len(),
            total,
            path.display()
        );
        Ok(Self {
            entries,
            year,
            month,
        })
    }

    /// File name of the index cache for one period.
    ///
    /// # Example
    /// ```
    /// # use malert_data::registry::DocumentIndex;
    /// let name = DocumentIndex::cache_file_name(2024, 3);
    /// assert_eq!(name, "documents_list_2024-03.csv");
    /// ```
    pub fn cache_file_name(year: i32, month: u32) -> String {
        format!("documents_list_{:04}-{:02}.csv", year, month)
    }

    /// All retained entries, in file order.
    pub fn entries(&self) -> &[DocumentIndexEntry] {
        &self.entries
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index retained no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The (year, month) period this index was loaded for.
    pub const fn period(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// Whether any entry belongs to the given corporate number.
    pub fn contains_jcn(&self, jcn: &str) -> bool {
        self.entries.iter().any(|entry| entry.jcn == jcn)
    }

    /// All entries of the given corporate number, in file order.
    ///
    /// Includes entries whose tabular-content flag is unset; callers decide
    /// whether those qualify for fetching.
    pub fn entries_for(&self, jcn: &str) -> Vec<&DocumentIndexEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.jcn == jcn)
            .collect()
    }
}

/// Whether a raw tabular-content cell is the "has CSV data" sentinel.
///
/// The source column is numeric with 1 meaning "tables present". Anything
/// else, including an empty cell or a non-numeric value, means no tables.
fn flag_is_set(raw: &str) -> bool {
    raw.parse::<f64>().map(|value| value == 1.0).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use rstest::rstest;
    use tempfile::tempdir;

    use super::*;

    fn write_index(dir: &Path, year: i32, month: u32, content: &str) {
        fs::write(dir.join(DocumentIndex::cache_file_name(year, month)), content).unwrap();
    }

    #[test]
    fn test_cache_file_name_zero_pads() {
        assert_eq!(
            DocumentIndex::cache_file_name(2024, 11),
            "documents_list_2024-11.csv"
        );
        assert_eq!(
            DocumentIndex::cache_file_name(2024, 3),
            "documents_list_2024-03.csv"
        );
    }

    #[test]
    fn test_load_drops_incomplete_rows() {
        let dir = tempdir().unwrap();
        write_index(
            dir.path(),
            2024,
            11,
            "\
,docID,filerName,JCN,csvFlag
0,S100AAAA,Aoba Holdings,6010001000001.0,1
1,,Missing Doc Id,6010001000002.0,1
2,S100BBBB,,6010001000003.0,1
3,S100CCCC,Missing Jcn,,1
4,S100DDDD,Chiyoda Denki,6010001000004.0,0
",
        );

        let index = DocumentIndex::load(dir.path(), 2024, 11).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0].doc_id, "S100AAAA");
        assert!(index.entries()[0].has_csv_data);
        assert_eq!(index.entries()[1].doc_id, "S100DDDD");
        assert!(!index.entries()[1].has_csv_data);
        assert_eq!(index.period(), (2024, 11));
    }

    #[test]
    fn test_load_normalizes_jcn_column() {
        let dir = tempdir().unwrap();
        write_index(
            dir.path(),
            2024,
            11,
            "\
,docID,filerName,JCN,csvFlag
0,S100AAAA,Aoba Holdings,6010001000001.0,1
1,S100BBBB,Beppu Foods,6.010001000002e12,1
2,S100CCCC,Chiyoda Denki,6010001000003,1
",
        );

        let index = DocumentIndex::load(dir.path(), 2024, 11).unwrap();
        let jcns: Vec<&str> = index
            .entries()
            .iter()
            .map(|entry| entry.jcn.as_str())
            .collect();
        assert_eq!(
            jcns,
            vec!["6010001000001", "6010001000002", "6010001000003"]
        );
        for jcn in jcns {
            assert!(!jcn.contains('.'));
            assert!(!jcn.contains('e'));
        }
    }

    #[test]
    fn test_load_missing_period_is_cache_not_found() {
        let dir = tempdir().unwrap();
        let result = DocumentIndex::load(dir.path(), 2019, 1);
        assert!(matches!(result, Err(DataError::CacheNotFound { .. })));
    }

    #[test]
    fn test_load_missing_required_column_fails() {
        let dir = tempdir().unwrap();
        write_index(
            dir.path(),
            2024,
            11,
            ",docID,filerName,JCN\n0,S100AAAA,Aoba Holdings,6010001000001.0\n",
        );

        let result = DocumentIndex::load(dir.path(), 2024, 11);
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_load_garbage_jcn_fails() {
        let dir = tempdir().unwrap();
        write_index(
            dir.path(),
            2024,
            11,
            ",docID,filerName,JCN,csvFlag\n0,S100AAAA,Aoba Holdings,not-a-number,1\n",
        );

        let result = DocumentIndex::load(dir.path(), 2024, 11);
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[test]
    fn test_load_drops_na_token_cells() {
        let dir = tempdir().unwrap();
        write_index(
            dir.path(),
            2024,
            11,
            "\
,docID,filerName,JCN,csvFlag
0,S100AAAA,Aoba Holdings,6010001000001.0,1
1,S100BBBB,Beppu Foods,NaN,1
2,NaN,Chiyoda Denki,6010001000002.0,1
3,S100DDDD,nan,6010001000003.0,1
",
        );

        // Spelled-out NA cells drop the row like empty ones; they are not
        // a load failure.
        let index = DocumentIndex::load(dir.path(), 2024, 11).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].doc_id, "S100AAAA");
    }

    #[rstest]
    #[case("1", true)]
    #[case("1.0", true)]
    #[case("0", false)]
    #[case("0.0", false)]
    #[case("2", false)]
    #[case("", false)]
    #[case("NaN", false)]
    #[case("yes", false)]
    fn test_flag_is_set(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(flag_is_set(raw), expected);
    }

    #[test]
    fn test_jcn_lookup_preserves_file_order() {
        let dir = tempdir().unwrap();
        write_index(
            dir.path(),
            2024,
            11,
            "\
,docID,filerName,JCN,csvFlag
0,S100AAAA,Aoba Holdings,6010001000001,1
1,S100BBBB,Beppu Foods,6010001000002,1
2,S100CCCC,Aoba Holdings,6010001000001,0
3,S100DDDD,Aoba Holdings,6010001000001,1
",
        );

        let index = DocumentIndex::load(dir.path(), 2024, 11).unwrap();
        assert!(index.contains_jcn("6010001000001"));
        assert!(!index.contains_jcn("9999999999999"));

        let selected: Vec<&str> = index
            .entries_for("6010001000001")
            .iter()
            .map(|entry| entry.doc_id.as_str())
            .collect();
        assert_eq!(selected, vec!["S100AAAA", "S100CCCC", "S100DDDD"]);
    }
}
