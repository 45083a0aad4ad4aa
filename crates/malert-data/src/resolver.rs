//! Corporate filing resolution.
//!
//! Bridges the document index and the EDINET client: given one corporate
//! number, fetches every indexed filing flagged as carrying tabular data,
//! strictly sequentially and in index order.

use tracing::{debug, info};

use crate::edinet::{EdinetClient, FilingTables};
use crate::error::{DataError, Result};
use crate::registry::DocumentIndex;

/// One fetched filing of a corporation.
#[derive(Debug, Clone)]
pub struct FilingDocument {
    /// EDINET document identifier
    pub doc_id: String,
    /// Parsed tables of the filing's archive
    pub tables: FilingTables,
}

/// Every qualifying filing of one corporation, in document-index order.
///
/// Built per request and discarded after rendering. A failed fetch aborts
/// the whole resolution; nothing partial is returned.
#[derive(Debug, Clone)]
pub struct CorporateFilings {
    jcn: String,
    documents: Vec<FilingDocument>,
}

impl CorporateFilings {
    /// Fetch every tabular filing of one corporation.
    ///
    /// Selects the index rows of `jcn`, keeps those flagged as carrying
    /// tabular data, and fetches each in index order, one HTTP round trip
    /// at a time; a fetch completes before the next starts.
    ///
    /// # Arguments
    /// * `client` - EDINET client used for every document fetch
    /// * `index` - Loaded document index for the period of interest
    /// * `jcn` - Corporate number to resolve
    ///
    /// # Returns
    /// The fetched filings; empty when the corporation has index rows but
    /// none flagged as tabular, which is not an error.
    ///
    /// # Errors
    /// Returns [`DataError::UnknownCorporation`] when `jcn` is absent from
    /// the index, checked before any network traffic. A failed document
    /// fetch propagates immediately and filings fetched earlier in the
    /// same call are dropped with it.
    ///
    /// # Example
    /// ```no_run
    /// use malert_data::edinet::EdinetClient;
    /// use malert_data::registry::DocumentIndex;
    /// use malert_data::resolver::CorporateFilings;
    ///
    /// # async fn example() -> malert_data::Result<()> {
    /// let index = DocumentIndex::load("cache", 2024, 11)?;
    /// let client = EdinetClient::new("subscription-key")?;
    /// let filings = CorporateFilings::fetch(&client, &index, "6010001000001").await?;
    /// println!("{} filings fetched", filings.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(client: &EdinetClient, index: &DocumentIndex, jcn: &str) -> Result<Self> {
        if !index.contains_jcn(jcn) {
            return Err(DataError::UnknownCorporation(jcn.to_string()));
        }

        let mut documents = Vec::new();
        for entry in index.entries_for(jcn) {
            if !entry.has_csv_data {
                debug!("skipping {} (no tabular data)", entry.doc_id);
                continue;
            }
            let tables = client.fetch_document(&entry.doc_id).await?;
            documents.push(FilingDocument {
                doc_id: entry.doc_id.clone(),
                tables,
            });
        }

        info!("fetched {} filings for {}", documents.len(), jcn);
        Ok(Self {
            jcn: jcn.to_string(),
            documents,
        })
    }

    /// Corporate number this collection was resolved for.
    pub fn jcn(&self) -> &str {
        &self.jcn
    }

    /// Fetched filings, in document-index order.
    pub fn documents(&self) -> &[FilingDocument] {
        &self.documents
    }

    /// Tables of one fetched document.
    pub fn get(&self, doc_id: &str) -> Option<&FilingTables> {
        self.documents
            .iter()
            .find(|document| document.doc_id == doc_id)
            .map(|document| &document.tables)
    }

    /// Document identifiers in fetch order.
    pub fn doc_ids(&self) -> Vec<&str> {
        self.documents
            .iter()
            .map(|document| document.doc_id.as_str())
            .collect()
    }

    /// Number of fetched filings.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no filing qualified for fetching.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
