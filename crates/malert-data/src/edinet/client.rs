//! EDINET document API client.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::edinet::archive::FilingTables;
use crate::error::{DataError, Result};

/// EDINET v2 API base URL
const EDINET_BASE_URL: &str = "https://disclosure.edinet-fsa.go.jp/api/v2";

/// Fixed document type requested from the API (5 = CSV archive)
const DOCUMENT_TYPE_CSV: &str = "5";

/// User agent for EDINET requests
const USER_AGENT: &str = concat!("malert/", env!("CARGO_PKG_VERSION"));

/// Client for fetching disclosure documents from the EDINET v2 API.
///
/// The subscription key is injected at construction; the client never reads
/// ambient configuration. Responses are processed entirely in memory and
/// nothing is cached between calls.
pub struct EdinetClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl EdinetClient {
    /// Create a client for the production EDINET endpoint.
    ///
    /// # Arguments
    /// * `api_key` - EDINET API subscription key
    ///
    /// # Errors
    /// Returns `DataError::Network` if the underlying HTTP client cannot be
    /// built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, EDINET_BASE_URL)
    }

    /// Create a client against a custom base URL.
    ///
    /// Tests use this to point the client at a local fixture server; the
    /// request shape is identical to the production endpoint's.
    ///
    /// # Arguments
    /// * `api_key` - EDINET API subscription key
    /// * `base_url` - Base URL replacing the production endpoint
    ///
    /// # Errors
    /// Returns `DataError::Network` if the underlying HTTP client cannot be
    /// built.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Fetch one disclosure document and parse its tabular contents.
    ///
    /// Issues a single GET for the document's CSV archive (request type 5)
    /// with the subscription key as a query credential. The response ZIP is
    /// held entirely in memory; every `.csv` entry is decoded from UTF-16
    /// and parsed as tab-separated values. Repeated calls with the same
    /// identifier repeat the network round trip.
    ///
    /// # Arguments
    /// * `doc_id` - EDINET document identifier (e.g. "S100TEST")
    ///
    /// # Returns
    /// The parsed tables keyed by their in-archive entry names; empty if
    /// the archive carried no tabular entries.
    ///
    /// # Errors
    /// Returns [`DataError::EdinetApi`] carrying the status and body on any
    /// non-success HTTP status (no retry, no backoff),
    /// [`DataError::Network`] on transport failure, and the errors of
    /// [`FilingTables::from_zip_bytes`] on a malformed payload.
    ///
    /// # Example
    /// ```no_run
    /// use malert_data::edinet::EdinetClient;
    ///
    /// # async fn example() -> malert_data::Result<()> {
    /// let client = EdinetClient::new("subscription-key")?;
    /// let tables = client.fetch_document("S100TEST").await?;
    /// for table in tables.iter() {
    ///     println!("{}: {} rows", table.name, table.data.height());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn fetch_document(&self, doc_id: &str) -> Result<FilingTables> {
        let url = self.document_url(doc_id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("type", DOCUMENT_TYPE_CSV),
                ("Subscription-Key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(DataError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::EdinetApi {
                doc_id: doc_id.to_string(),
                status,
                body,
            });
        }

        let bytes = response.bytes().await.map_err(DataError::Network)?;
        debug!("downloaded {} archive bytes for {}", bytes.len(), doc_id);
        FilingTables::from_zip_bytes(&bytes)
    }

    /// URL of one document's archive, without query parameters.
    fn document_url(&self, doc_id: &str) -> String {
        format!("{}/documents/{}", self.base_url, doc_id)
    }
}

impl std::fmt::Debug for EdinetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The subscription key stays out of debug output.
        f.debug_struct("EdinetClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// A well-formed ZIP archive with no entries (end-of-central-directory
    /// record only).
    const EMPTY_ZIP: [u8; 22] = [
        0x50, 0x4b, 0x05, 0x06, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];

    /// Serve the same canned HTTP response to every request on a fresh
    /// local port, counting accepted requests.
    async fn spawn_canned_server(
        status_line: &'static str,
        body: Vec<u8>,
    ) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let header = format!(
                    "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    status_line,
                    body.len()
                );
                let _ = socket.write_all(header.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    #[test]
    fn test_document_url() {
        let client = EdinetClient::with_base_url("key", "http://localhost:9999").unwrap();
        assert_eq!(
            client.document_url("S100TEST"),
            "http://localhost:9999/documents/S100TEST"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = EdinetClient::new("very-secret-key").unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("very-secret-key"));
    }

    #[tokio::test]
    async fn test_fetch_document_non_success_is_edinet_api_error() {
        let (base, hits) = spawn_canned_server("404 Not Found", b"document not found".to_vec()).await;
        let client = EdinetClient::with_base_url("test-key", base).unwrap();

        let result = client.fetch_document("S100MISS").await;
        match result {
            Err(DataError::EdinetApi {
                doc_id,
                status,
                body,
            }) => {
                assert_eq!(doc_id, "S100MISS");
                assert_eq!(status.as_u16(), 404);
                assert_eq!(body, "document not found");
            }
            other => panic!("expected EdinetApi error, got {:?}", other),
        }

        // Exactly one request: no retry on a non-success status.
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_document_empty_archive_is_ok() {
        let (base, hits) = spawn_canned_server("200 OK", EMPTY_ZIP.to_vec()).await;
        let client = EdinetClient::with_base_url("test-key", base).unwrap();

        let tables = client.fetch_document("S100ZERO").await.unwrap();
        assert!(tables.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_document_garbage_body_is_zip_error() {
        let (base, _hits) = spawn_canned_server("200 OK", b"this is not an archive".to_vec()).await;
        let client = EdinetClient::with_base_url("test-key", base).unwrap();

        let result = client.fetch_document("S100BAD").await;
        assert!(matches!(result, Err(DataError::Zip(_))));
    }
}
