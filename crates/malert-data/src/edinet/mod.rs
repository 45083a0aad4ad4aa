//! EDINET disclosure API access.
//!
//! This module provides:
//! - An authenticated client for the EDINET v2 documents endpoint
//! - In-memory extraction of a filing's ZIP archive into parsed tables
//!
//! # Example
//!
//! ```no_run
//! use malert_data::edinet::EdinetClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdinetClient::new("subscription-key")?;
//!     let tables = client.fetch_document("S100TEST").await?;
//!     println!("archive carried {} tables", tables.len());
//!     for table in tables.iter() {
//!         println!("{}\n{}", table.name, table.data);
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod client;

// Re-export main types
pub use archive::{FilingTable, FilingTables};
pub use client::EdinetClient;
