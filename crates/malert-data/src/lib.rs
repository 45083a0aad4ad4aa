#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/malert/malert/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod edinet;
pub mod error;
pub mod registry;
pub mod resolver;

pub use error::{DataError, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
