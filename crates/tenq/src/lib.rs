#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod summary;

// Re-export main types from sub-crates
pub use tenq_data as data;
pub use tenq_output as output;

pub use config::{Config, SummaryConfig};
pub use error::{Result, TenqError};
pub use pipeline::{ExtractRequest, Extraction, FilingQuery, FilingsReport, extract_section, fetch_filings};
pub use summary::{ChatCompletionsClient, Summarizer};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
