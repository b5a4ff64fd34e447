//! SEC EDGAR archive access.
//!
//! This module covers the three network-facing stages of the pipeline:
//! - Quarterly `crawler.idx` retrieval with rate-limit aware retries
//! - Parsing the index into [`FilingRecord`]s for one form type
//! - Resolving a filing's listing page to its primary document and
//!   flattening that document into text lines
//!
//! All network access goes through the [`Transport`] trait; [`EdgarClient`]
//! is the real implementation.
//!
//! # Example
//!
//! ```no_run
//! use tenq_data::edgar::{
//!     DocumentResolver, EdgarClient, IndexFetcher, IndexPeriod, TextLinearizer,
//!     parse_crawler_index,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdgarClient::new()?;
//!
//!     let raw = IndexFetcher::new(&client)
//!         .fetch(IndexPeriod::new(2024, 1)?)
//!         .await?;
//!     let filings = parse_crawler_index(&raw, "10-Q");
//!     println!("Found {} 10-Q filings", filings.len());
//!
//!     if let Some(filing) = filings.first() {
//!         let resolved = DocumentResolver::new(&client).resolve(&filing.index_url).await?;
//!         let lines = TextLinearizer::new(&client).linearize(&resolved.document_url).await?;
//!         println!("{} has {} lines", resolved.document_url, lines.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod crawler;
pub mod index;
pub mod resolver;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{
    ARCHIVE_BASE_URL, DEFAULT_USER_AGENT, EdgarClient, HttpResponse, Transport, TransportError,
    identity_headers,
};
pub use crawler::{DEFAULT_FORM_TYPE, FilingRecord, parse_crawler_index, sort_by_date_desc};
pub use index::{FIRST_INDEX_YEAR, IndexFetcher, IndexPeriod, RetryPolicy};
pub use resolver::{DocumentResolver, ResolvedDocument, resolve_from_html};
pub use text::{TextLinearizer, linearize_html, linearize_text};
