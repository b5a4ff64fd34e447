#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod edgar;
pub mod error;
pub mod scan;
pub mod section;

pub use error::{DataError, Result};
pub use section::{MarkerOutcome, Section, SectionRange, SectionSlicer, slice_section};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
