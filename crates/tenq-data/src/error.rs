//! Error types for archive operations.

use thiserror::Error;

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while fetching, resolving or extracting filings.
///
/// "No data" is never an error: an index with no matching lines parses to an
/// empty vector. Every variant here describes a failure and carries enough
/// context (URL, HTTP status) to explain it.
#[derive(Debug, Error)]
pub enum DataError {
    /// Retries exhausted, or the archive answered with a status that is not worth retrying
    #[error("{url} unavailable after {attempts} attempt(s){}", status_suffix(.status))]
    Unavailable {
        /// Requested URL
        url: String,
        /// Last HTTP status seen, if the server answered at all
        status: Option<u16>,
        /// Number of attempts made
        attempts: u32,
    },

    /// Single-shot fetch failure in the resolver or linearizer
    #[error("Failed to fetch {url}{}: {reason}", status_suffix(.status))]
    FetchError {
        /// Requested URL
        url: String,
        /// HTTP status, if the server answered
        status: Option<u16>,
        /// Transport or HTTP failure description
        reason: String,
    },

    /// An expected structural element is missing from a page
    #[error("No {element} found on {url}")]
    NotFound {
        /// Page URL
        url: String,
        /// Description of the missing element
        element: String,
    },

    /// Neither the form-type pass nor the HTML fallback produced a document link
    #[error("No primary document could be resolved from {url}")]
    NoDocument {
        /// Listing page URL
        url: String,
    },

    /// Section slicing produced an empty range
    #[error(
        "No text between start marker {} and end marker {}",
        marker_label(.start),
        marker_label(.end)
    )]
    NoMatch {
        /// Start marker used, if any
        start: Option<String>,
        /// End marker used, if any
        end: Option<String>,
    },

    /// Marker text that cannot be turned into a pattern
    #[error("Invalid section marker {marker:?}: {reason}")]
    InvalidMarker {
        /// Marker as supplied
        marker: String,
        /// Why the pattern was rejected
        reason: String,
    },

    /// User-Agent that cannot be sent as an HTTP header value
    #[error("Invalid user agent {user_agent:?}: {reason}")]
    InvalidUserAgent {
        /// User agent as supplied
        user_agent: String,
        /// Why the header value was rejected
        reason: String,
    },

    /// Year or quarter outside the archive's range
    #[error("Invalid filing period: {0}")]
    InvalidPeriod(String),

    /// URL could not be parsed or joined
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        /// Offending URL text
        url: String,
        /// Parser error
        source: url::ParseError,
    },

    /// Network error while building or using the HTTP client
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map_or_else(String::new, |s| format!(" (HTTP {s})"))
}

fn marker_label(marker: &Option<String>) -> String {
    marker
        .as_deref()
        .map_or_else(|| "<none>".to_string(), |m| format!("{m:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message_includes_status() {
        let err = DataError::Unavailable {
            url: "https://example.com/crawler.idx".to_string(),
            status: Some(403),
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "https://example.com/crawler.idx unavailable after 3 attempt(s) (HTTP 403)"
        );
    }

    #[test]
    fn test_no_match_message() {
        let err = DataError::NoMatch {
            start: Some("Item 2".to_string()),
            end: None,
        };
        assert_eq!(
            err.to_string(),
            "No text between start marker \"Item 2\" and end marker <none>"
        );
    }
}
