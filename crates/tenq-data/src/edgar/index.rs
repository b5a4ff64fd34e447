//! Quarterly full-index retrieval.
//!
//! EDGAR publishes one `crawler.idx` per calendar quarter listing every filing
//! submitted in that period. The archive rate-limits aggressively, so
//! retrieval waits before every attempt and retries on HTTP 403 and on
//! network failures.

use super::client::{ARCHIVE_BASE_URL, Transport};
use crate::error::{DataError, Result};
use chrono::{Datelike, Utc};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::sleep;

/// First year with an EDGAR full index.
pub const FIRST_INDEX_YEAR: i32 = 1995;

/// A (year, quarter) pair identifying one quarterly index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPeriod {
    year: i32,
    quarter: u8,
}

impl IndexPeriod {
    /// Create a validated period.
    ///
    /// # Errors
    /// Returns `DataError::InvalidPeriod` if the year is outside
    /// `1995..=current year` or the quarter is not 1-4.
    ///
    /// # Example
    /// ```
    /// use tenq_data::edgar::IndexPeriod;
    ///
    /// let period = IndexPeriod::new(2024, 1)?;
    /// assert_eq!(period.quarter(), 1);
    /// assert!(IndexPeriod::new(2024, 5).is_err());
    /// # Ok::<(), tenq_data::DataError>(())
    /// ```
    pub fn new(year: i32, quarter: u8) -> Result<Self> {
        let current_year = Utc::now().year();
        if !(FIRST_INDEX_YEAR..=current_year).contains(&year) {
            return Err(DataError::InvalidPeriod(format!(
                "year {year} is outside {FIRST_INDEX_YEAR}..={current_year}"
            )));
        }
        if !(1..=4).contains(&quarter) {
            return Err(DataError::InvalidPeriod(format!(
                "quarter {quarter} is not in 1..=4"
            )));
        }
        Ok(Self { year, quarter })
    }

    /// Calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar quarter, 1-4.
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }

    /// URL of this period's `crawler.idx` under `archive_base`.
    pub fn crawler_index_url(&self, archive_base: &str) -> String {
        format!(
            "{}/edgar/full-index/{}/QTR{}/crawler.idx",
            archive_base.trim_end_matches('/'),
            self.year,
            self.quarter
        )
    }
}

impl std::fmt::Display for IndexPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Q{}", self.year, self.quarter)
    }
}

/// Attempt budget and cooldowns for index retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Wait before every attempt, successful or not
    pub baseline_delay: Duration,
    /// Extra wait after an HTTP 403
    pub rate_limit_delay: Duration,
    /// Extra wait after a network-level failure
    pub network_delay: Duration,
}

impl RetryPolicy {
    /// Same attempt budget as the default, with no waiting.
    pub const fn immediate() -> Self {
        Self {
            max_attempts: 3,
            baseline_delay: Duration::ZERO,
            rate_limit_delay: Duration::ZERO,
            network_delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            baseline_delay: Duration::from_secs(5),
            rate_limit_delay: Duration::from_secs(10),
            network_delay: Duration::from_secs(10),
        }
    }
}

/// Downloads quarterly `crawler.idx` files.
#[derive(Debug, Clone)]
pub struct IndexFetcher<T> {
    transport: T,
    archive_base: String,
    policy: RetryPolicy,
}

impl<T: Transport> IndexFetcher<T> {
    /// Create a fetcher against the public archive with the default retry policy.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            archive_base: ARCHIVE_BASE_URL.to_string(),
            policy: RetryPolicy::default(),
        }
    }

    /// Use a different archive base URL (mirrors, tests).
    pub fn with_archive_base(mut self, archive_base: impl Into<String>) -> Self {
        self.archive_base = archive_base.into();
        self
    }

    /// Use a different retry policy.
    pub const fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch the raw `crawler.idx` text for `period`.
    ///
    /// # Errors
    /// Returns `DataError::Unavailable` when the archive answers with a
    /// non-retryable status (anything but 2xx and 403) or when every attempt
    /// failed with 403 or a network error.
    pub async fn fetch(&self, period: IndexPeriod) -> Result<String> {
        let url = period.crawler_index_url(&self.archive_base);
        info!("Fetching {} index from {}", period, url);

        let mut last_status = None;
        for attempt in 1..=self.policy.max_attempts {
            sleep(self.policy.baseline_delay).await;
            debug!("Attempt {}/{} for {}", attempt, self.policy.max_attempts, url);

            let cooldown = match self.transport.get(&url).await {
                Ok(response) if response.is_success() => {
                    info!("Fetched {} index ({} bytes)", period, response.body.len());
                    return Ok(response.body);
                }
                Ok(response) if response.status == 403 => {
                    warn!(
                        "Access denied (403) for {}, attempt {}/{}",
                        url, attempt, self.policy.max_attempts
                    );
                    last_status = Some(403);
                    self.policy.rate_limit_delay
                }
                Ok(response) => {
                    warn!("{} answered HTTP {}, not retrying", url, response.status);
                    return Err(DataError::Unavailable {
                        url,
                        status: Some(response.status),
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    warn!(
                        "Network error for {}: {}, attempt {}/{}",
                        url, e, attempt, self.policy.max_attempts
                    );
                    last_status = None;
                    self.policy.network_delay
                }
            };

            if attempt < self.policy.max_attempts {
                sleep(cooldown).await;
            }
        }

        Err(DataError::Unavailable {
            url,
            status: last_status,
            attempts: self.policy.max_attempts,
        })
    }
}
