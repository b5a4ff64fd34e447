//! The two end-to-end flows: listing a form's filings over one or more
//! quarters, and extracting a section from a filing document.
//!
//! Every stage is awaited in turn; nothing runs concurrently and no state is
//! kept between calls.

use crate::error::Result;
use log::{info, warn};
use tenq_data::edgar::{
    DEFAULT_FORM_TYPE, DocumentResolver, FilingRecord, IndexFetcher, IndexPeriod, TextLinearizer,
    Transport, parse_crawler_index, sort_by_date_desc,
};
use tenq_data::{DataError, Section, SectionSlicer};

/// Which filings to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingQuery {
    /// Calendar year
    pub year: i32,
    /// Quarters to fetch, in request order
    pub quarters: Vec<u8>,
    /// Form type to keep
    pub form_type: String,
    /// Case-insensitive substring every kept record must contain
    pub filter: Option<String>,
}

impl FilingQuery {
    /// Query `10-Q` filings for `quarters` of `year`.
    pub fn new(year: i32, quarters: Vec<u8>) -> Self {
        Self {
            year,
            quarters,
            form_type: DEFAULT_FORM_TYPE.to_string(),
            filter: None,
        }
    }

    /// Keep a different form type.
    pub fn with_form_type(mut self, form_type: impl Into<String>) -> Self {
        self.form_type = form_type.into();
        self
    }

    /// Keep only records matching `filter`.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Validated periods, duplicates removed, request order kept.
    ///
    /// # Errors
    /// `DataError::InvalidPeriod` for an empty quarter list or an invalid
    /// year or quarter.
    pub fn periods(&self) -> Result<Vec<IndexPeriod>> {
        if self.quarters.is_empty() {
            return Err(DataError::InvalidPeriod("no quarters requested".to_string()).into());
        }
        let mut periods: Vec<IndexPeriod> = Vec::with_capacity(self.quarters.len());
        for &quarter in &self.quarters {
            let period = IndexPeriod::new(self.year, quarter)?;
            if !periods.contains(&period) {
                periods.push(period);
            }
        }
        Ok(periods)
    }
}

/// Records gathered over several quarters, and the quarters that failed.
#[derive(Debug)]
pub struct FilingsReport {
    /// Matching records, most recently filed first
    pub records: Vec<FilingRecord>,
    /// Quarters whose index could not be fetched
    pub failures: Vec<(IndexPeriod, DataError)>,
}

/// Fetch, parse and merge the indexes for every quarter in `query`.
///
/// Quarters are fetched one after another. A quarter that fails is recorded
/// in [`FilingsReport::failures`] and the others still contribute; only when
/// every quarter fails is the first failure returned as the error. Records
/// are sorted by filing date, newest first, then filtered.
///
/// # Errors
/// `DataError::InvalidPeriod` for a bad query, or the first fetch error when
/// no quarter could be fetched.
pub async fn fetch_filings<T: Transport>(
    fetcher: &IndexFetcher<T>,
    query: &FilingQuery,
) -> Result<FilingsReport> {
    let periods = query.periods()?;
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for period in &periods {
        match fetcher.fetch(*period).await {
            Ok(raw) => {
                let parsed = parse_crawler_index(&raw, &query.form_type);
                info!("{}: {} {} filings", period, parsed.len(), query.form_type);
                records.extend(parsed);
            }
            Err(e) => {
                warn!("Skipping {}: {}", period, e);
                failures.push((*period, e));
            }
        }
    }

    if failures.len() == periods.len() {
        let (_, first) = failures.swap_remove(0);
        return Err(first.into());
    }

    sort_by_date_desc(&mut records);
    if let Some(filter) = &query.filter {
        records.retain(|record| record.matches_query(filter));
    }

    Ok(FilingsReport { records, failures })
}

/// Where and what to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    /// Document URL, or a filing listing page when `resolve` is set
    pub url: String,
    /// Start marker
    pub start: Option<String>,
    /// End marker
    pub end: Option<String>,
    /// Treat `url` as a listing page and resolve the primary document first
    pub resolve: bool,
    /// Form type used when resolving
    pub form_type: String,
}

impl ExtractRequest {
    /// Extract the whole document at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            start: None,
            end: None,
            resolve: false,
            form_type: DEFAULT_FORM_TYPE.to_string(),
        }
    }

    /// Bound the section by `start` and `end` markers.
    pub fn between(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Resolve `url` as a listing page for `form_type`.
    pub fn resolving(mut self, form_type: impl Into<String>) -> Self {
        self.resolve = true;
        self.form_type = form_type.into();
        self
    }
}

/// An extracted section and the document it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Document the lines were read from
    pub document_url: String,
    /// The non-empty section
    pub section: Section,
}

impl Extraction {
    /// Section lines joined with newlines.
    pub fn text(&self) -> String {
        self.section.lines.join("\n")
    }
}

/// Resolve (optionally), linearize and slice one document.
///
/// # Errors
/// Any resolver or fetch error, `DataError::InvalidMarker` for an unusable
/// marker, and `DataError::NoMatch` when the section is empty.
pub async fn extract_section<T: Transport>(
    transport: &T,
    request: &ExtractRequest,
) -> Result<Extraction> {
    let slicer = SectionSlicer::new(request.start.as_deref(), request.end.as_deref())?;

    let document_url = if request.resolve {
        DocumentResolver::new(transport)
            .with_form_type(request.form_type.as_str())
            .resolve(&request.url)
            .await?
            .document_url
    } else {
        request.url.clone()
    };

    let lines = TextLinearizer::new(transport)
        .linearize(&document_url)
        .await?;
    let section = slicer.slice_non_empty(&lines)?;
    if section.used_fallback() {
        warn!(
            "Marker not found in {}, section runs to the document boundary",
            document_url
        );
    }
    info!(
        "Extracted lines {}..{} of {} from {}",
        section.range.start,
        section.range.end,
        lines.len(),
        document_url
    );

    Ok(Extraction {
        document_url,
        section,
    })
}
