//! Primary document resolution from a filing's listing page.
//!
//! Each filing has an `-index.htm` page with a `tableFile` table listing the
//! attached documents (Seq, Description, Document, Type, Size). The primary
//! document is the first row typed with the target form; filings that omit
//! the type label fall back to the first HTML attachment.

use super::client::{Transport, fetch_once};
use super::crawler::DEFAULT_FORM_TYPE;
use crate::error::{DataError, Result};
use crate::scan::find_from;
use log::{debug, info};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static DOCUMENT_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.tableFile").expect("valid table selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid row selector"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid cell selector"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid link selector"));

/// Column holding the document link.
const LINK_COLUMN: usize = 2;
/// Column holding the declared document type.
const TYPE_COLUMN: usize = 3;

/// Inline XBRL documents are linked through the viewer, e.g.
/// `/ix?doc=/Archives/edgar/data/320193/000032019324000069/aapl-20240330.htm`.
const IX_VIEWER_PARAM: &str = "ix?doc=";

/// A filing's primary document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    /// Listing page the document was resolved from
    pub source_index_url: String,
    /// Absolute URL of the primary document
    pub document_url: String,
}

/// One row of the document table.
#[derive(Debug, Clone, Default)]
struct DocumentRow {
    doc_type: Option<String>,
    href: Option<String>,
}

impl DocumentRow {
    fn from_element(row: ElementRef<'_>) -> Self {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
        let href = cells
            .get(LINK_COLUMN)
            .and_then(|cell| cell.select(&LINK).next())
            .and_then(|a| a.value().attr("href"))
            .map(|href| unwrap_viewer_link(href.trim()).to_string());
        let doc_type = cells
            .get(TYPE_COLUMN)
            .map(|cell| cell.text().collect::<String>().trim().to_string());
        Self { doc_type, href }
    }

    fn is_typed(&self, form_type: &str) -> bool {
        let compact = form_type.replace('-', "");
        self.href.is_some()
            && self
                .doc_type
                .as_deref()
                .is_some_and(|t| t.contains(form_type) || (!compact.is_empty() && t.contains(&compact)))
    }

    fn is_html(&self) -> bool {
        self.href.as_deref().is_some_and(|href| {
            let path = href.split(['?', '#']).next().unwrap_or(href).to_lowercase();
            path.ends_with(".htm") || path.ends_with(".html")
        })
    }
}

fn unwrap_viewer_link(href: &str) -> &str {
    href.find(IX_VIEWER_PARAM)
        .map_or(href, |pos| &href[pos + IX_VIEWER_PARAM.len()..])
}

fn join_url(base: &str, href: &str) -> Result<String> {
    let base_url = Url::parse(base).map_err(|source| DataError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;
    base_url
        .join(href)
        .map(String::from)
        .map_err(|source| DataError::InvalidUrl {
            url: href.to_string(),
            source,
        })
}

/// Pick the primary document link out of a listing page's HTML.
///
/// Pass 1 takes the first row whose type column contains `form_type` (or
/// its hyphen-less spelling); pass 2, run only when pass 1 finds nothing,
/// takes the first row linking an `.htm`/`.html` file. The chosen link is
/// resolved against `page_url`.
///
/// # Errors
/// `DataError::NotFound` if the page has no `tableFile` table,
/// `DataError::NoDocument` if neither pass finds a link.
pub fn resolve_from_html(html: &str, page_url: &str, form_type: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let table = document
        .select(&DOCUMENT_TABLE)
        .next()
        .ok_or_else(|| DataError::NotFound {
            url: page_url.to_string(),
            element: "document table (table.tableFile)".to_string(),
        })?;

    // Heading rows have no `td` cells and never match either pass.
    let rows: Vec<DocumentRow> = table.select(&ROW).map(DocumentRow::from_element).collect();

    let chosen = find_from(&rows, 0, |row| row.is_typed(form_type)).or_else(|| {
        debug!("No {} row on {}, falling back to first HTML document", form_type, page_url);
        find_from(&rows, 0, DocumentRow::is_html)
    });

    let href = chosen
        .and_then(|i| rows[i].href.as_deref())
        .ok_or_else(|| DataError::NoDocument {
            url: page_url.to_string(),
        })?;

    join_url(page_url, href)
}

/// Resolves filing listing pages to primary document URLs.
#[derive(Debug, Clone)]
pub struct DocumentResolver<T> {
    transport: T,
    form_type: String,
}

impl<T: Transport> DocumentResolver<T> {
    /// Create a resolver looking for 10-Q documents.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            form_type: DEFAULT_FORM_TYPE.to_string(),
        }
    }

    /// Look for another form type.
    pub fn with_form_type(mut self, form_type: impl Into<String>) -> Self {
        self.form_type = form_type.into();
        self
    }

    /// Fetch the listing page at `index_url` and resolve its primary document.
    ///
    /// The page is fetched once, without retries.
    ///
    /// # Errors
    /// `DataError::FetchError` if the page cannot be fetched, otherwise the
    /// errors of [`resolve_from_html`].
    pub async fn resolve(&self, index_url: &str) -> Result<ResolvedDocument> {
        let html = fetch_once(&self.transport, index_url).await?;
        let document_url = resolve_from_html(&html, index_url, &self.form_type)?;
        info!("Resolved {} -> {}", index_url, document_url);

        Ok(ResolvedDocument {
            source_index_url: index_url.to_string(),
            document_url,
        })
    }
}
