//! Parsing of `crawler.idx` full-index files.
//!
//! A crawler index starts with a free-form preamble, then a header line
//! (`Company Name  Form Type  CIK  Date Filed  URL`), a dashed rule, and one
//! fixed-width row per filing. Column widths drift between years and company
//! names contain single spaces, so rows are split on runs of two or more
//! whitespace characters and fields are read from the end of the row.

use crate::scan::scan_or;
use chrono::NaiveDate;
use log::trace;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Form type selected when the caller does not ask for another one.
pub const DEFAULT_FORM_TYPE: &str = "10-Q";

/// Token that marks the column header line ending the preamble.
const HEADER_TOKEN: &str = "Form Type";

/// Fewest columns a data row can have.
const MIN_COLUMNS: usize = 5;

static COLUMN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid column separator regex"));

/// One filing listed in a quarterly index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRecord {
    /// Form type, e.g. "10-Q"
    #[serde(rename = "Form Type")]
    pub form_type: String,
    /// Company name as listed (may itself contain spaces)
    #[serde(rename = "Company")]
    pub company: String,
    /// Central Index Key, unpadded as listed
    #[serde(rename = "CIK")]
    pub cik: String,
    /// Date the filing was submitted
    #[serde(rename = "Date Filed")]
    pub date_filed: NaiveDate,
    /// URL of the filing's listing (index) page
    #[serde(rename = "URL")]
    pub index_url: String,
}

impl FilingRecord {
    /// Case-insensitive substring match against every field.
    ///
    /// An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let date_filed = self.date_filed.to_string();
        [
            self.form_type.as_str(),
            self.company.as_str(),
            self.cik.as_str(),
            date_filed.as_str(),
            self.index_url.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Sort records by filing date, most recent first.
///
/// The sort is stable, so records filed on the same day keep their index order.
pub fn sort_by_date_desc(records: &mut [FilingRecord]) {
    records.sort_by(|a, b| b.date_filed.cmp(&a.date_filed));
}

/// Named access to the columns of a tokenized index row.
///
/// The leading company-name column can itself contain runs of spaces and
/// split into several tokens, so every field except the form type is read
/// relative to the end of the row: URL last, date filed second to last, CIK
/// third to last. A layout change is a change to the offsets here.
#[derive(Debug, Clone, Copy)]
struct IndexColumns<'a> {
    tokens: &'a [&'a str],
}

impl<'a> IndexColumns<'a> {
    const FORM_TYPE: usize = 1;
    const URL_FROM_END: usize = 1;
    const DATE_FILED_FROM_END: usize = 2;
    const CIK_FROM_END: usize = 3;

    fn new(tokens: &'a [&'a str]) -> Option<Self> {
        (tokens.len() >= MIN_COLUMNS).then_some(Self { tokens })
    }

    fn from_end(&self, offset: usize) -> &'a str {
        self.tokens[self.tokens.len() - offset]
    }

    fn form_type(&self) -> &'a str {
        self.tokens[Self::FORM_TYPE]
    }

    fn company(&self) -> &'a str {
        self.tokens[0]
    }

    fn cik(&self) -> &'a str {
        self.from_end(Self::CIK_FROM_END)
    }

    fn date_filed(&self) -> &'a str {
        self.from_end(Self::DATE_FILED_FROM_END)
    }

    fn url(&self) -> &'a str {
        self.from_end(Self::URL_FROM_END)
    }
}

/// Split a data row into columns.
fn tokenize(line: &str) -> Vec<&str> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    COLUMN_SEPARATOR.split(line).collect()
}

fn parse_row(line: &str, form_type: &str) -> Option<FilingRecord> {
    let tokens = tokenize(line);
    let columns = IndexColumns::new(&tokens)?;
    if columns.form_type() != form_type {
        return None;
    }

    let date_filed = match NaiveDate::parse_from_str(columns.date_filed(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            trace!("Skipping row with unparseable date {:?}: {}", columns.date_filed(), e);
            return None;
        }
    };

    Some(FilingRecord {
        form_type: columns.form_type().to_string(),
        company: columns.company().to_string(),
        cik: columns.cik().to_string(),
        date_filed,
        index_url: columns.url().to_string(),
    })
}

/// Parse a `crawler.idx` body into the records of one form type.
///
/// Lines up to and including the first one containing `Form Type` are
/// skipped; without such a line nothing is parsed. Rows with fewer than five
/// columns, another form type or an unparseable date are skipped silently.
/// Records come back in index order, and an index with no matching rows
/// yields an empty vector.
///
/// # Example
/// ```
/// use tenq_data::edgar::parse_crawler_index;
///
/// let raw = "\
/// Description:           Daily Index of EDGAR Dissemination Feed by Company Name
///
/// Company Name                    Form Type   CIK         Date Filed  URL
/// --------------------------------------------------------------------------------
/// APPLE INC                       10-Q        320193      2024-05-03  https://www.sec.gov/Archives/edgar/data/320193/0000320193-24-000069-index.htm
/// APPLE INC                       8-K         320193      2024-05-02  https://www.sec.gov/Archives/edgar/data/320193/0000320193-24-000067-index.htm
/// ";
/// let records = parse_crawler_index(raw, "10-Q");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].cik, "320193");
/// ```
pub fn parse_crawler_index(raw: &str, form_type: &str) -> Vec<FilingRecord> {
    let lines: Vec<&str> = raw.lines().collect();
    let header = scan_or(&lines, 0, lines.len(), |line| line.contains(HEADER_TOKEN));

    lines
        .iter()
        .skip(header + 1)
        .filter_map(|line| parse_row(line, form_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PREAMBLE: &str = "\
Description:           Daily Index of EDGAR Dissemination Feed by Company Name
Last Data Received:    March 31, 2024
Comments:              webmaster@sec.gov
Anonymous FTP:         ftp://ftp.sec.gov/edgar/

";
    const HEADER: &str = "\
Company Name                                                  Form Type   CIK         Date Filed  URL
-------------------------------------------------------------------------------------------------------------------------------
";

    fn row(company: &str, form: &str, cik: &str, date: &str) -> String {
        format!(
            "{company:<62}{form:<12}{cik:<12}{date:<12}https://www.sec.gov/Archives/edgar/data/{cik}/0000{cik}-24-000001-index.htm\n"
        )
    }

    fn index(rows: &[String]) -> String {
        format!("{PREAMBLE}{HEADER}{}", rows.concat())
    }

    #[test]
    fn test_parse_keeps_only_target_form_in_order() {
        let raw = index(&[
            row("ALPHA CORP", "10-Q", "1001", "2024-02-01"),
            row("BETA INC", "8-K", "1002", "2024-02-02"),
            row("GAMMA LLC", "10-Q", "1003", "2024-01-15"),
            row("DELTA CO", "10-K", "1004", "2024-03-01"),
            row("EPSILON PLC", "10-Q/A", "1005", "2024-03-02"),
            row("ZETA HOLDINGS", "10-Q", "1006", "2024-03-20"),
        ]);

        let records = parse_crawler_index(&raw, DEFAULT_FORM_TYPE);
        let ciks: Vec<&str> = records.iter().map(|r| r.cik.as_str()).collect();
        assert_eq!(ciks, vec!["1001", "1003", "1006"]);
        assert!(records.iter().all(|r| r.form_type == "10-Q"));
    }

    #[test]
    fn test_parse_fields_are_read_from_end() {
        let raw = index(&[row("APPLE INC", "10-Q", "320193", "2024-05-03")]);
        let records = parse_crawler_index(&raw, "10-Q");

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.company, "APPLE INC");
        assert_eq!(record.cik, "320193");
        assert_eq!(
            record.date_filed,
            NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()
        );
        assert_eq!(
            record.index_url,
            "https://www.sec.gov/Archives/edgar/data/320193/0000320193-24-000001-index.htm"
        );
    }

    #[test]
    fn test_company_name_with_internal_double_space() {
        let line = "ACME  WIDGETS INC   10-Q   777   2024-01-02   https://www.sec.gov/Archives/edgar/data/777/x-index.htm";
        let raw = format!("{HEADER}{line}\n");

        // The name splits into two tokens, pushing the form type off column 1.
        assert!(parse_crawler_index(&raw, "10-Q").is_empty());

        let line = "ACME WIDGETS INC   10-Q   777   2024-01-02   https://www.sec.gov/Archives/edgar/data/777/x-index.htm";
        let raw = format!("{HEADER}{line}\n");
        let records = parse_crawler_index(&raw, "10-Q");
        assert_eq!(records[0].cik, "777");
        assert_eq!(records[0].company, "ACME WIDGETS INC");
    }

    #[test]
    fn test_preamble_rows_before_header_are_ignored() {
        let early = row("EARLY CORP", "10-Q", "42", "2024-01-01");
        let raw = format!("{early}{HEADER}{}", row("LATE CORP", "10-Q", "43", "2024-01-02"));

        let records = parse_crawler_index(&raw, "10-Q");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cik, "43");
    }

    #[test]
    fn test_missing_header_yields_nothing() {
        let raw = row("ALPHA CORP", "10-Q", "1001", "2024-02-01");
        assert!(parse_crawler_index(&raw, "10-Q").is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("ALPHA CORP  10-Q  1001  2024-02-01")]
    #[case("ALPHA CORP  10-Q  1001  not-a-date  https://example.com/x-index.htm")]
    #[case("ALPHA CORP 10-Q 1001 2024-02-01 https://example.com/x-index.htm")]
    fn test_malformed_rows_are_skipped(#[case] line: &str) {
        let raw = format!("{HEADER}{line}\n");
        assert!(parse_crawler_index(&raw, "10-Q").is_empty());
    }

    #[test]
    fn test_other_form_type() {
        let raw = index(&[
            row("ALPHA CORP", "10-Q", "1001", "2024-02-01"),
            row("DELTA CO", "10-K", "1004", "2024-03-01"),
        ]);
        let records = parse_crawler_index(&raw, "10-K");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cik, "1004");
    }

    #[test]
    fn test_form_type_match_is_exact() {
        let raw = index(&[row("ALPHA CORP", "10-Q", "1001", "2024-02-01")]);
        assert!(parse_crawler_index(&raw, "10-q").is_empty());
        assert!(parse_crawler_index(&raw, "10").is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = index(&[
            row("ALPHA CORP", "10-Q", "1001", "2024-02-01"),
            row("GAMMA LLC", "10-Q", "1003", "2024-01-15"),
        ]);
        assert_eq!(
            parse_crawler_index(&raw, "10-Q"),
            parse_crawler_index(&raw, "10-Q")
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let raw = index(&[row("ALPHA CORP", "10-Q", "1001", "2024-02-01")]).replace('\n', "\r\n");
        let records = parse_crawler_index(&raw, "10-Q");
        assert_eq!(records.len(), 1);
        assert!(records[0].index_url.ends_with("-index.htm"));
    }

    #[test]
    fn test_sort_by_date_desc_is_stable() {
        let raw = index(&[
            row("A", "10-Q", "1", "2024-01-01"),
            row("B", "10-Q", "2", "2024-03-01"),
            row("C", "10-Q", "3", "2024-01-01"),
        ]);
        let mut records = parse_crawler_index(&raw, "10-Q");
        sort_by_date_desc(&mut records);
        let ciks: Vec<&str> = records.iter().map(|r| r.cik.as_str()).collect();
        assert_eq!(ciks, vec!["2", "1", "3"]);
    }

    #[rstest]
    #[case("", true)]
    #[case("apple", true)]
    #[case("320193", true)]
    #[case("2024-05", true)]
    #[case("10-q", true)]
    #[case("microsoft", false)]
    fn test_matches_query(#[case] query: &str, #[case] expected: bool) {
        let raw = index(&[row("APPLE INC", "10-Q", "320193", "2024-05-03")]);
        let record = &parse_crawler_index(&raw, "10-Q")[0];
        assert_eq!(record.matches_query(query), expected);
    }
}
