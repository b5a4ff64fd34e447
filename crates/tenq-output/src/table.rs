//! Plain-text table rendering.

use tenq_data::edgar::FilingRecord;

/// Column headings, in output order.
pub const COLUMNS: [&str; 5] = ["Form Type", "Company", "CIK", "Date Filed", "URL"];

/// Gap between columns.
const COLUMN_GAP: &str = "  ";

fn cells(record: &FilingRecord) -> [String; 5] {
    [
        record.form_type.clone(),
        record.company.clone(),
        record.cik.clone(),
        record.date_filed.to_string(),
        record.index_url.clone(),
    ]
}

fn push_row<S: AsRef<str>>(out: &mut String, row: &[S], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in row.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(&format!("{:<width$}", cell.as_ref(), width = *width));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Render records as a left-aligned table with a heading row.
///
/// Each column is as wide as its widest cell; trailing padding is trimmed.
/// An empty slice renders the heading row alone.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tenq_data::edgar::FilingRecord;
/// use tenq_output::render_table;
///
/// let record = FilingRecord {
///     form_type: "10-Q".to_string(),
///     company: "APPLE INC".to_string(),
///     cik: "320193".to_string(),
///     date_filed: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
///     index_url: "https://www.sec.gov/x-index.htm".to_string(),
/// };
/// let table = render_table(&[record]);
/// assert_eq!(table.lines().count(), 2);
/// assert!(table.starts_with("Form Type  Company"));
/// ```
pub fn render_table(records: &[FilingRecord]) -> String {
    let rows: Vec<[String; 5]> = records.iter().map(cells).collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &COLUMNS, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}
