//! Parsed index records exported through every format.

use tenq_data::edgar::{parse_crawler_index, sort_by_date_desc};
use tenq_output::{ExportFormat, Exporter, export_file_name, render_table};

const INDEX: &str = "\
Company Name                    Form Type   CIK         Date Filed  URL
---------------------------------------------------------------------------
ALPHA CORP                      10-Q        1001        2024-02-01  https://www.sec.gov/Archives/edgar/data/1001/a-index.htm
BETA, INC.                      10-Q        1002        2024-03-15  https://www.sec.gov/Archives/edgar/data/1002/b-index.htm
GAMMA LLC                       8-K         1003        2024-03-20  https://www.sec.gov/Archives/edgar/data/1003/c-index.htm
";

#[test]
fn test_parsed_records_export_to_csv_and_table() {
    let mut records = parse_crawler_index(INDEX, "10-Q");
    sort_by_date_desc(&mut records);

    let csv = records.export_to_string(ExportFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Form Type,Company,CIK,Date Filed,URL",
            "10-Q,\"BETA, INC.\",1002,2024-03-15,https://www.sec.gov/Archives/edgar/data/1002/b-index.htm",
            "10-Q,ALPHA CORP,1001,2024-02-01,https://www.sec.gov/Archives/edgar/data/1001/a-index.htm",
        ]
    );

    let table = records.export_to_string(ExportFormat::Text).unwrap();
    assert_eq!(table, render_table(&records));
    assert_eq!(table.lines().count(), 3);
    assert!(table.lines().nth(1).unwrap().starts_with("10-Q       BETA, INC."));
}

#[test]
fn test_export_to_default_file_name() {
    let records = parse_crawler_index(INDEX, "10-Q");
    let dir = std::env::temp_dir().join(format!("tenq_output_it_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let path = dir.join(export_file_name("10-Q", 2024, &[1], ExportFormat::Json));
    records.export_to_file(&path, ExportFormat::Json).unwrap();
    assert!(path.ends_with("10Q_filings_2024_Q1.json"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 2);

    std::fs::remove_dir_all(&dir).unwrap();
}
