//! End-to-end preview behavior over an in-memory row source.

use odbc_probe::connect::DriverFamily;
use odbc_probe::error::ProbeResult;
use odbc_probe::inspect::preview_statement;
use odbc_probe::preview::{PREVIEW_ROW_CAP, Preview, RowSet};

struct FixtureRows {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    cursor: usize,
}

impl FixtureRows {
    fn new(columns: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            cursor: 0,
        }
    }
}

impl RowSet for FixtureRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> ProbeResult<Option<Vec<String>>> {
        let row = self.rows.get(self.cursor).cloned();
        self.cursor += 1;
        Ok(row)
    }
}

fn order_rows(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| {
            vec![
                (1000 + i).to_string(),
                format!("customer-{i}"),
                format!("{}.50", 10 + i),
            ]
        })
        .collect()
}

#[test]
fn test_seven_rows_render_five_and_report_seven() {
    let mut source = FixtureRows::new(&["id", "customer", "total"], order_rows(7));
    let preview = Preview::collect(&mut source).unwrap().unwrap();
    let rendered = preview.render("Orders");

    let lines: Vec<&str> = rendered.lines().collect();
    // Header, separator, five data rows, blank line, count line.
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0].matches('|').count(), 4, "three columns");
    assert!(lines[1].starts_with("|--"));
    assert_eq!(lines[8], "7 records read from Orders.");

    // First five rows in source order.
    assert!(lines[2].contains("1000"));
    assert!(lines[6].contains("1004"));
    assert!(!rendered.contains("1005"));
}

#[test]
fn test_empty_table_produces_no_preview() {
    let mut source = FixtureRows::new(&["id"], Vec::new());
    assert!(Preview::collect(&mut source).unwrap().is_none());
}

#[test]
fn test_row_counts_around_the_cap() {
    for (total, rendered_rows) in [(4, 4), (5, 5), (6, 5)] {
        let mut source = FixtureRows::new(&["id", "customer", "total"], order_rows(total));
        let preview = Preview::collect(&mut source).unwrap().unwrap();
        assert_eq!(preview.total, total);
        assert_eq!(preview.rows.len(), rendered_rows);
        assert!(preview.rows.len() <= PREVIEW_ROW_CAP);

        let rendered = preview.render("t");
        assert!(rendered.ends_with(&format!("{total} records read from t.\n")));
    }
}

#[test]
fn test_statement_quoting_follows_driver_family() {
    let excel = DriverFamily::of_driver("Microsoft Excel Driver (*.xls)");
    let generic = DriverFamily::of_driver("PostgreSQL Unicode");

    assert_eq!(
        preview_statement("Sheet1$", excel),
        "SELECT * FROM [Sheet1$];"
    );
    assert_eq!(preview_statement("Orders", generic), "SELECT * FROM Orders;");
}

#[test]
fn test_null_cells_render_as_blanks() {
    let rows = vec![vec!["1".to_string(), String::new()]];
    let mut source = FixtureRows::new(&["id", "note"], rows);
    let preview = Preview::collect(&mut source).unwrap().unwrap();
    let rendered = preview.render("t");

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[2], "| 1  |      |");
}
