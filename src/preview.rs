//! Bounded table previews.
//!
//! A preview drains a row source completely, counting every row, but
//! materializes only the first [`PREVIEW_ROW_CAP`] of them. Rendering
//! produces a width-aligned Markdown pipe table followed by the record
//! count line. An empty result set produces no preview at all.

use unicode_width::UnicodeWidthStr;

use crate::error::ProbeResult;

/// Hard ceiling on rendered rows per table.
pub const PREVIEW_ROW_CAP: usize = 5;

/// Row-at-a-time source feeding a preview.
///
/// Implemented by the live ODBC cursor adapter and by in-memory fixtures
/// in tests. A NULL cell is surfaced as the empty string.
pub trait RowSet {
    /// Column names, in result-set order.
    fn columns(&self) -> &[String];

    /// The next row's cells in column order, or `None` when exhausted.
    fn next_row(&mut self) -> ProbeResult<Option<Vec<String>>>;
}

/// Bounded materialization of one table's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Total rows the source produced, counted past the cap.
    pub total: usize,
}

impl Preview {
    /// Drain `source`, keeping the first [`PREVIEW_ROW_CAP`] rows while
    /// counting all of them. Returns `None` for an empty result set.
    pub fn collect<R: RowSet>(source: &mut R) -> ProbeResult<Option<Self>> {
        let columns = source.columns().to_vec();
        let mut rows = Vec::new();
        let mut total = 0usize;

        while let Some(cells) = source.next_row()? {
            if total < PREVIEW_ROW_CAP {
                rows.push(cells);
            }
            total += 1;
        }

        if total == 0 {
            return Ok(None);
        }

        Ok(Some(Self {
            columns,
            rows,
            total,
        }))
    }

    /// Render the Markdown table plus the record-count line.
    pub fn render(&self, table_name: &str) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.width());
                }
            }
        }

        let mut output = String::new();

        let header: String = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, w)| format!("| {} ", pad(name, *w)))
            .collect::<String>()
            + "|\n";
        output.push_str(&header);

        let separator: String = widths
            .iter()
            .map(|w| format!("|{}", "-".repeat(w + 2)))
            .collect::<String>()
            + "|\n";
        output.push_str(&separator);

        for row in &self.rows {
            let row_str: String = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("| {} ", pad(cell, *w)))
                .collect::<String>()
                + "|\n";
            output.push_str(&row_str);
        }

        output.push('\n');
        output.push_str(&format!(
            "{} records read from {}.\n",
            self.total, table_name
        ));

        output
    }
}

/// Pad to a display width, not a char count, so wide characters align.
fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}
