//! Live ODBC sessions.
//!
//! Opens connections through the process-wide driver-manager environment,
//! walks the table catalog, and runs the per-table preview query. The
//! [`OdbcRowSet`] adapter turns a driver cursor into the [`RowSet`] the
//! preview builder consumes, so everything above this module can run
//! against in-memory fixtures.

use odbc_api::{
    ColumnDescription, Connection, ConnectionOptions, Cursor, CursorRow, ResultSetMetadata,
};
use tracing::debug;

use crate::connect::DriverFamily;
use crate::error::{ProbeError, ProbeResult};
use crate::preview::RowSet;

/// Connections borrow the process-wide driver-manager environment.
pub type OdbcConnection = Connection<'static>;

/// The catalog row type that selects a table for previewing.
const BASE_TABLE_TYPE: &str = "TABLE";

// SQLTables result-set layout (1-based).
const TABLE_NAME_COLUMN: u16 = 3;
const TABLE_TYPE_COLUMN: u16 = 4;

/// One table from the catalog walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub table_type: String,
}

/// Open a connection for one probe target.
pub fn open_connection(label: &str, connection_string: &str) -> ProbeResult<OdbcConnection> {
    let environment =
        odbc_api::environment().map_err(|e| ProbeError::connection(label, e.to_string()))?;

    environment
        .connect_with_connection_string(connection_string, ConnectionOptions::default())
        .map_err(|e| ProbeError::connection(label, e.to_string()))
}

/// DBMS display name, for connect-time diagnostics.
pub fn dbms_name(conn: &OdbcConnection) -> ProbeResult<String> {
    Ok(conn.database_management_system_name()?)
}

/// Walk the table catalog, keeping base tables only.
pub fn list_base_tables(conn: &OdbcConnection) -> ProbeResult<Vec<TableDescriptor>> {
    let tables = walk_catalog(conn).map_err(|e| ProbeError::catalog(e.to_string()))?;
    debug!(count = tables.len(), "listed base tables");
    Ok(tables)
}

fn walk_catalog(conn: &OdbcConnection) -> Result<Vec<TableDescriptor>, odbc_api::Error> {
    let mut cursor = conn.tables("", "", "", "")?;
    let mut tables = Vec::new();

    while let Some(mut row) = cursor.next_row()? {
        // Columns must be read in ascending order for SQLGetData.
        let Some(name) = read_text(&mut row, TABLE_NAME_COLUMN)? else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let table_type = read_text(&mut row, TABLE_TYPE_COLUMN)?.unwrap_or_default();

        if is_base_table(&table_type) {
            tables.push(TableDescriptor { name, table_type });
        }
    }

    Ok(tables)
}

fn is_base_table(table_type: &str) -> bool {
    table_type.eq_ignore_ascii_case(BASE_TABLE_TYPE)
}

/// Build the preview statement for one table.
///
/// Spreadsheet drivers take bracket-quoted names, which is how their
/// sheet ranges are addressed; everything else gets the bare name.
pub fn preview_statement(table: &str, family: DriverFamily) -> String {
    match family {
        DriverFamily::Excel => format!("SELECT * FROM [{table}];"),
        DriverFamily::Generic => format!("SELECT * FROM {table};"),
    }
}

/// Run the preview query for one table.
///
/// Returns `None` when the statement produced no result set at all. The
/// returned row set borrows the connection and must be dropped before the
/// next statement runs on it.
pub fn select_all<'c>(
    conn: &'c OdbcConnection,
    table: &str,
    family: DriverFamily,
) -> ProbeResult<Option<OdbcRowSet<impl Cursor + 'c>>> {
    let sql = preview_statement(table, family);
    debug!(table = %table, sql = %sql, "running preview query");

    match conn.execute(&sql, (), None) {
        Ok(Some(cursor)) => Ok(Some(OdbcRowSet::new(cursor)?)),
        Ok(None) => Ok(None),
        Err(e) => Err(ProbeError::query(table, e.to_string())),
    }
}

/// Live cursor adapter implementing [`RowSet`].
pub struct OdbcRowSet<C> {
    cursor: C,
    columns: Vec<String>,
}

impl<C: Cursor> OdbcRowSet<C> {
    fn new(mut cursor: C) -> ProbeResult<Self> {
        let columns = column_names(&mut cursor)?;
        Ok(Self { cursor, columns })
    }
}

impl<C: Cursor> RowSet for OdbcRowSet<C> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> ProbeResult<Option<Vec<String>>> {
        let column_count = self.columns.len() as u16;
        let Some(mut row) = self.cursor.next_row()? else {
            return Ok(None);
        };

        let mut cells = Vec::with_capacity(column_count as usize);
        for index in 1..=column_count {
            match read_text(&mut row, index)? {
                Some(text) => cells.push(text),
                // NULL renders as an empty cell.
                None => cells.push(String::new()),
            }
        }

        Ok(Some(cells))
    }
}

fn column_names<C: ResultSetMetadata>(cursor: &mut C) -> ProbeResult<Vec<String>> {
    let count = cursor.num_result_cols().map_err(ProbeError::from)?;

    (1..=count)
        .map(|index| {
            let index = index as u16;
            let mut description = ColumnDescription::default();
            cursor.describe_col(index, &mut description)?;
            Ok(decode_column_name(description.name, index))
        })
        .collect()
}

fn decode_column_name(name: Vec<u8>, index: u16) -> String {
    String::from_utf8(name).unwrap_or_else(|_| format!("col{}", index - 1))
}

fn read_text(row: &mut CursorRow<'_>, column: u16) -> Result<Option<String>, odbc_api::Error> {
    let mut buf = Vec::new();
    match row.get_text(column, &mut buf)? {
        true => Ok(Some(String::from_utf8_lossy(&buf).into_owned())),
        false => Ok(None),
    }
}
