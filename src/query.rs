// Tabular query results + the ad-hoc SQL path
//
// Every query (named or ad-hoc) comes back as a QueryTable: ordered column
// names plus ordered rows. Ad-hoc SQL runs only on a connection that has been
// through `lock_down`, one statement at a time, and only if SQLite reports the
// statement read-only.

use crate::catalog::round2;
use crate::error::{DashboardError, DashboardResult};
use rusqlite::hooks::{AuthAction, AuthContext, Authorization};
use rusqlite::{limits::Limit, types::ValueRef, Batch, Connection};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// A single cell of a query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    fn from_value_ref(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => CellValue::Null,
            ValueRef::Integer(i) => CellValue::Integer(i),
            ValueRef::Real(f) => CellValue::Real(f),
            ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => CellValue::Blob(bytes.to_vec()),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "NULL"),
            CellValue::Integer(i) => write!(f, "{}", i),
            // Same half-away-from-zero rounding as the typed rows and charts
            CellValue::Real(r) => write!(f, "{:.2}", round2(*r)),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Tabular result: ordered named columns, ordered rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Plain-text rendering for the CLI
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        for row in &rendered {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let format_line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        let mut out = format_line(&self.columns);
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        for row in &rendered {
            out.push('\n');
            out.push_str(&format_line(row));
        }
        out
    }
}

// ============================================================================
// EXECUTION
// ============================================================================

/// Run one statement and collect every row. No row cap.
pub fn execute_query(conn: &Connection, sql: &str) -> DashboardResult<QueryTable> {
    let mut stmt = conn.prepare(sql)?;
    collect_rows(&mut stmt)
}

fn collect_rows(stmt: &mut rusqlite::Statement<'_>) -> DashboardResult<QueryTable> {
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let column_count = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let mut cells = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            cells.push(CellValue::from_value_ref(row.get_ref(idx)?));
        }
        rows.push(cells);
    }

    Ok(QueryTable { columns, rows })
}

/// Pragmas that only report on the schema; they take an argument but change
/// nothing.
const INTROSPECTION_PRAGMAS: [&str; 6] = [
    "table_info",
    "table_xinfo",
    "index_info",
    "index_xinfo",
    "index_list",
    "foreign_key_list",
];

/// Authorizer installed by `lock_down`: a pragma carrying a value is a
/// settings change (`query_only = OFF`, `case_sensitive_like = 1`, ...) and is
/// denied at prepare time.
fn deny_pragma_writes(ctx: AuthContext<'_>) -> Authorization {
    match ctx.action {
        AuthAction::Pragma {
            pragma_name,
            pragma_value: Some(_),
        } if !INTROSPECTION_PRAGMAS
            .iter()
            .any(|name| name.eq_ignore_ascii_case(pragma_name)) =>
        {
            Authorization::Deny
        }
        _ => Authorization::Allow,
    }
}

/// Restrict a loaded connection to reads.
///
/// Must be called once the snapshot tables are populated; after this the
/// connection can neither write, attach other database files, nor change
/// its own settings through a pragma.
pub fn lock_down(conn: &Connection) -> DashboardResult<()> {
    conn.pragma_update(None, "query_only", true)?;
    // Returns the previous limit, not a status
    conn.set_limit(Limit::SQLITE_LIMIT_ATTACHED, 0);
    conn.authorizer(Some(deny_pragma_writes));
    Ok(())
}

/// Execute user-typed SQL verbatim.
///
/// Any failure (empty text, more than one statement, syntax error, unknown
/// table or column, a statement that would write) comes back as
/// `DashboardError::Query` carrying the engine's message. Nothing here panics
/// on bad input.
pub fn run_adhoc_query(conn: &Connection, sql: &str) -> DashboardResult<QueryTable> {
    let result = prepare_single(conn, sql).and_then(|mut stmt| {
        if !stmt.readonly() {
            return Err(DashboardError::Query(
                "only read-only statements are allowed".to_string(),
            ));
        }
        collect_rows(&mut stmt)
    });

    match &result {
        Ok(table) => tracing::debug!(rows = table.row_count(), "ad-hoc query succeeded"),
        Err(error) => tracing::warn!(error = %error, "ad-hoc query failed"),
    }

    result
}

/// Prepare exactly one statement. Whitespace- or comment-only text counts as
/// empty; a second statement is an error rather than silently dropped.
fn prepare_single<'conn>(conn: &'conn Connection, sql: &str) -> DashboardResult<rusqlite::Statement<'conn>> {
    let mut batch = Batch::new(conn, sql);
    let stmt = batch
        .next()?
        .ok_or_else(|| DashboardError::Query("query must not be empty".to_string()))?;
    if batch.next()?.is_some() {
        return Err(DashboardError::Query("only one statement is allowed".to_string()));
    }
    Ok(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE customers (CUST_ID INTEGER, SEX TEXT, AGE INTEGER, SIU_CUST_YN TEXT);
             INSERT INTO customers VALUES (1, 'M', 30, 'Y'), (2, 'M', 50, 'N'), (3, 'F', 20, 'N');",
        )
        .unwrap();
        lock_down(&conn).unwrap();
        conn
    }

    #[test]
    fn test_adhoc_returns_full_result() {
        let conn = locked_connection();
        let table = run_adhoc_query(&conn, "SELECT CUST_ID, SEX FROM customers ORDER BY CUST_ID").unwrap();

        assert_eq!(table.columns, vec!["CUST_ID", "SEX"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[0][0], CellValue::Integer(1));
        assert_eq!(table.rows[2][1], CellValue::Text("F".to_string()));
    }

    #[test]
    fn test_adhoc_count_matches_table_size() {
        let conn = locked_connection();
        let table = run_adhoc_query(&conn, "select count(*) from customers").unwrap();
        assert_eq!(table.rows[0][0].as_i64(), Some(3));
    }

    #[test]
    fn test_adhoc_errors_are_recovered() {
        let conn = locked_connection();

        for sql in [
            "SELEC 1",
            "SELECT no_such_column FROM customers",
            "SELECT no_such_function(1)",
            "SELECT * FROM no_such_table",
            "   ",
        ] {
            let err = run_adhoc_query(&conn, sql).unwrap_err();
            assert!(err.is_query_failure(), "expected query failure for {:?}", sql);
        }

        // Session still usable afterwards
        assert!(run_adhoc_query(&conn, "SELECT 1").is_ok());
    }

    #[test]
    fn test_adhoc_error_carries_engine_text() {
        let conn = locked_connection();
        let err = run_adhoc_query(&conn, "SELECT * FROM no_such_table").unwrap_err();
        assert!(err.to_string().contains("no_such_table"));
    }

    #[test]
    fn test_adhoc_rejects_writes() {
        let conn = locked_connection();

        for sql in [
            "DELETE FROM customers",
            "DROP TABLE customers",
            "INSERT INTO customers VALUES (4, 'F', 44, 'Y')",
            "CREATE TABLE scratch (x INTEGER)",
            "PRAGMA query_only = OFF",
            "PRAGMA case_sensitive_like = 1",
        ] {
            assert!(run_adhoc_query(&conn, sql).is_err(), "expected rejection for {:?}", sql);
        }

        let table = run_adhoc_query(&conn, "SELECT COUNT(*) FROM customers").unwrap();
        assert_eq!(table.rows[0][0].as_i64(), Some(3));

        let guard = run_adhoc_query(&conn, "PRAGMA query_only").unwrap();
        assert_eq!(guard.rows[0][0].as_i64(), Some(1));
    }

    #[test]
    fn test_adhoc_allows_schema_pragmas() {
        let conn = locked_connection();
        let table = run_adhoc_query(&conn, "PRAGMA table_info(customers)").unwrap();
        assert_eq!(table.row_count(), 4);
    }

    #[test]
    fn test_adhoc_rejects_trailing_statements() {
        let conn = locked_connection();

        let err = run_adhoc_query(&conn, "SELECT COUNT(*) FROM customers; DROP TABLE customers").unwrap_err();
        assert!(err.is_query_failure());
        assert!(err.to_string().contains("only one statement"));

        let err = run_adhoc_query(&conn, "SELECT 1; SELECT 2").unwrap_err();
        assert!(err.to_string().contains("only one statement"));

        // A trailing semicolon is still one statement
        let table = run_adhoc_query(&conn, "SELECT COUNT(*) FROM customers;").unwrap();
        assert_eq!(table.rows[0][0].as_i64(), Some(3));
    }

    #[test]
    fn test_adhoc_comment_only_is_empty() {
        let conn = locked_connection();
        for sql in ["-- hi", "/* nothing */", "  ;  "] {
            let err = run_adhoc_query(&conn, sql).unwrap_err();
            assert!(err.to_string().contains("query must not be empty"), "{:?}: {}", sql, err);
        }
    }

    #[test]
    fn test_adhoc_rejects_attach() {
        let conn = locked_connection();
        let err = run_adhoc_query(&conn, "ATTACH DATABASE ':memory:' AS other").unwrap_err();
        assert!(err.is_query_failure());
    }

    #[test]
    fn test_cell_display_rounds_reals() {
        assert_eq!(CellValue::Real(33.333333).to_string(), "33.33");
        // Exact halves round away from zero, not to even
        assert_eq!(CellValue::Real(0.125).to_string(), "0.13");
        assert_eq!(CellValue::Integer(7).to_string(), "7");
        assert_eq!(CellValue::Null.to_string(), "NULL");
    }

    #[test]
    fn test_to_text_aligns_columns() {
        let table = QueryTable {
            columns: vec!["SEX".to_string(), "TOTAL_COUNT".to_string()],
            rows: vec![
                vec![CellValue::Text("F".to_string()), CellValue::Integer(1)],
                vec![CellValue::Text("M".to_string()), CellValue::Integer(2)],
            ],
        };
        let text = table.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "SEX | TOTAL_COUNT");
        assert_eq!(lines[2], "F   | 1          ");
    }
}
