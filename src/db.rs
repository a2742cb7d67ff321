// Table Store: CSV sources → in-memory SQLite tables
//
// Each source is read once, its column types inferred from the data, and the
// rows bulk-inserted into a table named after the logical source. The schema
// is whatever the header row says; only the required columns are checked.

use crate::error::{DashboardError, DashboardResult};
use crate::query::{execute_query, QueryTable};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params_from_iter, types::Value, Connection};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

// ============================================================================
// SOURCE TABLES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTable {
    Customers,
    Contracts,
    Claims,
}

impl SourceTable {
    pub const ALL: [SourceTable; 3] = [
        SourceTable::Customers,
        SourceTable::Contracts,
        SourceTable::Claims,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            SourceTable::Customers => "customers",
            SourceTable::Contracts => "contracts",
            SourceTable::Claims => "claims",
        }
    }

    /// Columns the catalog queries reference verbatim
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            SourceTable::Customers => &["CUST_ID", "SEX", "AGE", "SIU_CUST_YN"],
            SourceTable::Contracts => &["POLY_NO", "CUST_ID", "GOOD_CLSF_CDNM"],
            SourceTable::Claims => &["POLY_NO", "CUST_ID"],
        }
    }

    /// Raw-browse ordering
    pub fn sort_column(&self) -> &'static str {
        match self {
            SourceTable::Customers => "CUST_ID",
            SourceTable::Contracts | SourceTable::Claims => "POLY_NO",
        }
    }

    /// Accepts the logical names and the source file stems (cust, cntt, claim)
    pub fn from_name(name: &str) -> DashboardResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "customers" | "cust" => Ok(SourceTable::Customers),
            "contracts" | "cntt" => Ok(SourceTable::Contracts),
            "claims" | "claim" => Ok(SourceTable::Claims),
            _ => Err(DashboardError::UnknownTable(name.to_string())),
        }
    }
}

// ============================================================================
// RAW CSV + TYPE INFERENCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    fn to_value(&self, raw: &str) -> Value {
        if raw.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnType::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(raw.to_string())),
            ColumnType::Real => raw
                .parse::<f64>()
                .map(Value::Real)
                .unwrap_or_else(|_| Value::Text(raw.to_string())),
            ColumnType::Text => Value::Text(raw.to_string()),
        }
    }
}

/// Narrowest type that holds every non-empty value. All-empty columns are TEXT.
pub fn infer_column_type<'a>(values: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut seen_any = false;
    let mut all_int = true;
    let mut all_real = true;

    for v in values.filter(|v| !v.is_empty()) {
        seen_any = true;
        if all_int && v.parse::<i64>().is_err() {
            all_int = false;
        }
        if all_real && v.parse::<f64>().is_err() {
            all_real = false;
        }
        if !all_real {
            break;
        }
    }

    match (seen_any, all_int, all_real) {
        (false, _, _) => ColumnType::Text,
        (true, true, _) => ColumnType::Integer,
        (true, false, true) => ColumnType::Real,
        _ => ColumnType::Text,
    }
}

/// Header row + records, exactly as read
#[derive(Debug, Clone)]
pub struct RawCsv {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
    pub fingerprint: String,
}

impl RawCsv {
    pub fn column_types(&self) -> Vec<ColumnType> {
        (0..self.headers.len())
            .map(|idx| infer_column_type(self.records.iter().map(|r| r[idx].as_str())))
            .collect()
    }
}

pub fn load_csv(csv_path: &Path) -> Result<RawCsv> {
    let bytes = std::fs::read(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let fingerprint = format!("{:x}", hasher.finalize());

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes.as_slice());

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("CSV file has no header row");
    }

    let mut records = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to parse CSV record {}", line + 1))?;
        records.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(RawCsv {
        headers,
        records,
        fingerprint,
    })
}

// ============================================================================
// DATABASE
// ============================================================================

/// Summary of one loaded snapshot table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedTable {
    pub table: SourceTable,
    pub path: String,
    pub columns: Vec<(String, ColumnType)>,
    pub row_count: usize,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn setup_database(conn: &Connection, table: SourceTable, raw: &RawCsv) -> Result<Vec<ColumnType>> {
    for required in table.required_columns() {
        if !raw.headers.iter().any(|h| h == required) {
            bail!("missing required column {}", required);
        }
    }

    let types = raw.column_types();
    let column_defs: Vec<String> = raw
        .headers
        .iter()
        .zip(&types)
        .map(|(name, ty)| format!("{} {}", quote_ident(name), ty.sql_type()))
        .collect();

    conn.execute(
        &format!(
            "CREATE TABLE {} ({})",
            quote_ident(table.table_name()),
            column_defs.join(", ")
        ),
        [],
    )?;

    Ok(types)
}

pub fn insert_rows(
    conn: &Connection,
    table: SourceTable,
    raw: &RawCsv,
    types: &[ColumnType],
) -> Result<usize> {
    let placeholders: Vec<String> = (1..=raw.headers.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} VALUES ({})",
        quote_ident(table.table_name()),
        placeholders.join(", ")
    );

    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(&sql)?;
        for record in &raw.records {
            let values = record.iter().zip(types).map(|(raw, ty)| ty.to_value(raw));
            stmt.execute(params_from_iter(values))?;
            inserted += 1;
        }
    }
    tx.commit()?;

    Ok(inserted)
}

/// Read one CSV source into the connection.
///
/// Every failure here (unreadable file, malformed record, missing required
/// column) is a `DashboardError::Load`.
pub fn load_table(conn: &Connection, table: SourceTable, csv_path: &Path) -> DashboardResult<LoadedTable> {
    let load_error = |err: anyhow::Error| DashboardError::Load {
        table: table.table_name().to_string(),
        path: csv_path.display().to_string(),
        message: format!("{:#}", err),
    };

    let raw = load_csv(csv_path).map_err(load_error)?;
    let types = setup_database(conn, table, &raw).map_err(load_error)?;
    let row_count = insert_rows(conn, table, &raw, &types).map_err(load_error)?;

    tracing::info!(
        table = table.table_name(),
        path = %csv_path.display(),
        rows = row_count,
        fingerprint = %raw.fingerprint,
        "loaded source table"
    );

    Ok(LoadedTable {
        table,
        path: csv_path.display().to_string(),
        columns: raw.headers.into_iter().zip(types).collect(),
        row_count,
        fingerprint: raw.fingerprint,
        loaded_at: Utc::now(),
    })
}

pub fn verify_count(conn: &Connection, table: SourceTable) -> DashboardResult<i64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_ident(table.table_name())),
        [],
        |row| row.get(0),
    )?;

    Ok(count)
}

/// Every row and column of a source table, in its browse order
pub fn browse_table(conn: &Connection, table: SourceTable) -> DashboardResult<QueryTable> {
    execute_query(
        conn,
        &format!(
            "SELECT * FROM {} ORDER BY {} ASC",
            quote_ident(table.table_name()),
            quote_ident(table.sort_column())
        ),
    )
}
