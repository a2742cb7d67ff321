// Dashboard session: load-once table cache + the query interface the
// presentation layers call.

use crate::catalog::{self, ChartSpec, NamedQuery, OverviewReport};
use crate::config::DashboardConfig;
use crate::db::{self, LoadedTable, SourceTable};
use crate::error::DashboardResult;
use crate::query::{self, QueryTable};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The three CSV paths a session loads from
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePaths {
    pub customers: PathBuf,
    pub contracts: PathBuf,
    pub claims: PathBuf,
}

impl SourcePaths {
    pub fn path_for(&self, table: SourceTable) -> &Path {
        match table {
            SourceTable::Customers => &self.customers,
            SourceTable::Contracts => &self.contracts,
            SourceTable::Claims => &self.claims,
        }
    }
}

impl From<&DashboardConfig> for SourcePaths {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            customers: config.customers_csv.clone(),
            contracts: config.contracts_csv.clone(),
            claims: config.claims_csv.clone(),
        }
    }
}

/// Loaded snapshot: a read-only connection holding all three tables
pub struct Snapshot {
    conn: Connection,
    tables: Vec<LoadedTable>,
}

impl Snapshot {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn tables(&self) -> &[LoadedTable] {
        &self.tables
    }
}

/// Load-once cache for the CSV sources.
///
/// The first access reads all three files into a fresh in-memory database
/// and locks it read-only; every later access reuses that snapshot.
/// There is no invalidation: edits to the CSV files after the first load are
/// not seen until a new `SourceCache` (i.e. a new session) is created.
/// A failed load caches nothing, so the next access tries again.
pub struct SourceCache {
    paths: SourcePaths,
    snapshot: Option<Snapshot>,
}

impl SourceCache {
    pub fn new(paths: SourcePaths) -> Self {
        Self {
            paths,
            snapshot: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn get(&mut self) -> DashboardResult<&Snapshot> {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => snapshot,
            None => Self::load(&self.paths)?,
        };
        Ok(&*self.snapshot.insert(snapshot))
    }

    fn load(paths: &SourcePaths) -> DashboardResult<Snapshot> {
        let conn = Connection::open_in_memory()?;
        let mut tables = Vec::with_capacity(SourceTable::ALL.len());
        for table in SourceTable::ALL {
            tables.push(db::load_table(&conn, table, paths.path_for(table))?);
        }
        query::lock_down(&conn)?;
        Ok(Snapshot { conn, tables })
    }
}

/// One dashboard session. Every query is a pure function of the cached
/// snapshot and its arguments; no other state carries between calls.
pub struct Session {
    id: Uuid,
    cache: SourceCache,
}

impl Session {
    pub fn new(paths: SourcePaths) -> Self {
        Self {
            id: Uuid::new_v4(),
            cache: SourceCache::new(paths),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(SourcePaths::from(config))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Force the initial load; binaries call this at startup so a missing
    /// file stops the process before any page is shown.
    pub fn ensure_loaded(&mut self) -> DashboardResult<&[LoadedTable]> {
        let session_id = self.id;
        let snapshot = self.cache.get()?;
        tracing::info!(
            session = %session_id,
            tables = snapshot.tables().len(),
            "session snapshot ready"
        );
        Ok(snapshot.tables())
    }

    pub fn loaded_tables(&mut self) -> DashboardResult<Vec<LoadedTable>> {
        Ok(self.cache.get()?.tables().to_vec())
    }

    pub fn run_named_query(&mut self, name: &str) -> DashboardResult<QueryTable> {
        let query = NamedQuery::from_name(name)?;
        self.run_query(query)
    }

    pub fn run_query(&mut self, query: NamedQuery) -> DashboardResult<QueryTable> {
        let snapshot = self.cache.get()?;
        catalog::run_named_query(snapshot.connection(), query)
    }

    pub fn run_adhoc_query(&mut self, sql: &str) -> DashboardResult<QueryTable> {
        let session_id = self.id;
        let snapshot = self.cache.get()?;
        tracing::info!(session = %session_id, "executing ad-hoc query");
        query::run_adhoc_query(snapshot.connection(), sql)
    }

    /// Result table plus its chart (None for queries without one)
    pub fn run_with_chart(&mut self, query: NamedQuery) -> DashboardResult<(QueryTable, Option<ChartSpec>)> {
        let table = self.run_query(query)?;
        let chart = catalog::chart_for(query, &table);
        Ok((table, chart))
    }

    pub fn chart(&mut self, query: NamedQuery) -> DashboardResult<Option<ChartSpec>> {
        Ok(self.run_with_chart(query)?.1)
    }

    pub fn overview(&mut self) -> DashboardResult<OverviewReport> {
        catalog::overview(self.cache.get()?.connection())
    }

    pub fn browse_table(&mut self, table: SourceTable) -> DashboardResult<QueryTable> {
        db::browse_table(self.cache.get()?.connection(), table)
    }
}
