// Insurance Fraud Dashboard - Core Library
// Shared by the TUI, the API server, and tests

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod narrative;
pub mod query;
pub mod session;

// Re-export commonly used types
pub use catalog::{
    AgeBand, ChartBar, ChartSpec, ClaimantRow, FraudRateRow, NamedQuery, OverviewReport,
    fraud_rate, round2, TOP_CLAIMANTS_SQL,
};
pub use config::DashboardConfig;
pub use db::{ColumnType, LoadedTable, SourceTable};
pub use error::{DashboardError, DashboardResult};
pub use narrative::NarrativeSection;
pub use query::{CellValue, QueryTable};
pub use session::{Session, SourceCache, SourcePaths};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
