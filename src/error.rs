use thiserror::Error;

/// Error taxonomy shared by the library and both front ends.
///
/// `Load` is fatal to a session; every other variant is recovered where it
/// happens and surfaced as a message.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("LOAD_FAILURE: {table} ({path}): {message}")]
    Load {
        table: String,
        path: String,
        message: String,
    },
    #[error("QUERY_FAILURE: {0}")]
    Query(String),
    #[error("UNKNOWN_QUERY: {0}")]
    UnknownQuery(String),
    #[error("UNKNOWN_TABLE: {0}")]
    UnknownTable(String),
    #[error("CONFIG_INVALID: {0}")]
    Config(String),
}

impl DashboardError {
    pub fn is_load_failure(&self) -> bool {
        matches!(self, DashboardError::Load { .. })
    }

    pub fn is_query_failure(&self) -> bool {
        matches!(self, DashboardError::Query(_))
    }
}

impl From<rusqlite::Error> for DashboardError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value.to_string())
    }
}

impl From<figment::Error> for DashboardError {
    fn from(value: figment::Error) -> Self {
        Self::Config(value.to_string())
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
