// Dashboard configuration
// Defaults < insu-dashboard.toml < INSU_* environment variables

use crate::error::DashboardResult;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "insu-dashboard.toml";
pub const ENV_PREFIX: &str = "INSU_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Customer source file (CUST_ID, SEX, AGE, SIU_CUST_YN)
    pub customers_csv: PathBuf,

    /// Contract source file (POLY_NO, CUST_ID, GOOD_CLSF_CDNM)
    pub contracts_csv: PathBuf,

    /// Claim source file (POLY_NO, CUST_ID)
    pub claims_csv: PathBuf,

    /// Listen address for the API server
    pub bind_addr: String,

    /// Where the TUI writes its log events (stderr belongs to the terminal)
    pub log_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            customers_csv: PathBuf::from("cust.csv"),
            contracts_csv: PathBuf::from("cntt.csv"),
            claims_csv: PathBuf::from("claim.csv"),
            bind_addr: "0.0.0.0:3000".to_string(),
            log_file: PathBuf::from("insu-dashboard.log"),
        }
    }
}

impl DashboardConfig {
    /// Load from the default file in the working directory plus environment.
    pub fn load() -> DashboardResult<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(config_file: &Path) -> DashboardResult<Self> {
        let config = Self::figment(config_file).extract()?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(DashboardConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX))
    }
}
