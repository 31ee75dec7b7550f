use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use snafu::ResultExt as _;

use crate::database::DocumentStoreConfig;
use crate::error::{ApplicationError, ConfigLoadSnafu};
use crate::warehouse::WarehouseConfig;
use crate::youtube::YouTubeConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ServerConfig {
    host_address: SocketAddr,
    log_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Everything the application reads from the environment. Each section has its own prefix:
/// `YOUTUBE_`, `SURREAL_` and `WAREHOUSE_`.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: SocketAddr,
    pub log_dir: PathBuf,
    pub youtube: YouTubeConfig,
    pub surreal: DocumentStoreConfig,
    pub warehouse: WarehouseConfig,
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Config, ApplicationError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        let server: ServerConfig = envy::from_iter(vars.clone()).context(ConfigLoadSnafu)?;
        let youtube = envy::prefixed("YOUTUBE_")
            .from_iter(vars.clone())
            .context(ConfigLoadSnafu)?;
        let surreal = envy::prefixed("SURREAL_")
            .from_iter(vars.clone())
            .context(ConfigLoadSnafu)?;
        let warehouse = envy::prefixed("WAREHOUSE_")
            .from_iter(vars)
            .context(ConfigLoadSnafu)?;

        Ok(Config {
            host: server.host_address,
            log_dir: server.log_dir,
            youtube,
            surreal,
            warehouse,
        })
    }
}
