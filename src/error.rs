use std::net::SocketAddr;

use snafu::{Location, Snafu};

use crate::api::ApiError;
use crate::database::DocumentStoreError;
use crate::warehouse::WarehouseError;
use crate::youtube::YouTubeError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApplicationError {
    /// Could not read the configuration from the environment
    #[snafu(display("invalid configuration at {location}: {source}"))]
    ConfigLoad {
        source: envy::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not initialize the logger
    InitializeLogger {
        source: tracing::subscriber::SetGlobalDefaultError,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not build the YouTube client
    YouTubeClient {
        source: YouTubeError,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not connect to the document store
    ConnectDocumentStore {
        source: DocumentStoreError,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not open the warehouse
    ConnectWarehouse {
        source: WarehouseError,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not prepare the web application
    CreateApp {
        source: ApiError,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not bind to the given address, check if it's already in use
    BindAddress {
        address: SocketAddr,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not serve the application
    WebServer {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },
}
