use dotenvy::dotenv;
use snafu::ResultExt as _;

use yt_harvest::api::{create_app, create_router};
use yt_harvest::config::Config;
use yt_harvest::database::DocumentStore;
use yt_harvest::error::*;
use yt_harvest::harvest::Harvester;
use yt_harvest::logger;
use yt_harvest::warehouse::Warehouse;
use yt_harvest::youtube::YouTube;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    if config.youtube.api_key.is_empty() {
        tracing::warn!("YOUTUBE_API_KEY is not set, every fetch will be rejected by the API");
    }

    let youtube = YouTube::connect(&config.youtube).context(YouTubeClientSnafu)?;
    let store = DocumentStore::connect(&config.surreal)
        .await
        .context(ConnectDocumentStoreSnafu)?;
    let warehouse = Warehouse::connect(&config.warehouse)
        .await
        .context(ConnectWarehouseSnafu)?;

    let harvester = Harvester::new(youtube, store, warehouse, config.warehouse.scope);
    let app = create_app(harvester).context(CreateAppSnafu)?;

    let address = config.host;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .context(BindAddressSnafu { address })?;

    tracing::info!("serving the dashboard on http://{}", address);
    axum::serve(listener, create_router(app))
        .await
        .context(WebServerSnafu)
}
