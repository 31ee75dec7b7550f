use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::{Form, Query};
use axum_template::RenderHtml;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::dashboard::{Page, PageRequest};
use crate::Located as _;

mod error;
mod state;

pub use error::*;
pub use state::*;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

pub fn create_router(app: App) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/fetch", post(fetch))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn index(State(app): State<App>, Query(request): Query<PageRequest>) -> impl IntoResponse {
    let page = Page::build(app.harvester.warehouse(), request, None, None).await;
    RenderHtml("index.html", app.templates, page)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FetchForm {
    count: Option<usize>,
    channel: Vec<String>,
}

async fn fetch(State(app): State<App>, Form(form): Form<FetchForm>) -> impl IntoResponse {
    let request = PageRequest {
        count: form.count,
        channels: form.channel.clone(),
        ..PageRequest::default()
    };
    let warehouse = app.harvester.warehouse();

    let (status, page) = match app.harvester.run(&form.channel).await {
        Ok(report) => (StatusCode::OK, Page::build(warehouse, request, Some(report), None).await),
        Err(err) => {
            tracing::error!(error = ?err, location = %err.location(), "ingestion failed: {}", err);
            let status = status_of(&err);
            (status, Page::build(warehouse, request, None, Some(err.to_string())).await)
        }
    };

    (status, RenderHtml("index.html", app.templates, page))
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
