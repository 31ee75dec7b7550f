use axum::http::StatusCode;
use snafu::{Location, Snafu};

use crate::harvest::HarvestError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    /// The embedded page templates do not compile
    #[snafu(display("invalid page template at {location}: {source}"))]
    Template {
        source: tera::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl crate::Located for ApiError {
    fn location(&self) -> Location {
        match self {
            ApiError::Template { location, .. } => *location,
        }
    }
}

/// Status the page is served with when a fetch failed.
pub fn status_of(err: &HarvestError) -> StatusCode {
    match err {
        HarvestError::NoChannels { .. } | HarvestError::TooManyChannels { .. } => {
            StatusCode::BAD_REQUEST
        }
        HarvestError::ChannelsNotFound { .. } => StatusCode::NOT_FOUND,
        HarvestError::YouTube { .. } => StatusCode::BAD_GATEWAY,
        HarvestError::DocumentStore { .. } | HarvestError::Warehouse { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
