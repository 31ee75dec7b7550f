use reqwest::StatusCode;
use snafu::{Location, Snafu};

pub type Result<T, E = YouTubeError> = ::std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum YouTubeError {
    #[snafu(display("could not build the http client: {source}"))]
    BuildClient {
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("request to `{resource}` failed: {source}"))]
    Request {
        resource: &'static str,
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("API returned {status} for `{resource}`: {message}"))]
    Api {
        resource: &'static str,
        status: StatusCode,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("malformed response for `{resource}`: {source}"))]
    InvalidBody {
        resource: &'static str,
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl crate::Located for YouTubeError {
    fn location(&self) -> Location {
        match self {
            YouTubeError::BuildClient { location, .. }
            | YouTubeError::Request { location, .. }
            | YouTubeError::Api { location, .. }
            | YouTubeError::InvalidBody { location, .. } => *location,
        }
    }
}
