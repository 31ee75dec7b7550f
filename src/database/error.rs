use snafu::{Location, Snafu};
use url::Url;

pub type Result<T, E = DocumentStoreError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DocumentStoreError {
    #[snafu(display("cannot connect to the document store `{url}`: {source}"))]
    Connect {
        url: Url,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to query collection `{collection}`: {source}"))]
    Query {
        collection: &'static str,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to deserialize rows of `{collection}`: {source}"))]
    Deserialize {
        collection: &'static str,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl crate::Located for DocumentStoreError {
    fn location(&self) -> Location {
        match self {
            DocumentStoreError::Connect { location, .. }
            | DocumentStoreError::Query { location, .. }
            | DocumentStoreError::Deserialize { location, .. } => *location,
        }
    }
}
