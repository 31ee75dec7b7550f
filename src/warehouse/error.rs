use snafu::{Location, Snafu};

pub type Result<T, E = WarehouseError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum WarehouseError {
    #[snafu(display("cannot open the warehouse `{url}`: {source}"))]
    Connect {
        url: String,
        source: sqlx::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("warehouse query failed: {source}"))]
    Query {
        source: sqlx::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// No channel matches the lookup
    #[snafu(display("no channel `{channel}` in the warehouse"))]
    ChannelNotFound {
        channel: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// More than one channel carries the same display name
    #[snafu(display("{count} channels are named `{name}`"))]
    AmbiguousChannel {
        name: String,
        count: usize,
        #[snafu(implicit)]
        location: Location,
    },
}

impl crate::Located for WarehouseError {
    fn location(&self) -> Location {
        match self {
            WarehouseError::Connect { location, .. }
            | WarehouseError::Query { location, .. }
            | WarehouseError::ChannelNotFound { location, .. }
            | WarehouseError::AmbiguousChannel { location, .. } => *location,
        }
    }
}
