pub mod api;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod error;
pub mod harvest;
pub mod logger;
pub mod model;
pub mod warehouse;
pub mod youtube;

mod macros;

/// Errors that remember where in the source they were raised.
pub trait Located {
    fn location(&self) -> snafu::Location;
}
