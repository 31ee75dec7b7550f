use serde::de::DeserializeOwned;
use snafu::ResultExt as _;
use surrealdb::engine::any::Any;
use surrealdb::opt::{IntoQuery, QueryResult};
use surrealdb::Surreal;

use super::error::*;

/// An extension trait that allows you to execute raw SurrealQL against a collection. Parameters
/// are bound with [Bindings::bind] which takes any serializable data structure.
///
/// # Example
/// ```ignore
/// let videos: Vec<Video> = database.sql("video", "SELECT * FROM video WHERE channel_id = $channel")
///     .bind(("channel", "UC_acme"))
///     .fetch()
///     .await?;
/// ```
pub trait Sql {
    fn sql(&self, collection: &'static str, query: impl IntoQuery) -> Bindings<'_>;
}

impl Sql for Surreal<Any> {
    fn sql(&self, collection: &'static str, query: impl IntoQuery) -> Bindings<'_> {
        Bindings {
            collection,
            query: self.query(query),
        }
    }
}

#[derive(Debug)]
pub struct Bindings<'a> {
    collection: &'static str,
    query: surrealdb::method::Query<'a, Any>,
}

impl Bindings<'_> {
    pub fn bind(mut self, params: impl serde::Serialize) -> Self {
        self.query = self.query.bind(params);
        self
    }

    /// Execute the statements and fail if any of them failed. The results are discarded.
    pub async fn execute(self) -> Result<()> {
        let collection = self.collection;
        let response = self.query.await.context(QuerySnafu { collection })?;
        response.check().context(QuerySnafu { collection })?;
        Ok(())
    }

    /// Execute the query and deserialize the result of the first statement.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T>
    where
        usize: QueryResult<T>,
    {
        let collection = self.collection;
        let mut response = self.query.await.context(QuerySnafu { collection })?;
        response.take::<T>(0).context(DeserializeSnafu { collection })
    }
}
