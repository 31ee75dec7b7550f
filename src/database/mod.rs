use std::collections::BTreeMap;

use serde::Deserialize;
use snafu::ResultExt as _;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::sql::{Id, Thing};
use surrealdb::Surreal;
use tracing::instrument;
use url::Url;

use crate::model::{Channel, Collection, Comment, Harvest, PlaylistEntry, Video};

/// Helper trait for executing arbitrary SurrealQL queries.
pub mod query;

mod error;

pub use error::*;
pub use query::{Bindings, Sql};

/// How fetched records land in the document store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Every record is stored under its natural key, re-ingesting replaces it.
    #[default]
    Upsert,
    /// Records are appended under random ids and a dedup pass runs afterwards.
    Append,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentStoreConfig {
    pub url: Url,
    pub ns: String,
    pub db: String,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub write_mode: WriteMode,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("mem://").expect("default document store url is valid"),
            ns: "yt_harvest".to_string(),
            db: "youtube_data_harvesting".to_string(),
            user: None,
            pass: None,
            write_mode: WriteMode::default(),
        }
    }
}

impl DocumentStoreConfig {
    fn credentials(&self) -> Option<auth::Database<'_>> {
        let (username, password) = (self.user.as_deref()?, self.pass.as_deref()?);

        Some(auth::Database {
            namespace: &self.ns,
            database: &self.db,
            username,
            password,
        })
    }
}

/// The document store holding one collection per record kind.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    database: Surreal<Any>,
    mode: WriteMode,
}

#[derive(Debug, Deserialize)]
struct Keyed {
    id: Thing,
    key: Option<String>,
}

impl DocumentStore {
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: &DocumentStoreConfig) -> Result<Self> {
        let url = config.url.clone();

        let database = surrealdb::engine::any::connect(url.as_str())
            .await
            .context(ConnectSnafu { url: url.clone() })?;

        if let Some(credentials) = config.credentials() {
            database
                .signin(credentials)
                .await
                .context(ConnectSnafu { url: url.clone() })?;
        }

        database
            .use_ns(&config.ns)
            .use_db(&config.db)
            .await
            .context(ConnectSnafu { url })?;

        tracing::info!(
            namespace = %config.ns,
            database = %config.db,
            "connected to the document store"
        );

        Ok(Self {
            database,
            mode: config.write_mode,
        })
    }

    /// Store everything a run fetched according to the configured [WriteMode].
    #[instrument(skip_all)]
    pub async fn save(&self, harvest: &Harvest) -> Result<()> {
        match self.mode {
            WriteMode::Upsert => {
                self.upsert(&harvest.channels).await?;
                self.upsert(&harvest.videos).await?;
                self.upsert(&harvest.comments).await?;
                self.upsert(&harvest.playlist).await?;
            }
            WriteMode::Append => {
                self.append(&harvest.channels).await?;
                self.append(&harvest.videos).await?;
                self.append(&harvest.comments).await?;
                self.append(&harvest.playlist).await?;
                self.clean().await?;
            }
        }

        Ok(())
    }

    /// Write every row under the record id `collection:⟨natural key⟩`, replacing what was there.
    #[instrument(skip_all, fields(collection = T::NAME, rows = rows.len()))]
    pub async fn upsert<T: Collection>(&self, rows: &[T]) -> Result<usize> {
        for row in rows {
            self.database
                .sql(T::NAME, "UPDATE type::thing($table, $key) CONTENT $row RETURN NONE")
                .bind(("table", T::NAME))
                .bind(("key", row.key()))
                .bind(("row", row))
                .execute()
                .await?;
        }

        tracing::debug!("upserted {} rows into `{}`", rows.len(), T::NAME);
        Ok(rows.len())
    }

    /// Insert every row under a fresh random record id. Duplicates are left for [Self::deduplicate].
    #[instrument(skip_all, fields(collection = T::NAME, rows = rows.len()))]
    pub async fn append<T: Collection>(&self, rows: &[T]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        self.database
            .sql(T::NAME, format!("INSERT INTO {} $rows", T::NAME))
            .bind(("rows", rows))
            .execute()
            .await?;

        tracing::debug!("appended {} rows to `{}`", rows.len(), T::NAME);
        Ok(rows.len())
    }

    /// Keep one record per natural key and delete the others. Returns how many were deleted.
    ///
    /// The survivor is the record stored under the natural key itself when there is one, otherwise
    /// the record with the smallest id.
    #[instrument(skip(self), fields(collection = T::NAME))]
    pub async fn deduplicate<T: Collection>(&self) -> Result<usize> {
        let rows: Vec<Keyed> = self
            .database
            .sql(T::NAME, format!("SELECT id, {} AS key FROM {} ORDER BY id", T::KEY, T::NAME))
            .fetch()
            .await?;

        let mut groups: BTreeMap<String, Vec<Thing>> = BTreeMap::new();
        for row in rows {
            if let Some(key) = row.key {
                groups.entry(key).or_default().push(row.id);
            }
        }

        let mut removed = 0;
        for (key, mut ids) in groups {
            if ids.len() < 2 {
                continue;
            }

            let survivor = ids
                .iter()
                .position(|thing| matches!(&thing.id, Id::String(id) if *id == key))
                .unwrap_or(0);
            ids.remove(survivor);

            for id in ids {
                self.database
                    .sql(T::NAME, "DELETE $id RETURN NONE")
                    .bind(("id", id))
                    .execute()
                    .await?;
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(removed, "removed duplicates from `{}`", T::NAME);
        }

        Ok(removed)
    }

    /// Deduplicate all four collections.
    pub async fn clean(&self) -> Result<usize> {
        Ok(self.deduplicate::<Channel>().await?
            + self.deduplicate::<Video>().await?
            + self.deduplicate::<PlaylistEntry>().await?
            + self.deduplicate::<Comment>().await?)
    }

    pub async fn all<T: Collection>(&self) -> Result<Vec<T>> {
        self.database
            .sql(T::NAME, format!("SELECT * FROM {} ORDER BY {}", T::NAME, T::KEY))
            .fetch()
            .await
    }

    pub async fn count<T: Collection>(&self) -> Result<usize> {
        let counts: Vec<usize> = self
            .database
            .sql(T::NAME, format!("SELECT VALUE count() FROM {} GROUP ALL", T::NAME))
            .fetch()
            .await?;

        Ok(counts.first().copied().unwrap_or(0))
    }

    pub async fn channels_by_id(&self, ids: &[String]) -> Result<Vec<Channel>> {
        self.database
            .sql(
                Channel::NAME,
                "SELECT * FROM channel WHERE channel_id INSIDE $ids ORDER BY channel_id",
            )
            .bind(("ids", ids))
            .fetch()
            .await
    }

    pub async fn videos_for_channels(&self, channel_ids: &[String]) -> Result<Vec<Video>> {
        self.database
            .sql(Video::NAME, "SELECT * FROM video WHERE channel_id INSIDE $ids ORDER BY video_id")
            .bind(("ids", channel_ids))
            .fetch()
            .await
    }

    pub async fn playlist_for_channels(
        &self, channel_ids: &[String],
    ) -> Result<Vec<PlaylistEntry>> {
        self.database
            .sql(
                PlaylistEntry::NAME,
                "SELECT * FROM playlist WHERE channel_id INSIDE $ids ORDER BY playlist_items_id",
            )
            .bind(("ids", channel_ids))
            .fetch()
            .await
    }

    pub async fn comments_for_videos(&self, video_ids: &[String]) -> Result<Vec<Comment>> {
        self.database
            .sql(
                Comment::NAME,
                "SELECT * FROM comment WHERE video_id INSIDE $ids ORDER BY comment_id",
            )
            .bind(("ids", video_ids))
            .fetch()
            .await
    }
}
