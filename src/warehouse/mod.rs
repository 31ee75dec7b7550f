use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use snafu::ResultExt as _;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Sqlite};
use tracing::instrument;

use crate::database::{DocumentStore, DocumentStoreError};
use crate::model::{Channel, Comment, Harvest, Video};

pub use error::*;
pub use questions::*;

mod error;
mod questions;
mod schema;

/// Which part of the document store a warehouse replace is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only the channels of the current run.
    #[default]
    Run,
    /// Everything the document store holds.
    All,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    pub url: String,
    pub scope: Scope,
    pub max_connections: u32,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://warehouse.db?mode=rwc".to_string(),
            scope: Scope::default(),
            max_connections: 4,
        }
    }
}

type ChannelRow = (String, String, String, i64, String, String, i64, i64, String);

type VideoRow = (
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    i64,
    i64,
    i64,
    Option<i64>,
    Option<i64>,
    String,
    i64,
    bool,
);

type CommentRow = (String, String, String, String, Option<DateTime<Utc>>);

const CHANNEL_COLUMNS: &str = "channel_id, channel_name, channel_type, channel_views, \
    channel_description, channel_status, subscription_count, total_videos, playlist_id";

const VIDEO_COLUMNS: &str = "video_id, channel_id, video_name, video_description, published_date, \
    view_count, like_count, dislike_count, favorite_count, comment_count, duration, \
    duration_seconds, caption_status";

fn channel_from_row(row: ChannelRow) -> Channel {
    let (id, name, topics, views, description, status, subscribers, videos, playlist) = row;
    let topics = topics
        .split(", ")
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect();

    Channel::new(id, name, topics, views, description, status, subscribers, videos, playlist)
}

fn video_from_row(row: VideoRow) -> Video {
    let (
        id,
        channel,
        name,
        description,
        published,
        views,
        likes,
        dislikes,
        favorites,
        comments,
        duration,
        seconds,
        caption,
    ) = row;

    Video::new(
        id,
        channel,
        name,
        description,
        published,
        views,
        likes,
        dislikes,
        favorites,
        comments,
        duration,
        seconds,
        caption,
    )
}

/// `?, ?, ?` for `n` bound values.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Build the tabular snapshot a warehouse replace is made from.
#[instrument(skip(store, channel_ids))]
pub async fn snapshot(
    store: &DocumentStore, scope: Scope, channel_ids: &[String],
) -> Result<Harvest, DocumentStoreError> {
    let harvest = match scope {
        Scope::All => Harvest {
            channels: store.all().await?,
            videos: store.all().await?,
            comments: store.all().await?,
            playlist: store.all().await?,
        },
        Scope::Run => {
            let videos = store.videos_for_channels(channel_ids).await?;
            let video_ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();

            Harvest {
                channels: store.channels_by_id(channel_ids).await?,
                comments: store.comments_for_videos(&video_ids).await?,
                playlist: store.playlist_for_channels(channel_ids).await?,
                videos,
            }
        }
    };

    tracing::debug!(
        channels = harvest.channels.len(),
        videos = harvest.videos.len(),
        comments = harvest.comments.len(),
        playlist = harvest.playlist.len(),
        "loaded snapshot"
    );

    Ok(harvest)
}

/// The relational side: four tables rebuilt wholesale on every run.
#[derive(Debug, Clone)]
pub struct Warehouse {
    pool: Pool<Sqlite>,
}

impl Warehouse {
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: &WarehouseConfig) -> Result<Self> {
        let url = config.url.clone();
        let options =
            SqliteConnectOptions::from_str(&url).context(ConnectSnafu { url: url.clone() })?;

        // every connection to an in-memory database sees a different database
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
        };

        let pool = pool
            .connect_with(options)
            .await
            .context(ConnectSnafu { url })?;

        let warehouse = Self { pool };
        warehouse.create_schema().await?;

        Ok(warehouse)
    }

    async fn create_schema(&self) -> Result<()> {
        for statement in schema::CREATE {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context(QuerySnafu)?;
        }
        Ok(())
    }

    /// Drop and recreate every table, then load the snapshot. Runs in one transaction so readers
    /// never observe a half-replaced warehouse.
    #[instrument(skip_all)]
    pub async fn replace(&self, snapshot: &Harvest) -> Result<()> {
        let mut tx = self.pool.begin().await.context(QuerySnafu)?;

        for table in schema::TABLES {
            sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
                .execute(&mut *tx)
                .await
                .context(QuerySnafu)?;
        }

        for statement in schema::CREATE {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .context(QuerySnafu)?;
        }

        for channel in &snapshot.channels {
            sqlx::query(schema::INSERT_CHANNEL)
                .bind(&channel.channel_id)
                .bind(&channel.channel_name)
                .bind(channel.topics())
                .bind(channel.channel_views)
                .bind(&channel.channel_description)
                .bind(&channel.channel_status)
                .bind(channel.subscription_count)
                .bind(channel.total_videos)
                .bind(&channel.playlist_id)
                .execute(&mut *tx)
                .await
                .context(QuerySnafu)?;
        }

        for video in &snapshot.videos {
            sqlx::query(schema::INSERT_VIDEO)
                .bind(&video.video_id)
                .bind(&video.channel_id)
                .bind(&video.video_name)
                .bind(&video.video_description)
                .bind(video.published_date)
                .bind(video.view_count)
                .bind(video.like_count)
                .bind(video.dislike_count)
                .bind(video.favorite_count)
                .bind(video.comment_count)
                .bind(&video.duration)
                .bind(video.duration_seconds)
                .bind(video.caption_status)
                .execute(&mut *tx)
                .await
                .context(QuerySnafu)?;
        }

        for comment in &snapshot.comments {
            sqlx::query(schema::INSERT_COMMENT)
                .bind(&comment.comment_id)
                .bind(&comment.video_id)
                .bind(&comment.comment_text)
                .bind(&comment.comment_author)
                .bind(comment.comment_published_date)
                .execute(&mut *tx)
                .await
                .context(QuerySnafu)?;
        }

        for entry in &snapshot.playlist {
            sqlx::query(schema::INSERT_PLAYLIST)
                .bind(&entry.playlist_id)
                .bind(&entry.playlist_items_id)
                .bind(&entry.channel_id)
                .bind(&entry.playlist_name)
                .bind(&entry.video_id)
                .execute(&mut *tx)
                .await
                .context(QuerySnafu)?;
        }

        tx.commit().await.context(QuerySnafu)?;

        tracing::info!(
            channels = snapshot.channels.len(),
            videos = snapshot.videos.len(),
            comments = snapshot.comments.len(),
            playlist = snapshot.playlist.len(),
            "replaced warehouse tables"
        );

        Ok(())
    }

    /// Every channel id currently in the warehouse.
    pub async fn channel_ids(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT channel_id FROM channel ORDER BY channel_id")
            .fetch_all(&self.pool)
            .await
            .context(QuerySnafu)
    }

    /// `(id, name)` of the given channels that are in the warehouse, ordered by name.
    pub async fn channel_names(&self, ids: &[String]) -> Result<Vec<(String, String)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT channel_id, channel_name FROM channel \
             WHERE channel_id IN ({}) ORDER BY channel_name",
            placeholders(ids.len())
        );

        let mut query = sqlx::query_as::<_, (String, String)>(&sql);
        for id in ids {
            query = query.bind(id.as_str());
        }

        query.fetch_all(&self.pool).await.context(QuerySnafu)
    }

    pub async fn channel(&self, id: &str) -> Result<Channel> {
        let sql = format!("SELECT {CHANNEL_COLUMNS} FROM channel WHERE channel_id = ?");

        let row: Option<ChannelRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context(QuerySnafu)?;

        match row {
            Some(row) => Ok(channel_from_row(row)),
            None => ChannelNotFoundSnafu { channel: id }.fail(),
        }
    }

    pub async fn channel_by_name(&self, name: &str) -> Result<Channel> {
        let sql = format!("SELECT {CHANNEL_COLUMNS} FROM channel WHERE channel_name = ?");

        let mut rows: Vec<ChannelRow> = sqlx::query_as(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .context(QuerySnafu)?;

        match rows.len() {
            0 => ChannelNotFoundSnafu { channel: name }.fail(),
            1 => Ok(channel_from_row(rows.remove(0))),
            count => AmbiguousChannelSnafu { name, count }.fail(),
        }
    }

    pub async fn videos_of(&self, channel_id: &str) -> Result<Vec<Video>> {
        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM video WHERE channel_id = ? ORDER BY published_date DESC"
        );

        let rows: Vec<VideoRow> = sqlx::query_as(&sql)
            .bind(channel_id)
            .fetch_all(&self.pool)
            .await
            .context(QuerySnafu)?;

        Ok(rows.into_iter().map(video_from_row).collect())
    }

    /// Most recent comments on the given videos.
    pub async fn comments_of(&self, video_ids: &[String], limit: u32) -> Result<Vec<Comment>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT comment_id, video_id, comment_text, comment_author, comment_published_date \
             FROM comment WHERE video_id IN ({}) ORDER BY comment_published_date DESC LIMIT ?",
            placeholders(video_ids.len())
        );

        let mut query = sqlx::query_as::<_, CommentRow>(&sql);
        for id in video_ids {
            query = query.bind(id.as_str());
        }

        let rows = query
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context(QuerySnafu)?;

        Ok(rows
            .into_iter()
            .map(|(id, video, text, author, published)| {
                Comment::new(id, video, text, author, published)
            })
            .collect())
    }

    /// Run a query whose `{ids}` marker is expanded into one placeholder per channel id. `leading`
    /// values are bound before the ids.
    async fn fetch_scoped<T>(&self, sql: &str, leading: &[String], ids: &[String]) -> Result<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let sql = sql.replace("{ids}", &placeholders(ids.len()));

        let mut query = sqlx::query_as::<_, T>(&sql);
        for value in leading.iter().chain(ids) {
            query = query.bind(value.as_str());
        }

        query.fetch_all(&self.pool).await.context(QuerySnafu)
    }
}
