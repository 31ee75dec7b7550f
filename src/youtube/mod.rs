use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize};
use snafu::ResultExt as _;
use tracing::instrument;
use url::Url;

use crate::model::{Channel, Comment, PlaylistEntry, Video};
use crate::Located as _;

pub use batch::*;
pub use error::*;

use response::*;

mod batch;
mod error;
mod response;

#[cfg(test)]
pub(crate) mod mock;

/// The most ids a single list call accepts.
pub const MAX_BATCH: usize = 50;

/// The most comment threads a single `commentThreads.list` page returns.
pub const MAX_COMMENTS: u32 = 100;

const CHANNEL_PARTS: &str = "snippet,contentDetails,statistics,topicDetails,status";
const VIDEO_PARTS: &str = "snippet,contentDetails,statistics,status";

/// Header carrying the API key. The key is never part of a request url.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub api_url: Url,
    /// Upper bound of concurrent requests while fanning out.
    pub concurrency: usize,
    pub comments_per_video: u32,
    pub timeout_secs: u64,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: Url::parse("https://www.googleapis.com/youtube/v3")
                .expect("default API url is valid"),
            concurrency: 8,
            comments_per_video: MAX_COMMENTS,
            timeout_secs: 30,
        }
    }
}

/// Client for the read-only parts of the YouTube Data API v3.
///
/// Cloning is cheap, all clones share the same connection pool.
#[derive(Clone)]
pub struct YouTube {
    http: reqwest::Client,
    base: String,
    api_key: String,
    concurrency: usize,
    comments_per_video: u32,
}

impl std::fmt::Debug for YouTube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTube")
            .field("base", &self.base)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl YouTube {
    pub fn connect(config: &YouTubeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context(BuildClientSnafu)?;

        Ok(Self {
            http,
            base: config.api_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            concurrency: config.concurrency.max(1),
            comments_per_video: config.comments_per_video.clamp(1, MAX_COMMENTS),
        })
    }

    /// Fetch the given channels with a single call. Ids the API does not know are simply absent
    /// from the result.
    #[instrument(skip(self))]
    pub async fn channels(&self, ids: &[String]) -> Result<Vec<Channel>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let page: Page<ChannelItem> = self
            .get("channels", &[("part", CHANNEL_PARTS), ("id", &joined), ("maxResults", "50")])
            .await?;

        let channels: Vec<Channel> =
            page.items.into_iter().map(ChannelItem::into_channel).collect();
        tracing::info!(requested = ids.len(), received = channels.len(), "fetched channels");

        Ok(channels)
    }

    /// Walk every page of a playlist.
    #[instrument(skip(self))]
    pub async fn playlist_entries(&self, playlist_id: &str) -> Result<Vec<PlaylistEntry>> {
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page: Page<PlaylistItem> = {
                let mut query =
                    vec![("part", "snippet"), ("maxResults", "50"), ("playlistId", playlist_id)];
                if let Some(token) = page_token.as_deref() {
                    query.push(("pageToken", token));
                }

                self.get("playlistItems", &query).await?
            };
            entries.extend(page.items.into_iter().map(PlaylistItem::into_entry));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::info!(entries = entries.len(), "fetched playlist `{}`", playlist_id);
        Ok(entries)
    }

    /// Fetch video details in batches of [MAX_BATCH], concurrently.
    #[instrument(skip(self, ids), fields(ids = ids.len()))]
    pub async fn videos(&self, ids: &[String]) -> Result<Vec<Video>> {
        let videos =
            fetch_batched(ids, MAX_BATCH, self.concurrency, |batch| self.video_batch(batch)).await?;

        tracing::info!(videos = videos.len(), "fetched video details");
        Ok(videos)
    }

    async fn video_batch(&self, ids: Vec<String>) -> Result<Vec<Video>> {
        let joined = ids.join(",");
        let page: Page<VideoItem> = self
            .get("videos", &[("part", VIDEO_PARTS), ("id", &joined), ("maxResults", "50")])
            .await?;

        Ok(page.items.into_iter().map(VideoItem::into_video).collect())
    }

    /// Fetch the first page of top-level comments of a video.
    #[instrument(skip(self))]
    pub async fn comments(&self, video_id: &str) -> Result<Vec<Comment>> {
        let max_results = self.comments_per_video.to_string();
        let page: Page<CommentThread> = self
            .get(
                "commentThreads",
                &[
                    ("part", "snippet"),
                    ("videoId", video_id),
                    ("maxResults", &max_results),
                    ("textFormat", "plainText"),
                ],
            )
            .await?;

        Ok(page.items.into_iter().map(|thread| thread.into_comment(video_id)).collect())
    }

    /// Fetch comments for every video concurrently. A video whose comments cannot be fetched
    /// (disabled comments, quota, network) contributes no comments.
    #[instrument(skip(self, video_ids), fields(videos = video_ids.len()))]
    pub async fn comments_for(&self, video_ids: &[String]) -> Vec<Comment> {
        let ids = video_ids.iter().cloned();
        let comments = fan_out(ids, self.concurrency, |video_id: String| async move {
            match self.comments(&video_id).await {
                Ok(comments) => comments,
                Err(err) => {
                    tracing::warn!(
                        %video_id,
                        location = %err.location(),
                        "failed to fetch comments: {}",
                        err
                    );
                    Vec::new()
                }
            }
        })
        .await;

        tracing::info!(comments = comments.len(), "fetched comments");
        comments
    }

    async fn get<T: DeserializeOwned>(
        &self, resource: &'static str, query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{resource}", self.base);

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context(RequestSnafu { resource })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
            };

            return ApiSnafu {
                resource,
                status,
                message,
            }
            .fail();
        }

        response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context(InvalidBodySnafu { resource })
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{self, Fixture};
    use super::*;

    fn client(mock: &mock::MockYouTube) -> YouTube {
        YouTube::connect(&mock.config()).unwrap()
    }

    #[tokio::test]
    async fn channels_are_fetched_in_one_call() {
        let mock = mock::serve(
            Fixture::new()
                .channel("UC_acme", "Acme")
                .channel("UC_bolt", "Bolt"),
        )
        .await;

        let ids = vec!["UC_acme".to_string(), "UC_bolt".to_string(), "UC_gone".to_string()];
        let channels = client(&mock).channels(&ids).await.unwrap();

        let names: Vec<_> = channels.iter().map(|c| c.channel_name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Bolt"]);
        assert_eq!(mock.calls.channels(), 1);
    }

    #[tokio::test]
    async fn playlist_pages_are_followed_until_exhausted() {
        let mut fixture = Fixture::new().channel("UC_acme", "Acme");
        for i in 0..5 {
            fixture = fixture.video("UC_acme", &format!("vid-{i}"), "clip", 10, 1);
        }
        let mock = mock::serve(fixture).await;

        let entries = client(&mock).playlist_entries("UU_acme").await.unwrap();

        let videos: Vec<_> = entries.iter().map(|e| e.video_id.as_str()).collect();
        assert_eq!(videos, vec!["vid-0", "vid-1", "vid-2", "vid-3", "vid-4"]);
        assert!(entries.iter().all(|e| e.channel_id == "UC_acme"));
        assert_eq!(mock.calls.playlist_pages(), 3);
    }

    #[tokio::test]
    async fn videos_are_fetched_in_batches_of_fifty() {
        let mut fixture = Fixture::new().channel("UC_acme", "Acme");
        let mut ids = Vec::new();
        for i in 0..120 {
            let id = format!("vid-{i:03}");
            fixture = fixture.video("UC_acme", &id, "clip", i, 0);
            ids.push(id);
        }
        let mock = mock::serve(fixture).await;

        let videos = client(&mock).videos(&ids).await.unwrap();

        assert_eq!(videos.len(), 120);
        assert_eq!(videos.iter().map(|v| v.video_id.clone()).collect::<Vec<_>>(), ids);

        let mut batches = mock.calls.video_batches();
        batches.sort_unstable();
        assert_eq!(batches, vec![20, 50, 50]);
    }

    #[tokio::test]
    async fn failing_comment_threads_degrade_to_no_comments() {
        let mock = mock::serve(
            Fixture::new()
                .channel("UC_acme", "Acme")
                .video("UC_acme", "vid-1", "first", 100, 5)
                .video("UC_acme", "vid-2", "second", 50, 3)
                .comment("vid-1", "c-1", "nice")
                .comment("vid-1", "c-2", "great")
                .comment("vid-2", "c-3", "hidden")
                .failing_comments("vid-2"),
        )
        .await;

        let ids = vec!["vid-1".to_string(), "vid-2".to_string()];
        let comments = client(&mock).comments_for(&ids).await;

        let found: Vec<_> = comments.iter().map(|c| c.comment_id.as_str()).collect();
        assert_eq!(found, vec!["c-1", "c-2"]);
        assert!(comments.iter().all(|c| c.video_id == "vid-1"));
    }

    #[tokio::test]
    async fn api_errors_carry_status_and_message() {
        let mock = mock::serve(
            Fixture::new()
                .channel("UC_acme", "Acme")
                .video("UC_acme", "vid-1", "first", 100, 5)
                .failing_comments("vid-1"),
        )
        .await;

        let error = client(&mock).comments("vid-1").await.unwrap_err();

        match error {
            YouTubeError::Api { status, message, .. } => {
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
                assert!(message.contains("disabled comments"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn transport_errors_do_not_reveal_the_key() {
        let config = mock::unreachable("secret-key-4242").await;

        let error = YouTube::connect(&config)
            .unwrap()
            .channels(&["UC_acme".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(error, YouTubeError::Request { .. }));
        let message = error.to_string();
        assert!(!message.contains("secret-key-4242"), "{message}");
        assert!(!message.contains(".rs:"), "{message}");
    }

    #[tokio::test]
    async fn comments_are_requested_as_plain_text() {
        let mock = mock::serve(
            Fixture::new()
                .channel("UC_acme", "Acme")
                .video("UC_acme", "vid-1", "first", 100, 5)
                .comment("vid-1", "c-1", "it's <really> good & fun"),
        )
        .await;

        let comments = client(&mock).comments("vid-1").await.unwrap();

        assert_eq!(comments[0].comment_text, "it's <really> good & fun");
    }
}
