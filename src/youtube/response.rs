//! Wire shapes of the Data API v3 resources we read, and their conversion into records.
//!
//! Counts are delivered as decimal strings, hence the `DisplayFromStr` adapters.

use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};

use crate::model::{iso8601_seconds, Channel, Comment, PlaylistEntry, Timestamp, Video};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
    content_details: ChannelContentDetails,
    #[serde(default)]
    statistics: ChannelStatistics,
    #[serde(default)]
    topic_details: TopicDetails,
    #[serde(default)]
    status: ChannelStatus,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    #[serde_as(as = "Option<DisplayFromStr>")]
    view_count: Option<i64>,
    /// Absent when the channel hides its subscriber count.
    #[serde_as(as = "Option<DisplayFromStr>")]
    subscriber_count: Option<i64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    video_count: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicDetails {
    #[serde(default)]
    topic_categories: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatus {
    #[serde(default)]
    privacy_status: String,
}

impl ChannelItem {
    pub fn into_channel(self) -> Channel {
        Channel {
            channel_id: self.id,
            channel_name: self.snippet.title,
            channel_type: self.topic_details.topic_categories,
            channel_views: self.statistics.view_count.unwrap_or_default(),
            channel_description: self.snippet.description,
            channel_status: self.status.privacy_status,
            subscription_count: self.statistics.subscriber_count.unwrap_or_default(),
            total_videos: self.statistics.video_count.unwrap_or_default(),
            playlist_id: self.content_details.related_playlists.uploads,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    id: String,
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    playlist_id: String,
    channel_id: String,
    #[serde(default)]
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: String,
}

impl PlaylistItem {
    pub fn into_entry(self) -> PlaylistEntry {
        PlaylistEntry {
            playlist_id: self.snippet.playlist_id,
            playlist_items_id: self.id,
            channel_id: self.snippet.channel_id,
            playlist_name: self.snippet.title,
            video_id: self.snippet.resource_id.video_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    content_details: VideoContentDetails,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    channel_id: String,
    title: String,
    #[serde(default)]
    description: String,
    published_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
struct VideoContentDetails {
    #[serde(default)]
    duration: String,
    /// `"true"` or `"false"`.
    #[serde(default)]
    caption: Option<String>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    #[serde_as(as = "Option<DisplayFromStr>")]
    view_count: Option<i64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    like_count: Option<i64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    dislike_count: Option<i64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    favorite_count: Option<i64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    comment_count: Option<i64>,
}

impl VideoItem {
    pub fn into_video(self) -> Video {
        let duration_seconds = iso8601_seconds(&self.content_details.duration).unwrap_or_default();
        let caption_status = self.content_details.caption.as_deref() == Some("true");

        Video {
            video_id: self.id,
            channel_id: self.snippet.channel_id,
            video_name: self.snippet.title,
            video_description: self.snippet.description,
            published_date: self.snippet.published_at,
            view_count: self.statistics.view_count.unwrap_or_default(),
            like_count: self.statistics.like_count.unwrap_or_default(),
            dislike_count: self.statistics.dislike_count.unwrap_or_default(),
            favorite_count: self.statistics.favorite_count,
            comment_count: self.statistics.comment_count,
            duration: self.content_details.duration,
            duration_seconds,
            caption_status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentThread {
    id: String,
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    /// Plain text when requested with `textFormat=plainText`, HTML otherwise.
    #[serde(default)]
    text_display: String,
    /// Only returned when the caller may see the raw text.
    #[serde(default)]
    text_original: Option<String>,
    #[serde(default)]
    author_display_name: String,
    #[serde(default)]
    published_at: Option<Timestamp>,
}

impl CommentThread {
    pub fn into_comment(self, video_id: &str) -> Comment {
        let snippet = self.snippet.top_level_comment.snippet;

        Comment {
            comment_id: self.id,
            video_id: video_id.to_string(),
            comment_text: snippet.text_original.unwrap_or(snippet.text_display),
            comment_author: snippet.author_display_name,
            comment_published_date: snippet.published_at,
        }
    }
}
