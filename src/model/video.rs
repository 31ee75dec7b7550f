use chrono::Datelike as _;
use derive_new::new;
use serde::{Deserialize, Serialize};

use super::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Video {
    pub video_id: String,
    pub channel_id: String,
    pub video_name: String,
    pub video_description: String,
    pub published_date: Timestamp,
    pub view_count: i64,
    pub like_count: i64,
    pub dislike_count: i64,
    #[serde(default)]
    pub favorite_count: Option<i64>,
    #[serde(default)]
    pub comment_count: Option<i64>,
    /// ISO-8601 duration as delivered by the API, e.g. `PT4M13S`.
    pub duration: String,
    #[serde(default)]
    pub duration_seconds: i64,
    #[serde(default)]
    pub caption_status: bool,
}

crate::collection!("video": Video = video_id);

impl Video {
    /// Calendar month of publication, `1..=12`.
    pub fn month(&self) -> u32 {
        self.published_date.month()
    }
}
