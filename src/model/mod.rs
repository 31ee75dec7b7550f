use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

pub use channel::*;
pub use comment::*;
pub use duration::*;
pub use numerize::*;
pub use playlist::*;
pub use video::*;

mod channel;
mod comment;
mod duration;
mod numerize;
mod playlist;
mod video;

pub type Timestamp = DateTime<Utc>;

/// A record kind that lives in both stores and is identified by a natural key.
pub trait Collection: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the document store collection, which is also the warehouse table.
    const NAME: &'static str;

    /// Name of the field holding the natural key.
    const KEY: &'static str;

    /// Returns the natural key of the record.
    fn key(&self) -> &str;
}

/// Everything a single ingestion run produced, one list per record kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Harvest {
    pub channels: Vec<Channel>,
    pub videos: Vec<Video>,
    pub comments: Vec<Comment>,
    pub playlist: Vec<PlaylistEntry>,
}

impl Harvest {
    pub fn channel_ids(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.channel_id.clone()).collect()
    }

    pub fn video_ids(&self) -> Vec<String> {
        self.videos.iter().map(|v| v.video_id.clone()).collect()
    }
}
