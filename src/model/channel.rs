use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Channel {
    pub channel_id: String,
    pub channel_name: String,
    /// Topic category URLs, empty when the channel has none.
    #[serde(default)]
    pub channel_type: Vec<String>,
    pub channel_views: i64,
    pub channel_description: String,
    pub channel_status: String,
    pub subscription_count: i64,
    pub total_videos: i64,
    /// The channel's uploads playlist.
    pub playlist_id: String,
}

crate::collection!("channel": Channel = channel_id);

impl Channel {
    /// Topic categories as stored in the warehouse.
    pub fn topics(&self) -> String {
        self.channel_type.join(", ")
    }
}
