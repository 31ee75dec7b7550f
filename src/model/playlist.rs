use derive_new::new;
use serde::{Deserialize, Serialize};

/// One item of a channel's uploads playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct PlaylistEntry {
    pub playlist_id: String,
    pub playlist_items_id: String,
    pub channel_id: String,
    pub playlist_name: String,
    /// The video this entry points at.
    pub video_id: String,
}

crate::collection!("playlist": PlaylistEntry = playlist_items_id);
