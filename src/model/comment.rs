use derive_new::new;
use serde::{Deserialize, Serialize};

use super::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Comment {
    pub comment_id: String,
    pub video_id: String,
    #[serde(default)]
    pub comment_text: String,
    #[serde(default)]
    pub comment_author: String,
    #[serde(default)]
    pub comment_published_date: Option<Timestamp>,
}

crate::collection!("comment": Comment = comment_id);
