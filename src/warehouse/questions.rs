use std::time::Duration;

use serde::Serialize;

use super::{Result, Warehouse};

/// The ten canned questions the dashboard can answer about the channels in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Question {
    VideosWithChannels,
    ChannelsByVideoCount,
    MostViewed,
    CommentsPerVideo,
    MostLiked,
    LikesAndDislikes,
    TotalViewsPerChannel,
    PublishedInYear,
    AverageDuration,
    MostCommented,
}

impl Question {
    pub const ALL: [Question; 10] = [
        Question::VideosWithChannels,
        Question::ChannelsByVideoCount,
        Question::MostViewed,
        Question::CommentsPerVideo,
        Question::MostLiked,
        Question::LikesAndDislikes,
        Question::TotalViewsPerChannel,
        Question::PublishedInYear,
        Question::AverageDuration,
        Question::MostCommented,
    ];

    /// 1-based position in [Question::ALL].
    pub fn number(self) -> u8 {
        Self::ALL
            .iter()
            .position(|q| *q == self)
            .map_or(0, |i| i as u8 + 1)
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Question::VideosWithChannels => {
                "What are the names of all the videos and their corresponding channels?"
            }
            Question::ChannelsByVideoCount => {
                "Which channels have the most number of videos, and how many videos do they have?"
            }
            Question::MostViewed => {
                "What are the top 10 most viewed videos and their respective channels?"
            }
            Question::CommentsPerVideo => {
                "How many comments were made on each video, and what are their corresponding video names?"
            }
            Question::MostLiked => {
                "Which videos have the highest number of likes, and what are their corresponding channel names?"
            }
            Question::LikesAndDislikes => {
                "What is the total number of likes and dislikes for each video, and what are their corresponding video names?"
            }
            Question::TotalViewsPerChannel => {
                "What is the total number of views for each channel, and what are their corresponding channel names?"
            }
            Question::PublishedInYear => {
                "What are the names of all the channels that have published videos in a given year?"
            }
            Question::AverageDuration => {
                "What is the average duration of all videos in each channel, and what are their corresponding channel names?"
            }
            Question::MostCommented => {
                "Which video has the highest number of comments, and what is its channel name?"
            }
        }
    }
}

/// An answer rendered as a plain table of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl AnswerTable {
    fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    fn with_rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        self.rows = rows.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn count_or_blank(count: Option<i64>) -> String {
    count.map(|c| c.to_string()).unwrap_or_default()
}

impl Warehouse {
    /// Answer `question` over the given channels. `year` is only used by
    /// [Question::PublishedInYear].
    #[tracing::instrument(skip(self, channel_ids), fields(channels = channel_ids.len()))]
    pub async fn answer(
        &self, question: Question, channel_ids: &[String], year: i32,
    ) -> Result<AnswerTable> {
        let none: &[String] = &[];

        let table = match question {
            Question::VideosWithChannels => {
                let rows: Vec<(String, String)> = self
                    .fetch_scoped(
                        "SELECT v.video_name, c.channel_name FROM video v \
                         JOIN channel c ON v.channel_id = c.channel_id \
                         WHERE c.channel_id IN ({ids}) \
                         ORDER BY c.channel_name, v.published_date DESC",
                        none,
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Video Name", "Channel Name"])
                    .with_rows(rows.into_iter().map(|(video, channel)| vec![video, channel]))
            }
            Question::ChannelsByVideoCount => {
                let rows: Vec<(String, i64)> = self
                    .fetch_scoped(
                        "SELECT c.channel_name, COUNT(*) AS videos FROM video v \
                         JOIN channel c ON v.channel_id = c.channel_id \
                         WHERE c.channel_id IN ({ids}) \
                         GROUP BY c.channel_id, c.channel_name \
                         ORDER BY videos DESC, c.channel_name",
                        none,
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Channel Name", "Number Of Videos"]).with_rows(
                    rows.into_iter()
                        .map(|(channel, videos)| vec![channel, videos.to_string()]),
                )
            }
            Question::MostViewed => {
                let rows: Vec<(String, i64, String)> = self
                    .fetch_scoped(
                        "SELECT v.video_name, v.view_count, c.channel_name FROM video v \
                         JOIN channel c ON v.channel_id = c.channel_id \
                         WHERE c.channel_id IN ({ids}) \
                         ORDER BY v.view_count DESC LIMIT 10",
                        none,
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Video Title", "Views", "Channel Name"]).with_rows(
                    rows.into_iter()
                        .map(|(video, views, channel)| vec![video, views.to_string(), channel]),
                )
            }
            Question::CommentsPerVideo => {
                let rows: Vec<(String, Option<i64>)> = self
                    .fetch_scoped(
                        "SELECT video_name, comment_count FROM video \
                         WHERE channel_id IN ({ids}) ORDER BY video_name",
                        none,
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Video Title", "Comment Count"]).with_rows(
                    rows.into_iter()
                        .map(|(video, comments)| vec![video, count_or_blank(comments)]),
                )
            }
            Question::MostLiked => {
                let rows: Vec<(String, i64, String)> = self
                    .fetch_scoped(
                        "SELECT v.video_name, v.like_count, c.channel_name FROM video v \
                         JOIN channel c ON v.channel_id = c.channel_id \
                         WHERE c.channel_id IN ({ids}) \
                         ORDER BY v.like_count DESC LIMIT 10",
                        none,
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Video Title", "Likes", "Channel Name"]).with_rows(
                    rows.into_iter()
                        .map(|(video, likes, channel)| vec![video, likes.to_string(), channel]),
                )
            }
            Question::LikesAndDislikes => {
                let rows: Vec<(String, i64, i64)> = self
                    .fetch_scoped(
                        "SELECT video_name, like_count, dislike_count FROM video \
                         WHERE channel_id IN ({ids}) ORDER BY video_name",
                        none,
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Video Title", "Likes", "Dislikes"]).with_rows(
                    rows.into_iter().map(|(video, likes, dislikes)| {
                        vec![video, likes.to_string(), dislikes.to_string()]
                    }),
                )
            }
            Question::TotalViewsPerChannel => {
                let rows: Vec<(String, i64)> = self
                    .fetch_scoped(
                        "SELECT c.channel_name, SUM(v.view_count) AS views FROM channel c \
                         JOIN video v ON c.channel_id = v.channel_id \
                         WHERE c.channel_id IN ({ids}) \
                         GROUP BY c.channel_id, c.channel_name \
                         ORDER BY views DESC",
                        none,
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Channel Name", "Total Views"]).with_rows(
                    rows.into_iter()
                        .map(|(channel, views)| vec![channel, views.to_string()]),
                )
            }
            Question::PublishedInYear => {
                let rows: Vec<(String,)> = self
                    .fetch_scoped(
                        "SELECT DISTINCT c.channel_name FROM channel c \
                         JOIN video v ON c.channel_id = v.channel_id \
                         WHERE substr(v.published_date, 1, 4) = ? \
                         AND c.channel_id IN ({ids}) \
                         ORDER BY c.channel_name",
                        &[format!("{year:04}")],
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Channel Name"])
                    .with_rows(rows.into_iter().map(|(channel,)| vec![channel]))
            }
            Question::AverageDuration => {
                let rows: Vec<(String, f64)> = self
                    .fetch_scoped(
                        "SELECT c.channel_name, AVG(v.duration_seconds) FROM channel c \
                         JOIN video v ON c.channel_id = v.channel_id \
                         WHERE c.channel_id IN ({ids}) \
                         GROUP BY c.channel_id, c.channel_name \
                         ORDER BY c.channel_name",
                        none,
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Channel Name", "Average Duration"]).with_rows(
                    rows.into_iter().map(|(channel, seconds)| {
                        let average = Duration::from_secs(seconds.max(0.0).round() as u64);
                        vec![channel, humantime::format_duration(average).to_string()]
                    }),
                )
            }
            Question::MostCommented => {
                let rows: Vec<(String, String, Option<i64>)> = self
                    .fetch_scoped(
                        "SELECT v.video_name, c.channel_name, v.comment_count FROM video v \
                         JOIN channel c ON v.channel_id = c.channel_id \
                         WHERE c.channel_id IN ({ids}) \
                         ORDER BY v.comment_count DESC LIMIT 1",
                        none,
                        channel_ids,
                    )
                    .await?;

                AnswerTable::new(&["Video Title", "Channel Name", "Comment Count"]).with_rows(
                    rows.into_iter().map(|(video, channel, comments)| {
                        vec![video, channel, count_or_blank(comments)]
                    }),
                )
            }
        };

        Ok(table)
    }
}
