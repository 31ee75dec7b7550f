//! View models for the single dashboard page. Everything here reads the warehouse only.

use chrono::{Datelike as _, Utc};
use serde::{Deserialize, Serialize};

use crate::harvest::{IngestReport, MAX_CHANNELS};
use crate::model::{numerize, Channel, Comment};
use crate::Located as _;
use crate::warehouse::{AnswerTable, Question, Result, Warehouse};

pub use chart::*;

mod chart;

/// How many of the newest comments the channel view lists.
pub const RECENT_COMMENTS: u32 = 20;

/// The year asked about by default when no other year is picked.
pub const DEFAULT_YEAR: i32 = 2022;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub label: &'static str,
    pub value: String,
}

/// Everything shown about the selected channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelView {
    pub channel: Channel,
    pub headlines: Vec<Headline>,
    pub charts: Vec<BarChart>,
    pub comments: Vec<Comment>,
}

impl ChannelView {
    pub async fn load(warehouse: &Warehouse, channel_id: &str) -> Result<Self> {
        let channel = warehouse.channel(channel_id).await?;
        let videos = warehouse.videos_of(channel_id).await?;

        let video_ids: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
        let comments = warehouse.comments_of(&video_ids, RECENT_COMMENTS).await?;

        let headlines = vec![
            Headline {
                label: "Subscribers",
                value: numerize(channel.subscription_count),
            },
            Headline {
                label: "Total views",
                value: numerize(channel.channel_views),
            },
            Headline {
                label: "Total videos",
                value: numerize(channel.total_videos),
            },
        ];

        let charts = vec![
            BarChart::videos_per_month(&videos),
            BarChart::most_liked(&videos),
            BarChart::most_viewed(&videos),
        ];

        Ok(Self {
            channel,
            headlines,
            charts,
            comments,
        })
    }
}

/// What the user asked the page to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Number of channel id inputs, 1 to 10.
    pub count: Option<usize>,
    #[serde(rename = "channel")]
    pub channels: Vec<String>,
    pub selected: Option<String>,
    /// Select a channel by its display name instead of its id.
    pub name: Option<String>,
    pub question: Option<u8>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelOption {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionOption {
    pub number: u8,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// One entry per channel id input, blank when nothing was entered.
    pub inputs: Vec<String>,
    pub channels: Vec<ChannelOption>,
    pub selected: Option<String>,
    pub view: Option<ChannelView>,
    pub questions: Vec<QuestionOption>,
    pub question: Option<u8>,
    pub question_title: Option<&'static str>,
    pub year: i32,
    pub answer: Option<AnswerTable>,
    pub report: Option<IngestReport>,
    pub error: Option<String>,
}

impl Page {
    /// Build the page. Warehouse failures end up in [Page::error] so the page still renders.
    pub async fn build(
        warehouse: &Warehouse, request: PageRequest, report: Option<IngestReport>,
        error: Option<String>,
    ) -> Self {
        let year = request.year.unwrap_or(DEFAULT_YEAR).clamp(1970, Utc::now().year() + 1);
        let question = request.question.and_then(Question::from_number);

        let mut page = Page {
            inputs: inputs(&request),
            channels: Vec::new(),
            selected: None,
            view: None,
            questions: Question::ALL
                .iter()
                .map(|q| QuestionOption {
                    number: q.number(),
                    title: q.title(),
                })
                .collect(),
            question: question.map(Question::number),
            question_title: question.map(Question::title),
            year,
            answer: None,
            report,
            error,
        };

        if let Err(err) = page.load(warehouse, &request, question).await {
            tracing::error!(
                error = ?err,
                location = %err.location(),
                "failed to load the dashboard: {}",
                err
            );
            page.error.get_or_insert_with(|| err.to_string());
        }

        page
    }

    async fn load(
        &mut self, warehouse: &Warehouse, request: &PageRequest, question: Option<Question>,
    ) -> Result<()> {
        let requested: Vec<String> = match &self.report {
            Some(report) => report.channel_ids.clone(),
            None => request
                .channels
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        };

        let scope = if requested.is_empty() {
            warehouse.channel_ids().await?
        } else {
            requested
        };

        self.channels = warehouse
            .channel_names(&scope)
            .await?
            .into_iter()
            .map(|(id, name)| ChannelOption { id, name })
            .collect();

        let named = match request.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Some(warehouse.channel_by_name(name).await?),
            None => None,
        };

        let selected = match named {
            Some(channel) => {
                if !self.channels.iter().any(|c| c.id == channel.channel_id) {
                    self.channels.push(ChannelOption {
                        id: channel.channel_id.clone(),
                        name: channel.channel_name,
                    });
                }
                Some(channel.channel_id)
            }
            None => request
                .selected
                .as_deref()
                .filter(|id| self.channels.iter().any(|c| c.id == *id))
                .or_else(|| self.channels.first().map(|c| c.id.as_str()))
                .map(str::to_string),
        };

        if let Some(id) = &selected {
            self.view = Some(ChannelView::load(warehouse, id).await?);
        }
        self.selected = selected;

        if let Some(question) = question {
            let ids: Vec<String> = self.channels.iter().map(|c| c.id.clone()).collect();
            self.answer = Some(warehouse.answer(question, &ids, self.year).await?);
        }

        Ok(())
    }
}

fn inputs(request: &PageRequest) -> Vec<String> {
    let count = request
        .count
        .unwrap_or(request.channels.len())
        .clamp(1, MAX_CHANNELS);

    let mut inputs: Vec<String> = request.channels.iter().take(count).cloned().collect();
    inputs.resize(count, String::new());
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Harvest;
    use crate::warehouse::tests::{channel, memory_warehouse, video};

    async fn warehouse() -> Warehouse {
        let warehouse = memory_warehouse().await;
        warehouse
            .replace(&Harvest {
                channels: vec![channel("UC_b", "Bolt"), channel("UC_a", "Acme")],
                videos: vec![video("a1", "UC_a", 100, 3), video("a2", "UC_a", 50, 8)],
                ..Harvest::default()
            })
            .await
            .unwrap();
        warehouse
    }

    #[test]
    fn inputs_follow_the_requested_count() {
        let request = PageRequest {
            count: Some(3),
            channels: vec!["UC_a".to_string()],
            ..PageRequest::default()
        };
        assert_eq!(inputs(&request), vec!["UC_a".to_string(), String::new(), String::new()]);

        let request = PageRequest {
            count: Some(50),
            ..PageRequest::default()
        };
        assert_eq!(inputs(&request).len(), MAX_CHANNELS);

        assert_eq!(inputs(&PageRequest::default()), vec![String::new()]);
    }

    #[tokio::test]
    async fn headline_statistics_are_humanized() {
        let view = ChannelView::load(&warehouse().await, "UC_a").await.unwrap();

        let values: Vec<_> = view.headlines.iter().map(|h| h.value.as_str()).collect();
        assert_eq!(values, vec!["1.2M", "150", "2"]);
        assert_eq!(view.charts.len(), 3);
        assert_eq!(view.charts[0].bars[0].label, "Mar");
        assert_eq!(view.charts[0].bars[0].value, 2);
    }

    #[tokio::test]
    async fn first_channel_is_selected_by_default() {
        let page = Page::build(&warehouse().await, PageRequest::default(), None, None).await;

        let names: Vec<_> = page.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Bolt"]);
        assert_eq!(page.selected.as_deref(), Some("UC_a"));
        assert!(page.view.is_some());
        assert!(page.answer.is_none());
        assert!(page.error.is_none());
        assert_eq!(page.year, DEFAULT_YEAR);
    }

    #[tokio::test]
    async fn question_is_answered_over_the_listed_channels() {
        let request = PageRequest {
            channels: vec!["UC_a".to_string()],
            question: Some(3),
            ..PageRequest::default()
        };

        let page = Page::build(&warehouse().await, request, None, None).await;

        let answer = page.answer.unwrap();
        assert_eq!(answer.rows.len(), 2);
        assert_eq!(answer.rows[0][1], "100");
        assert_eq!(page.question_title, Some(Question::MostViewed.title()));
    }

    #[tokio::test]
    async fn unknown_selection_falls_back_to_the_first_channel() {
        let request = PageRequest {
            selected: Some("UC_zzz".to_string()),
            ..PageRequest::default()
        };

        let page = Page::build(&warehouse().await, request, None, None).await;
        assert_eq!(page.selected.as_deref(), Some("UC_a"));
    }

    #[tokio::test]
    async fn channel_can_be_picked_by_name() {
        let request = PageRequest {
            channels: vec!["UC_a".to_string()],
            name: Some(" Bolt ".to_string()),
            ..PageRequest::default()
        };

        let page = Page::build(&warehouse().await, request, None, None).await;

        assert!(page.error.is_none());
        assert_eq!(page.selected.as_deref(), Some("UC_b"));
        assert_eq!(page.view.unwrap().channel.channel_name, "Bolt");
        assert!(page.channels.iter().any(|c| c.id == "UC_b"));
    }

    #[tokio::test]
    async fn shared_names_are_reported_on_the_page() {
        let warehouse = memory_warehouse().await;
        warehouse
            .replace(&Harvest {
                channels: vec![channel("UC_a", "Acme"), channel("UC_x", "Acme")],
                ..Harvest::default()
            })
            .await
            .unwrap();
        let request = PageRequest {
            name: Some("Acme".to_string()),
            ..PageRequest::default()
        };

        let page = Page::build(&warehouse, request, None, None).await;

        assert_eq!(page.error.as_deref(), Some("2 channels are named `Acme`"));
        assert!(page.view.is_none());
    }
}
