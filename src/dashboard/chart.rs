use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Video;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How many bars the "top" charts show.
pub const TOP: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: i64,
    /// Length of the bar relative to the largest one, 0 to 100.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub unit: &'static str,
    pub bars: Vec<Bar>,
}

impl BarChart {
    fn new(title: &'static str, unit: &'static str, values: Vec<(String, i64)>) -> Self {
        let max = values.iter().map(|(_, v)| *v).max().unwrap_or(0);

        let bars = values
            .into_iter()
            .map(|(label, value)| {
                let percent = if max > 0 { value.max(0) as f64 * 100.0 / max as f64 } else { 0.0 };
                Bar { label, value, percent }
            })
            .collect();

        Self { title, unit, bars }
    }

    /// Number of uploads per calendar month, January first. Months without uploads are left out.
    pub fn videos_per_month(videos: &[Video]) -> Self {
        let mut months: BTreeMap<u32, i64> = BTreeMap::new();
        for video in videos {
            *months.entry(video.month()).or_default() += 1;
        }

        let values = months
            .into_iter()
            .map(|(month, count)| (MONTHS[(month - 1) as usize].to_string(), count))
            .collect();

        Self::new("Videos uploaded per month", "videos", values)
    }

    pub fn most_viewed(videos: &[Video]) -> Self {
        Self::new("Top 10 most watched videos", "views", top_by(videos, |v| v.view_count))
    }

    pub fn most_liked(videos: &[Video]) -> Self {
        Self::new("Top 10 most liked videos", "likes", top_by(videos, |v| v.like_count))
    }
}

/// The [TOP] videos with the highest `key`, highest first. Ties keep their input order.
fn top_by(videos: &[Video], key: impl Fn(&Video) -> i64) -> Vec<(String, i64)> {
    let mut ranked: Vec<(String, i64)> =
        videos.iter().map(|v| (v.video_name.clone(), key(v))).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP);
    ranked
}
