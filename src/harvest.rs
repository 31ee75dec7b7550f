//! One ingestion run: fetch everything about a set of channels, store it, rebuild the warehouse.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use snafu::{ensure, Location, Snafu};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::database::{DocumentStore, DocumentStoreError};
use crate::Located as _;
use crate::model::{Harvest, PlaylistEntry};
use crate::warehouse::{self, Scope, Warehouse, WarehouseError};
use crate::youtube::{YouTube, YouTubeError};

/// The most channels a single run accepts.
pub const MAX_CHANNELS: usize = 10;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum HarvestError {
    #[snafu(display("enter at least one channel id"))]
    NoChannels {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("at most {MAX_CHANNELS} channels can be fetched at once, got {count}"))]
    TooManyChannels {
        count: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("none of the channels could be found: {}", ids.join(", ")))]
    ChannelsNotFound {
        ids: Vec<String>,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(transparent)]
    YouTube { source: YouTubeError },

    #[snafu(transparent)]
    DocumentStore { source: DocumentStoreError },

    #[snafu(transparent)]
    Warehouse { source: WarehouseError },
}

impl crate::Located for HarvestError {
    fn location(&self) -> Location {
        match self {
            HarvestError::NoChannels { location }
            | HarvestError::TooManyChannels { location, .. }
            | HarvestError::ChannelsNotFound { location, .. } => *location,
            HarvestError::YouTube { source } => source.location(),
            HarvestError::DocumentStore { source } => source.location(),
            HarvestError::Warehouse { source } => source.location(),
        }
    }
}

pub type Result<T, E = HarvestError> = std::result::Result<T, E>;

/// Summary of a finished run, shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Ids of the channels that were found, in request order.
    pub channel_ids: Vec<String>,
    /// Requested ids the API did not return.
    pub missing: Vec<String>,
    pub videos: usize,
    pub comments: usize,
    pub playlist_entries: usize,
    /// Videos whose owner was not among the requested channels.
    pub dropped_videos: usize,
}

/// Trim, drop blanks and repeated ids, then check the count.
pub fn parse_channel_ids<S: AsRef<str>>(input: &[S]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = input
        .iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect();

    ensure!(!ids.is_empty(), NoChannelsSnafu);
    ensure!(ids.len() <= MAX_CHANNELS, TooManyChannelsSnafu { count: ids.len() });

    Ok(ids)
}

/// Runs ingestion. Clones share the same lock, so two runs never interleave their writes.
#[derive(Debug, Clone)]
pub struct Harvester {
    youtube: YouTube,
    store: DocumentStore,
    warehouse: Warehouse,
    scope: Scope,
    lock: Arc<Mutex<()>>,
}

impl Harvester {
    pub fn new(youtube: YouTube, store: DocumentStore, warehouse: Warehouse, scope: Scope) -> Self {
        Self {
            youtube,
            store,
            warehouse,
            scope,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    #[instrument(skip(self, input))]
    pub async fn run<S: AsRef<str>>(&self, input: &[S]) -> Result<IngestReport> {
        let ids = parse_channel_ids(input)?;
        let _running = self.lock.lock().await;
        tracing::info!(channels = ?ids, "start ingestion");

        let (harvest, dropped_videos) = self.fetch(&ids).await?;
        let found = harvest.channel_ids();
        let missing: Vec<String> = ids.iter().filter(|id| !found.contains(id)).cloned().collect();

        self.store.save(&harvest).await?;

        let snapshot = warehouse::snapshot(&self.store, self.scope, &found).await?;
        self.warehouse.replace(&snapshot).await?;

        let report = IngestReport {
            channel_ids: found,
            missing,
            videos: harvest.videos.len(),
            comments: harvest.comments.len(),
            playlist_entries: harvest.playlist.len(),
            dropped_videos,
        };

        tracing::info!(report = ?report, "finished ingestion");
        Ok(report)
    }

    /// Fetch the run's records. Also returns how many videos were dropped for belonging to a
    /// channel outside the run.
    async fn fetch(&self, ids: &[String]) -> Result<(Harvest, usize)> {
        let channels = self.youtube.channels(ids).await?;
        if channels.is_empty() {
            return ChannelsNotFoundSnafu { ids: ids.to_vec() }.fail();
        }

        let mut playlist: Vec<PlaylistEntry> = Vec::new();
        for channel in &channels {
            let entries = self.youtube.playlist_entries(&channel.playlist_id).await?;
            playlist.extend(entries.into_iter().map(|mut entry| {
                entry.channel_id = channel.channel_id.clone();
                entry
            }));
        }

        let mut seen = HashSet::new();
        let video_ids: Vec<String> = playlist
            .iter()
            .filter(|entry| seen.insert(entry.video_id.as_str()))
            .map(|entry| entry.video_id.clone())
            .collect();

        let owners: HashSet<&str> = channels.iter().map(|c| c.channel_id.as_str()).collect();
        let (videos, foreign): (Vec<_>, Vec<_>) = self
            .youtube
            .videos(&video_ids)
            .await?
            .into_iter()
            .partition(|video| owners.contains(video.channel_id.as_str()));

        for video in &foreign {
            tracing::warn!(
                video_id = %video.video_id,
                channel_id = %video.channel_id,
                "dropping a video of a channel outside this run"
            );
        }

        let fetched: Vec<String> = videos.iter().map(|v| v.video_id.clone()).collect();
        let comments = self.youtube.comments_for(&fetched).await;

        let harvest = Harvest {
            channels,
            videos,
            comments,
            playlist,
        };

        Ok((harvest, foreign.len()))
    }
}
