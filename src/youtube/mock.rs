//! A local stand-in for the Data API v3, serving canned resources over real HTTP.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use url::Url;

use super::YouTubeConfig;

pub(crate) const API_KEY: &str = "test-key";

#[derive(Debug, Clone)]
pub(crate) struct Fixture {
    channels: Vec<Value>,
    playlists: HashMap<String, Vec<Value>>,
    videos: HashMap<String, Value>,
    comments: HashMap<String, Vec<Value>>,
    failing_comments: HashSet<String>,
    page_size: usize,
}

fn uploads_of(channel_id: &str) -> String {
    format!("UU{}", channel_id.trim_start_matches("UC"))
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            playlists: HashMap::new(),
            videos: HashMap::new(),
            comments: HashMap::new(),
            failing_comments: HashSet::new(),
            page_size: 2,
        }
    }

    pub fn channel(mut self, channel_id: &str, name: &str) -> Self {
        self.playlists.entry(uploads_of(channel_id)).or_default();
        self.channels.push(json!({
            "id": channel_id,
            "snippet": { "title": name, "description": format!("{name} channel") },
            "contentDetails": { "relatedPlaylists": { "uploads": uploads_of(channel_id) } },
            "statistics": { "viewCount": "150", "subscriberCount": "1234567", "videoCount": "2" },
            "topicDetails": { "topicCategories": ["https://en.wikipedia.org/wiki/Technology"] },
            "status": { "privacyStatus": "public" }
        }));
        self
    }

    /// Add a video to the channel's uploads playlist, published in March 2022.
    pub fn video(
        self, channel_id: &str, video_id: &str, title: &str, views: i64, likes: i64,
    ) -> Self {
        self.video_json(
            channel_id,
            json!({
                "id": video_id,
                "snippet": {
                    "channelId": channel_id,
                    "title": title,
                    "description": "",
                    "publishedAt": "2022-03-01T10:00:00Z"
                },
                "contentDetails": { "duration": "PT2M30S", "caption": "false" },
                "statistics": {
                    "viewCount": views.to_string(),
                    "likeCount": likes.to_string(),
                    "favoriteCount": "0",
                    "commentCount": "2"
                }
            }),
        )
    }

    /// Add a video with a hand-written resource body.
    pub fn video_json(mut self, channel_id: &str, item: Value) -> Self {
        let video_id = item["id"].as_str().unwrap_or_default().to_string();
        let title = item["snippet"]["title"].clone();
        let playlist_id = uploads_of(channel_id);

        let entries = self.playlists.entry(playlist_id.clone()).or_default();
        entries.push(json!({
            "id": format!("{playlist_id}-{video_id}"),
            "snippet": {
                "playlistId": playlist_id,
                "channelId": channel_id,
                "title": title,
                "resourceId": { "kind": "youtube#video", "videoId": video_id }
            }
        }));

        self.videos.insert(video_id, item);
        self
    }

    pub fn comment(mut self, video_id: &str, comment_id: &str, text: &str) -> Self {
        self.comments.entry(video_id.to_string()).or_default().push(json!({
            "id": comment_id,
            "snippet": {
                "topLevelComment": {
                    "snippet": {
                        "textDisplay": text,
                        "authorDisplayName": "viewer",
                        "publishedAt": "2022-03-02T08:00:00Z"
                    }
                }
            }
        }));
        self
    }

    pub fn failing_comments(mut self, video_id: &str) -> Self {
        self.failing_comments.insert(video_id.to_string());
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct Calls {
    channels: AtomicUsize,
    playlist_pages: AtomicUsize,
    video_batches: Mutex<Vec<usize>>,
}

impl Calls {
    pub fn channels(&self) -> usize {
        self.channels.load(Ordering::SeqCst)
    }

    pub fn playlist_pages(&self) -> usize {
        self.playlist_pages.load(Ordering::SeqCst)
    }

    pub fn video_batches(&self) -> Vec<usize> {
        self.video_batches.lock().unwrap().clone()
    }
}

pub(crate) struct MockYouTube {
    pub url: Url,
    pub calls: Arc<Calls>,
}

impl MockYouTube {
    pub fn config(&self) -> YouTubeConfig {
        YouTubeConfig {
            api_key: API_KEY.to_string(),
            api_url: self.url.clone(),
            concurrency: 4,
            timeout_secs: 5,
            ..YouTubeConfig::default()
        }
    }
}

/// A config whose API url points at a port nothing listens on.
pub(crate) async fn unreachable(api_key: &str) -> YouTubeConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    YouTubeConfig {
        api_key: api_key.to_string(),
        api_url: Url::parse(&format!("http://{address}")).unwrap(),
        timeout_secs: 2,
        ..YouTubeConfig::default()
    }
}

type Params = Query<HashMap<String, String>>;

#[derive(Clone)]
struct Mock {
    fixture: Arc<Fixture>,
    calls: Arc<Calls>,
}

pub(crate) async fn serve(fixture: Fixture) -> MockYouTube {
    let calls = Arc::new(Calls::default());
    let state = Mock {
        fixture: Arc::new(fixture),
        calls: calls.clone(),
    };

    let router = Router::new()
        .route("/channels", get(channels))
        .route("/playlistItems", get(playlist_items))
        .route("/videos", get(videos))
        .route("/commentThreads", get(comment_threads))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    MockYouTube {
        url: Url::parse(&format!("http://{address}")).unwrap(),
        calls,
    }
}

fn api_error(status: StatusCode, message: &str) -> Response {
    let body = json!({ "error": { "code": status.as_u16(), "message": message } });
    (status, Json(body)).into_response()
}

fn requested_ids(params: &HashMap<String, String>) -> Vec<String> {
    params
        .get("id")
        .map(|ids| ids.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-goog-api-key").and_then(|key| key.to_str().ok()) == Some(API_KEY)
}

/// What the API sends as `textDisplay` unless plain text is asked for.
fn as_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&#39;")
}

async fn channels(
    State(mock): State<Mock>, headers: HeaderMap, Query(params): Params,
) -> Response {
    if !authorized(&headers) {
        return api_error(StatusCode::FORBIDDEN, "API key not valid");
    }
    mock.calls.channels.fetch_add(1, Ordering::SeqCst);

    let ids = requested_ids(&params);
    let items: Vec<&Value> = mock
        .fixture
        .channels
        .iter()
        .filter(|c| ids.iter().any(|id| c["id"] == id.as_str()))
        .collect();

    Json(json!({ "items": items })).into_response()
}

async fn playlist_items(
    State(mock): State<Mock>, headers: HeaderMap, Query(params): Params,
) -> Response {
    if !authorized(&headers) {
        return api_error(StatusCode::FORBIDDEN, "API key not valid");
    }
    mock.calls.playlist_pages.fetch_add(1, Ordering::SeqCst);

    let playlist = params.get("playlistId");
    let Some(entries) = playlist.and_then(|id| mock.fixture.playlists.get(id)) else {
        return api_error(StatusCode::NOT_FOUND, "playlist not found");
    };

    let start: usize = params.get("pageToken").and_then(|t| t.parse().ok()).unwrap_or(0);
    let end = (start + mock.fixture.page_size).min(entries.len());
    let items = &entries[start.min(end)..end];

    let mut body = json!({ "items": items });
    if end < entries.len() {
        body["nextPageToken"] = json!(end.to_string());
    }

    Json(body).into_response()
}

async fn videos(
    State(mock): State<Mock>, headers: HeaderMap, Query(params): Params,
) -> Response {
    if !authorized(&headers) {
        return api_error(StatusCode::FORBIDDEN, "API key not valid");
    }

    let ids = requested_ids(&params);
    if ids.len() > super::MAX_BATCH {
        return api_error(StatusCode::BAD_REQUEST, "too many ids");
    }
    mock.calls.video_batches.lock().unwrap().push(ids.len());

    let items: Vec<&Value> = ids.iter().filter_map(|id| mock.fixture.videos.get(id)).collect();
    Json(json!({ "items": items })).into_response()
}

async fn comment_threads(
    State(mock): State<Mock>, headers: HeaderMap, Query(params): Params,
) -> Response {
    if !authorized(&headers) {
        return api_error(StatusCode::FORBIDDEN, "API key not valid");
    }

    let video_id = params.get("videoId").cloned().unwrap_or_default();
    if mock.fixture.failing_comments.contains(&video_id) {
        return api_error(
            StatusCode::FORBIDDEN,
            "The video identified by the videoId parameter has disabled comments.",
        );
    }

    let mut items = mock.fixture.comments.get(&video_id).cloned().unwrap_or_default();
    if params.get("textFormat").map(String::as_str) != Some("plainText") {
        for item in &mut items {
            let snippet = &mut item["snippet"]["topLevelComment"]["snippet"];
            let html = as_html(snippet["textDisplay"].as_str().unwrap_or_default());
            snippet["textDisplay"] = json!(html);
        }
    }

    Json(json!({ "items": items })).into_response()
}
