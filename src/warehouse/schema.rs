//! Table layout of the warehouse. Every table mirrors one document store collection.

pub(super) const TABLES: [&str; 4] = ["channel", "video", "comment", "playlist"];

pub(super) const CREATE: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS channel (
        channel_id TEXT PRIMARY KEY,
        channel_name TEXT NOT NULL,
        channel_type TEXT NOT NULL,
        channel_views INTEGER NOT NULL,
        channel_description TEXT NOT NULL,
        channel_status TEXT NOT NULL,
        subscription_count INTEGER NOT NULL,
        total_videos INTEGER NOT NULL,
        playlist_id TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS video (
        video_id TEXT PRIMARY KEY,
        channel_id TEXT NOT NULL,
        video_name TEXT NOT NULL,
        video_description TEXT NOT NULL,
        published_date TEXT NOT NULL,
        view_count INTEGER NOT NULL,
        like_count INTEGER NOT NULL,
        dislike_count INTEGER NOT NULL,
        favorite_count INTEGER,
        comment_count INTEGER,
        duration TEXT NOT NULL,
        duration_seconds INTEGER NOT NULL,
        caption_status INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comment (
        comment_id TEXT PRIMARY KEY,
        video_id TEXT NOT NULL,
        comment_text TEXT NOT NULL,
        comment_author TEXT NOT NULL,
        comment_published_date TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS playlist (
        playlist_id TEXT NOT NULL,
        playlist_items_id TEXT PRIMARY KEY,
        channel_id TEXT NOT NULL,
        playlist_name TEXT NOT NULL,
        video_id TEXT NOT NULL
    )
    "#,
];

pub(super) const INSERT_CHANNEL: &str = r#"
    INSERT OR REPLACE INTO channel (
        channel_id, channel_name, channel_type, channel_views, channel_description,
        channel_status, subscription_count, total_videos, playlist_id
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub(super) const INSERT_VIDEO: &str = r#"
    INSERT OR REPLACE INTO video (
        video_id, channel_id, video_name, video_description, published_date, view_count,
        like_count, dislike_count, favorite_count, comment_count, duration, duration_seconds,
        caption_status
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub(super) const INSERT_COMMENT: &str = r#"
    INSERT OR REPLACE INTO comment (
        comment_id, video_id, comment_text, comment_author, comment_published_date
    ) VALUES (?, ?, ?, ?, ?)
"#;

pub(super) const INSERT_PLAYLIST: &str = r#"
    INSERT OR REPLACE INTO playlist (
        playlist_id, playlist_items_id, channel_id, playlist_name, video_id
    ) VALUES (?, ?, ?, ?, ?)
"#;
