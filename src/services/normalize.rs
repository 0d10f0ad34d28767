//! Discovery Normalizer: converts raw provider payloads into uniform
//! [`DiscoveryItem`] values.
//!
//! Acceptance rules:
//! - Google items need both a title and a link.
//! - YouTube items need both a video id and a title.
//!
//! Item ids are `{source}-{context}-[{discriminator}-]{position}` where
//! `position` counts accepted items, so ids stay unique per batch even
//! when a provider repeats its own ids.

use crate::services::google::GoogleSearchResponse;
use crate::services::youtube::{YoutubeSearchResponse, YoutubeThumbnails};
use crate::types::{ContentSource, DiscoveryItem};

/// Normalize Google items for a category context.
pub fn normalize_google_items(context: &str, payload: &GoogleSearchResponse) -> Vec<DiscoveryItem> {
    let mut out = Vec::new();
    for item in &payload.items {
        let (Some(title), Some(link)) = (&item.title, &item.link) else {
            continue;
        };
        out.push(DiscoveryItem {
            id: format!("google-{context}-{}", out.len()),
            title: title.clone(),
            url: link.clone(),
            source: ContentSource::Google,
            video_id: None,
            view_count: None,
            thumbnail_url: item
                .pagemap
                .as_ref()
                .and_then(|p| p.cse_image.first())
                .and_then(|image| image.src.clone()),
            published_at: None,
            description: item.snippet.clone(),
        });
    }
    out
}

/// Normalize YouTube items for a category context.
pub fn normalize_youtube_items(
    context: &str,
    payload: &YoutubeSearchResponse,
) -> Vec<DiscoveryItem> {
    collect_youtube_items(payload, |video_id, position| {
        format!("youtube-{context}-{video_id}-{position}")
    })
}

/// Normalize YouTube items for a free-form query.
pub fn normalize_youtube_query_items(
    query: &str,
    payload: &YoutubeSearchResponse,
) -> Vec<DiscoveryItem> {
    let context = query_context(query);
    collect_youtube_items(payload, |video_id, position| {
        format!("youtube-query-{context}-{video_id}-{position}")
    })
}

/// Lower-cased, hyphenated id context for a free-form query.
pub fn query_context(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn collect_youtube_items(
    payload: &YoutubeSearchResponse,
    make_id: impl Fn(&str, usize) -> String,
) -> Vec<DiscoveryItem> {
    let mut out = Vec::new();
    for item in &payload.items {
        let Some(video_id) = item.id.as_ref().and_then(|id| id.video_id.as_deref()) else {
            continue;
        };
        let Some(title) = item.snippet.as_ref().and_then(|s| s.title.clone()) else {
            continue;
        };
        let snippet = item.snippet.as_ref();
        out.push(DiscoveryItem {
            id: make_id(video_id, out.len()),
            title,
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            source: ContentSource::Youtube,
            video_id: Some(video_id.to_string()),
            view_count: None,
            thumbnail_url: snippet
                .and_then(|s| s.thumbnails.as_ref())
                .and_then(best_thumbnail),
            published_at: snippet.and_then(|s| s.published_at.clone()),
            description: snippet.and_then(|s| s.description.clone()),
        });
    }
    out
}

/// Thumbnail preference: high, then medium, then default.
fn best_thumbnail(thumbnails: &YoutubeThumbnails) -> Option<String> {
    thumbnails
        .high
        .as_ref()
        .and_then(|t| t.url.clone())
        .or_else(|| thumbnails.medium.as_ref().and_then(|t| t.url.clone()))
        .or_else(|| thumbnails.default.as_ref().and_then(|t| t.url.clone()))
}
