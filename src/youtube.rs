/// YouTube URL and identifier utilities
///
/// Pure helpers for pulling a canonical video id out of the many URL shapes
/// YouTube uses, and for deriving asset URLs from that id. Everything in here
/// is total: bad input yields an empty string or a placeholder, never a panic.
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Placeholder returned when no thumbnail can be derived
pub const THUMBNAIL_PLACEHOLDER: &str = "/placeholder.svg";

/// Thumbnail size variants offered by img.youtube.com
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSize {
    Default,
    Medium,
    High,
    Standard,
    MaxRes,
}

impl ThumbnailSize {
    fn file_stem(&self) -> &'static str {
        match self {
            ThumbnailSize::Default => "default",
            ThumbnailSize::Medium => "mqdefault",
            ThumbnailSize::High => "hqdefault",
            ThumbnailSize::Standard => "sddefault",
            ThumbnailSize::MaxRes => "maxresdefault",
        }
    }
}

fn video_id_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        // Covers youtu.be short links, /v/ /vi/ /u/<c>/ /embed/ /shorts/ path
        // forms, and the watch?v= / &v= query forms (vi aliases included)
        Regex::new(r"^.*(?:(?:youtu\.be/|v/|vi/|u/\w/|embed/|shorts/)|(?:(?:watch)?\?vi?=|&vi?=))([^#&?]*).*")
            .ok()
    })
    .as_ref()
}

/// Extract the video id from a YouTube URL
///
/// Returns an empty string when the URL is empty or matches no known shape.
pub fn extract_video_id(video_url: &str) -> String {
    if video_url.is_empty() {
        return String::new();
    }

    let Some(re) = video_id_regex() else {
        return String::new();
    };

    re.captures(video_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Derive a thumbnail URL for a video id
pub fn thumbnail_url(video_id: &str, size: ThumbnailSize) -> String {
    if video_id.is_empty() {
        return THUMBNAIL_PLACEHOLDER.to_string();
    }
    format!(
        "https://img.youtube.com/vi/{}/{}.jpg",
        video_id,
        size.file_stem()
    )
}

/// Canonical watch URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Extract a playlist id from a YouTube URL, passing bare ids through
pub fn extract_playlist_id(url_or_id: &str) -> Option<String> {
    let trimmed = url_or_id.trim();
    if trimmed.is_empty() {
        return None;
    }

    if !trimmed.contains("youtube.com") && !trimmed.contains("youtu.be") {
        // Already a bare playlist id
        return Some(trimmed.to_string());
    }

    let parsed = Url::parse(trimmed).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "list")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

/// Derive artist names from "Artist - Title" style video titles
///
/// Returns unique names in first-seen order. Titles without a dash separator
/// are skipped.
pub fn artists_from_titles(titles: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut artists = Vec::new();

    for title in titles {
        let mut parts = title.splitn(2, " - ");
        let candidate = parts.next().unwrap_or("").trim();
        if parts.next().is_none() {
            continue;
        }
        if candidate.len() > 1 && seen.insert(candidate.to_string()) {
            artists.push(candidate.to_string());
        }
    }

    artists
}
