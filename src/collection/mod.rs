/// Collection reconciliation module
///
/// This module owns the local music video collection: the normalized artist
/// and video containers, the file-backed store with its legacy upgrade path,
/// the merge/import/deletion engines, and the export transformers.
///
/// Two identifier namespaces run through everything here: MusicBrainz ids
/// (MBID, from the identity lookup) and TheAudioDB ids (ADID, from the video
/// catalog). Videos are keyed by their track ADID, artists by their artist
/// ADID, and the MBID is carried alongside as a cross-reference.

pub mod export;
pub mod import;
pub mod merge;
pub mod store;

// Re-export main types
pub use export::{CombinedSnapshot, LegacyV2Artist, LegacyV2Video};
pub use import::{import_json, parse_artist_names, ImportPayload, ImportReport};
pub use merge::{delete_artists, merge_search_result};
pub use store::CollectionStore;

use serde::{Deserialize, Serialize};

/// One music video in the normalized collection
///
/// Serialized field names match the JSON written by earlier releases so data
/// files round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoEntry {
    /// TheAudioDB artist id
    #[serde(rename = "artistADID")]
    pub artist_adid: String,
    /// MusicBrainz artist id, empty when unknown at ingestion time
    #[serde(rename = "artistMBID", default)]
    pub artist_mbid: String,
    /// TheAudioDB track id, unique key within the video container
    #[serde(rename = "songADID")]
    pub song_adid: String,
    /// Track title
    #[serde(rename = "songTitle")]
    pub song_title: String,
    /// Full YouTube URL as returned by the catalog
    #[serde(rename = "videoURL")]
    pub video_url: String,
    /// YouTube video id extracted from the URL
    #[serde(rename = "thumbnailYTID")]
    pub thumbnail_ytid: String,
    /// Artist display name at ingestion time, may be empty
    #[serde(rename = "strArtist", default)]
    pub artist_name: String,
}

/// One artist known to the collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtistEntry {
    /// MusicBrainz artist id
    #[serde(rename = "artistMBID", default)]
    pub mbid: String,
    /// TheAudioDB artist id, unique key within the artist container
    #[serde(rename = "artistADID")]
    pub adid: String,
    /// Display name
    #[serde(rename = "artistName", default)]
    pub name: String,
    /// Derived: count of videos sharing this artist ADID
    #[serde(rename = "artistVideoCount", default)]
    pub video_count: usize,
    /// Derived: YouTube id of the first matching video, used as a cheap
    /// visual representative
    #[serde(rename = "artistThumb", default)]
    pub thumb_ytid: String,
    /// Enrichment: artist thumbnail URL from TheAudioDB
    #[serde(rename = "strArtistThumb", default)]
    pub thumbnail_url: String,
    /// Enrichment: banner URL
    #[serde(rename = "strArtistBanner", default)]
    pub banner_url: String,
    /// Enrichment: logo URL
    #[serde(rename = "strArtistLogo", default)]
    pub logo_url: String,
    /// Enrichment: wide thumbnail URL
    #[serde(rename = "strArtistWideThumb", default)]
    pub wide_thumb_url: String,
    /// Enrichment: genre
    #[serde(rename = "strGenre", default)]
    pub genre: String,
    /// Enrichment: mood
    #[serde(rename = "strMood", default)]
    pub mood: String,
    /// Enrichment: style
    #[serde(rename = "strStyle", default)]
    pub style: String,
}

impl ArtistEntry {
    /// New artist row with empty enrichment fields
    pub fn new(mbid: String, adid: String, name: String) -> Self {
        Self {
            mbid,
            adid,
            name,
            video_count: 0,
            thumb_ytid: String::new(),
            thumbnail_url: String::new(),
            banner_url: String::new(),
            logo_url: String::new(),
            wide_thumb_url: String::new(),
            genre: String::new(),
            mood: String::new(),
            style: String::new(),
        }
    }

    /// Display name with the stable placeholder fallback
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        placeholder_name(&self.adid)
    }

    /// Copy enrichment fields and name from another row, keeping derived
    /// aggregates untouched
    pub fn carry_over_from(&mut self, other: &ArtistEntry) {
        if self.name.is_empty() && !other.name.is_empty() {
            self.name = other.name.clone();
        }
        if self.thumbnail_url.is_empty() {
            self.thumbnail_url = other.thumbnail_url.clone();
        }
        if self.banner_url.is_empty() {
            self.banner_url = other.banner_url.clone();
        }
        if self.logo_url.is_empty() {
            self.logo_url = other.logo_url.clone();
        }
        if self.wide_thumb_url.is_empty() {
            self.wide_thumb_url = other.wide_thumb_url.clone();
        }
        if self.genre.is_empty() {
            self.genre = other.genre.clone();
        }
        if self.mood.is_empty() {
            self.mood = other.mood.clone();
        }
        if self.style.is_empty() {
            self.style = other.style.clone();
        }
    }
}

/// Synthesized display name for an artist with no known name
pub fn placeholder_name(adid: &str) -> String {
    let prefix: String = adid.chars().take(8).collect();
    format!("Artist (ID: {}...)", prefix)
}

/// Top-level artist container, persisted as artist_data.json
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistDataFile {
    pub artists: Vec<ArtistEntry>,
}

/// Top-level video container, persisted as video_data.json
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoDataFile {
    pub videos: Vec<VideoEntry>,
}

/// Legacy single-container collection written by pre-split releases
///
/// Uses MusicBrainz ids as join keys and raw catalog video records; read-only
/// at startup, never written by current code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyDataFile {
    #[serde(default)]
    pub artists: Vec<crate::api::Artist>,
    #[serde(default)]
    pub videos: Vec<crate::api::MusicVideo>,
    #[serde(rename = "artistCount", default)]
    pub artist_count: usize,
    #[serde(rename = "videoCount", default)]
    pub video_count: usize,
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_name() {
        assert_eq!(placeholder_name("abcdefgh1234"), "Artist (ID: abcdefgh...)");
        assert_eq!(placeholder_name("abc"), "Artist (ID: abc...)");
    }

    #[test]
    fn test_display_name_fallback() {
        let mut artist = ArtistEntry::new("mb-1".to_string(), "abcdefgh1234".to_string(), String::new());
        assert_eq!(artist.display_name(), "Artist (ID: abcdefgh...)");
        artist.name = "Daft Punk".to_string();
        assert_eq!(artist.display_name(), "Daft Punk");
    }

    #[test]
    fn test_carry_over_keeps_existing_values() {
        let mut fresh = ArtistEntry::new("mb-1".to_string(), "ad-1".to_string(), String::new());
        fresh.genre = "Rock".to_string();

        let mut old = ArtistEntry::new("mb-1".to_string(), "ad-1".to_string(), "Queen".to_string());
        old.genre = "Pop".to_string();
        old.banner_url = "https://example.com/banner.jpg".to_string();

        fresh.carry_over_from(&old);
        assert_eq!(fresh.name, "Queen");
        assert_eq!(fresh.genre, "Rock");
        assert_eq!(fresh.banner_url, "https://example.com/banner.jpg");
    }

    #[test]
    fn test_video_entry_serde_field_names() {
        let video = VideoEntry {
            artist_adid: "ad-1".to_string(),
            artist_mbid: "mb-1".to_string(),
            song_adid: "t-1".to_string(),
            song_title: "Song".to_string(),
            video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            thumbnail_ytid: "dQw4w9WgXcQ".to_string(),
            artist_name: "Test".to_string(),
        };
        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["artistADID"], "ad-1");
        assert_eq!(json["songADID"], "t-1");
        assert_eq!(json["thumbnailYTID"], "dQw4w9WgXcQ");
        assert_eq!(json["strArtist"], "Test");
    }

    #[test]
    fn test_artist_entry_defaults_for_missing_enrichment() {
        let json = r#"{"artistMBID":"mb-1","artistADID":"ad-1","artistName":"Test","artistVideoCount":2,"artistThumb":"yt1"}"#;
        let artist: ArtistEntry = serde_json::from_str(json).unwrap();
        assert_eq!(artist.video_count, 2);
        assert_eq!(artist.genre, "");
        assert_eq!(artist.banner_url, "");
    }
}
