/// Export transformers
///
/// Pure projections of the collection into downloadable JSON shapes. Nothing
/// here touches the store; callers load first and serialize the result.
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ArtistDataFile, VideoDataFile};
use crate::youtube::{thumbnail_url, watch_url, ThumbnailSize};

/// Full-fidelity backup snapshot combining both containers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedSnapshot {
    #[serde(rename = "artistData")]
    pub artist_data: ArtistDataFile,
    #[serde(rename = "videoData")]
    pub video_data: VideoDataFile,
    pub timestamp: String,
    #[serde(rename = "artistCount")]
    pub artist_count: usize,
    #[serde(rename = "videoCount")]
    pub video_count: usize,
}

/// One artist record in the legacy v2 export schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyV2Artist {
    pub artist_name: String,
    pub mbid: String,
    pub music_videos: Vec<LegacyV2Video>,
}

/// One video record in the legacy v2 export schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyV2Video {
    pub title: String,
    pub youtube_url: String,
    pub track_thumb: String,
}

/// Build the combined backup snapshot
pub fn combined_snapshot(artists: &ArtistDataFile, videos: &VideoDataFile) -> CombinedSnapshot {
    CombinedSnapshot {
        artist_data: artists.clone(),
        video_data: videos.clone(),
        timestamp: Utc::now().to_rfc3339(),
        artist_count: artists.artists.len(),
        video_count: videos.videos.len(),
    }
}

/// Build the legacy v2 projection
///
/// Video URLs and thumbnails are reconstructed from the stored YouTube id
/// rather than the original URL, normalizing away URL-format drift. Artists
/// with no videos still produce a record with an empty video list.
pub fn legacy_v2(artists: &ArtistDataFile, videos: &VideoDataFile) -> Vec<LegacyV2Artist> {
    artists
        .artists
        .iter()
        .map(|artist| {
            let music_videos = videos
                .videos
                .iter()
                .filter(|video| video.artist_adid == artist.adid)
                .map(|video| LegacyV2Video {
                    title: video.song_title.clone(),
                    youtube_url: watch_url(&video.thumbnail_ytid),
                    track_thumb: thumbnail_url(&video.thumbnail_ytid, ThumbnailSize::Medium),
                })
                .collect();

            LegacyV2Artist {
                artist_name: artist.display_name(),
                mbid: artist.mbid.clone(),
                music_videos,
            }
        })
        .collect()
}

/// Descriptive export file name carrying the current collection counts
pub fn export_filename(prefix: &str, artist_count: usize, video_count: usize) -> String {
    format!(
        "{}_{}-artists_{}-videos_{}.json",
        prefix,
        artist_count,
        video_count,
        Utc::now().format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{ArtistEntry, VideoEntry};

    fn sample() -> (ArtistDataFile, VideoDataFile) {
        let mut artist = ArtistEntry::new(
            "mb-1".to_string(),
            "ad-1".to_string(),
            "Test".to_string(),
        );
        artist.video_count = 1;
        artist.thumb_ytid = "dQw4w9WgXcQ".to_string();

        let video = VideoEntry {
            artist_adid: "ad-1".to_string(),
            artist_mbid: "mb-1".to_string(),
            song_adid: "t-1".to_string(),
            song_title: "Song".to_string(),
            video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            thumbnail_ytid: "dQw4w9WgXcQ".to_string(),
            artist_name: "Test".to_string(),
        };

        (
            ArtistDataFile {
                artists: vec![artist],
            },
            VideoDataFile {
                videos: vec![video],
            },
        )
    }

    #[test]
    fn test_combined_snapshot_counts() {
        let (artists, videos) = sample();
        let snapshot = combined_snapshot(&artists, &videos);
        assert_eq!(snapshot.artist_count, 1);
        assert_eq!(snapshot.video_count, 1);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("artistData").is_some());
        assert!(json.get("videoData").is_some());
        assert!(json.get("artistCount").is_some());
    }

    #[test]
    fn test_legacy_v2_reconstructs_urls_from_ytid() {
        let (mut artists, mut videos) = sample();
        // Stored URL uses the short form; the export must use the watch form
        videos.videos[0].video_url = "https://youtu.be/dQw4w9WgXcQ".to_string();
        artists.artists[0].video_count = 1;

        let records = legacy_v2(&artists, &videos);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].artist_name, "Test");
        assert_eq!(records[0].mbid, "mb-1");
        assert_eq!(records[0].music_videos.len(), 1);
        assert_eq!(
            records[0].music_videos[0].youtube_url,
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            records[0].music_videos[0].track_thumb,
            "https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg"
        );
    }

    #[test]
    fn test_legacy_v2_placeholder_name() {
        let (mut artists, videos) = sample();
        artists.artists[0].name = String::new();
        artists.artists[0].adid = "abcdefgh1234".to_string();

        let records = legacy_v2(&artists, &videos);
        assert_eq!(records[0].artist_name, "Artist (ID: abcdefgh...)");
    }

    #[test]
    fn test_legacy_v2_zero_video_artist_keeps_record() {
        let (mut artists, videos) = sample();
        artists.artists.push(ArtistEntry::new(
            "mb-2".to_string(),
            "ad-2".to_string(),
            "Empty".to_string(),
        ));

        let records = legacy_v2(&artists, &videos);
        assert_eq!(records.len(), 2);
        assert!(records[1].music_videos.is_empty());
    }

    #[test]
    fn test_export_filename_contains_counts() {
        let name = export_filename("artist_data", 12, 300);
        assert!(name.starts_with("artist_data_12-artists_300-videos_"));
        assert!(name.ends_with(".json"));
    }
}
