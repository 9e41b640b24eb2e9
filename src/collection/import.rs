/// JSON and text import
///
/// Imported JSON arrives in one of four shapes (normalized artist container,
/// normalized video container, combined snapshot, or a legacy single-search
/// payload). The shape is detected up front into a closed enum; the merge
/// logic then matches over the variant instead of probing fields inline. An
/// unrecognized shape imports nothing and is not an error.
use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::store::{artists_from_videos, CollectionStore};
use super::{placeholder_name, ArtistDataFile, VideoDataFile, VideoEntry};
use crate::api::{Artist, MusicVideo};
use crate::youtube::extract_video_id;

/// Detected shape of an imported JSON payload
#[derive(Debug, Clone)]
pub enum ImportPayload {
    /// Normalized artist container
    ArtistData(ArtistDataFile),
    /// Normalized video container
    VideoData(VideoDataFile),
    /// Combined backup snapshot
    Combined {
        artist_data: ArtistDataFile,
        video_data: VideoDataFile,
    },
    /// Legacy single-search-result payload
    SearchResults {
        artist: Artist,
        videos: Vec<MusicVideo>,
    },
    /// None of the known shapes
    Unrecognized,
}

impl ImportPayload {
    /// Detect the payload shape from its discriminating fields
    ///
    /// The presence of `artistADID` on the first element of an `artists` or
    /// `videos` array marks the normalized containers; `artistData` plus
    /// `videoData` marks the combined snapshot; `artist` plus `videos` marks
    /// the legacy search payload.
    pub fn detect(value: &Value) -> ImportPayload {
        if first_element_has(value, "artists", "artistADID") {
            if let Ok(data) = serde_json::from_value::<ArtistDataFile>(value.clone()) {
                return ImportPayload::ArtistData(data);
            }
        } else if first_element_has(value, "videos", "artistADID") {
            if let Ok(data) = serde_json::from_value::<VideoDataFile>(value.clone()) {
                return ImportPayload::VideoData(data);
            }
        } else if value.get("artistData").is_some() && value.get("videoData").is_some() {
            let artist_data = serde_json::from_value(value["artistData"].clone());
            let video_data = serde_json::from_value(value["videoData"].clone());
            if let (Ok(artist_data), Ok(video_data)) = (artist_data, video_data) {
                return ImportPayload::Combined {
                    artist_data,
                    video_data,
                };
            }
        } else if value.get("artist").is_some() && value.get("videos").is_some() {
            let artist = serde_json::from_value(value["artist"].clone());
            let videos = serde_json::from_value(value["videos"].clone());
            if let (Ok(artist), Ok(videos)) = (artist, videos) {
                return ImportPayload::SearchResults { artist, videos };
            }
        }

        ImportPayload::Unrecognized
    }
}

fn first_element_has(value: &Value, container: &str, field: &str) -> bool {
    value[container]
        .as_array()
        .and_then(|a| a.first())
        .map(|first| first.get(field).is_some())
        .unwrap_or(false)
}

/// Result of a JSON import
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Rows actually added (duplicates and unrecognized payloads add none)
    pub rows_added: usize,
    pub artist_count: usize,
    pub video_count: usize,
}

/// Import a JSON payload into the collection
///
/// After any row is added, all artist aggregates are regenerated from the
/// full video container, then names and enrichment fields of previously
/// known artists are re-applied so regeneration never clobbers them. A no-op
/// import does not touch storage.
pub async fn import_json(store: &CollectionStore, raw: &str) -> Result<ImportReport> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Import file is not valid JSON: {}", e);
            let stats = store.stats().await?;
            return Ok(ImportReport {
                rows_added: 0,
                artist_count: stats.artist_count,
                video_count: stats.video_count,
            });
        }
    };

    let (mut artist_data, mut video_data) = store.load().await?;
    let mut rows_added = 0usize;

    match ImportPayload::detect(&value) {
        ImportPayload::ArtistData(imported) => {
            rows_added += add_artists(&mut artist_data, imported);
        }
        ImportPayload::VideoData(imported) => {
            rows_added += add_videos(&mut video_data, imported);
        }
        ImportPayload::Combined {
            artist_data: imported_artists,
            video_data: imported_videos,
        } => {
            rows_added += add_artists(&mut artist_data, imported_artists);
            rows_added += add_videos(&mut video_data, imported_videos);
        }
        ImportPayload::SearchResults { artist, videos } => {
            rows_added += add_search_videos(&mut video_data, &artist, &videos);
        }
        ImportPayload::Unrecognized => {
            warn!("Import payload shape not recognized, nothing imported");
        }
    }

    if rows_added > 0 {
        let mut regenerated = artists_from_videos(&video_data.videos);
        for artist in &mut regenerated.artists {
            if let Some(existing) = artist_data.artists.iter().find(|a| a.adid == artist.adid) {
                artist.carry_over_from(existing);
            }
        }
        artist_data = regenerated;

        store.save(&artist_data, &video_data).await?;
        info!(
            "📥 Imported {} rows: {} artists, {} videos in collection",
            rows_added,
            artist_data.artists.len(),
            video_data.videos.len()
        );
    } else {
        debug!("Import added no rows, storage untouched");
    }

    Ok(ImportReport {
        rows_added,
        artist_count: artist_data.artists.len(),
        video_count: video_data.videos.len(),
    })
}

fn add_artists(artist_data: &mut ArtistDataFile, imported: ArtistDataFile) -> usize {
    let mut added = 0;
    for mut artist in imported.artists {
        if artist_data.artists.iter().any(|a| a.adid == artist.adid) {
            continue;
        }
        if artist.name.is_empty() {
            artist.name = placeholder_name(&artist.adid);
        }
        artist_data.artists.push(artist);
        added += 1;
    }
    added
}

fn add_videos(video_data: &mut VideoDataFile, imported: VideoDataFile) -> usize {
    let mut added = 0;
    for video in imported.videos {
        if video_data
            .videos
            .iter()
            .any(|v| v.song_adid == video.song_adid)
        {
            continue;
        }
        video_data.videos.push(video);
        added += 1;
    }
    added
}

fn add_search_videos(
    video_data: &mut VideoDataFile,
    artist: &Artist,
    videos: &[MusicVideo],
) -> usize {
    let mut added = 0;
    for video in videos {
        let ytid = extract_video_id(&video.music_vid);
        if ytid.is_empty() {
            continue;
        }
        if video_data
            .videos
            .iter()
            .any(|v| v.song_adid == video.id_track)
        {
            continue;
        }
        video_data.videos.push(VideoEntry {
            artist_adid: video.id_artist.clone(),
            artist_mbid: artist.id.clone(),
            song_adid: video.id_track.clone(),
            song_title: video.track.clone(),
            video_url: video.music_vid.clone(),
            thumbnail_ytid: ytid,
            artist_name: if !video.artist.is_empty() {
                video.artist.clone()
            } else {
                artist.name.clone()
            },
        });
        added += 1;
    }
    added
}

/// Parse a text file of artist names, one per line
///
/// Lines are trimmed; blank lines are dropped.
pub fn parse_artist_names(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn video_json(song_adid: &str, ytid: &str) -> String {
        format!(
            r#"{{
                "artistADID": "ad-1",
                "artistMBID": "mb-1",
                "songADID": "{song_adid}",
                "songTitle": "Test - Song",
                "videoURL": "https://youtu.be/{ytid}",
                "thumbnailYTID": "{ytid}",
                "strArtist": "Test"
            }}"#
        )
    }

    #[test]
    fn test_detect_video_container() {
        let raw = format!(r#"{{"videos": [{}]}}"#, video_json("t-1", "dQw4w9WgXcQ"));
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert!(matches!(
            ImportPayload::detect(&value),
            ImportPayload::VideoData(_)
        ));
    }

    #[test]
    fn test_detect_search_results() {
        let raw = r#"{
            "artist": {"id": "mb-1", "name": "Test"},
            "videos": [{
                "idArtist": "ad-1",
                "idTrack": "t-1",
                "strTrack": "Song",
                "strMusicVid": "https://youtu.be/dQw4w9WgXcQ"
            }],
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;
        let value: Value = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            ImportPayload::detect(&value),
            ImportPayload::SearchResults { .. }
        ));
    }

    #[test]
    fn test_detect_unrecognized() {
        let value: Value = serde_json::from_str(r#"{"something": "else"}"#).unwrap();
        assert!(matches!(
            ImportPayload::detect(&value),
            ImportPayload::Unrecognized
        ));

        // Legacy artists without the ADID field are not the normalized shape
        let value: Value =
            serde_json::from_str(r#"{"artists": [{"id": "mb-1", "name": "Test"}]}"#).unwrap();
        assert!(matches!(
            ImportPayload::detect(&value),
            ImportPayload::Unrecognized
        ));
    }

    #[tokio::test]
    async fn test_import_videos_regenerates_artists() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());

        let raw = format!(
            r#"{{"videos": [{}, {}]}}"#,
            video_json("t-1", "aaaaaaaaaaa"),
            video_json("t-2", "bbbbbbbbbbb")
        );
        let report = import_json(&store, &raw).await.unwrap();

        assert_eq!(report.rows_added, 2);
        assert_eq!(report.artist_count, 1);
        assert_eq!(report.video_count, 2);

        let (artists, _) = store.load().await.unwrap();
        assert_eq!(artists.artists[0].video_count, 2);
        assert_eq!(artists.artists[0].thumb_ytid, "aaaaaaaaaaa");
    }

    #[tokio::test]
    async fn test_reimport_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());

        let raw = format!(r#"{{"videos": [{}]}}"#, video_json("t-1", "dQw4w9WgXcQ"));
        import_json(&store, &raw).await.unwrap();
        let (artists_once, videos_once) = store.load().await.unwrap();

        let report = import_json(&store, &raw).await.unwrap();
        assert_eq!(report.rows_added, 0);

        let (artists_twice, videos_twice) = store.load().await.unwrap();
        assert_eq!(artists_once, artists_twice);
        assert_eq!(videos_once, videos_twice);
    }

    #[tokio::test]
    async fn test_import_preserves_enrichment() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());

        // Seed with one video, then enrich the resulting artist by hand
        let raw = format!(r#"{{"videos": [{}]}}"#, video_json("t-1", "aaaaaaaaaaa"));
        import_json(&store, &raw).await.unwrap();

        let (mut artists, videos) = store.load().await.unwrap();
        artists.artists[0].genre = "Electronic".to_string();
        artists.artists[0].banner_url = "https://example.com/banner.jpg".to_string();
        store.save(&artists, &videos).await.unwrap();

        // Importing more videos regenerates aggregates but keeps enrichment
        let raw = format!(r#"{{"videos": [{}]}}"#, video_json("t-2", "bbbbbbbbbbb"));
        import_json(&store, &raw).await.unwrap();

        let (artists, _) = store.load().await.unwrap();
        assert_eq!(artists.artists[0].video_count, 2);
        assert_eq!(artists.artists[0].genre, "Electronic");
        assert_eq!(artists.artists[0].banner_url, "https://example.com/banner.jpg");
    }

    #[tokio::test]
    async fn test_import_search_results_payload() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());

        let raw = r#"{
            "artist": {"id": "mb-1", "name": "Test"},
            "videos": [{
                "idArtist": "ad-1",
                "idTrack": "t-1",
                "strTrack": "Song",
                "strMusicVid": "https://youtu.be/dQw4w9WgXcQ"
            }]
        }"#;
        let report = import_json(&store, raw).await.unwrap();

        assert_eq!(report.rows_added, 1);
        let (artists, videos) = store.load().await.unwrap();
        assert_eq!(videos.videos[0].artist_mbid, "mb-1");
        assert_eq!(videos.videos[0].thumbnail_ytid, "dQw4w9WgXcQ");
        assert_eq!(artists.artists.len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_import_is_silent_noop() {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf());

        let report = import_json(&store, r#"{"unknown": true}"#).await.unwrap();
        assert_eq!(report.rows_added, 0);
        assert!(!dir.path().join(super::super::store::VIDEO_DATA_FILE).exists());

        let report = import_json(&store, "not json at all").await.unwrap();
        assert_eq!(report.rows_added, 0);
    }

    #[test]
    fn test_parse_artist_names() {
        let content = "Daft Punk\n\n  Air  \nJustice\n";
        assert_eq!(
            parse_artist_names(content),
            vec!["Daft Punk", "Air", "Justice"]
        );
    }
}
