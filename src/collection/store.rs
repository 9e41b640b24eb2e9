/// File-backed collection store
///
/// The collection lives in two JSON files under a data directory, always
/// written together. A third, legacy single-file format from older releases
/// is read (never written) and upgraded on first load when the current files
/// are absent.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::{ArtistDataFile, ArtistEntry, LegacyDataFile, VideoDataFile, VideoEntry};
use crate::youtube::extract_video_id;

/// Current-format artist container file name
pub const ARTIST_DATA_FILE: &str = "artist_data.json";
/// Current-format video container file name
pub const VIDEO_DATA_FILE: &str = "video_data.json";
/// Legacy single-container file name, read-only
pub const LEGACY_DATA_FILE: &str = "video_collection.json";

/// Collection size summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub artist_count: usize,
    pub video_count: usize,
}

/// File-backed store for the artist and video containers
#[derive(Debug, Clone)]
pub struct CollectionStore {
    data_dir: PathBuf,
}

impl CollectionStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Create the data directory if it does not exist
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).await?;
        debug!("📁 Collection directory ready: {}", self.data_dir.display());
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn artist_path(&self) -> PathBuf {
        self.data_dir.join(ARTIST_DATA_FILE)
    }

    fn video_path(&self) -> PathBuf {
        self.data_dir.join(VIDEO_DATA_FILE)
    }

    fn legacy_path(&self) -> PathBuf {
        self.data_dir.join(LEGACY_DATA_FILE)
    }

    /// Load both containers
    ///
    /// A missing or malformed file yields its empty container. When neither
    /// current-format file exists, a parseable legacy file is upgraded and
    /// returned; the upgrade is not persisted here, the next mutating
    /// operation does that. Running it twice is safe because it is
    /// deterministic.
    pub async fn load(&self) -> Result<(ArtistDataFile, VideoDataFile)> {
        let artist_raw = read_optional(&self.artist_path()).await;
        let video_raw = read_optional(&self.video_path()).await;

        if artist_raw.is_none() && video_raw.is_none() {
            if let Some(legacy_raw) = read_optional(&self.legacy_path()).await {
                match serde_json::from_str::<LegacyDataFile>(&legacy_raw) {
                    Ok(legacy) => {
                        info!(
                            "🔄 Upgrading legacy collection ({} artists, {} videos)",
                            legacy.artists.len(),
                            legacy.videos.len()
                        );
                        return Ok(upgrade_legacy(&legacy));
                    }
                    Err(e) => {
                        warn!("Failed to parse legacy collection file: {}", e);
                    }
                }
            }
        }

        let artist_data = artist_raw
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!("Failed to parse {}: {}", ARTIST_DATA_FILE, e);
                    None
                }
            })
            .unwrap_or_default();

        let video_data = video_raw
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!("Failed to parse {}: {}", VIDEO_DATA_FILE, e);
                    None
                }
            })
            .unwrap_or_default();

        Ok((artist_data, video_data))
    }

    /// Persist both containers together
    pub async fn save(&self, artists: &ArtistDataFile, videos: &VideoDataFile) -> Result<()> {
        self.initialize().await?;
        let artist_json = serde_json::to_string_pretty(artists)?;
        let video_json = serde_json::to_string_pretty(videos)?;
        fs::write(self.artist_path(), artist_json).await?;
        fs::write(self.video_path(), video_json).await?;
        debug!(
            "💾 Saved collection: {} artists, {} videos",
            artists.artists.len(),
            videos.videos.len()
        );
        Ok(())
    }

    /// Current artist and video counts
    pub async fn stats(&self) -> Result<CollectionStats> {
        let (artists, videos) = self.load().await?;
        Ok(CollectionStats {
            artist_count: artists.artists.len(),
            video_count: videos.videos.len(),
        })
    }

    /// Remove all collection files, including the legacy one
    pub async fn reset(&self) -> Result<()> {
        for path in [self.artist_path(), self.video_path(), self.legacy_path()] {
            if path.exists() {
                fs::remove_file(&path).await?;
            }
        }
        info!("🧹 Collection reset");
        Ok(())
    }
}

async fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path).await {
        Ok(content) => Some(content),
        Err(_) => None,
    }
}

/// Upgrade a legacy single-container collection to the two-container format
///
/// Deterministic and idempotent: videos whose URL yields no YouTube id are
/// dropped, MBIDs are backfilled by matching legacy artist names through the
/// legacy video rows, and the artist container is derived entirely from the
/// converted videos so both containers agree from the start.
pub fn upgrade_legacy(legacy: &LegacyDataFile) -> (ArtistDataFile, VideoDataFile) {
    let mut video_data = VideoDataFile::default();

    for video in &legacy.videos {
        let ytid = extract_video_id(&video.music_vid);
        if ytid.is_empty() {
            continue;
        }
        video_data.videos.push(VideoEntry {
            artist_adid: video.id_artist.clone(),
            artist_mbid: String::new(),
            song_adid: video.id_track.clone(),
            song_title: video.track.clone(),
            video_url: video.music_vid.clone(),
            thumbnail_ytid: ytid,
            artist_name: video.artist.clone(),
        });
    }

    // Backfill MBIDs: a legacy artist matches a converted video when some
    // legacy video row shares the ADID and carries that artist's name
    for entry in &mut video_data.videos {
        let matching = legacy.artists.iter().find(|artist| {
            legacy
                .videos
                .iter()
                .any(|v| v.id_artist == entry.artist_adid && v.artist == artist.name)
        });
        if let Some(artist) = matching {
            entry.artist_mbid = artist.id.clone();
        }
    }

    let artist_data = artists_from_videos(&video_data.videos);
    (artist_data, video_data)
}

/// Derive the artist container by grouping videos per artist ADID
///
/// The first-seen video for each artist supplies the thumbnail id and the
/// name (its stored artist name, else the "Artist - Title" split of the song
/// title, else the id placeholder). Counts come from the grouping itself.
pub fn artists_from_videos(videos: &[VideoEntry]) -> ArtistDataFile {
    let mut order: Vec<String> = Vec::new();
    let mut by_adid: std::collections::HashMap<String, ArtistEntry> =
        std::collections::HashMap::new();

    for video in videos {
        match by_adid.get_mut(&video.artist_adid) {
            Some(artist) => {
                artist.video_count += 1;
                if artist.name.is_empty() && !video.artist_name.is_empty() {
                    artist.name = video.artist_name.clone();
                }
            }
            None => {
                let name = if !video.artist_name.is_empty() {
                    video.artist_name.clone()
                } else if let Some((head, _)) = video.song_title.split_once(" - ") {
                    head.trim().to_string()
                } else {
                    super::placeholder_name(&video.artist_adid)
                };

                let mut artist =
                    ArtistEntry::new(video.artist_mbid.clone(), video.artist_adid.clone(), name);
                artist.video_count = 1;
                artist.thumb_ytid = video.thumbnail_ytid.clone();
                order.push(video.artist_adid.clone());
                by_adid.insert(video.artist_adid.clone(), artist);
            }
        }
    }

    ArtistDataFile {
        artists: order
            .into_iter()
            .filter_map(|adid| by_adid.remove(&adid))
            .collect(),
    }
}
