/// Merge and deletion engines
///
/// Both operate as whole-store read-modify-write sequences: load the full
/// collection, compute the new state, persist both containers together.
use anyhow::Result;
use tracing::{debug, info};

use super::store::CollectionStore;
use super::{ArtistDataFile, ArtistEntry, VideoDataFile, VideoEntry};
use crate::api::{Artist, MusicVideo};
use crate::youtube::extract_video_id;

/// Merge one search result (one artist, their videos) into the collection
///
/// Videos without an extractable YouTube id are never stored; a video whose
/// track ADID already exists is silently dropped (first write wins). The
/// artist row's video count is always recomputed from the full video
/// container, not incremented, so prior partial data corrects itself.
///
/// All videos in one call must belong to one artist: the artist ADID is read
/// from the first video.
pub async fn merge_search_result(
    store: &CollectionStore,
    artist: &Artist,
    videos: &[MusicVideo],
) -> Result<(ArtistDataFile, VideoDataFile)> {
    let (mut artist_data, mut video_data) = store.load().await?;

    let mut skipped = 0usize;
    for video in videos {
        let ytid = extract_video_id(&video.music_vid);
        if ytid.is_empty() {
            skipped += 1;
            continue;
        }

        if video_data.videos.iter().any(|v| v.song_adid == video.id_track) {
            debug!("Skipping duplicate track {}", video.id_track);
            continue;
        }

        let artist_name = if !video.artist.is_empty() {
            video.artist.clone()
        } else {
            artist.name.clone()
        };

        video_data.videos.push(VideoEntry {
            artist_adid: video.id_artist.clone(),
            artist_mbid: artist.id.clone(),
            song_adid: video.id_track.clone(),
            song_title: video.track.clone(),
            video_url: video.music_vid.clone(),
            thumbnail_ytid: ytid,
            artist_name,
        });
    }

    if skipped > 0 {
        debug!("Skipped {} videos without a usable YouTube URL", skipped);
    }

    if videos.is_empty() {
        record_artist_without_videos(&mut artist_data, artist);
    } else {
        let adid = &videos[0].id_artist;
        let matching_count = video_data
            .videos
            .iter()
            .filter(|v| &v.artist_adid == adid)
            .count();
        let first_thumb = video_data
            .videos
            .iter()
            .find(|v| &v.artist_adid == adid)
            .map(|v| v.thumbnail_ytid.clone())
            .unwrap_or_default();

        match artist_data.artists.iter_mut().find(|a| &a.adid == adid) {
            Some(existing) => {
                existing.video_count = matching_count;
                if existing.name.is_empty() {
                    existing.name = artist.name.clone();
                }
            }
            None => {
                let mut entry =
                    ArtistEntry::new(artist.id.clone(), adid.clone(), artist.name.clone());
                entry.video_count = matching_count;
                entry.thumb_ytid = first_thumb;

                // A previous zero-video search for this artist left a row
                // keyed by the MBID; absorb it now that the ADID is known
                if let Some(pos) = artist_data
                    .artists
                    .iter()
                    .position(|a| a.mbid == artist.id && a.adid == a.mbid && a.video_count == 0)
                {
                    let placeholder = artist_data.artists.remove(pos);
                    entry.carry_over_from(&placeholder);
                }

                artist_data.artists.push(entry);
            }
        }
    }

    store.save(&artist_data, &video_data).await?;
    info!(
        "✅ Merged search result for {}: {} artists, {} videos in collection",
        artist.name,
        artist_data.artists.len(),
        video_data.videos.len()
    );

    Ok((artist_data, video_data))
}

/// Record an artist found by the identity search but with no videos
///
/// Keeps the row so repeated searches do not re-query. No catalog ADID is
/// known yet, so the row is keyed by the MBID until videos arrive. An artist
/// without an MBID has no usable key at all and is not recorded.
fn record_artist_without_videos(artist_data: &mut ArtistDataFile, artist: &Artist) {
    if artist.id.is_empty() {
        debug!("Not recording {} with no videos and no MBID", artist.name);
        return;
    }

    let already_known = artist_data.artists.iter().any(|a| a.mbid == artist.id);
    if already_known {
        return;
    }

    info!("Recording {} with no videos", artist.name);
    artist_data.artists.push(ArtistEntry::new(
        artist.id.clone(),
        artist.id.clone(),
        artist.name.clone(),
    ));
}

/// Delete artists and cascade to their videos
///
/// Unknown ADIDs are no-ops. Videos are never orphaned: every video row
/// whose artist ADID is in the set goes with it.
pub async fn delete_artists(
    store: &CollectionStore,
    adids: &[String],
) -> Result<(ArtistDataFile, VideoDataFile)> {
    let (mut artist_data, mut video_data) = store.load().await?;

    let before_artists = artist_data.artists.len();
    let before_videos = video_data.videos.len();

    artist_data
        .artists
        .retain(|artist| !adids.contains(&artist.adid));
    video_data
        .videos
        .retain(|video| !adids.contains(&video.artist_adid));

    store.save(&artist_data, &video_data).await?;
    info!(
        "🗑️ Deleted {} artists and {} videos",
        before_artists - artist_data.artists.len(),
        before_videos - video_data.videos.len()
    );

    Ok((artist_data, video_data))
}
