/// Batch artist search processing
///
/// Drives the search-then-merge pipeline for a list of artist names. Work is
/// strictly sequential, one artist in flight at a time, and a failure on one
/// name never stops the rest of the queue.
use anyhow::Result;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{info, warn};

use crate::api::{ApiResult, Artist, MusicApiClient, MusicVideo};
use crate::collection::{merge_search_result, CollectionStore};

/// Search backend for the batch queue, implemented by the live API client
/// and by test stubs
#[async_trait]
pub trait MusicSource: Send + Sync {
    async fn search_artist(&self, name: &str) -> ApiResult<Option<Artist>>;
    async fn music_videos(&self, mbid: &str) -> ApiResult<Vec<MusicVideo>>;
}

#[async_trait]
impl MusicSource for MusicApiClient {
    async fn search_artist(&self, name: &str) -> ApiResult<Option<Artist>> {
        MusicApiClient::search_artist(self, name).await
    }

    async fn music_videos(&self, mbid: &str) -> ApiResult<Vec<MusicVideo>> {
        MusicApiClient::music_videos(self, mbid).await
    }
}

/// Outcome for a single searched name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Artist found and merged, with the number of videos the lookup returned
    Merged { artist_name: String, videos: usize },
    /// MusicBrainz had no match for the name
    NotFound,
    /// A lookup failed; nothing was merged for this name
    Failed(String),
}

/// Tally of a batch search run
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    pub processed: usize,
    pub merged: usize,
    pub not_found: usize,
    pub failed: usize,
    pub outcomes: Vec<(String, SearchOutcome)>,
}

/// Sequential search queue over the collection store
pub struct SearchProcessor<'a, S: MusicSource> {
    store: &'a CollectionStore,
    source: &'a S,
}

impl<'a, S: MusicSource> SearchProcessor<'a, S> {
    pub fn new(store: &'a CollectionStore, source: &'a S) -> Self {
        Self { store, source }
    }

    /// Search one artist name and merge the result into the collection
    pub async fn process_one(&self, name: &str) -> Result<SearchOutcome> {
        let artist = match self.source.search_artist(name).await {
            Ok(Some(artist)) => artist,
            Ok(None) => {
                info!("🔍 No MusicBrainz match for '{}'", name);
                return Ok(SearchOutcome::NotFound);
            }
            Err(e) => {
                warn!("Artist search failed for '{}': {}", name, e);
                return Ok(SearchOutcome::Failed(e.to_string()));
            }
        };

        // A failed video lookup still records the artist, with zero videos
        let videos = match self.source.music_videos(&artist.id).await {
            Ok(videos) => videos,
            Err(e) => {
                warn!("Video lookup failed for '{}': {}", artist.name, e);
                Vec::new()
            }
        };

        let video_count = videos.len();
        merge_search_result(self.store, &artist, &videos).await?;
        info!("✅ Merged '{}' ({} videos)", artist.name, video_count);

        Ok(SearchOutcome::Merged {
            artist_name: artist.name,
            videos: video_count,
        })
    }

    /// Run the full queue of names, sequentially
    pub async fn process_batch(&self, names: &[String]) -> Result<SearchReport> {
        let start_time = Instant::now();
        info!("🚀 Processing {} artist names", names.len());

        let mut report = SearchReport::default();

        for name in names {
            let outcome = self.process_one(name).await?;
            report.processed += 1;
            match outcome {
                SearchOutcome::Merged { .. } => report.merged += 1,
                SearchOutcome::NotFound => report.not_found += 1,
                SearchOutcome::Failed(_) => report.failed += 1,
            }
            report.outcomes.push((name.clone(), outcome));
        }

        info!(
            "🎉 Batch complete in {:.1}s: {} merged, {} not found, {} failed",
            start_time.elapsed().as_secs_f64(),
            report.merged,
            report.not_found,
            report.failed
        );
        Ok(report)
    }
}
