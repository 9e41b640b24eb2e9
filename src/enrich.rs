/// Artist enrichment engine
///
/// Augments artist rows with the secondary attributes TheAudioDB knows
/// (images, genre, mood, style) after the initial merge. The detail lookup
/// is rate limited on the service side, so the batch runs strictly
/// sequentially with a fixed delay between requests.
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::{ApiResult, ArtistDetails, MusicApiClient};
use crate::collection::{ArtistEntry, CollectionStore};

/// Source of artist detail records, implemented by the TheAudioDB client
/// and by test stubs
#[async_trait]
pub trait ArtistDetailSource: Send + Sync {
    async fn artist_details(&self, adid: &str) -> ApiResult<Option<ArtistDetails>>;
}

#[async_trait]
impl ArtistDetailSource for MusicApiClient {
    async fn artist_details(&self, adid: &str) -> ApiResult<Option<ArtistDetails>> {
        MusicApiClient::artist_details(self, adid).await
    }
}

/// Tally of a bulk enrichment run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub success: usize,
    pub failed: usize,
}

/// Sequential enrichment engine over the collection store
pub struct ArtistEnricher<'a, S: ArtistDetailSource> {
    store: &'a CollectionStore,
    source: &'a S,
    request_delay: Duration,
}

impl<'a, S: ArtistDetailSource> ArtistEnricher<'a, S> {
    pub fn new(store: &'a CollectionStore, source: &'a S, request_delay_ms: u64) -> Self {
        Self {
            store,
            source,
            request_delay: Duration::from_millis(request_delay_ms),
        }
    }

    /// Enrich a single artist by ADID
    ///
    /// Returns `None` when the artist is unknown, the service has no record,
    /// or the fetch fails; the store is left untouched in all three cases.
    /// A populated field is only replaced by a non-blank source value.
    pub async fn enrich_one(&self, adid: &str) -> Result<Option<ArtistEntry>> {
        let (mut artist_data, video_data) = self.store.load().await?;

        let Some(pos) = artist_data.artists.iter().position(|a| a.adid == adid) else {
            debug!("No artist with ADID {} in collection, skipping", adid);
            return Ok(None);
        };

        let details = match self.source.artist_details(adid).await {
            Ok(Some(details)) => details,
            Ok(None) => {
                debug!("No detail record for ADID {}", adid);
                return Ok(None);
            }
            Err(e) => {
                warn!("Detail fetch failed for ADID {}: {}", adid, e);
                return Ok(None);
            }
        };

        let artist = &mut artist_data.artists[pos];
        apply_details(artist, &details);
        let enriched = artist.clone();

        self.store.save(&artist_data, &video_data).await?;
        debug!("Enriched artist {} ({})", enriched.name, adid);
        Ok(Some(enriched))
    }

    /// Enrich every artist in the collection, sequentially
    ///
    /// One failed artist never aborts the batch. The progress callback runs
    /// after every attempt with (current, total, success, failed).
    pub async fn enrich_all<F>(&self, mut on_progress: F) -> Result<EnrichmentReport>
    where
        F: FnMut(usize, usize, usize, usize),
    {
        let (artist_data, _) = self.store.load().await?;
        let adids: Vec<String> = artist_data.artists.iter().map(|a| a.adid.clone()).collect();
        let total = adids.len();

        info!("🎨 Enriching {} artists", total);
        let mut report = EnrichmentReport::default();

        for (index, adid) in adids.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.request_delay).await;
            }

            match self.enrich_one(adid).await? {
                Some(_) => report.success += 1,
                None => report.failed += 1,
            }

            on_progress(index + 1, total, report.success, report.failed);
        }

        info!(
            "✅ Enrichment complete: {} succeeded, {} failed",
            report.success, report.failed
        );
        Ok(report)
    }
}

/// Merge a detail record into an artist row
///
/// Blank source values never clear an existing field; non-blank values win.
fn apply_details(artist: &mut ArtistEntry, details: &ArtistDetails) {
    if artist.name.is_empty() && !details.name.is_empty() {
        artist.name = details.name.clone();
    }

    for (field, value) in [
        (&mut artist.thumbnail_url, &details.thumbnail_url),
        (&mut artist.banner_url, &details.banner_url),
        (&mut artist.logo_url, &details.logo_url),
        (&mut artist.wide_thumb_url, &details.wide_thumb_url),
        (&mut artist.genre, &details.genre),
        (&mut artist.mood, &details.mood),
        (&mut artist.style, &details.style),
    ] {
        if !value.is_empty() {
            *field = value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::collection::{ArtistDataFile, VideoDataFile};
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Stub detail source: canned records per ADID, failures per ADID
    struct StubSource {
        records: HashMap<String, ArtistDetails>,
        failing: Vec<String>,
    }

    #[async_trait]
    impl ArtistDetailSource for StubSource {
        async fn artist_details(&self, adid: &str) -> ApiResult<Option<ArtistDetails>> {
            if self.failing.contains(&adid.to_string()) {
                return Err(ApiError::Status {
                    service: "TheAudioDB",
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                });
            }
            Ok(self.records.get(adid).cloned())
        }
    }

    async fn seed_store(dir: &TempDir, adids: &[&str]) -> CollectionStore {
        let store = CollectionStore::new(dir.path().to_path_buf());
        let artist_data = ArtistDataFile {
            artists: adids
                .iter()
                .map(|adid| {
                    ArtistEntry::new(format!("mb-{}", adid), adid.to_string(), format!("Artist {}", adid))
                })
                .collect(),
        };
        store.save(&artist_data, &VideoDataFile::default()).await.unwrap();
        store
    }

    fn details(genre: &str, thumb: &str) -> ArtistDetails {
        ArtistDetails {
            genre: genre.to_string(),
            thumbnail_url: thumb.to_string(),
            ..ArtistDetails::default()
        }
    }

    #[tokio::test]
    async fn test_enrich_one_fills_fields() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, &["ad-1"]).await;

        let source = StubSource {
            records: HashMap::from([(
                "ad-1".to_string(),
                details("Electronic", "https://example.com/thumb.jpg"),
            )]),
            failing: vec![],
        };

        let enricher = ArtistEnricher::new(&store, &source, 0);
        let enriched = enricher.enrich_one("ad-1").await.unwrap().unwrap();
        assert_eq!(enriched.genre, "Electronic");
        assert_eq!(enriched.thumbnail_url, "https://example.com/thumb.jpg");

        let (artists, _) = store.load().await.unwrap();
        assert_eq!(artists.artists[0].genre, "Electronic");
    }

    #[tokio::test]
    async fn test_enrich_one_blank_never_clears() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, &["ad-1"]).await;

        let (mut artists, videos) = store.load().await.unwrap();
        artists.artists[0].genre = "Rock".to_string();
        store.save(&artists, &videos).await.unwrap();

        let source = StubSource {
            records: HashMap::from([("ad-1".to_string(), details("", "https://example.com/t.jpg"))]),
            failing: vec![],
        };

        let enricher = ArtistEnricher::new(&store, &source, 0);
        let enriched = enricher.enrich_one("ad-1").await.unwrap().unwrap();
        assert_eq!(enriched.genre, "Rock");
    }

    #[tokio::test]
    async fn test_enrich_one_nonblank_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, &["ad-1"]).await;

        let (mut artists, videos) = store.load().await.unwrap();
        artists.artists[0].genre = "Rock".to_string();
        store.save(&artists, &videos).await.unwrap();

        let source = StubSource {
            records: HashMap::from([("ad-1".to_string(), details("Pop", ""))]),
            failing: vec![],
        };

        let enricher = ArtistEnricher::new(&store, &source, 0);
        let enriched = enricher.enrich_one("ad-1").await.unwrap().unwrap();
        assert_eq!(enriched.genre, "Pop");
    }

    #[tokio::test]
    async fn test_enrich_one_unknown_artist_is_skip() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, &["ad-1"]).await;

        let source = StubSource {
            records: HashMap::new(),
            failing: vec![],
        };

        let enricher = ArtistEnricher::new(&store, &source, 0);
        assert!(enricher.enrich_one("ad-999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enrich_one_fetch_failure_leaves_store_unmodified() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, &["ad-1"]).await;
        let (before, _) = store.load().await.unwrap();

        let source = StubSource {
            records: HashMap::new(),
            failing: vec!["ad-1".to_string()],
        };

        let enricher = ArtistEnricher::new(&store, &source, 0);
        assert!(enricher.enrich_one("ad-1").await.unwrap().is_none());

        let (after, _) = store.load().await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_enrich_all_continues_past_failures() {
        let dir = TempDir::new().unwrap();
        let store = seed_store(&dir, &["ad-1", "ad-2", "ad-3"]).await;

        let source = StubSource {
            records: HashMap::from([
                ("ad-1".to_string(), details("Electronic", "")),
                ("ad-3".to_string(), details("Rock", "")),
            ]),
            failing: vec!["ad-2".to_string()],
        };

        let enricher = ArtistEnricher::new(&store, &source, 0);
        let mut progress_calls = Vec::new();
        let report = enricher
            .enrich_all(|current, total, success, failed| {
                progress_calls.push((current, total, success, failed));
            })
            .await
            .unwrap();

        assert_eq!(report, EnrichmentReport { success: 2, failed: 1 });
        assert_eq!(progress_calls.len(), 3);
        assert_eq!(progress_calls[2], (3, 3, 2, 1));

        let (artists, _) = store.load().await.unwrap();
        assert_eq!(artists.artists[0].genre, "Electronic");
        assert_eq!(artists.artists[1].genre, "");
        assert_eq!(artists.artists[2].genre, "Rock");
    }
}
