use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;

/// Errors surfaced by the external API clients
///
/// "No results" conditions are not errors: artist search returns `None` and
/// video lookup returns an empty vec for those. Only transport and HTTP
/// failures end up here.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("YouTube API key not configured")]
    MissingApiKey,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Artist identity from MusicBrainz
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    /// MusicBrainz id
    pub id: String,
    pub name: String,
    /// Search match score, present on search results only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Raw music video record from TheAudioDB
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MusicVideo {
    #[serde(rename = "idArtist", default, deserialize_with = "null_to_empty")]
    pub id_artist: String,
    #[serde(rename = "idTrack", default, deserialize_with = "null_to_empty")]
    pub id_track: String,
    #[serde(rename = "strTrack", default, deserialize_with = "null_to_empty")]
    pub track: String,
    #[serde(rename = "strArtist", default, deserialize_with = "null_to_empty")]
    pub artist: String,
    #[serde(rename = "strTrackThumb", default)]
    pub track_thumb: Option<String>,
    #[serde(rename = "strMusicVid", default, deserialize_with = "null_to_empty")]
    pub music_vid: String,
    #[serde(rename = "strDescriptionEN", default)]
    pub description: Option<String>,
    #[serde(rename = "strMusicBrainzArtistID", default)]
    pub musicbrainz_artist_id: Option<String>,
}

/// Artist detail record from TheAudioDB, used for enrichment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistDetails {
    #[serde(rename = "strArtist", default, deserialize_with = "null_to_empty")]
    pub name: String,
    #[serde(rename = "strArtistThumb", default, deserialize_with = "null_to_empty")]
    pub thumbnail_url: String,
    #[serde(rename = "strArtistBanner", default, deserialize_with = "null_to_empty")]
    pub banner_url: String,
    #[serde(rename = "strArtistLogo", default, deserialize_with = "null_to_empty")]
    pub logo_url: String,
    #[serde(rename = "strArtistWideThumb", default, deserialize_with = "null_to_empty")]
    pub wide_thumb_url: String,
    #[serde(rename = "strGenre", default, deserialize_with = "null_to_empty")]
    pub genre: String,
    #[serde(rename = "strMood", default, deserialize_with = "null_to_empty")]
    pub mood: String,
    #[serde(rename = "strStyle", default, deserialize_with = "null_to_empty")]
    pub style: String,
}

/// One entry from a YouTube playlist listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub title: String,
}

/// Client for the external music metadata services
#[derive(Clone)]
pub struct MusicApiClient {
    config: ApiConfig,
    client: reqwest::Client,
}

impl MusicApiClient {
    pub fn new(config: ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { config, client }
    }

    /// Search MusicBrainz for an artist by name, returning the top match
    pub async fn search_artist(&self, name: &str) -> ApiResult<Option<Artist>> {
        let url = format!(
            "{}/artist?query={}&fmt=json",
            self.config.musicbrainz_endpoint,
            urlencoding::encode(name)
        );
        debug!("Searching MusicBrainz: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                service: "MusicBrainz",
                status: response.status(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        let Some(top) = body["artists"].as_array().and_then(|a| a.first()) else {
            info!("No MusicBrainz match for \"{}\"", name);
            return Ok(None);
        };

        Ok(Some(Artist {
            id: top["id"].as_str().unwrap_or("").to_string(),
            name: top["name"].as_str().unwrap_or("").to_string(),
            score: top["score"].as_f64(),
        }))
    }

    /// Fetch music videos for an artist MBID from TheAudioDB
    ///
    /// An empty or missing `mvids` member means no videos, not an error. The
    /// alternate endpoint is tried before a failure is surfaced.
    pub async fn music_videos(&self, mbid: &str) -> ApiResult<Vec<MusicVideo>> {
        if mbid.is_empty() {
            debug!("Skipping video lookup - missing MBID");
            return Ok(Vec::new());
        }

        let path = format!("mvid-mb.php?i={}", mbid);
        let body = self.audiodb_get(&path).await?;

        let videos = match body.get("mvids") {
            Some(serde_json::Value::Array(raw)) => raw
                .iter()
                .filter_map(|v| serde_json::from_value::<MusicVideo>(v.clone()).ok())
                .collect(),
            _ => {
                info!("No videos found for MBID {} ('mvids' is null)", mbid);
                Vec::new()
            }
        };

        Ok(videos)
    }

    /// Fetch detailed artist information for an ADID from TheAudioDB
    pub async fn artist_details(&self, adid: &str) -> ApiResult<Option<ArtistDetails>> {
        if adid.is_empty() {
            debug!("Skipping artist details lookup - missing ADID");
            return Ok(None);
        }

        let path = format!("artist.php?i={}", adid);
        let body = self.audiodb_get(&path).await?;

        let Some(raw) = body["artists"].as_array().and_then(|a| a.first()) else {
            info!("No TheAudioDB entry for ADID {}", adid);
            return Ok(None);
        };

        match serde_json::from_value::<ArtistDetails>(raw.clone()) {
            Ok(details) => {
                info!("Found artist details for {}", details.name);
                Ok(Some(details))
            }
            Err(e) => {
                warn!("Failed to decode artist details for {}: {}", adid, e);
                Ok(None)
            }
        }
    }

    /// GET a TheAudioDB path, falling back to the alternate host
    async fn audiodb_get(&self, path: &str) -> ApiResult<serde_json::Value> {
        let primary = format!("{}/{}", self.config.audiodb_endpoint, path);
        match self.audiodb_try(&primary).await {
            Ok(body) => Ok(body),
            Err(primary_err) => {
                let alternate = format!("{}/{}", self.config.audiodb_alternate_endpoint, path);
                warn!(
                    "Primary TheAudioDB endpoint failed ({}), trying alternate: {}",
                    primary_err, alternate
                );
                self.audiodb_try(&alternate).await
            }
        }
    }

    async fn audiodb_try(&self, url: &str) -> ApiResult<serde_json::Value> {
        debug!("Fetching from TheAudioDB: {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                service: "TheAudioDB",
                status: response.status(),
            });
        }
        Ok(response.json().await?)
    }

    /// List all items of a YouTube playlist, following pagination
    pub async fn playlist_items(&self, playlist_id: &str) -> ApiResult<Vec<PlaylistItem>> {
        let api_key = self
            .config
            .youtube_api_key
            .as_ref()
            .ok_or(ApiError::MissingApiKey)?;

        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/playlistItems?part=snippet&maxResults=50&playlistId={}&key={}",
                self.config.youtube_endpoint, playlist_id, api_key
            );
            if let Some(token) = &page_token {
                url.push_str(&format!("&pageToken={}", token));
            }

            let response = self.client.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(ApiError::Status {
                    service: "YouTube",
                    status: response.status(),
                });
            }

            let body: serde_json::Value = response.json().await?;
            if let Some(page_items) = body["items"].as_array() {
                for item in page_items {
                    if let Some(title) = item["snippet"]["title"].as_str() {
                        if !title.is_empty() {
                            items.push(PlaylistItem {
                                title: title.to_string(),
                            });
                        }
                    }
                }
            }

            match body["nextPageToken"].as_str() {
                Some(token) => page_token = Some(token.to_string()),
                None => break,
            }
        }

        info!("Fetched {} playlist items for {}", items.len(), playlist_id);
        Ok(items)
    }
}
