/// Music Video Finder - Rust Implementation
///
/// Builds and maintains a local collection of music videos per artist,
/// backed by MusicBrainz for identity, TheAudioDB for videos and artwork,
/// and YouTube for playlists and thumbnails.

pub mod api;
pub mod collection;
pub mod config;
pub mod enrich;
pub mod processing;
pub mod youtube;

// Re-export main types for easy access
pub use crate::api::{Artist, ArtistDetails, MusicApiClient, MusicVideo};
pub use crate::collection::{
    ArtistDataFile, ArtistEntry, CollectionStore, ImportReport, VideoDataFile, VideoEntry,
};
pub use crate::config::Config;
pub use crate::enrich::{ArtistDetailSource, ArtistEnricher, EnrichmentReport};
pub use crate::processing::{SearchOutcome, SearchProcessor, SearchReport};
