use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing::{error, info, warn};

use music_video_finder::{
    api::MusicApiClient,
    collection::{self, CollectionStore},
    config::Config,
    enrich::ArtistEnricher,
    processing::SearchProcessor,
    youtube,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("music_video_finder=info,warn")
        .init();

    let matches = Command::new("Music Video Finder")
        .version("0.1.0")
        .author("TigreRoll")
        .about("Builds a local music video collection from MusicBrainz, TheAudioDB and YouTube")
        .subcommand_required(true)
        .subcommand(
            Command::new("search")
                .about("Search one artist and merge their videos into the collection")
                .arg(Arg::new("name").value_name("NAME").required(true)),
        )
        .subcommand(
            Command::new("batch")
                .about("Search every artist name listed in a text file, one per line")
                .arg(Arg::new("file").value_name("FILE").required(true)),
        )
        .subcommand(
            Command::new("playlist")
                .about("Extract artist names from a YouTube playlist and search them all")
                .arg(Arg::new("playlist").value_name("URL_OR_ID").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Import a previously exported JSON file into the collection")
                .arg(Arg::new("file").value_name("FILE").required(true)),
        )
        .subcommand(
            Command::new("enrich")
                .about("Fetch artwork, genre, mood and style for every artist"),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete artists and all their videos by ADID")
                .arg(
                    Arg::new("adids")
                        .value_name("ADID")
                        .required(true)
                        .num_args(1..),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write the collection to a JSON export file")
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .value_parser(["artists", "videos", "combined", "legacy-v2"])
                        .default_value("combined"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .help("Output directory for the export file")
                        .default_value("."),
                ),
        )
        .subcommand(Command::new("stats").about("Show artist and video counts"))
        .subcommand(
            Command::new("reset")
                .about("Delete all collection data files")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .help("Confirm the reset")
                        .action(ArgAction::SetTrue),
                ),
        )
        .get_matches();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });
    config.validate()?;

    let store = CollectionStore::new(config.storage.data_dir.clone());
    let client = MusicApiClient::new(config.api.clone());

    match matches.subcommand() {
        Some(("search", sub)) => {
            let name = sub.get_one::<String>("name").cloned().unwrap_or_default();
            let processor = SearchProcessor::new(&store, &client);
            processor.process_one(&name).await?;
            print_stats(&store).await?;
        }
        Some(("batch", sub)) => {
            let file = sub.get_one::<String>("file").cloned().unwrap_or_default();
            let content = tokio::fs::read_to_string(&file).await?;
            let names = collection::parse_artist_names(&content);
            if names.is_empty() {
                warn!("No artist names found in {}", file);
                return Ok(());
            }
            let processor = SearchProcessor::new(&store, &client);
            processor.process_batch(&names).await?;
            print_stats(&store).await?;
        }
        Some(("playlist", sub)) => {
            let raw = sub
                .get_one::<String>("playlist")
                .cloned()
                .unwrap_or_default();
            let Some(playlist_id) = youtube::extract_playlist_id(&raw) else {
                error!("Not a recognizable playlist URL or id: {}", raw);
                return Err(anyhow::anyhow!("Invalid playlist reference"));
            };

            info!("📺 Fetching playlist {}", playlist_id);
            let items = client.playlist_items(&playlist_id).await?;
            let titles: Vec<String> = items.into_iter().map(|i| i.title).collect();
            let names = youtube::artists_from_titles(&titles);
            info!(
                "🎤 Extracted {} artist names from {} titles",
                names.len(),
                titles.len()
            );
            if names.is_empty() {
                warn!("No 'Artist - Title' entries in this playlist");
                return Ok(());
            }

            let processor = SearchProcessor::new(&store, &client);
            processor.process_batch(&names).await?;
            print_stats(&store).await?;
        }
        Some(("import", sub)) => {
            let file = sub.get_one::<String>("file").cloned().unwrap_or_default();
            let raw = tokio::fs::read_to_string(&file).await?;
            let report = collection::import_json(&store, &raw).await?;
            info!(
                "📥 Imported {} rows, collection now {} artists / {} videos",
                report.rows_added, report.artist_count, report.video_count
            );
        }
        Some(("enrich", _)) => {
            let enricher =
                ArtistEnricher::new(&store, &client, config.enrichment.request_delay_ms);
            enricher
                .enrich_all(|current, total, success, failed| {
                    info!(
                        "🎨 Enriching {}/{} ({} ok, {} failed)",
                        current, total, success, failed
                    );
                })
                .await?;
        }
        Some(("delete", sub)) => {
            let adids: Vec<String> = sub
                .get_many::<String>("adids")
                .map(|v| v.cloned().collect())
                .unwrap_or_default();
            collection::delete_artists(&store, &adids).await?;
            print_stats(&store).await?;
        }
        Some(("export", sub)) => {
            let format = sub
                .get_one::<String>("format")
                .cloned()
                .unwrap_or_else(|| "combined".to_string());
            let output = PathBuf::from(
                sub.get_one::<String>("output")
                    .cloned()
                    .unwrap_or_else(|| ".".to_string()),
            );
            export_collection(&store, &format, &output).await?;
        }
        Some(("stats", _)) => {
            print_stats(&store).await?;
        }
        Some(("reset", sub)) => {
            if !sub.get_flag("yes") {
                error!("Refusing to reset without --yes");
                return Err(anyhow::anyhow!("Reset not confirmed"));
            }
            store.reset().await?;
            info!("🗑️ Collection reset");
        }
        _ => unreachable!("subcommand required"),
    }

    Ok(())
}

async fn print_stats(store: &CollectionStore) -> Result<()> {
    let stats = store.stats().await?;
    info!(
        "📊 Collection: {} artists, {} videos",
        stats.artist_count, stats.video_count
    );
    Ok(())
}

async fn export_collection(store: &CollectionStore, format: &str, output: &PathBuf) -> Result<()> {
    let (artists, videos) = store.load().await?;

    let (prefix, json) = match format {
        "artists" => (
            "artist-data",
            serde_json::to_string_pretty(&artists)?,
        ),
        "videos" => ("video-data", serde_json::to_string_pretty(&videos)?),
        "legacy-v2" => (
            "music-collection-v2",
            serde_json::to_string_pretty(&collection::export::legacy_v2(&artists, &videos))?,
        ),
        _ => (
            "music-collection",
            serde_json::to_string_pretty(&collection::export::combined_snapshot(
                &artists, &videos,
            ))?,
        ),
    };

    let filename = collection::export::export_filename(
        prefix,
        artists.artists.len(),
        videos.videos.len(),
    );
    let path = output.join(filename);
    tokio::fs::create_dir_all(output).await?;
    tokio::fs::write(&path, json).await?;
    info!("💾 Exported {} format to {}", format, path.display());
    Ok(())
}
