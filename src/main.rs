//! CLI entry point for the GBFS client.
//!
//! Provides subcommands for listing the feeds of a system, printing stations
//! with their availability, dumping any feed as JSON and appending feed
//! summaries to a CSV file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gbfs_client::{
    Client, Error, FeedKey,
    output::{export_feeds, print_json},
};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gbfs")]
#[command(about = "Fetch and inspect GBFS feeds", long_about = None)]
struct Cli {
    /// Root URL the feeds are published under
    #[arg(long, env = "GBFS_BASE_URL")]
    base_url: String,

    /// Language segment of the feed URLs
    #[arg(short, long, env = "GBFS_LANGUAGE")]
    language: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    /// Take feed URLs from gbfs.json instead of composing them
    #[arg(short, long, default_value_t = false)]
    discover: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the languages and feed URLs published in gbfs.json
    Discover,
    /// Print every station with its current availability
    Stations,
    /// Print any feed as JSON
    Feed {
        /// Feed key, e.g. system_information
        #[arg(value_name = "KEY", value_parser = parse_key)]
        key: FeedKey,
    },
    /// Append a summary row per feed to a CSV file
    Export {
        /// Feed keys to export (all when omitted)
        #[arg(value_name = "KEY", value_parser = parse_key)]
        keys: Vec<FeedKey>,

        /// CSV file to append results to
        #[arg(short, long, default_value = "feeds.csv")]
        output: PathBuf,
    },
}

fn parse_key(s: &str) -> std::result::Result<FeedKey, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + optional JSON rolling log file
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let (json_layer, _file_guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_dir = Path::new(&log_file_path)
                .parent()
                .unwrap_or(Path::new("logs"))
                .to_path_buf();
            let log_file_name = Path::new(&log_file_path)
                .file_name()
                .unwrap_or(OsStr::new("gbfs.log"))
                .to_os_string();

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(
                    EnvFilter::try_from_env("RUST_LOG_JSON")
                        .unwrap_or_else(|_| EnvFilter::new("debug")),
                );
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut builder = Client::builder()
        .base_url(&cli.base_url)
        .timeout(Duration::from_secs(cli.timeout));
    if let Some(language) = &cli.language {
        builder = builder.language(language);
    }
    let mut client = builder.build().context("Failed to build GBFS client")?;

    if cli.discover {
        client
            .use_auto_discovery(cli.language.as_deref())
            .context("Failed to read gbfs.json")?;
    }

    match cli.command {
        Commands::Discover => {
            let discovery = client.auto_discovery()?;
            info!(
                last_updated = %discovery.last_updated.to_datetime(),
                ttl = discovery.ttl,
                version = discovery.version.as_deref().unwrap_or("unknown"),
                "Auto-discovery fetched"
            );
            for (language, feeds) in &discovery.data.languages {
                for feed in &feeds.feeds {
                    println!("{}\t{}\t{}", language, feed.name, feed.url);
                }
            }
        }
        Commands::Stations => print_stations(&mut client)?,
        Commands::Feed { key } => {
            let feed = client.fetch_any(key)?;
            print_json(&feed)?;
        }
        Commands::Export { keys, output } => {
            let keys = if keys.is_empty() {
                FeedKey::ALL.to_vec()
            } else {
                keys
            };
            export_feeds(&mut client, &keys, &output).context("Failed to write export")?;
        }
    }

    Ok(())
}

/// Prints station information joined with station status, when published.
#[tracing::instrument(skip_all)]
fn print_stations(client: &mut Client) -> Result<()> {
    let info = client.station_information()?;

    let status = match client.station_status() {
        Ok(status) => Some(status),
        Err(e) if e.is_not_found() => {
            warn!("station_status is not published, printing locations only");
            None
        }
        Err(e) => return Err(e.into()),
    };

    for station in &info.data.stations {
        let availability = status
            .as_ref()
            .and_then(|s| s.data.station(&station.station_id));
        match availability {
            Some(a) => println!(
                "{}\t{}\tbikes={}\tdocks={}\trenting={}",
                station.station_id,
                station.name,
                a.num_bikes_available,
                a.num_docks_available.unwrap_or(0),
                a.is_renting
            ),
            None => println!(
                "{}\t{}\t{:.6},{:.6}",
                station.station_id, station.name, station.lat, station.lon
            ),
        }
    }

    info!(
        stations = info.data.stations.len(),
        last_updated = %info.last_updated.to_datetime(),
        "Stations printed"
    );
    Ok(())
}
