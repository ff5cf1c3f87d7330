//! Output formatting and persistence for feed summaries.
//!
//! Supports JSON printing, CSV append and exporting a batch of feeds.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::client::Client;
use crate::feed::FeedKey;
use crate::stats::FeedSummary;

/// Writes `value` to stdout as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a [`FeedSummary`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, summary: &FeedSummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

/// Fetches each feed in `keys` and appends one summary row per feed to
/// `path`. A feed that fails is recorded with its [`Error::kind`] and does
/// not stop the export; only CSV failures are returned.
///
/// [`Error::kind`]: crate::Error::kind
#[tracing::instrument(skip_all, fields(output = %path.display()))]
pub fn export_feeds(client: &mut Client, keys: &[FeedKey], path: &Path) -> Result<usize> {
    let mut exported = 0;

    for &key in keys {
        let url = client.url(key).to_string();
        let summary = match client.fetch_any(key) {
            Ok(feed) => {
                info!(feed = %key, entities = feed.data.entity_count(), "Feed fetched");
                FeedSummary::from_envelope(&feed)
            }
            Err(e) => {
                if e.is_not_found() {
                    info!(feed = %key, "Feed not published");
                } else {
                    error!(feed = %key, kind = e.kind(), error = %e, "Feed fetch failed");
                }
                FeedSummary::from_fetch_error(key, &e)
            }
        };

        append_record(path, &summary.with_url(&url))?;
        exported += 1;
    }

    info!(exported, "Export complete");
    Ok(exported)
}
