//! Blocking client and typed model for General Bikeshare Feed Specification
//! (GBFS) feeds.
//!
//! ```no_run
//! use gbfs_client::Client;
//!
//! let mut client = Client::builder()
//!     .base_url("https://gbfs.example.com/gbfs")
//!     .language("en")
//!     .build()?;
//!
//! let stations = client.station_information()?;
//! for s in &stations.data.stations {
//!     println!("{} ({} docks)", s.name, s.capacity.unwrap_or(0));
//! }
//! # Ok::<(), gbfs_client::Error>(())
//! ```

pub mod client;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod output;
pub mod resolver;
pub mod stats;

pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use feed::{AnyFeed, Envelope, FeedKey, FeedPayload};
