mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::StatusCode;
use tracing::debug;

use crate::error::{Error, Result};

/// Status and body of a completed GET.
#[derive(Debug)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Issues a GET for `url` and reads the whole body, whatever the status.
pub fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Fetched> {
    let parsed = reqwest::Url::parse(url).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let req = reqwest::blocking::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req)?;
    let status = resp.status();
    let body = resp.bytes()?.to_vec();
    debug!(url, status = status.as_u16(), bytes = body.len(), "Response received");

    Ok(Fetched { status, body })
}
