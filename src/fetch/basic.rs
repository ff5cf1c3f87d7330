use std::time::Duration;

use super::client::HttpClient;

pub struct BasicClient(reqwest::blocking::Client);

impl BasicClient {
    /// A client with reqwest's defaults (30 second timeout).
    pub fn new() -> Self {
        Self(reqwest::blocking::Client::new())
    }

    /// A client with explicit timeouts. `None` keeps reqwest's default.
    pub fn with_timeouts(
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        Ok(Self(builder.build()?))
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

impl From<reqwest::blocking::Client> for BasicClient {
    fn from(client: reqwest::blocking::Client) -> Self {
        Self(client)
    }
}

impl HttpClient for BasicClient {
    fn execute(&self, req: reqwest::blocking::Request) -> reqwest::Result<reqwest::blocking::Response> {
        self.0.execute(req)
    }
}
