use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, ClientBuilder};

/// Charset of Náyade pages, used when the response doesn't name one.
pub const PAGE_CHARSET: &str = "ISO-8859-1";

pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("GET {url}");

        let page = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text_with_charset(PAGE_CHARSET))
            .with_context(|| format!("Couldn't download {url}"))?;

        Ok(page)
    }
}
