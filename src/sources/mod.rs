//! This module provides the storefront sources the poll cycle reads from
//! and [`Registry`], the static list of them.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::{StdResult, models::Game};

mod epic;
mod humble;
mod steam;
mod ubisoft;

pub use epic::Epic;
pub use humble::Humble;
pub use steam::Steam;
pub use ubisoft::Ubisoft;

/// Anything that makes a source's data unusable for one cycle.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected payload shape: {0}")]
    MissingField(&'static str),
    #[error("Gave up after {0:?}")]
    Timeout(Duration),
    #[error("Source task panicked")]
    Panicked,
}

/// Static metadata of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Stable id, referenced by stored games and destination configs.
    pub id: &'static str,
    pub name: &'static str,
    pub color: u32,
}

#[async_trait]
pub trait Source: Send + Sync {
    fn descriptor(&self) -> &Descriptor;

    /// Performs the request for this source's listing.
    async fn fetch(&self) -> StdResult<String, SourceError>;

    /// Narrows a fetched listing down to games that are free for a limited
    /// time. A well-formed listing with nothing free is `Ok(vec![])`.
    async fn parse(&self, raw: String) -> StdResult<Vec<Game>, SourceError>;

    async fn free_games(&self) -> StdResult<Vec<Game>, SourceError> {
        let raw = self.fetch().await?;
        self.parse(raw).await
    }
}

/// Every source the bot polls.
#[derive(Clone, Default)]
pub struct Registry {
    sources: Vec<Arc<dyn Source>>,
}

impl Registry {
    /// Registers the built-in storefronts.
    pub fn builtin(http: reqwest::Client) -> Self {
        let mut registry = Self::default();
        registry.register(Arc::new(Epic::new(http.clone())));
        registry.register(Arc::new(Humble::new(http.clone())));
        registry.register(Arc::new(Steam::new(http.clone())));
        registry.register(Arc::new(Ubisoft::new(http)));
        registry
    }

    /// Adds a source. A source with an id that's already registered
    /// replaces the previous one.
    pub fn register(&mut self, source: Arc<dyn Source>) {
        let id = source.descriptor().id;
        self.sources.retain(|s| s.descriptor().id != id);
        self.sources.push(source);
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Source>> {
        self.sources.iter().find(|s| s.descriptor().id == id)
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.descriptor().id).collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.sources.iter().map(|s| s.descriptor())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.iter()
    }
}

/// Builds the HTTP client shared by all sources.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
}

/// GETs `url` and returns its body, treating non-2xx as an error.
async fn get_text(
    http: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
) -> StdResult<String, SourceError> {
    Ok(http
        .get(url)
        .headers(headers)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?)
}
