//! Remote photo retrieval.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Response;

use crate::config::ReportFeat;

/// Retrieves the bytes behind an image URL.
///
/// A fetcher never fails loudly: any problem yields `None` and the caller
/// skips that photo.
pub trait AssetFetcher {
    /// The body behind `url`, or `None` when it cannot be retrieved.
    fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

/// Fetches photos over plain HTTP(S) GET, one attempt per URL.
///
/// Nothing is cached. The same URL listed twice is downloaded twice.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// A fetcher using the user agent and timeout of `feat`.
    pub fn new(feat: &ReportFeat) -> Self {
        Self {
            user_agent: feat.user_agent.clone(),
            timeout: feat.fetch_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        debug!("fetching image {url}");

        threaded_http(url, self, |resp| {
            let response = match resp.and_then(|r| r.error_for_status()) {
                Ok(response) => response,
                Err(err) => {
                    warn!("cannot fetch image {url}: {err}");
                    return None;
                }
            };

            match response.bytes() {
                Ok(bytes) => Some(bytes.to_vec()),
                Err(err) => {
                    warn!("cannot read image body from {url}: {err}");
                    None
                }
            }
        })
        .flatten()
    }
}

/// Runs a blocking request on a scoped thread, so that the blocking client
/// is never created or dropped inside an async runtime of the caller.
fn threaded_http<T: Send + Sync>(
    url: &str,
    fetcher: &HttpFetcher,
    f: impl FnOnce(Result<Response, reqwest::Error>) -> T + Send + Sync,
) -> Option<T> {
    std::thread::scope(|s| {
        s.spawn(move || {
            let mut client_builder = reqwest::blocking::Client::builder();
            if let Some(user_agent) = &fetcher.user_agent {
                client_builder = client_builder.user_agent(user_agent.as_str());
            }
            if let Some(timeout) = fetcher.timeout {
                client_builder = client_builder.timeout(timeout);
            }

            let resp = client_builder
                .build()
                .and_then(|client| client.get(url).send());
            f(resp)
        })
        .join()
        .ok()
    })
}

/// Serves photos from memory. Useful when the caller already holds the bytes,
/// and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// An empty fetcher. Every URL is unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `data` as the body of `url`.
    pub fn with(mut self, url: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.assets.insert(url.into(), data.into());
        self
    }
}

impl AssetFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        let data = self.assets.get(url).cloned();
        if data.is_none() {
            warn!("cannot fetch image {url}: not found");
        }
        data
    }
}

impl<F: AssetFetcher + ?Sized> AssetFetcher for &F {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        (**self).fetch(url)
    }
}

impl<F: AssetFetcher + ?Sized> AssetFetcher for Box<F> {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        (**self).fetch(url)
    }
}

/// The lowercase file extension of a URL path, ignoring any query string or
/// fragment.
pub fn declared_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = file.rsplit_once('.')?;

    (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
}
