//! HTTP feed fetcher
//!
//! This module handles the single GET a crawl makes per operation:
//! - Building the HTTP client with the crawler's user agent and timeouts
//! - Fetching the raw feed body
//! - Classifying failures into [`FetchError`]
//!
//! There is no retry here; re-running a failed crawl is the caller's decision.

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Formats the user agent as `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `fetcher` - Timeouts and scheme policy
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    fetcher: &FetcherConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .https_only(fetcher.https_only)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves raw feed documents over HTTP(S)
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Creates a fetcher from configuration
    pub fn new(fetcher: &FetcherConfig, user_agent: &UserAgentConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_http_client(fetcher, user_agent)?,
        })
    }

    /// Fetches the body at `url`
    ///
    /// Any non-2xx status is an error; redirects are followed by the client.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Fetching feed {}", parsed);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(url, e))?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
