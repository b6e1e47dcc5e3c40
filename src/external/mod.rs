use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Logo formats probed on the asset host, most preferred first.
const LOGO_EXTENSIONS: [&str; 3] = ["svg", "png", "webp"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no logo found for `{0}`")]
    Missing(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Fetches one asset so that it lands in the host's (and any intermediary's) cache.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<(), FetchError>;
}

/// Static asset host serving `/coin-logos/<ticker>.<ext>`.
pub struct AssetHost {
    client: Client,
    base_url: String,
}

impl AssetHost {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(AssetHost {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn logo_url(&self, ticker: &str, ext: &str) -> String {
        format!("{}/coin-logos/{ticker}.{ext}", self.base_url)
    }
}

#[async_trait]
impl AssetFetcher for AssetHost {
    async fn fetch(&self, id: &str) -> Result<(), FetchError> {
        for ext in LOGO_EXTENSIONS {
            let response = self.client.get(self.logo_url(id, ext)).send().await?;
            match response.status() {
                status if status.is_success() => {
                    // Drain the body so the full asset is transferred.
                    response.bytes().await?;
                    return Ok(());
                }
                StatusCode::NOT_FOUND => continue,
                _ => {
                    response.error_for_status()?;
                }
            }
        }
        Err(FetchError::Missing(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_logo_urls() {
        let host = AssetHost::new("https://cdn.example/").unwrap();
        assert_eq!(
            host.logo_url("HEX", "svg"),
            "https://cdn.example/coin-logos/HEX.svg"
        );
    }
}
