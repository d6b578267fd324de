//! Best-effort lookup of the host's public address

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Used only to tell players where to connect; never fails.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn public_address(&self) -> String;
}

pub struct HttpAddressLookup {
    client: reqwest::Client,
    url: String,
}

impl HttpAddressLookup {
    pub fn new(url: impl Into<String>) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn fetch(&self) -> reqwest::Result<String> {
        let text = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl AddressLookup for HttpAddressLookup {
    async fn public_address(&self) -> String {
        match self.fetch().await {
            Ok(address) if !address.is_empty() => address,
            Ok(_) => "unavailable (empty response)".to_string(),
            Err(err) => {
                warn!(url = %self.url, error = %err, "public address lookup failed");
                format!("unavailable ({err})")
            }
        }
    }
}
