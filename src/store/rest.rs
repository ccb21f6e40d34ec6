//! Read-only client for the hosted backend's auto-generated data API.

use super::{RecordStore, StoreError};
use crate::config::SourceConfig;
use crate::models::TeardownRecord;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Store that queries the `teardowns` table over REST.
pub struct RestStore {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
    published_only: bool,
}

impl RestStore {
    /// Create a store from the `[source]` config section.
    pub fn from_config(config: &SourceConfig) -> Result<Self, StoreError> {
        let base_url = config
            .api_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| StoreError::Config("no API URL set".to_string()))?;

        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| StoreError::Config("no API key set".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        info!("Using data API at {}", base_url);

        Ok(Self {
            http_client,
            base_url,
            api_key,
            table: config.table.clone(),
            published_only: config.published_only,
        })
    }

    /// Query URL for the full listing, newest first.
    fn list_url(&self) -> String {
        let mut url = format!(
            "{}/rest/v1/{}?select=*&order=created_at.desc",
            self.base_url, self.table
        );
        if self.published_only {
            url.push_str("&status=eq.published");
        }
        url
    }

    /// Request for a single row by id, sent as an encoded query value.
    fn item_request(&self, id: &str) -> reqwest::RequestBuilder {
        self.authorized(self.http_client.get(format!(
            "{}/rest/v1/{}",
            self.base_url, self.table
        )))
        .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn get_json(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<TeardownRecord>, StoreError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, body });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn fetch_teardowns(&self) -> Result<Vec<TeardownRecord>, StoreError> {
        let url = self.list_url();
        debug!("GET {}", url);

        let records = self
            .get_json(self.authorized(self.http_client.get(url)))
            .await?;
        info!("Fetched {} teardowns from data API", records.len());
        Ok(records)
    }

    async fn fetch_teardown(&self, id: &str) -> Result<TeardownRecord, StoreError> {
        debug!("GET teardown {}", id);

        self.get_json(self.item_request(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn describe(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}
