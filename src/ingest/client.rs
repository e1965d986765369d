use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::EntitySource;
use super::transform::RawEntity;
use crate::error::{GraphError, GraphResult};

/// HTTP client for the remote entity API
pub struct EntityApiClient {
    client: Client,
    base_url: String,
}

/// Records are kept as raw JSON here so one malformed entry cannot sink the page
#[derive(Deserialize)]
struct EntityPage {
    #[serde(default)]
    entities: Option<Vec<Value>>,
}

impl EntityApiClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl EntitySource for EntityApiClient {
    async fn fetch_page(&self, page: usize, limit: usize) -> GraphResult<Option<Vec<RawEntity>>> {
        let url = format!("{}/entities?page={}&limit={}", self.base_url, page, limit);
        tracing::info!("Fetching: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| GraphError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GraphError::Http { url, source })?;

        if !status.is_success() {
            return Err(GraphError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let page: EntityPage = serde_json::from_str(&body)?;
        Ok(page
            .entities
            .map(|records| records.into_iter().map(RawEntity::from_value).collect()))
    }
}
