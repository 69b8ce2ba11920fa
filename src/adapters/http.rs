use crate::domain::model::{Page, Record};
use crate::domain::ports::{ConfigProvider, ProductSource};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Fixed filter set for the product search: country tag and packaging tag,
/// both matched with "contains".
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub country: String,
    pub packaging: String,
    pub page_size: usize,
    pub fields: Vec<String>,
}

impl SearchQuery {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            country: config.country().to_string(),
            packaging: config.packaging().to_string(),
            page_size: config.page_size(),
            fields: config.fields().to_vec(),
        }
    }

    pub fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("action", "process".to_string()),
            ("tagtype_0", "countries".to_string()),
            ("tag_contains_0", "contains".to_string()),
            ("tag_0", self.country.clone()),
            ("tagtype_1", "packaging".to_string()),
            ("tag_contains_1", "contains".to_string()),
            ("tag_1", self.packaging.clone()),
            ("page_size", self.page_size.to_string()),
            ("page", page.to_string()),
            ("json", "1".to_string()),
            ("fields", self.fields.join(",")),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Option<Vec<Record>>,
}

pub struct SearchClient {
    client: Client,
    endpoint: String,
    query: SearchQuery,
}

impl SearchClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            query: SearchQuery::from_config(config),
        })
    }
}

#[async_trait]
impl ProductSource for SearchClient {
    async fn fetch_page(&self, page: u32) -> Result<Page> {
        tracing::debug!("Requesting page {} from {}", page, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query.params(page))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        // Error statuses end the run like transport errors, even when the body is JSON.
        if !status.is_success() {
            return Err(EtlError::HttpStatusError {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&body)?;

        Ok(Page {
            number: page,
            records: parsed.products.unwrap_or_default(),
        })
    }
}
