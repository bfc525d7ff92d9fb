//! HTTP client for the delivery service endpoints.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dronz_core::models::{NamedRegion, Order, Restaurant};
use reqwest::Client;
use std::time::Duration;

/// Client for the delivery service REST API.
///
/// All methods are read-only GETs; errors carry the endpoint that failed.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client for the given base URL (no trailing slash
    /// required).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Health check; the service answers a bare JSON boolean.
    pub async fn is_alive(&self) -> Result<bool> {
        self.get_json("/isAlive").await
    }

    /// The central campus area polygon.
    pub async fn central_area(&self) -> Result<NamedRegion> {
        self.get_json("/centralArea").await
    }

    /// All configured no-fly zones.
    pub async fn no_fly_zones(&self) -> Result<Vec<NamedRegion>> {
        self.get_json("/noFlyZones").await
    }

    /// All restaurants participating in the scheme.
    pub async fn restaurants(&self) -> Result<Vec<Restaurant>> {
        self.get_json("/restaurants").await
    }

    /// Orders placed for the given date.
    pub async fn orders_by_date(&self, date: NaiveDate) -> Result<Vec<Order>> {
        self.get_json(&format!("/orders/{}", date.format("%Y-%m-%d")))
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "fetching");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;

        response
            .json()
            .await
            .with_context(|| format!("failed to decode response from {url}"))
    }
}
