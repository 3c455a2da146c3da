//! HTTP client for the scheduling API

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use weekboard_core::protocol::{DashboardPayload, FreeBusyUser, parse_dashboard, parse_free_busy, parse_users};
use weekboard_core::user_directory::{UserInfo, UserInfoFetcher};
use weekboard_core::{WeekboardConfig, WeekboardError, WeekboardResult};

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Client {
    pub fn new(config: &WeekboardConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let mut req = self.http.get(format!("{}{}", self.base_url, path)).query(query);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        tracing::debug!(path, "GET");
        let resp = req.send().await.context("Failed to connect to server")?;

        if !resp.status().is_success() {
            anyhow::bail!("Server returned HTTP {} for {}", resp.status(), path);
        }

        Ok(resp.text().await?)
    }

    /// GET /v1/calendar/dashboard
    pub async fn dashboard(&self, start: i64, end: i64) -> Result<DashboardPayload> {
        let body = self
            .get_text(
                "/v1/calendar/dashboard",
                &[("start", start.to_string()), ("end", end.to_string())],
            )
            .await?;
        Ok(parse_dashboard(&body)?)
    }

    /// GET /v1/calendar/freebusy
    pub async fn free_busy(&self, uids: &[String], start: i64, end: i64) -> Result<Vec<FreeBusyUser>> {
        let body = self
            .get_text(
                "/v1/calendar/freebusy",
                &[
                    ("uids", uids.join(",")),
                    ("start", start.to_string()),
                    ("end", end.to_string()),
                ],
            )
            .await?;
        Ok(parse_free_busy(&body)?)
    }

    /// GET /v1/users
    pub async fn users(&self, ids: &[String]) -> Result<Vec<UserInfo>> {
        let body = self.get_text("/v1/users", &[("ids", ids.join(","))]).await?;
        Ok(parse_users(&body)?)
    }
}

#[async_trait]
impl UserInfoFetcher for Client {
    async fn fetch(&self, ids: &[String]) -> WeekboardResult<Vec<UserInfo>> {
        self.users(ids)
            .await
            .map_err(|e| WeekboardError::UserLookup(e.to_string()))
    }
}
