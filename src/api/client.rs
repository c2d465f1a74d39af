use super::{AnalyticsApi, HashtagCount, HistoricalPoint, Post, TrendWindow, UserAnalytics};
use crate::config::ApiConfig;
use crate::error::{FetchError, FetchResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// HTTP client for the analytics backend. The base URL is injected at
/// construction; nothing here reads global state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("skypulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn posts_url(&self, limit: usize, hashtag: Option<&str>) -> String {
        match hashtag {
            Some(tag) => format!(
                "{}/posts?limit={}&hashtag={}",
                self.base_url,
                limit,
                urlencoding::encode(tag)
            ),
            None => format!("{}/posts?limit={}", self.base_url, limit),
        }
    }

    fn trending_url(&self, window: TrendWindow) -> String {
        format!("{}/trending?days={}", self.base_url, window.days())
    }

    fn user_url(&self, username: &str) -> String {
        format!(
            "{}/analytics/user/{}",
            self.base_url,
            urlencoding::encode(username)
        )
    }

    fn historical_url(&self, username: &str) -> String {
        format!("{}/historical", self.user_url(username))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> FetchResult<T> {
        tracing::debug!("GET {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

#[async_trait]
impl AnalyticsApi for ApiClient {
    async fn recent_posts(&self, limit: usize, hashtag: Option<&str>) -> FetchResult<Vec<Post>> {
        self.get_json(self.posts_url(limit, hashtag)).await
    }

    async fn trending(&self, window: TrendWindow) -> FetchResult<Vec<HashtagCount>> {
        self.get_json(self.trending_url(window)).await
    }

    async fn user_analytics(&self, username: &str) -> FetchResult<UserAnalytics> {
        self.get_json(self.user_url(username)).await
    }

    async fn user_historical(&self, username: &str) -> FetchResult<Vec<HistoricalPoint>> {
        self.get_json(self.historical_url(username)).await
    }
}
