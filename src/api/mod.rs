pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{
    format_average, total_engagement, Engagement, HashtagCount, HistoricalPoint, Post,
    TrendWindow, UserAnalytics,
};

use crate::error::FetchResult;
use async_trait::async_trait;

/// Read-only endpoints of the analytics backend.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// `GET /posts?limit=N[&hashtag=T]`
    async fn recent_posts(&self, limit: usize, hashtag: Option<&str>) -> FetchResult<Vec<Post>>;

    /// `GET /trending?days=D`
    async fn trending(&self, window: TrendWindow) -> FetchResult<Vec<HashtagCount>>;

    /// `GET /analytics/user/{username}`
    async fn user_analytics(&self, username: &str) -> FetchResult<UserAnalytics>;

    /// `GET /analytics/user/{username}/historical`
    async fn user_historical(&self, username: &str) -> FetchResult<Vec<HistoricalPoint>>;
}
