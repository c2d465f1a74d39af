use super::{FeedData, FeedFetcher};
use crate::api::{AnalyticsApi, TrendWindow};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub struct TrendingFetcher {
    api: Arc<dyn AnalyticsApi>,
    window: TrendWindow,
}

impl TrendingFetcher {
    pub fn new(api: Arc<dyn AnalyticsApi>, window: TrendWindow) -> Self {
        Self { api, window }
    }
}

#[async_trait]
impl FeedFetcher for TrendingFetcher {
    async fn fetch(&self) -> Result<FeedData> {
        let hashtags = self.api.trending(self.window).await?;
        tracing::debug!(
            "Fetched {} trending hashtags for {}",
            hashtags.len(),
            self.window
        );
        Ok(FeedData::Trending(hashtags))
    }
}
