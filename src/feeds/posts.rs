use super::{FeedData, FeedFetcher};
use crate::api::AnalyticsApi;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub struct RecentPostsFetcher {
    api: Arc<dyn AnalyticsApi>,
    limit: usize,
    hashtag: Option<String>,
}

impl RecentPostsFetcher {
    pub fn new(api: Arc<dyn AnalyticsApi>, limit: usize, hashtag: Option<String>) -> Self {
        Self {
            api,
            limit,
            hashtag,
        }
    }
}

#[async_trait]
impl FeedFetcher for RecentPostsFetcher {
    async fn fetch(&self) -> Result<FeedData> {
        let posts = self
            .api
            .recent_posts(self.limit, self.hashtag.as_deref())
            .await?;
        tracing::debug!("Fetched {} posts", posts.len());
        Ok(FeedData::Posts(posts))
    }
}
