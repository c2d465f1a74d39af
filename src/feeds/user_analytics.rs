use super::{FeedData, FeedFetcher};
use crate::api::AnalyticsApi;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Fetches a user's aggregate analytics together with the monthly history.
///
/// The history is optional: if that request fails the aggregate is still
/// delivered without it.
pub struct UserAnalyticsFetcher {
    api: Arc<dyn AnalyticsApi>,
    username: String,
}

impl UserAnalyticsFetcher {
    pub fn new(api: Arc<dyn AnalyticsApi>, username: String) -> Self {
        Self { api, username }
    }
}

#[async_trait]
impl FeedFetcher for UserAnalyticsFetcher {
    async fn fetch(&self) -> Result<FeedData> {
        let (analytics, historical) = futures::join!(
            self.api.user_analytics(&self.username),
            self.api.user_historical(&self.username)
        );

        let analytics = analytics?;
        let historical = match historical {
            Ok(points) => Some(points),
            Err(e) => {
                tracing::warn!("Historical analytics for {} unavailable: {}", self.username, e);
                None
            }
        };

        Ok(FeedData::UserAnalytics {
            analytics,
            historical,
        })
    }
}
