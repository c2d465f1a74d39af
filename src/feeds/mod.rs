pub mod posts;
pub mod trending;
pub mod user_analytics;

use crate::api::{AnalyticsApi, HashtagCount, HistoricalPoint, Post, TrendWindow, UserAnalytics};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type RequestId = u64;

/// Identifies where a fetch result has to go: the view generation that
/// issued it and the request within that view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub mount: u64,
    pub request: RequestId,
}

#[derive(Debug, Clone)]
pub struct FeedMessage {
    pub ticket: Ticket,
    pub data: FeedData,
}

#[derive(Debug, Clone)]
pub enum FeedData {
    Posts(Vec<Post>),
    Trending(Vec<HashtagCount>),
    UserAnalytics {
        analytics: UserAnalytics,
        historical: Option<Vec<HistoricalPoint>>,
    },
    Error(String),
}

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self) -> Result<FeedData>;
}

/// What a view wants fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    RecentPosts {
        limit: usize,
        hashtag: Option<String>,
    },
    Trending {
        window: TrendWindow,
    },
    UserAnalytics {
        username: String,
    },
}

impl FetchRequest {
    pub fn into_fetcher(self, api: Arc<dyn AnalyticsApi>) -> Box<dyn FeedFetcher> {
        match self {
            Self::RecentPosts { limit, hashtag } => {
                Box::new(posts::RecentPostsFetcher::new(api, limit, hashtag))
            }
            Self::Trending { window } => Box::new(trending::TrendingFetcher::new(api, window)),
            Self::UserAnalytics { username } => {
                Box::new(user_analytics::UserAnalyticsFetcher::new(api, username))
            }
        }
    }
}

/// A request paired with the id its result will come back under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issued {
    pub id: RequestId,
    pub request: FetchRequest,
    /// Earlier request from the same slot that this one replaces
    pub supersedes: Option<RequestId>,
}

/// Hands out request ids. Ids are never reused for the life of the app.
#[derive(Debug, Default)]
pub struct RequestSeq {
    next: RequestId,
}

impl RequestSeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> RequestId {
        self.next += 1;
        self.next
    }
}

/// One independently fetched piece of view state.
///
/// Only the most recently issued request is accepted; anything older was
/// superseded and its result is dropped.
#[derive(Debug, Default)]
pub struct FetchSlot {
    latest: Option<RequestId>,
}

impl FetchSlot {
    pub fn issue(&mut self, seq: &mut RequestSeq, request: FetchRequest) -> Issued {
        let id = seq.next_id();
        let supersedes = self.latest.replace(id);
        Issued {
            id,
            request,
            supersedes,
        }
    }

    /// Claim a result. Returns false for ids this slot is no longer waiting on.
    pub fn accept(&mut self, id: RequestId) -> bool {
        if self.latest == Some(id) {
            self.latest = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.latest
    }
}
