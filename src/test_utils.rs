//! Test doubles and rendering helpers shared by unit tests

use crate::api::{
    AnalyticsApi, Engagement, HashtagCount, HistoricalPoint, Post, TrendWindow, UserAnalytics,
};
use crate::error::{FetchError, FetchResult};
use async_trait::async_trait;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    RecentPosts {
        limit: usize,
        hashtag: Option<String>,
    },
    Trending {
        days: u32,
    },
    UserAnalytics(String),
    UserHistorical(String),
}

/// In-memory `AnalyticsApi`. Endpoints without canned data fail with a 503.
#[derive(Debug, Default)]
pub struct FakeApi {
    posts: Option<Vec<Post>>,
    trending: Option<Vec<HashtagCount>>,
    user: Option<UserAnalytics>,
    history: Option<Vec<HistoricalPoint>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = Some(posts);
        self
    }

    pub fn with_trending(mut self, tags: Vec<HashtagCount>) -> Self {
        self.trending = Some(tags);
        self
    }

    pub fn with_user(mut self, analytics: UserAnalytics) -> Self {
        self.user = Some(analytics);
        self
    }

    pub fn with_history(mut self, history: Vec<HistoricalPoint>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn respond<T: Clone>(data: &Option<T>, path: &str) -> FetchResult<T> {
        data.clone().ok_or_else(|| FetchError::Status {
            url: format!("http://fake{}", path),
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        })
    }
}

#[async_trait]
impl AnalyticsApi for FakeApi {
    async fn recent_posts(&self, limit: usize, hashtag: Option<&str>) -> FetchResult<Vec<Post>> {
        self.record(ApiCall::RecentPosts {
            limit,
            hashtag: hashtag.map(str::to_string),
        });
        Self::respond(&self.posts, "/posts")
    }

    async fn trending(&self, window: TrendWindow) -> FetchResult<Vec<HashtagCount>> {
        self.record(ApiCall::Trending {
            days: window.days(),
        });
        Self::respond(&self.trending, "/trending")
    }

    async fn user_analytics(&self, username: &str) -> FetchResult<UserAnalytics> {
        self.record(ApiCall::UserAnalytics(username.to_string()));
        Self::respond(&self.user, "/analytics/user")
    }

    async fn user_historical(&self, username: &str) -> FetchResult<Vec<HistoricalPoint>> {
        self.record(ApiCall::UserHistorical(username.to_string()));
        Self::respond(&self.history, "/analytics/user/historical")
    }
}

pub fn sample_post(id: &str, author: &str, likes: u64, reposts: u64, replies: u64) -> Post {
    Post {
        post_id: format!("at://{}/app.bsky.feed.post/{}", author, id),
        author: author.to_string(),
        author_display_name: format!("{} (display)", author),
        content: format!("post {} by {}", id, author),
        like_count: likes,
        repost_count: reposts,
        reply_count: replies,
        created_at: "2024-10-15T12:00:00Z".to_string(),
    }
}

pub fn sample_tag(hashtag: &str, count: u64) -> HashtagCount {
    HashtagCount {
        hashtag: hashtag.to_string(),
        count,
    }
}

pub fn sample_analytics(username: &str, post_count: u64) -> UserAnalytics {
    UserAnalytics {
        username: username.to_string(),
        post_count,
        engagement: Engagement {
            total_likes: 10,
            total_reposts: 4,
            total_replies: 1,
        },
        top_hashtags: vec![sample_tag("rust", 3), sample_tag("tui", 1)],
    }
}

pub fn sample_history() -> Vec<HistoricalPoint> {
    ["2024-08", "2024-09", "2024-10"]
        .iter()
        .enumerate()
        .map(|(i, month)| HistoricalPoint {
            month: month.to_string(),
            likes: 10 * (i as u64 + 1),
            reposts: 2 * i as u64,
            replies: i as u64,
        })
        .collect()
}

/// Thin wrapper around a `TestBackend` terminal.
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    pub fn new() -> Self {
        Self::with_size(100, 30)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        buffer_to_string(self.buffer()).contains(text)
    }
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
