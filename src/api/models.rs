//! Typed records for the analytics API responses

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
    pub post_id: String,
    pub author: String,
    pub author_display_name: String,
    pub content: String,
    pub like_count: u64,
    pub repost_count: u64,
    pub reply_count: u64,
    /// Kept as sent; the backend emits RFC 3339 or HTTP-date text
    pub created_at: String,
}

impl Post {
    pub fn engagement(&self) -> u64 {
        self.like_count + self.repost_count + self.reply_count
    }

    pub fn display_date(&self) -> String {
        format_date_in(&self.created_at, &Local)
    }
}

/// Sum of likes, reposts and replies over every post.
pub fn total_engagement(posts: &[Post]) -> u64 {
    posts.iter().map(Post::engagement).sum()
}

/// A hashtag with its usage count. The trending endpoint calls the count
/// `total_count`, the per-user endpoint calls it `count`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HashtagCount {
    pub hashtag: String,
    #[serde(alias = "total_count", deserialize_with = "null_as_zero")]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Engagement {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_likes: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_reposts: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_replies: u64,
}

impl Engagement {
    pub fn total(&self) -> u64 {
        self.total_likes + self.total_reposts + self.total_replies
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserAnalytics {
    pub username: String,
    pub post_count: u64,
    #[serde(default)]
    pub engagement: Engagement,
    #[serde(default)]
    pub top_hashtags: Vec<HashtagCount>,
}

impl UserAnalytics {
    /// Mean engagement per post rounded to one decimal; 0 when there are no posts.
    pub fn average_engagement(&self) -> f64 {
        if self.post_count == 0 {
            return 0.0;
        }
        let avg = self.engagement.total() as f64 / self.post_count as f64;
        (avg * 10.0).round() / 10.0
    }
}

/// Render an average the way a person would write it: `3`, `2.5`, `0`.
pub fn format_average(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistoricalPoint {
    /// Month label, `YYYY-MM`
    pub month: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub reposts: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub replies: u64,
}

/// Day windows the trending endpoint is queried with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TrendWindow {
    Day,
    ThreeDays,
    Week,
    Month,
}

impl TrendWindow {
    pub const ALL: [TrendWindow; 4] = [Self::Day, Self::ThreeDays, Self::Week, Self::Month];

    pub fn days(self) -> u32 {
        match self {
            Self::Day => 1,
            Self::ThreeDays => 3,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Last 24 hours",
            Self::ThreeDays => "Last 3 days",
            Self::Week => "Last 7 days",
            Self::Month => "Last 30 days",
        }
    }

    /// The next longer window, staying put at the end.
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1).min(Self::ALL.len() - 1)]
    }

    /// The next shorter window, staying put at the start.
    pub fn prev(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|w| *w == self).unwrap_or(0)
    }
}

impl TryFrom<u32> for TrendWindow {
    type Error = String;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|w| w.days() == days)
            .ok_or_else(|| {
                format!(
                    "unsupported trending window: {} days (expected 1, 3, 7 or 30)",
                    days
                )
            })
    }
}

impl From<TrendWindow> for u32 {
    fn from(window: TrendWindow) -> Self {
        window.days()
    }
}

impl fmt::Display for TrendWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days())
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Parse an API timestamp and render it as a calendar date in `tz`.
/// Unparseable input is shown as-is.
pub fn format_date_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let parsed = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        });

    match parsed {
        Ok(dt) => dt.with_timezone(tz).format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(likes: u64, reposts: u64, replies: u64) -> Post {
        Post {
            post_id: format!("at://post/{}", likes),
            author: "alice.bsky.social".to_string(),
            author_display_name: "Alice".to_string(),
            content: "hello".to_string(),
            like_count: likes,
            repost_count: reposts,
            reply_count: replies,
            created_at: "2024-10-15T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_post_decodes_and_ignores_extra_fields() {
        let json = r#"{
            "post_id": "at://did:plc:abc/app.bsky.feed.post/1",
            "author": "alice.bsky.social",
            "author_display_name": "Alice",
            "content": "hi #rust",
            "like_count": 4,
            "repost_count": 1,
            "reply_count": 2,
            "created_at": "Tue, 15 Oct 2024 12:00:00 GMT",
            "collected_at": "Tue, 15 Oct 2024 12:05:00 GMT"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.author, "alice.bsky.social");
        assert_eq!(post.engagement(), 7);
    }

    #[test]
    fn test_post_missing_field_is_rejected() {
        let json = r#"{"post_id": "1", "author": "a", "content": "x"}"#;
        assert!(serde_json::from_str::<Post>(json).is_err());
    }

    #[test]
    fn test_total_engagement() {
        let posts = vec![post(1, 2, 3), post(10, 0, 5), post(0, 0, 0)];
        assert_eq!(total_engagement(&posts), 21);
        assert_eq!(total_engagement(&[]), 0);
    }

    #[test]
    fn test_hashtag_count_accepts_both_field_names() {
        let trending: HashtagCount =
            serde_json::from_str(r#"{"hashtag": "rust", "total_count": 42}"#).unwrap();
        let per_user: HashtagCount =
            serde_json::from_str(r#"{"hashtag": "rust", "count": 3}"#).unwrap();
        assert_eq!(trending.count, 42);
        assert_eq!(per_user.count, 3);
    }

    #[test]
    fn test_user_analytics_null_engagement_is_zero() {
        let json = r#"{
            "username": "ghost",
            "post_count": 0,
            "engagement": {"total_likes": null, "total_reposts": null, "total_replies": null},
            "top_hashtags": []
        }"#;
        let analytics: UserAnalytics = serde_json::from_str(json).unwrap();
        assert_eq!(analytics.engagement, Engagement::default());
        assert_eq!(analytics.average_engagement(), 0.0);
        assert_eq!(format_average(analytics.average_engagement()), "0");
    }

    #[test]
    fn test_average_engagement_rounds_to_one_decimal() {
        let analytics = UserAnalytics {
            username: "alice".to_string(),
            post_count: 3,
            engagement: Engagement {
                total_likes: 5,
                total_reposts: 2,
                total_replies: 1,
            },
            top_hashtags: vec![],
        };
        // 8 / 3 = 2.666...
        assert_eq!(analytics.average_engagement(), 2.7);
        assert_eq!(format_average(analytics.average_engagement()), "2.7");
    }

    #[test]
    fn test_format_average_whole_numbers() {
        assert_eq!(format_average(3.0), "3");
        assert_eq!(format_average(0.0), "0");
        assert_eq!(format_average(f64::NAN), "0");
        assert_eq!(format_average(f64::INFINITY), "0");
    }

    #[test]
    fn test_historical_point_nulls() {
        let point: HistoricalPoint =
            serde_json::from_str(r#"{"month": "2024-09", "likes": 12, "reposts": null}"#)
                .unwrap();
        assert_eq!(point.likes, 12);
        assert_eq!(point.reposts, 0);
        assert_eq!(point.replies, 0);
    }

    #[test]
    fn test_trend_window_conversions() {
        assert_eq!(TrendWindow::try_from(30), Ok(TrendWindow::Month));
        assert!(TrendWindow::try_from(14).is_err());
        assert_eq!(u32::from(TrendWindow::ThreeDays), 3);
        assert_eq!(TrendWindow::Day.to_string(), "1d");
    }

    #[test]
    fn test_trend_window_stepping_clamps() {
        assert_eq!(TrendWindow::Day.prev(), TrendWindow::Day);
        assert_eq!(TrendWindow::Day.next(), TrendWindow::ThreeDays);
        assert_eq!(TrendWindow::Week.next(), TrendWindow::Month);
        assert_eq!(TrendWindow::Month.next(), TrendWindow::Month);
    }

    #[test]
    fn test_format_date_rfc3339() {
        assert_eq!(format_date_in("2024-10-15T12:00:00Z", &Utc), "Oct 15, 2024");
        assert_eq!(
            format_date_in("2024-10-15T23:30:00-02:00", &Utc),
            "Oct 16, 2024"
        );
    }

    #[test]
    fn test_format_date_http_date() {
        assert_eq!(
            format_date_in("Tue, 15 Oct 2024 12:00:00 GMT", &Utc),
            "Oct 15, 2024"
        );
    }

    #[test]
    fn test_format_date_naive() {
        assert_eq!(
            format_date_in("2024-03-01T08:15:00.123", &Utc),
            "Mar 1, 2024"
        );
    }

    #[test]
    fn test_format_date_garbage_passes_through() {
        assert_eq!(format_date_in("yesterday", &Utc), "yesterday");
    }
}
