use super::{charts, Action, PageView, Route};
use crate::api::{format_average, HistoricalPoint, UserAnalytics};
use crate::event::InputKey;
use crate::feeds::{FeedData, FetchRequest, FetchSlot, Issued, RequestId, RequestSeq};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::any::Any;

pub const EMPTY_USERNAME_ERROR: &str = "Please enter a username";
pub const FETCH_FAILED_ERROR: &str = "Failed to fetch user analytics";

/// Username form plus summary cards and charts for the looked-up user.
pub struct UserAnalyticsView {
    username: String,
    /// Handle passed in by navigation; submitted once on mount
    prefill: Option<String>,
    analytics: Option<UserAnalytics>,
    historical: Option<Vec<HistoricalPoint>>,
    loading: bool,
    error: Option<String>,
    slot: FetchSlot,
}

impl UserAnalyticsView {
    pub fn new(prefill: Option<String>) -> Self {
        Self {
            username: prefill.clone().unwrap_or_default(),
            prefill,
            analytics: None,
            historical: None,
            loading: false,
            error: None,
            slot: FetchSlot::default(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn analytics(&self) -> Option<&UserAnalytics> {
        self.analytics.as_ref()
    }

    pub fn historical(&self) -> Option<&[HistoricalPoint]> {
        self.historical.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate the form and issue a lookup. An empty username only sets
    /// the inline error.
    pub fn submit(&mut self, seq: &mut RequestSeq) -> Option<Issued> {
        let username = self.username.trim();
        if username.is_empty() {
            self.error = Some(EMPTY_USERNAME_ERROR.to_string());
            return None;
        }

        let request = FetchRequest::UserAnalytics {
            username: username.to_string(),
        };
        self.loading = true;
        self.error = None;
        Some(self.slot.issue(seq, request))
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let status = if self.loading {
            Line::from(Span::styled("Loading...", Style::default().fg(Color::Yellow)))
        } else if let Some(error) = &self.error {
            Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
        } else {
            Line::from(Span::styled(
                "Enter to get analytics",
                Style::default().fg(Color::DarkGray),
            ))
        };

        let form = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("@", Style::default().fg(Color::DarkGray)),
                Span::styled(self.username.as_str(), Style::default().fg(Color::White)),
                Span::styled("█", Style::default().fg(Color::Cyan)),
            ]),
            status,
        ])
        .block(
            Block::default()
                .title(" Bluesky Username ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        frame.render_widget(form, area);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, analytics: &UserAnalytics) {
        let block = Block::default()
            .title(format!(" Analytics for @{} ", analytics.username))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(inner);

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[0]);

        let card_values = [
            ("Total Posts", analytics.post_count, Color::Blue),
            ("Total Likes", analytics.engagement.total_likes, Color::Green),
            (
                "Total Reposts",
                analytics.engagement.total_reposts,
                Color::Magenta,
            ),
        ];
        for ((label, value, color), area) in card_values.into_iter().zip(cards.iter()) {
            let card = Paragraph::new(vec![
                Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
                Line::from(Span::styled(
                    value.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
            ])
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(card, *area);
        }

        let tags_block = Block::default().title(" Top Hashtags ").borders(Borders::ALL);
        let tag_items: Vec<ListItem> = if analytics.top_hashtags.is_empty() {
            vec![ListItem::new("No hashtags found.")]
        } else {
            analytics
                .top_hashtags
                .iter()
                .enumerate()
                .map(|(i, tag)| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                        Span::styled(format!("#{}", tag.hashtag), Style::default().fg(Color::Cyan)),
                        Span::styled(
                            format!("  {} posts", tag.count),
                            Style::default().fg(Color::Gray),
                        ),
                    ]))
                })
                .collect()
        };
        frame.render_widget(List::new(tag_items).block(tags_block), rows[1]);

        let summary = Paragraph::new(Line::from(vec![
            Span::raw("Average engagement per post: "),
            Span::styled(
                format_average(analytics.average_engagement()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]))
        .block(
            Block::default()
                .title(" Engagement Summary ")
                .borders(Borders::ALL),
        );
        frame.render_widget(summary, rows[2]);
    }
}

impl PageView for UserAnalyticsView {
    fn route(&self) -> Route {
        Route::UserAnalytics
    }

    fn on_mount(&mut self, seq: &mut RequestSeq) -> Vec<Issued> {
        match self.prefill.take() {
            Some(_) => self.submit(seq).into_iter().collect(),
            None => Vec::new(),
        }
    }

    fn handle_key(&mut self, key: InputKey, seq: &mut RequestSeq) -> Option<Action> {
        match key {
            InputKey::Enter => {
                return self.submit(seq).map(|issued| Action::Fetch(vec![issued]));
            }
            InputKey::Backspace => {
                self.username.pop();
            }
            InputKey::Esc => self.username.clear(),
            InputKey::Char(c) if !c.is_control() => self.username.push(c),
            _ => {}
        }
        None
    }

    fn update_data(&mut self, request: RequestId, data: FeedData) {
        if !self.slot.accept(request) {
            tracing::debug!("User analytics ignoring superseded response {}", request);
            return;
        }

        self.loading = false;
        match data {
            FeedData::UserAnalytics {
                analytics,
                historical,
            } => {
                self.analytics = Some(analytics);
                self.historical = historical;
                self.error = None;
            }
            FeedData::Error(e) => {
                tracing::warn!("Error fetching user analytics: {}", e);
                self.analytics = None;
                self.historical = None;
                self.error = Some(FETCH_FAILED_ERROR.to_string());
            }
            other => {
                tracing::warn!("Unexpected data for user analytics: {:?}", other);
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(5)])
            .split(area);

        self.render_form(frame, chunks[0]);

        let Some(analytics) = &self.analytics else {
            return;
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        self.render_summary(frame, columns[0], analytics);
        charts::render(frame, columns[1], analytics, self.historical());
    }

    fn help(&self) -> &'static str {
        "type username  Enter submit  Backspace delete  Esc clear"
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Engagement;
    use crate::test_utils::{sample_analytics, sample_history, TestTerminal};

    fn type_text(view: &mut UserAnalyticsView, seq: &mut RequestSeq, text: &str) {
        for c in text.chars() {
            assert_eq!(view.handle_key(InputKey::Char(c), seq), None);
        }
    }

    fn loaded(analytics: UserAnalytics) -> FeedData {
        FeedData::UserAnalytics {
            analytics,
            historical: Some(sample_history()),
        }
    }

    #[test]
    fn test_empty_submit_sets_error_without_request() {
        let mut seq = RequestSeq::new();
        let mut view = UserAnalyticsView::new(None);
        assert!(view.on_mount(&mut seq).is_empty());

        assert_eq!(view.handle_key(InputKey::Enter, &mut seq), None);
        assert_eq!(view.error(), Some("Please enter a username"));
        assert!(!view.is_loading());

        type_text(&mut view, &mut seq, "   ");
        assert_eq!(view.handle_key(InputKey::Enter, &mut seq), None);
        assert_eq!(view.error(), Some(EMPTY_USERNAME_ERROR));
    }

    #[test]
    fn test_typed_username_submits_lookup() {
        let mut seq = RequestSeq::new();
        let mut view = UserAnalyticsView::new(None);
        type_text(&mut view, &mut seq, "alicex");
        view.handle_key(InputKey::Backspace, &mut seq);
        assert_eq!(view.username(), "alice");

        match view.handle_key(InputKey::Enter, &mut seq) {
            Some(Action::Fetch(issued)) => {
                assert_eq!(
                    issued[0].request,
                    FetchRequest::UserAnalytics {
                        username: "alice".into()
                    }
                );
            }
            other => panic!("expected fetch, got {:?}", other),
        }
        assert!(view.is_loading());
        assert_eq!(view.error(), None);
    }

    #[test]
    fn test_prefill_submits_exactly_once() {
        let mut seq = RequestSeq::new();
        let mut view = UserAnalyticsView::new(Some("bob.bsky.social".into()));
        assert_eq!(view.username(), "bob.bsky.social");

        let issued = view.on_mount(&mut seq);
        assert_eq!(issued.len(), 1);
        assert_eq!(
            issued[0].request,
            FetchRequest::UserAnalytics {
                username: "bob.bsky.social".into()
            }
        );
        assert!(view.on_mount(&mut seq).is_empty());
    }

    #[test]
    fn test_success_replaces_analytics_and_clears_error() {
        let mut seq = RequestSeq::new();
        let mut view = UserAnalyticsView::new(None);
        view.handle_key(InputKey::Enter, &mut seq);
        assert!(view.error().is_some());

        type_text(&mut view, &mut seq, "alice");
        let issued = view.submit(&mut seq).unwrap();
        view.update_data(issued.id, loaded(sample_analytics("alice", 5)));

        assert!(!view.is_loading());
        assert_eq!(view.error(), None);
        assert_eq!(view.analytics().unwrap().post_count, 5);
        assert_eq!(view.historical().unwrap().len(), 3);
    }

    #[test]
    fn test_failure_clears_previous_analytics() {
        let mut seq = RequestSeq::new();
        let mut view = UserAnalyticsView::new(Some("alice".into()));
        let first = view.on_mount(&mut seq).remove(0);
        view.update_data(first.id, loaded(sample_analytics("alice", 5)));
        assert!(view.analytics().is_some());

        let second = view.submit(&mut seq).unwrap();
        view.update_data(second.id, FeedData::Error("HTTP 404".into()));

        assert!(view.analytics().is_none());
        assert!(view.historical().is_none());
        assert!(!view.is_loading());
        assert_eq!(view.error(), Some("Failed to fetch user analytics"));
    }

    #[test]
    fn test_resubmit_ignores_superseded_response() {
        let mut seq = RequestSeq::new();
        let mut view = UserAnalyticsView::new(None);
        type_text(&mut view, &mut seq, "alice");
        let first = view.submit(&mut seq).unwrap();

        view.handle_key(InputKey::Esc, &mut seq);
        type_text(&mut view, &mut seq, "bob");
        let second = view.submit(&mut seq).unwrap();

        view.update_data(second.id, loaded(sample_analytics("bob", 2)));
        view.update_data(first.id, loaded(sample_analytics("alice", 9)));

        assert_eq!(view.analytics().unwrap().username, "bob");
    }

    #[test]
    fn test_zero_posts_renders_zero_average() {
        let mut seq = RequestSeq::new();
        let mut view = UserAnalyticsView::new(Some("ghost".into()));
        let issued = view.on_mount(&mut seq).remove(0);
        view.update_data(
            issued.id,
            FeedData::UserAnalytics {
                analytics: UserAnalytics {
                    username: "ghost".into(),
                    post_count: 0,
                    engagement: Engagement::default(),
                    top_hashtags: vec![],
                },
                historical: None,
            },
        );

        let mut term = TestTerminal::with_size(120, 40);
        term.draw_with(|frame| view.render(frame, frame.area()));
        assert!(term.buffer_contains("Average engagement per post: 0"));
        assert!(!term.buffer_contains("NaN"));
        assert!(!term.buffer_contains("inf"));
        assert!(term.buffer_contains("No hashtags found."));
        assert!(!term.buffer_contains("Historical Engagement"));
    }

    #[test]
    fn test_render_summary_and_charts() {
        let mut seq = RequestSeq::new();
        let mut view = UserAnalyticsView::new(Some("alice".into()));
        let issued = view.on_mount(&mut seq).remove(0);

        let mut term = TestTerminal::with_size(120, 40);
        term.draw_with(|frame| view.render(frame, frame.area()));
        assert!(term.buffer_contains("Loading..."));

        // 15 engagement over 4 posts
        view.update_data(issued.id, loaded(sample_analytics("alice", 4)));
        term.draw_with(|frame| view.render(frame, frame.area()));
        assert!(term.buffer_contains("Analytics for @alice"));
        assert!(term.buffer_contains("Total Posts"));
        assert!(term.buffer_contains("Total Likes"));
        assert!(term.buffer_contains("Total Reposts"));
        assert!(term.buffer_contains("#rust"));
        assert!(term.buffer_contains("Average engagement per post: 3.8"));
        assert!(term.buffer_contains("Engagement Composition"));
        assert!(term.buffer_contains("Historical Engagement"));
    }

    #[test]
    fn test_render_error_inline() {
        let mut seq = RequestSeq::new();
        let mut view = UserAnalyticsView::new(None);
        view.handle_key(InputKey::Enter, &mut seq);

        let mut term = TestTerminal::new();
        term.draw_with(|frame| view.render(frame, frame.area()));
        assert!(term.buffer_contains("Please enter a username"));
    }
}
