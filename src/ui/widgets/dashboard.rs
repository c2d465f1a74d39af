use super::{step_selection, Action, NavState, Navigation, PageView, Route};
use crate::api::{total_engagement, HashtagCount, Post, TrendWindow};
use crate::config::DashboardConfig;
use crate::event::InputKey;
use crate::feeds::{FeedData, FetchRequest, FetchSlot, Issued, RequestId, RequestSeq};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::any::Any;

/// Recent posts feed with a hashtag side panel and quick stats.
pub struct DashboardView {
    post_limit: usize,
    trending_window: TrendWindow,
    hashtag_filter: Option<String>,
    posts: Vec<Post>,
    hashtags: Vec<HashtagCount>,
    posts_loading: bool,
    hashtags_loading: bool,
    posts_slot: FetchSlot,
    hashtags_slot: FetchSlot,
    scroll_state: ListState,
}

impl DashboardView {
    pub fn new(config: &DashboardConfig, hashtag_filter: Option<String>) -> Self {
        Self {
            post_limit: config.post_limit,
            trending_window: config.trending_days,
            hashtag_filter,
            posts: Vec::new(),
            hashtags: Vec::new(),
            posts_loading: true,
            hashtags_loading: true,
            posts_slot: FetchSlot::default(),
            hashtags_slot: FetchSlot::default(),
            scroll_state: ListState::default(),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn hashtags(&self) -> &[HashtagCount] {
        &self.hashtags
    }

    pub fn posts_loading(&self) -> bool {
        self.posts_loading
    }

    pub fn hashtags_loading(&self) -> bool {
        self.hashtags_loading
    }

    pub fn hashtag_filter(&self) -> Option<&str> {
        self.hashtag_filter.as_deref()
    }

    pub fn posts_collected(&self) -> usize {
        self.posts.len()
    }

    pub fn total_engagement(&self) -> u64 {
        total_engagement(&self.posts)
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.posts.get(self.scroll_state.selected()?)
    }

    fn fetch_posts(&mut self, seq: &mut RequestSeq) -> Issued {
        self.posts_loading = true;
        self.posts_slot.issue(
            seq,
            FetchRequest::RecentPosts {
                limit: self.post_limit,
                hashtag: self.hashtag_filter.clone(),
            },
        )
    }

    fn fetch_hashtags(&mut self, seq: &mut RequestSeq) -> Issued {
        self.hashtags_loading = true;
        self.hashtags_slot.issue(
            seq,
            FetchRequest::Trending {
                window: self.trending_window,
            },
        )
    }

    fn scroll(&mut self, delta: isize) {
        let next = step_selection(self.scroll_state.selected(), delta, self.posts.len());
        self.scroll_state.select(next);
    }

    fn render_feed(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.hashtag_filter {
            Some(tag) => format!(" Posts tagged #{} ", tag),
            None => " What's Hot ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        if self.posts_loading {
            let loading = List::new(vec![ListItem::new("Loading posts...")]).block(block);
            frame.render_widget(loading, area);
            return;
        }

        if self.posts.is_empty() {
            let empty = List::new(vec![ListItem::new("No posts to show")]).block(block);
            frame.render_widget(empty, area);
            return;
        }

        let wrap_width = area.width.saturating_sub(6).max(10) as usize;
        let items: Vec<ListItem> = self
            .posts
            .iter()
            .map(|post| {
                let mut lines = vec![Line::from(vec![
                    Span::styled(
                        post.author_display_name.as_str(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" @{}", post.author),
                        Style::default().fg(Color::Cyan),
                    ),
                ])];

                for chunk in textwrap::wrap(&post.content, wrap_width) {
                    lines.push(Line::from(format!("  {}", chunk)));
                }

                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  ♥ {}", post.like_count),
                        Style::default().fg(Color::Red),
                    ),
                    Span::styled(
                        format!("  ⟲ {}", post.repost_count),
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(
                        format!("  ✎ {}", post.reply_count),
                        Style::default().fg(Color::Blue),
                    ),
                    Span::styled(
                        format!("  {}", post.display_date()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
                lines.push(Line::from(""));

                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = self.scroll_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let label = Style::default().fg(Color::DarkGray);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let stats = Paragraph::new(vec![
            Line::from(Span::styled("Posts Collected", label)),
            Line::from(Span::styled(self.posts_collected().to_string(), value)),
            Line::from(""),
            Line::from(Span::styled("Total Engagement", label)),
            Line::from(Span::styled(self.total_engagement().to_string(), value)),
        ])
        .block(
            Block::default()
                .title(" Quick Stats ")
                .borders(Borders::ALL),
        );
        frame.render_widget(stats, area);
    }

    fn render_hashtags(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Hashtags ({}) ", self.trending_window.label()))
            .borders(Borders::ALL);

        let items: Vec<ListItem> = if self.hashtags_loading {
            vec![ListItem::new("Loading hashtags...")]
        } else {
            self.hashtags
                .iter()
                .map(|tag| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("#{}", tag.hashtag),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::styled(
                            format!("  {}", tag.count),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect()
        };

        frame.render_widget(List::new(items).block(block), area);
    }
}

impl PageView for DashboardView {
    fn route(&self) -> Route {
        Route::Dashboard
    }

    fn on_mount(&mut self, seq: &mut RequestSeq) -> Vec<Issued> {
        vec![self.fetch_posts(seq), self.fetch_hashtags(seq)]
    }

    fn handle_key(&mut self, key: InputKey, seq: &mut RequestSeq) -> Option<Action> {
        match key {
            InputKey::Up | InputKey::Char('k') => self.scroll(-1),
            InputKey::Down | InputKey::Char('j') => self.scroll(1),
            InputKey::PageUp => self.scroll(-10),
            InputKey::PageDown => self.scroll(10),
            InputKey::Home => self.scroll(isize::MIN / 2),
            InputKey::End => self.scroll(isize::MAX / 2),
            InputKey::Enter => {
                let author = self.selected_post()?.author.clone();
                return Some(Action::Navigate(Navigation::with_state(
                    Route::UserAnalytics,
                    NavState::Username(author),
                )));
            }
            InputKey::Char('r') => return Some(Action::Fetch(self.on_mount(seq))),
            InputKey::Esc if self.hashtag_filter.is_some() => {
                self.hashtag_filter = None;
                return Some(Action::Fetch(vec![self.fetch_posts(seq)]));
            }
            _ => {}
        }
        None
    }

    fn update_data(&mut self, request: RequestId, data: FeedData) {
        if self.posts_slot.accept(request) {
            self.posts_loading = false;
            self.posts = match data {
                FeedData::Posts(posts) => posts,
                FeedData::Error(e) => {
                    tracing::warn!("Error fetching recent posts: {}", e);
                    Vec::new()
                }
                other => {
                    tracing::warn!("Unexpected data for posts feed: {:?}", other);
                    Vec::new()
                }
            };
            let selection = if self.posts.is_empty() { None } else { Some(0) };
            self.scroll_state.select(selection);
        } else if self.hashtags_slot.accept(request) {
            self.hashtags_loading = false;
            self.hashtags = match data {
                FeedData::Trending(tags) => tags,
                FeedData::Error(e) => {
                    tracing::warn!("Error fetching trending hashtags: {}", e);
                    Vec::new()
                }
                other => {
                    tracing::warn!("Unexpected data for hashtag panel: {:?}", other);
                    Vec::new()
                }
            };
        } else {
            tracing::debug!("Dashboard ignoring stale response {}", request);
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(area);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(3)])
            .split(columns[1]);

        self.render_feed(frame, columns[0]);
        self.render_stats(frame, side[0]);
        self.render_hashtags(frame, side[1]);
    }

    fn help(&self) -> &'static str {
        if self.hashtag_filter.is_some() {
            "↑/↓ select  Enter author analytics  r refresh  Esc clear filter"
        } else {
            "↑/↓ select  Enter author analytics  r refresh"
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
