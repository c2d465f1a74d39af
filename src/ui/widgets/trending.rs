use super::{step_selection, Action, NavState, Navigation, PageView, Route};
use crate::api::{HashtagCount, TrendWindow};
use crate::event::InputKey;
use crate::feeds::{FeedData, FetchRequest, FetchSlot, Issued, RequestId, RequestSeq};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
    Frame,
};
use std::any::Any;

/// Ranked trending hashtags for a selectable day window.
pub struct TrendingView {
    window: TrendWindow,
    hashtags: Vec<HashtagCount>,
    loading: bool,
    slot: FetchSlot,
    table_state: TableState,
}

impl TrendingView {
    pub fn new(window: TrendWindow) -> Self {
        Self {
            window,
            hashtags: Vec::new(),
            loading: true,
            slot: FetchSlot::default(),
            table_state: TableState::default(),
        }
    }

    pub fn window(&self) -> TrendWindow {
        self.window
    }

    pub fn hashtags(&self) -> &[HashtagCount] {
        &self.hashtags
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Rows as shown in the table: 1-based rank in server order.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &HashtagCount)> {
        self.hashtags.iter().enumerate().map(|(i, tag)| (i + 1, tag))
    }

    /// Switch windows. Selecting the current window is a no-op.
    pub fn set_window(&mut self, window: TrendWindow, seq: &mut RequestSeq) -> Option<Issued> {
        if window == self.window {
            return None;
        }
        tracing::debug!("Trending window {} -> {}", self.window, window);
        self.window = window;
        Some(self.fetch(seq))
    }

    fn fetch(&mut self, seq: &mut RequestSeq) -> Issued {
        self.loading = true;
        self.slot.issue(
            seq,
            FetchRequest::Trending {
                window: self.window,
            },
        )
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(vec!["Rank", "Hashtag", "Count"]).style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = self
            .ranked()
            .map(|(rank, tag)| {
                Row::new(vec![
                    Cell::from(rank.to_string()).style(Style::default().fg(Color::White)),
                    Cell::from(format!("#{}", tag.hashtag)).style(Style::default().fg(Color::Cyan)),
                    Cell::from(tag.count.to_string()).style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(format!(" Trending Hashtags: {} ", self.window.label()))
                    .borders(Borders::ALL),
            )
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .column_spacing(1);

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl PageView for TrendingView {
    fn route(&self) -> Route {
        Route::Trending
    }

    fn on_mount(&mut self, seq: &mut RequestSeq) -> Vec<Issued> {
        vec![self.fetch(seq)]
    }

    fn handle_key(&mut self, key: InputKey, seq: &mut RequestSeq) -> Option<Action> {
        let window = match key {
            InputKey::Left => self.window.prev(),
            InputKey::Right => self.window.next(),
            InputKey::Char('1') => TrendWindow::Day,
            InputKey::Char('3') => TrendWindow::ThreeDays,
            InputKey::Char('7') => TrendWindow::Week,
            InputKey::Char('m') => TrendWindow::Month,
            InputKey::Char('r') => return Some(Action::Fetch(vec![self.fetch(seq)])),
            InputKey::Up | InputKey::Char('k') => {
                let next = step_selection(self.table_state.selected(), -1, self.hashtags.len());
                self.table_state.select(next);
                return None;
            }
            InputKey::Down | InputKey::Char('j') => {
                let next = step_selection(self.table_state.selected(), 1, self.hashtags.len());
                self.table_state.select(next);
                return None;
            }
            InputKey::Enter if !self.loading => {
                let tag = self.hashtags.get(self.table_state.selected()?)?;
                return Some(Action::Navigate(Navigation::with_state(
                    Route::Dashboard,
                    NavState::Hashtag(tag.hashtag.clone()),
                )));
            }
            _ => return None,
        };

        self.set_window(window, seq)
            .map(|issued| Action::Fetch(vec![issued]))
    }

    fn update_data(&mut self, request: RequestId, data: FeedData) {
        if !self.slot.accept(request) {
            tracing::debug!("Trending ignoring superseded response {}", request);
            return;
        }

        self.loading = false;
        self.hashtags = match data {
            FeedData::Trending(tags) => tags,
            FeedData::Error(e) => {
                tracing::warn!("Error fetching trending hashtags: {}", e);
                Vec::new()
            }
            other => {
                tracing::warn!("Unexpected data for trending table: {:?}", other);
                Vec::new()
            }
        };
        let selection = if self.hashtags.is_empty() { None } else { Some(0) };
        self.table_state.select(selection);
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let titles: Vec<&str> = TrendWindow::ALL.iter().map(|w| w.label()).collect();
        let selected = TrendWindow::ALL
            .iter()
            .position(|w| *w == self.window)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .block(Block::default().title(" Timeframe ").borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        if self.loading {
            let loading = Paragraph::new("Loading trending data...")
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, chunks[1]);
            return;
        }

        if self.hashtags.is_empty() {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(4), Constraint::Min(1)])
                .split(chunks[1]);
            self.render_table(frame, body[0]);
            let empty = Paragraph::new("No trending hashtags found for this timeframe.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, body[1]);
            return;
        }

        self.render_table(frame, chunks[1]);
    }

    fn help(&self) -> &'static str {
        "←/→ timeframe  1/3/7/m pick  ↑/↓ select  Enter posts for tag  r refresh"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
