pub mod charts;
pub mod dashboard;
pub mod navbar;
pub mod trending;
pub mod user_analytics;

use crate::config::Config;
use crate::event::InputKey;
use crate::feeds::{FeedData, Issued, RequestId, RequestSeq};
use ratatui::{layout::Rect, Frame};
use std::any::Any;

pub use dashboard::DashboardView;
pub use trending::TrendingView;
pub use user_analytics::UserAnalyticsView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Trending,
    UserAnalytics,
}

impl Route {
    pub const ALL: [Route; 3] = [Self::Dashboard, Self::Trending, Self::UserAnalytics];

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Trending => "Trending",
            Self::UserAnalytics => "User Analytics",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Dashboard => 0,
            Self::Trending => 1,
            Self::UserAnalytics => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One-shot payload handed to the view being navigated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    Username(String),
    Hashtag(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub state: Option<NavState>,
}

impl Navigation {
    pub fn to(route: Route) -> Self {
        Self { route, state: None }
    }

    pub fn with_state(route: Route, state: NavState) -> Self {
        Self {
            route,
            state: Some(state),
        }
    }
}

/// What a view asks the app to do after handling a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Fetch(Vec<Issued>),
    Navigate(Navigation),
}

/// A page mounted by the navigation shell. Each page owns its data and
/// fetch bookkeeping; nothing is shared between pages.
pub trait PageView {
    fn route(&self) -> Route;

    /// Requests to issue as soon as the page is shown.
    fn on_mount(&mut self, seq: &mut RequestSeq) -> Vec<Issued>;

    fn handle_key(&mut self, key: InputKey, seq: &mut RequestSeq) -> Option<Action>;

    fn update_data(&mut self, request: RequestId, data: FeedData);

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Short key help shown in the footer.
    fn help(&self) -> &'static str;

    /// Whether plain characters are text input rather than shortcuts.
    fn captures_text(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
}

/// Build a fresh page for `nav`, consuming its one-shot state.
pub fn mount(nav: Navigation, config: &Config) -> Box<dyn PageView> {
    match nav.route {
        Route::Dashboard => {
            let filter = match nav.state {
                Some(NavState::Hashtag(tag)) => Some(tag),
                _ => None,
            };
            Box::new(DashboardView::new(&config.dashboard, filter))
        }
        Route::Trending => Box::new(TrendingView::new(config.trending.default_window)),
        Route::UserAnalytics => {
            let username = match nav.state {
                Some(NavState::Username(name)) => Some(name),
                _ => None,
            };
            Box::new(UserAnalyticsView::new(username))
        }
    }
}

/// Step a list selection by `delta`, clamped to `len`.
pub(crate) fn step_selection(current: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.unwrap_or(0) as isize;
    Some((current + delta).clamp(0, len as isize - 1) as usize)
}
