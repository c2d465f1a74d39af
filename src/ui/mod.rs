pub mod widgets;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

/// Draw the navigation shell around the mounted page.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let view = app.view();
    widgets::navbar::render(frame, chunks[0], view.route());
    view.render(frame, chunks[1]);
    widgets::navbar::render_footer(frame, chunks[2], view.help(), view.captures_text());
}
