use super::Route;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub const APP_TITLE: &str = "Bluesky Analytics";

/// Tab bar linking the pages. Holds no data of its own.
pub fn render(frame: &mut Frame, area: Rect, active: Route) {
    let titles: Vec<Line> = Route::ALL
        .iter()
        .enumerate()
        .map(|(i, route)| Line::from(format!("F{} {}", i + 1, route.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(active.index())
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", APP_TITLE),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );

    frame.render_widget(tabs, area);
}

pub fn render_footer(frame: &mut Frame, area: Rect, help: &str, text_input: bool) {
    let quit = if text_input { "Ctrl-C quit" } else { "q quit" };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" Tab/Shift-Tab pages  {} ", quit),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::styled(format!("  {}", help), Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_navbar_lists_every_page() {
        let mut term = TestTerminal::with_size(100, 3);
        term.draw_with(|frame| render(frame, frame.area(), Route::Trending));
        assert!(term.buffer_contains(APP_TITLE));
        assert!(term.buffer_contains("F1 Dashboard"));
        assert!(term.buffer_contains("F2 Trending"));
        assert!(term.buffer_contains("F3 User Analytics"));
    }

    #[test]
    fn test_footer_shows_view_help() {
        let mut term = TestTerminal::with_size(100, 1);
        term.draw_with(|frame| render_footer(frame, frame.area(), "r refresh", false));
        assert!(term.buffer_contains("q quit"));
        assert!(term.buffer_contains("r refresh"));

        term.draw_with(|frame| render_footer(frame, frame.area(), "Enter submit", true));
        assert!(term.buffer_contains("Ctrl-C quit"));
    }
}
