//! Derived charts for a user's analytics. Stateless: everything is
//! computed from the records passed in.

use crate::api::{Engagement, HashtagCount, HistoricalPoint, UserAnalytics};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, Gauge, GraphType},
    Frame,
};

const LIKES_COLOR: Color = Color::Blue;
const REPOSTS_COLOR: Color = Color::Green;
const REPLIES_COLOR: Color = Color::Yellow;

#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: &'static str,
    pub value: u64,
    /// Fraction of the total in `0.0..=1.0`
    pub ratio: f64,
}

/// Likes, reposts and replies as fractions of total engagement.
/// All ratios are 0 when there is no engagement at all.
pub fn engagement_shares(engagement: &Engagement) -> [Share; 3] {
    let total = engagement.total();
    let ratio = |value: u64| {
        if total == 0 {
            0.0
        } else {
            value as f64 / total as f64
        }
    };

    [
        Share {
            label: "Likes",
            value: engagement.total_likes,
            ratio: ratio(engagement.total_likes),
        },
        Share {
            label: "Reposts",
            value: engagement.total_reposts,
            ratio: ratio(engagement.total_reposts),
        },
        Share {
            label: "Replies",
            value: engagement.total_replies,
            ratio: ratio(engagement.total_replies),
        },
    ]
}

pub fn hashtag_bars(tags: &[HashtagCount]) -> Vec<(String, u64)> {
    tags.iter()
        .map(|tag| (format!("#{}", tag.hashtag), tag.count))
        .collect()
}

/// Points for the likes, reposts and replies lines, x = index into `points`.
pub fn history_series(points: &[HistoricalPoint]) -> [Vec<(f64, f64)>; 3] {
    let series = |value: fn(&HistoricalPoint) -> u64| -> Vec<(f64, f64)> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, value(p) as f64))
            .collect()
    };
    [
        series(|p| p.likes),
        series(|p| p.reposts),
        series(|p| p.replies),
    ]
}

/// First, middle and last month labels.
pub fn month_labels(points: &[HistoricalPoint]) -> Vec<String> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![points[0].month.clone()],
        2 => vec![points[0].month.clone(), points[1].month.clone()],
        n => vec![
            points[0].month.clone(),
            points[n / 2].month.clone(),
            points[n - 1].month.clone(),
        ],
    }
}

/// Lay out and draw every chart that has data.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    analytics: &UserAnalytics,
    historical: Option<&[HistoricalPoint]>,
) {
    let history = historical.filter(|points| !points.is_empty());

    let constraints = if history.is_some() {
        vec![
            Constraint::Length(8),
            Constraint::Percentage(45),
            Constraint::Min(8),
        ]
    } else {
        vec![Constraint::Length(8), Constraint::Min(8)]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_composition(frame, chunks[0], &analytics.engagement);
    render_hashtag_usage(frame, chunks[1], &analytics.top_hashtags);
    if let Some(points) = history {
        render_history(frame, chunks[2], points);
    }
}

fn render_composition(frame: &mut Frame, area: Rect, engagement: &Engagement) {
    let block = Block::default()
        .title(" Engagement Composition ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(inner);

    let colors = [LIKES_COLOR, REPOSTS_COLOR, REPLIES_COLOR];
    for ((share, color), row) in engagement_shares(engagement)
        .iter()
        .zip(colors)
        .zip(rows.iter())
    {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio(share.ratio.clamp(0.0, 1.0))
            .label(format!(
                "{} {} ({:.0}%)",
                share.label,
                share.value,
                share.ratio * 100.0
            ));
        frame.render_widget(gauge, Rect { height: 1, ..*row });
    }
}

fn render_hashtag_usage(frame: &mut Frame, area: Rect, tags: &[HashtagCount]) {
    let block = Block::default()
        .title(" Top Hashtag Usage ")
        .borders(Borders::ALL);

    let bars = hashtag_bars(tags);
    let data: Vec<(&str, u64)> = bars.iter().map(|(label, n)| (label.as_str(), *n)).collect();

    let bar_width = bars
        .iter()
        .map(|(label, _)| label.chars().count() as u16)
        .max()
        .unwrap_or(3)
        .clamp(3, 14);

    let chart = BarChart::default()
        .block(block)
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    frame.render_widget(chart, area);
}

fn render_history(frame: &mut Frame, area: Rect, points: &[HistoricalPoint]) {
    let [likes, reposts, replies] = history_series(points);

    let y_max = likes
        .iter()
        .chain(reposts.iter())
        .chain(replies.iter())
        .map(|(_, y)| *y)
        .fold(1.0, f64::max);
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("Likes")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(LIKES_COLOR))
            .data(&likes),
        Dataset::default()
            .name("Reposts")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(REPOSTS_COLOR))
            .data(&reposts),
        Dataset::default()
            .name("Replies")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(REPLIES_COLOR))
            .data(&replies),
    ];

    let x_labels: Vec<Span> = month_labels(points).into_iter().map(Span::raw).collect();
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{}", (y_max / 2.0).round() as u64)),
        Span::styled(
            format!("{}", y_max as u64),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Historical Engagement ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("Month")
                .style(Style::default().fg(Color::Gray))
                .labels(x_labels)
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(y_labels)
                .bounds([0.0, y_max * 1.1]),
        );

    frame.render_widget(chart, area);
}
