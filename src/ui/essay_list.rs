use crate::catalog::Catalog;
use crate::config::SiteConfig;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Landing view: site heading, intro text, the essays, and footer text
pub fn render_essay_list(
    frame: &mut Frame,
    area: Rect,
    site: &SiteConfig,
    catalog: &Catalog,
    list_state: &mut ListState,
) {
    let header = header_lines(site);
    let footer: Vec<Line> = site
        .footer
        .iter()
        .map(|line| Line::styled(line.clone(), Style::default().fg(Color::DarkGray)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header.len() as u16 + 1),
            Constraint::Min(3),
            Constraint::Length(footer.len() as u16),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(header).wrap(Wrap { trim: true }), chunks[0]);

    let items: Vec<ListItem> = if catalog.is_empty() {
        vec![ListItem::new(Span::styled(
            "No essays found.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        catalog
            .iter()
            .map(|essay| ListItem::new(Span::styled(essay.title.clone(), Style::default().fg(Color::LightBlue))))
            .collect()
    };

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, chunks[1], list_state);

    if !footer.is_empty() {
        frame.render_widget(Paragraph::new(footer).wrap(Wrap { trim: true }), chunks[2]);
    }
}

fn header_lines(site: &SiteConfig) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled(
        site.heading.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    lines.extend(
        site.intro
            .iter()
            .map(|line| Line::styled(line.clone(), Style::default().fg(Color::Gray))),
    );
    lines
}
