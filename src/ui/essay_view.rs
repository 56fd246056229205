use crate::catalog::EssayDescriptor;
use crate::tea::EssayContent;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Detail view for one essay. `body` is the terminal rendering of the
/// essay's HTML and is only used once the content is rendered.
pub fn render_essay_view(
    frame: &mut Frame,
    area: Rect,
    essay: &EssayDescriptor,
    content: &EssayContent,
    body: &Text<'static>,
    scroll: u16,
) {
    let block = Block::default()
        .borders(Borders::TOP)
        .title(Line::from(vec![
            Span::styled("← back ", Style::default().fg(Color::DarkGray)),
            Span::styled(essay.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]));

    let paragraph = match content {
        EssayContent::Loading => Paragraph::new(Line::styled(
            "Loading…",
            Style::default().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center),

        EssayContent::Failed { reason } => Paragraph::new(vec![
            Line::styled(
                "This essay could not be loaded.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::styled(reason.clone(), Style::default().fg(Color::Red)),
            Line::from(""),
            Line::styled(
                "Press r to try again or Backspace to return to the list.",
                Style::default().fg(Color::DarkGray),
            ),
        ])
        .wrap(Wrap { trim: true }),

        EssayContent::Rendered { .. } => Paragraph::new(body.clone())
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
    };

    frame.render_widget(paragraph.block(block), area);
}
