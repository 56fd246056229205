use crate::navigation::Location;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Trait for status bar segments that can be rendered
pub trait StatusSegment {
    /// Get the content to display in this segment
    fn content(&self) -> String;

    /// Get the priority of this segment (higher = more important)
    fn priority(&self) -> u8;

    /// Whether this segment should be visible
    fn is_visible(&self) -> bool {
        true
    }

    /// Get custom styling for this segment (optional)
    fn custom_style(&self) -> Option<Style> {
        None
    }
}

/// The current location, shown like a browser's address bar
#[derive(Debug, Clone)]
pub struct LocationSegment {
    pub location: Location,
}

/// Back/forward availability
#[derive(Debug, Clone)]
pub struct HistorySegment {
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// Shown while an essay is loading
#[derive(Debug, Clone)]
pub struct LoadingSegment {
    pub loading: bool,
}

/// Navigation hints segment
#[derive(Debug, Clone)]
pub struct NavigationHintsSegment {
    pub current_pane: String,
    pub available_shortcuts: Vec<(String, String)>, // (key, description)
}

impl StatusSegment for LocationSegment {
    fn content(&self) -> String {
        self.location.to_string()
    }

    fn priority(&self) -> u8 {
        100
    }

    fn custom_style(&self) -> Option<Style> {
        Some(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    }
}

impl StatusSegment for HistorySegment {
    fn content(&self) -> String {
        let back = if self.can_go_back { "◀" } else { "◁" };
        let forward = if self.can_go_forward { "▶" } else { "▷" };
        format!("{} {}", back, forward)
    }

    fn priority(&self) -> u8 {
        90
    }
}

impl StatusSegment for LoadingSegment {
    fn content(&self) -> String {
        "⟳ loading".to_string()
    }

    fn priority(&self) -> u8 {
        80
    }

    fn is_visible(&self) -> bool {
        self.loading
    }

    fn custom_style(&self) -> Option<Style> {
        Some(Style::default().fg(Color::Yellow))
    }
}

impl StatusSegment for NavigationHintsSegment {
    fn content(&self) -> String {
        let shortcuts: Vec<String> = self
            .available_shortcuts
            .iter()
            .map(|(key, desc)| format!("{}: {}", key, desc))
            .collect();

        format!("{} | {}", self.current_pane, shortcuts.join(" | "))
    }

    fn priority(&self) -> u8 {
        30
    }

    fn custom_style(&self) -> Option<Style> {
        Some(Style::default().fg(Color::DarkGray))
    }
}

/// One-line status bar; segments are laid out by priority and truncated to fit
#[derive(Default)]
pub struct StatusBar {
    segments: Vec<Box<dyn StatusSegment>>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a status segment
    pub fn add_segment<T: StatusSegment + 'static>(&mut self, segment: T) {
        let priority = segment.priority();
        let insert_pos = self
            .segments
            .iter()
            .position(|existing| existing.priority() < priority)
            .unwrap_or(self.segments.len());
        self.segments.insert(insert_pos, Box::new(segment));
    }

    /// Build the line for a given width
    pub fn line(&self, width: u16) -> Line<'static> {
        const SEPARATOR: &str = " │ ";
        let mut spans = Vec::new();
        let mut remaining = width as usize;

        for segment in self.segments.iter().filter(|segment| segment.is_visible()) {
            if remaining == 0 {
                break;
            }
            if !spans.is_empty() {
                if remaining <= SEPARATOR.chars().count() {
                    break;
                }
                spans.push(Span::styled(SEPARATOR, Style::default().fg(Color::DarkGray)));
                remaining -= SEPARATOR.chars().count();
            }

            let content = segment.content();
            let length = content.chars().count();
            let display_content = if length > remaining {
                if remaining > 3 {
                    format!("{}...", content.chars().take(remaining - 3).collect::<String>())
                } else {
                    ".".repeat(remaining)
                }
            } else {
                content
            };
            remaining -= display_content.chars().count();

            let style = segment.custom_style().unwrap_or_default();
            spans.push(Span::styled(display_content, style));
        }

        Line::from(spans)
    }

    /// Render the status bar
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }

        let paragraph = Paragraph::new(self.line(area.width))
            .alignment(Alignment::Left)
            .style(Style::default().bg(Color::Black));
        frame.render_widget(paragraph, area);
    }
}
