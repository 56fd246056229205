pub mod essay_list;
pub mod essay_view;
pub mod status_bar;

use crate::config::SiteConfig;
use crate::html::HtmlRenderer;
use crate::navigation::Location;
use crate::tea::{EssayContent, Model, ViewState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{ListState, Paragraph},
    Frame,
};

use self::{
    essay_list::render_essay_list,
    essay_view::render_essay_view,
    status_bar::{HistorySegment, LoadingSegment, LocationSegment, NavigationHintsSegment, StatusBar},
};

/// History state shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStatus {
    pub location: Location,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// Terminal presentation of the navigation model.
///
/// Holds only presentation state: list selection, scroll offset, the address
/// prompt and the terminal rendering of the current essay. Everything about
/// which view is shown comes from the [`Model`].
pub struct UI {
    site: SiteConfig,
    html_renderer: HtmlRenderer,
    list_state: ListState,
    scroll: u16,
    address: Option<String>,
    /// Last rendered HTML and its terminal text
    rendered: Option<(String, Text<'static>)>,
    seen_generation: Option<u64>,
}

impl UI {
    pub fn new(site: SiteConfig) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            site,
            html_renderer: HtmlRenderer::default(),
            list_state,
            scroll: 0,
            address: None,
            rendered: None,
            seen_generation: None,
        }
    }

    /// Catch up with a navigation: reset the scroll and point the list
    /// selection at the essay being shown.
    pub fn sync(&mut self, model: &Model) {
        if self.seen_generation == Some(model.generation) {
            return;
        }
        self.seen_generation = Some(model.generation);
        self.scroll = 0;

        if let Some(position) = model
            .view
            .identifier()
            .and_then(|identifier| model.catalog.position(identifier))
        {
            self.list_state.select(Some(position));
        }
        if let Some(EssayContent::Rendered { html }) = model.view.content() {
            self.ensure_rendered(html);
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Identifier of the highlighted essay in the list
    pub fn selected_identifier(&self, model: &Model) -> Option<String> {
        self.list_state
            .selected()
            .and_then(|index| model.catalog.essays().get(index))
            .map(|essay| essay.identifier.clone())
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = match self.list_state.selected() {
            Some(index) if index + 1 < len => index + 1,
            Some(index) => index,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let previous = self.list_state.selected().map_or(0, |index| index.saturating_sub(1));
        self.list_state.select(Some(previous));
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.body_height().saturating_sub(1);
        self.scroll = self.scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.body_height().saturating_sub(1);
    }

    fn body_height(&self) -> u16 {
        self.rendered
            .as_ref()
            .map_or(0, |(_, text)| text.lines.len().min(u16::MAX as usize) as u16)
    }

    // Address prompt

    pub fn is_prompting(&self) -> bool {
        self.address.is_some()
    }

    pub fn open_address(&mut self, current: &Location) {
        self.address = Some(current.to_string());
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn address_input(&mut self, c: char) {
        if let Some(address) = self.address.as_mut() {
            address.push(c);
        }
    }

    pub fn address_backspace(&mut self) {
        if let Some(address) = self.address.as_mut() {
            address.pop();
        }
    }

    pub fn cancel_address(&mut self) {
        self.address = None;
    }

    /// Close the prompt and return what was typed
    pub fn take_address(&mut self) -> Option<String> {
        self.address.take()
    }

    fn ensure_rendered(&mut self, html: &str) {
        let stale = self
            .rendered
            .as_ref()
            .map_or(true, |(source, _)| source != html);
        if stale {
            let text = self.html_renderer.render_html(html);
            self.rendered = Some((html.to_string(), text));
        }
    }

    pub fn render(&mut self, frame: &mut Frame, model: &Model, history: &HistoryStatus) {
        let size = frame.size();
        let prompt_height = u16::from(self.address.is_some());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(prompt_height),
            ])
            .split(size);

        let content_area = pad(chunks[0]);
        match &model.view {
            ViewState::List => {
                render_essay_list(frame, content_area, &self.site, &model.catalog, &mut self.list_state);
            }
            ViewState::Detail { essay, content } => {
                if let EssayContent::Rendered { html } = content {
                    self.ensure_rendered(html);
                }
                let empty = Text::default();
                let body = self.rendered.as_ref().map_or(&empty, |(_, text)| text);
                render_essay_view(frame, content_area, essay, content, body, self.scroll);
            }
        }

        self.status_bar(model, history).render(frame, chunks[1]);

        if let Some(address) = &self.address {
            let prompt = Paragraph::new(Line::from(vec![
                Span::styled("go to: ", Style::default().fg(Color::Yellow)),
                Span::raw(address.clone()),
            ]));
            frame.render_widget(prompt, chunks[2]);
        }
    }

    fn status_bar(&self, model: &Model, history: &HistoryStatus) -> StatusBar {
        let mut bar = StatusBar::new();
        bar.add_segment(LocationSegment {
            location: history.location.clone(),
        });
        bar.add_segment(HistorySegment {
            can_go_back: history.can_go_back,
            can_go_forward: history.can_go_forward,
        });
        bar.add_segment(LoadingSegment {
            loading: model.view.is_loading(),
        });

        let (pane, shortcuts) = match &model.view {
            ViewState::List => ("Essays", vec![("Enter", "Open"), ("o", "Go to"), ("q", "Quit")]),
            ViewState::Detail { .. } => ("Essay", vec![("b", "Back"), ("r", "Reload"), ("q", "Quit")]),
        };
        bar.add_segment(NavigationHintsSegment {
            current_pane: pane.to_string(),
            available_shortcuts: shortcuts
                .into_iter()
                .map(|(key, description)| (key.to_string(), description.to_string()))
                .collect(),
        });
        bar
    }
}

/// One column of margin on each side
fn pad(area: Rect) -> Rect {
    if area.width <= 2 {
        return area;
    }
    Rect {
        x: area.x + 1,
        width: area.width - 2,
        ..area
    }
}
