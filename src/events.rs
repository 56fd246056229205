use crate::navigation::Location;
use crate::tea::{Model, ViewState};
use crate::ui::UI;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Lines moved by PageUp/PageDown
const PAGE_LINES: u16 = 20;

/// Result of handling a key event
#[derive(Debug, Clone, PartialEq)]
pub enum EventResult {
    Continue,
    Quit,
    /// Open the highlighted essay
    Select(String),
    /// Return to the list
    GoBack,
    /// Move back through history, like a browser's back button
    HistoryBack,
    HistoryForward,
    Reload,
    /// Navigate to a typed address
    Visit(Location),
}

/// Maps key presses to navigation actions. Presentation-only keys
/// (list movement, scrolling, prompt editing) are applied to the UI directly.
#[derive(Debug, Default)]
pub struct EventHandler {
    should_quit: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, ui: &mut UI, model: &Model) -> EventResult {
        if key.kind == KeyEventKind::Release {
            return EventResult::Continue;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return EventResult::Quit;
        }

        if ui.is_prompting() {
            return self.handle_address_keys(key, ui);
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            match key.code {
                KeyCode::Left => return EventResult::HistoryBack,
                KeyCode::Right => return EventResult::HistoryForward,
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                EventResult::Quit
            }
            KeyCode::Char('h') => EventResult::HistoryBack,
            KeyCode::Char('l') => EventResult::HistoryForward,
            KeyCode::Char('o') => {
                ui.open_address(&model.view.location());
                EventResult::Continue
            }
            _ => match &model.view {
                ViewState::List => self.handle_list_keys(key, ui, model),
                ViewState::Detail { .. } => self.handle_essay_keys(key, ui),
            },
        }
    }

    fn handle_list_keys(&mut self, key: KeyEvent, ui: &mut UI, model: &Model) -> EventResult {
        let len = model.catalog.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                ui.select_next(len);
                EventResult::Continue
            }
            KeyCode::Up | KeyCode::Char('k') => {
                ui.select_previous(len);
                EventResult::Continue
            }
            KeyCode::Enter => match ui.selected_identifier(model) {
                Some(identifier) => EventResult::Select(identifier),
                None => EventResult::Continue,
            },
            _ => EventResult::Continue,
        }
    }

    fn handle_essay_keys(&mut self, key: KeyEvent, ui: &mut UI) -> EventResult {
        match key.code {
            KeyCode::Backspace | KeyCode::Esc | KeyCode::Char('b') => EventResult::GoBack,
            KeyCode::Char('r') => EventResult::Reload,
            KeyCode::Down | KeyCode::Char('j') => {
                ui.scroll_down(1);
                EventResult::Continue
            }
            KeyCode::Up | KeyCode::Char('k') => {
                ui.scroll_up(1);
                EventResult::Continue
            }
            KeyCode::PageDown | KeyCode::Char(' ') => {
                ui.scroll_down(PAGE_LINES);
                EventResult::Continue
            }
            KeyCode::PageUp => {
                ui.scroll_up(PAGE_LINES);
                EventResult::Continue
            }
            KeyCode::Home | KeyCode::Char('g') => {
                ui.scroll_to_top();
                EventResult::Continue
            }
            KeyCode::End | KeyCode::Char('G') => {
                ui.scroll_to_bottom();
                EventResult::Continue
            }
            _ => EventResult::Continue,
        }
    }

    fn handle_address_keys(&mut self, key: KeyEvent, ui: &mut UI) -> EventResult {
        match key.code {
            KeyCode::Esc => {
                ui.cancel_address();
                EventResult::Continue
            }
            KeyCode::Enter => match ui.take_address() {
                Some(address) if !address.trim().is_empty() => {
                    EventResult::Visit(Location::parse(address.trim()))
                }
                _ => EventResult::Continue,
            },
            KeyCode::Backspace => {
                ui.address_backspace();
                EventResult::Continue
            }
            KeyCode::Char(c) => {
                ui.address_input(c);
                EventResult::Continue
            }
            _ => EventResult::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, EssayDescriptor};
    use crate::config::SiteConfig;
    use crate::tea::EssayContent;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn model() -> Model {
        let catalog = Catalog::new(vec![
            EssayDescriptor::new("Before The Startup", "before.md", "essays/before.md"),
            EssayDescriptor::new("Default Alive", "alive.md", "essays/alive.md"),
        ])
        .unwrap();
        Model::new(Arc::new(catalog))
    }

    #[test]
    fn test_enter_selects_highlighted_essay() {
        let model = model();
        let mut ui = UI::new(SiteConfig::default());
        let mut handler = EventHandler::new();

        assert_eq!(handler.handle_key_event(key(KeyCode::Down), &mut ui, &model), EventResult::Continue);
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Enter), &mut ui, &model),
            EventResult::Select("alive.md".to_string())
        );
    }

    #[test]
    fn test_back_keys_only_in_essay_view() {
        let mut model = model();
        let mut ui = UI::new(SiteConfig::default());
        let mut handler = EventHandler::new();

        assert_eq!(handler.handle_key_event(key(KeyCode::Backspace), &mut ui, &model), EventResult::Continue);

        let essay = model.catalog.get("before.md").unwrap().clone();
        model.view = ViewState::Detail {
            essay,
            content: EssayContent::Loading,
        };
        assert_eq!(handler.handle_key_event(key(KeyCode::Backspace), &mut ui, &model), EventResult::GoBack);
        assert_eq!(handler.handle_key_event(key(KeyCode::Char('r')), &mut ui, &model), EventResult::Reload);
    }

    #[test]
    fn test_history_keys() {
        let model = model();
        let mut ui = UI::new(SiteConfig::default());
        let mut handler = EventHandler::new();

        let alt_left = KeyEvent::new(KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(handler.handle_key_event(alt_left, &mut ui, &model), EventResult::HistoryBack);
        assert_eq!(handler.handle_key_event(key(KeyCode::Char('l')), &mut ui, &model), EventResult::HistoryForward);
    }

    #[test]
    fn test_address_prompt_visits_location() {
        let model = model();
        let mut ui = UI::new(SiteConfig::default());
        let mut handler = EventHandler::new();

        handler.handle_key_event(key(KeyCode::Char('o')), &mut ui, &model);
        assert!(ui.is_prompting());
        for c in "essay/alive.md".chars() {
            handler.handle_key_event(key(KeyCode::Char(c)), &mut ui, &model);
        }

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Enter), &mut ui, &model),
            EventResult::Visit(Location::essay("alive.md"))
        );
        assert!(!ui.is_prompting());
    }

    #[test]
    fn test_quit() {
        let model = model();
        let mut ui = UI::new(SiteConfig::default());
        let mut handler = EventHandler::new();

        assert_eq!(handler.handle_key_event(key(KeyCode::Char('q')), &mut ui, &model), EventResult::Quit);
        assert!(handler.should_quit());
    }
}
