use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::time::{Duration, Instant};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::events::{EventHandler, EventResult};
use crate::navigation::{History, Location, MemoryHistory, NavigationController};
use crate::ui::{HistoryStatus, UI};

/// The interactive reader: terminal setup, the draw/poll loop, and the
/// mapping from key results to navigation.
pub struct App {
    should_quit: bool,
    ui: UI,
    event_handler: EventHandler,
    history: MemoryHistory,
    controller: NavigationController,
}

impl App {
    /// Build the reader starting at `initial`. Must be called inside a Tokio
    /// runtime; a deep link starts loading immediately.
    pub fn new(config: &Config, catalog: Catalog, initial: Location) -> Self {
        let history = MemoryHistory::new(initial);
        let controller = NavigationController::new(
            Arc::new(catalog),
            config.content_loader(),
            Arc::new(history.clone()),
        );

        Self {
            should_quit: false,
            ui: UI::new(config.site.clone()),
            event_handler: EventHandler::new(),
            history,
            controller,
        }
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    pub async fn run(&mut self) -> Result<()> {
        if !std::io::stdout().is_tty() {
            return Err(anyhow::anyhow!(
                "quire needs a terminal (TTY). Use `quire list` or `quire render` for non-interactive output."
            ));
        }

        enable_raw_mode().map_err(|e| anyhow::anyhow!("Failed to enable raw mode: {}", e))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| anyhow::anyhow!("Failed to setup terminal: {}", e))?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal =
            Terminal::new(backend).map_err(|e| anyhow::anyhow!("Failed to create terminal: {}", e))?;

        let result = self.run_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.controller.shutdown();
        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let mut last_tick = Instant::now();
        let tick_rate = Duration::from_millis(50);

        loop {
            // Apply load results and history events queued since the last frame
            self.controller.pump();
            self.ui.sync(self.controller.model());

            let status = self.history_status();
            let model = self.controller.model();
            let ui = &mut self.ui;
            terminal.draw(|frame| ui.render(frame, model, &status))?;

            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            // Blocking poll; yield afterwards so spawned loads make progress
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    let result = self
                        .event_handler
                        .handle_key_event(key, &mut self.ui, self.controller.model());
                    self.apply(result);
                }
            }
            tokio::task::yield_now().await;

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
            }

            if self.should_quit || self.event_handler.should_quit() {
                break;
            }
        }

        Ok(())
    }

    /// Carry out a key result against the controller or the history
    pub fn apply(&mut self, result: EventResult) {
        match result {
            EventResult::Continue => {}
            EventResult::Quit => self.should_quit = true,
            EventResult::Select(identifier) => self.controller.select_essay(&identifier),
            EventResult::GoBack => self.controller.go_back(),
            EventResult::Reload => self.controller.reload(),
            // Browser-style moves notify the controller through its history subscription
            EventResult::HistoryBack => {
                if !self.history.back() {
                    tracing::debug!("Already at the oldest history entry");
                }
            }
            EventResult::HistoryForward => {
                if !self.history.forward() {
                    tracing::debug!("Already at the newest history entry");
                }
            }
            EventResult::Visit(location) => {
                tracing::info!("Visiting {}", location);
                self.history.visit(location);
            }
        }
    }

    fn history_status(&self) -> HistoryStatus {
        HistoryStatus {
            location: self.history.current(),
            can_go_back: self.history.can_go_back(),
            can_go_forward: self.history.can_go_forward(),
        }
    }
}
