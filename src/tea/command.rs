/// Command system for TEA pattern
///
/// Commands are the side effects requested by `update`. Loads run as tokio
/// tasks and report back to the update loop as `Message::ContentLoaded`.

use crate::catalog::EssayDescriptor;
use crate::content::ContentLoader;
use crate::navigation::{History, Location};
use crate::tea::Message;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a history entry for a user-initiated navigation
    PushLocation(Location),

    /// Fetch and render an essay for the given navigation generation
    LoadContent {
        generation: u64,
        essay: EssayDescriptor,
    },
}

/// Performs commands against the history and the content loader
pub struct CommandExecutor {
    message_sender: mpsc::UnboundedSender<Message>,
    loader: ContentLoader,
    history: Arc<dyn History>,
}

impl CommandExecutor {
    pub fn new(
        message_sender: mpsc::UnboundedSender<Message>,
        loader: ContentLoader,
        history: Arc<dyn History>,
    ) -> Self {
        Self {
            message_sender,
            loader,
            history,
        }
    }

    /// Execute a command. Loads are spawned, so this must run inside a
    /// Tokio runtime.
    pub fn execute(&self, command: Command) {
        match command {
            Command::PushLocation(location) => {
                tracing::debug!("Pushing history entry {}", location);
                self.history.push(location);
            }
            Command::LoadContent { generation, essay } => {
                self.spawn_load(generation, essay);
            }
        }
    }

    fn spawn_load(&self, generation: u64, essay: EssayDescriptor) {
        let loader = self.loader.clone();
        let sender = self.message_sender.clone();

        tokio::spawn(async move {
            let result = loader.load(&essay).await;
            let message = Message::ContentLoaded {
                generation,
                identifier: essay.identifier,
                result,
            };
            if let Err(e) = sender.send(message) {
                tracing::debug!("Load finished after the controller shut down: {}", e);
            }
        });
    }
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}
