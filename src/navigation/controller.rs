use super::{History, HistorySubscription, Location};
use crate::catalog::Catalog;
use crate::content::ContentLoader;
use crate::tea::{update, CommandExecutor, Message, Model, ViewState};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Keeps the view state and the history location in step.
///
/// User actions, history events and load results are queued as messages and
/// applied one at a time, each to completion. The controller registers a
/// history listener on construction and drops it on shutdown or drop.
///
/// Must be created and driven inside a Tokio runtime, since loads are
/// spawned as tasks.
pub struct NavigationController {
    model: Model,
    history: Arc<dyn History>,
    executor: CommandExecutor,
    inbox: mpsc::UnboundedReceiver<Message>,
    sender: mpsc::UnboundedSender<Message>,
    subscription: Option<HistorySubscription>,
}

impl NavigationController {
    /// Create the controller and derive the initial view from the history's
    /// current location. A deep link to a known essay starts loading at once.
    pub fn new(catalog: Arc<Catalog>, loader: ContentLoader, history: Arc<dyn History>) -> Self {
        let (sender, inbox) = mpsc::unbounded_channel();

        let listener_sender = sender.clone();
        let subscription = history.subscribe(Arc::new(move |location: &Location| {
            if listener_sender
                .send(Message::HistoryNavigated(location.clone()))
                .is_err()
            {
                tracing::debug!("History moved to {} after controller shutdown", location);
            }
        }));

        let executor = CommandExecutor::new(sender.clone(), loader, history.clone());
        let mut controller = Self {
            model: Model::new(catalog),
            history,
            executor,
            inbox,
            sender,
            subscription: Some(subscription),
        };

        let initial = controller.history.current();
        tracing::info!("Starting navigation at {}", initial);
        controller.dispatch(Message::HistoryNavigated(initial));
        controller
    }

    pub fn state(&self) -> &ViewState {
        &self.model.view
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn catalog(&self) -> &Catalog {
        &self.model.catalog
    }

    /// The host's current location
    pub fn location(&self) -> Location {
        self.history.current()
    }

    /// Sender for queueing messages from elsewhere (other tasks, the UI)
    pub fn sender(&self) -> mpsc::UnboundedSender<Message> {
        self.sender.clone()
    }

    pub fn select_essay(&mut self, identifier: &str) {
        self.submit(Message::select(identifier));
    }

    pub fn go_back(&mut self) {
        self.submit(Message::GoBack);
    }

    pub fn on_history_navigate(&mut self, location: Location) {
        self.submit(Message::HistoryNavigated(location));
    }

    /// Re-select the essay on screen, if any
    pub fn reload(&mut self) {
        self.pump();
        if let Some(identifier) = self.model.view.identifier().map(str::to_string) {
            self.dispatch(Message::select(identifier));
        }
    }

    /// Apply a user action after everything already queued, so history
    /// events that arrived earlier are never overtaken
    fn submit(&mut self, message: Message) {
        self.pump();
        self.dispatch(message);
    }

    /// Run one message through `update` and execute its commands
    pub fn dispatch(&mut self, message: Message) {
        let commands = update(&mut self.model, message);
        for command in commands {
            self.executor.execute(command);
        }
    }

    /// Apply every message that is already queued without waiting.
    /// Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.inbox.try_recv() {
            self.dispatch(message);
            applied += 1;
        }
        applied
    }

    /// Wait for the next queued message and apply it
    pub async fn next_event(&mut self) {
        if let Some(message) = self.inbox.recv().await {
            self.dispatch(message);
        }
    }

    /// Stop listening to history events
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            tracing::debug!("Navigation controller unsubscribing from history");
            subscription.unsubscribe();
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

impl std::fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationController")
            .field("view", &self.model.view)
            .field("generation", &self.model.generation)
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}
