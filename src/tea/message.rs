/// Messages driving the navigation model
///
/// User actions, history events and async load results all flow through
/// one queue as `Message`s and are applied in arrival order.

use crate::content::LoadError;
use crate::navigation::Location;

#[derive(Debug, Clone)]
pub enum Message {
    /// The user picked an essay from the list (or reloads the current one)
    SelectEssay(String),

    /// The in-page back button
    GoBack,

    /// The host moved through history on its own (back/forward, typed location)
    HistoryNavigated(Location),

    /// A load issued under `generation` finished
    ContentLoaded {
        generation: u64,
        identifier: String,
        result: Result<String, LoadError>,
    },
}

impl Message {
    pub fn select(identifier: impl Into<String>) -> Self {
        Message::SelectEssay(identifier.into())
    }
}
