/// Update function for TEA pattern
///
/// All navigation state changes happen here. The function is pure: it
/// mutates the model and returns the commands the executor should run.

use crate::content::LoadError;
use crate::navigation::{Location, Route};
use crate::tea::{Command, EssayContent, Message, Model, ViewState};

/// Apply a message to the model and return the resulting side effects
pub fn update(model: &mut Model, message: Message) -> Vec<Command> {
    match message {
        Message::SelectEssay(identifier) => select_essay(model, &identifier),
        Message::GoBack => go_back(model),
        Message::HistoryNavigated(location) => history_navigated(model, &location),
        Message::ContentLoaded {
            generation,
            identifier,
            result,
        } => content_loaded(model, generation, &identifier, result),
    }
}

/// User selection. Unknown identifiers are ignored before any fetch is issued.
fn select_essay(model: &mut Model, identifier: &str) -> Vec<Command> {
    let Some(essay) = model.catalog.get(identifier).cloned() else {
        tracing::warn!("Ignoring selection of unknown essay {:?}", identifier);
        return Vec::new();
    };

    // Re-selecting the essay on screen reloads it without a duplicate entry
    let already_shown = model.view.identifier() == Some(identifier);
    let generation = model.next_generation();
    tracing::info!("Opening essay {} (generation {})", identifier, generation);

    model.view = ViewState::Detail {
        essay: essay.clone(),
        content: EssayContent::Loading,
    };

    let mut commands = Vec::with_capacity(2);
    if !already_shown {
        commands.push(Command::PushLocation(Location::essay(identifier)));
    }
    commands.push(Command::LoadContent { generation, essay });
    commands
}

/// The in-page back button always records a new root entry
fn go_back(model: &mut Model) -> Vec<Command> {
    if model.view.is_list() {
        tracing::debug!("Back requested while already on the list");
        return Vec::new();
    }

    let generation = model.next_generation();
    tracing::info!("Returning to essay list (generation {})", generation);
    model.view = ViewState::List;
    vec![Command::PushLocation(Location::root())]
}

/// Re-derive the view from a location without touching history.
///
/// Also used for the initial location at startup.
fn history_navigated(model: &mut Model, location: &Location) -> Vec<Command> {
    let generation = model.next_generation();

    match location.route() {
        Route::Essay(identifier) => match model.catalog.get(&identifier).cloned() {
            Some(essay) => {
                tracing::info!("History moved to essay {} (generation {})", identifier, generation);
                model.view = ViewState::Detail {
                    essay: essay.clone(),
                    content: EssayContent::Loading,
                };
                vec![Command::LoadContent { generation, essay }]
            }
            None => {
                tracing::warn!("History moved to unknown essay {:?}, showing list", identifier);
                model.view = ViewState::List;
                Vec::new()
            }
        },
        Route::Root => {
            tracing::info!("History moved to essay list (generation {})", generation);
            model.view = ViewState::List;
            Vec::new()
        }
        Route::Unknown(path) => {
            tracing::warn!("History moved to unrecognised path {}, showing list", path);
            model.view = ViewState::List;
            Vec::new()
        }
    }
}

/// Apply a finished load if it still belongs to the current navigation
fn content_loaded(
    model: &mut Model,
    generation: u64,
    identifier: &str,
    result: Result<String, LoadError>,
) -> Vec<Command> {
    if !model.is_current(generation) {
        tracing::debug!(
            "Discarding superseded load of {} (generation {}, current {})",
            identifier,
            generation,
            model.generation
        );
        return Vec::new();
    }

    match &mut model.view {
        ViewState::Detail { essay, content }
            if essay.identifier == identifier && *content == EssayContent::Loading =>
        {
            *content = match result {
                Ok(html) => EssayContent::Rendered { html },
                Err(e) => {
                    tracing::warn!("Failed to load essay {}: {}", identifier, e);
                    EssayContent::Failed {
                        reason: e.to_string(),
                    }
                }
            };
        }
        _ => {
            tracing::debug!("Load of {} no longer matches the view, discarding", identifier);
        }
    }
    Vec::new()
}
