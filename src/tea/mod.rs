/// The Elm Architecture (TEA) core of the reader
///
/// Navigation state lives in a single `Model`; every change goes through
/// `update`, which is pure and returns the side effects (`Command`s) for the
/// `CommandExecutor` to perform against the history and the content loader.

pub mod command;
pub mod message;
pub mod model;
pub mod update;

pub use command::{Command, CommandExecutor};
pub use message::Message;
pub use model::{EssayContent, Model, ViewState};
pub use update::update;
