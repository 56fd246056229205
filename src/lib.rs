pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod content;
pub mod events;
pub mod html;
pub mod navigation;
pub mod tea;
pub mod ui;

pub use app::App;
