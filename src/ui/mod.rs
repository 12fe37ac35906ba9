//! Ratatui front-end: an Entry tab for upserts and deletes, and a Stock tab
//! for browsing, filtering and exporting. All state lives in [`App`].

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
