//! Core library surface for the branch inventory tool.
//!
//! The store and the CSV layer carry all of the behaviour; the `ui` module
//! and the binary are thin drivers on top so headless commands and tests can
//! reuse the same pieces.
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod storage;
pub mod store;
pub mod ui;

pub use config::AppConfig;
pub use error::{InventoryError, InventoryResult};
pub use models::{InventoryRecord, BRANCHES, CATEGORIES};
pub use store::{InventoryFilter, InventoryStore, RecordField, UpsertOutcome};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
