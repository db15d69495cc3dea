//! Application layer for taskdeck.
//!
//! This crate provides the task list state engine, the store abstraction it
//! persists through, undo buffering, and configuration shared across
//! front ends.

pub mod config;
pub mod observer;
pub mod service;
pub mod store;
pub mod undo;

// Re-exports for convenience
pub use config::{AppConfig, ListConfig, StoreConfig, UndoConfig};
pub use observer::{TaskListObserver, TaskListUpdate};
pub use service::{
    CreateTaskInput, DescriptionPatch, TaskEdit, TaskListError, TaskListService,
};
pub use store::TaskStore;
pub use undo::{
    DELETE_UNDO_WINDOW, TOGGLE_UNDO_WINDOW, UndoAffordance, UndoKind, UndoSlot,
};
