//! Terminal UI for the task board
//!
//! Built on iocraft. State transitions live in [`crate::board::state`];
//! this module maps keys to actions and renders the result.

pub mod components;
pub mod handlers;
pub mod kanban;
pub mod theme;

pub use kanban::{KanbanBoard, KanbanBoardProps};
