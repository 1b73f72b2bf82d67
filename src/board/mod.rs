//! Kanban board for work items.
//!
//! - [`model`]: pure grouping, search and drop planning
//! - [`state`]: navigation reducer driving the terminal board
//! - [`controller`]: cache-backed optimistic status changes

pub mod controller;
pub mod model;
pub mod state;

pub use controller::{DropOutcome, GENERIC_UPDATE_FAILURE, TASK_TAG, TASKS_KEY, TaskBoard};
pub use model::{
    COLUMNS, Column, DropEvent, DropLocation, DropPlan, IgnoreReason, filter_items, group_items,
    matches_search, plan_drop,
};
pub use state::{BoardAction, BoardState, drop_for_move, reduce_board_state};
