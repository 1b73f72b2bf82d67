//! Board navigation state for the terminal UI.
//!
//! Keeps the selection, search and loaded items as plain data and updates
//! them through [`reduce_board_state`], so key handling can be tested
//! without a terminal. Moving a card between columns is expressed as the
//! same [`DropEvent`] a pointer drag would produce; see [`drop_for_move`].

use crate::notify::Toast;
use crate::types::{RecordId, WorkItem};

use super::model::{COLUMNS, Column, DropEvent, DropLocation, group_items};

/// Raw state that changes during user interaction
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    /// Items as last read from the cache
    pub items: Vec<WorkItem>,
    pub search_query: String,
    pub search_focused: bool,
    /// Index into [`COLUMNS`]
    pub current_column: usize,
    /// Row within the current column
    pub current_row: usize,
    pub is_loading: bool,
    pub toast: Option<Toast>,
}

/// All possible actions on the board
#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    // Navigation
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    GoToTop,
    GoToBottom,

    // Status changes, handled by the component through `drop_for_move`
    MoveCardLeft,
    MoveCardRight,

    // Search
    FocusSearch,
    UpdateSearch(String),
    ExitSearch,
    ClearSearchAndExit,

    // Data
    /// Replace the items after a load, refresh or rollback
    ItemsLoaded(Vec<WorkItem>),
    /// Select the card with this id wherever it now lives
    FollowCard(RecordId),
    ShowToast(Toast),
    DismissToast,

    // App
    Reload,
    Quit,
}

impl BoardState {
    pub fn columns(&self) -> Vec<Column> {
        group_items(&self.items, &self.search_query)
    }

    /// The card under the cursor
    pub fn selected_item(&self) -> Option<WorkItem> {
        self.columns()
            .into_iter()
            .nth(self.current_column)
            .and_then(|column| column.items.into_iter().nth(self.current_row))
    }

    fn column_len(&self, column: usize) -> usize {
        self.columns().get(column).map(Column::len).unwrap_or(0)
    }

    fn clamp_row(&mut self) {
        let max_row = self.column_len(self.current_column).saturating_sub(1);
        if self.current_row > max_row {
            self.current_row = max_row;
        }
    }
}

/// Pure function: apply action to state (reducer pattern)
///
/// Card moves, reloads and quitting need async I/O or the app context and
/// are left to the component; they pass through unchanged here.
pub fn reduce_board_state(mut state: BoardState, action: BoardAction) -> BoardState {
    match action {
        BoardAction::MoveLeft => {
            state.current_column = state.current_column.saturating_sub(1);
            state.clamp_row();
        }
        BoardAction::MoveRight => {
            state.current_column = (state.current_column + 1).min(COLUMNS.len() - 1);
            state.clamp_row();
        }
        BoardAction::MoveUp => {
            state.current_row = state.current_row.saturating_sub(1);
        }
        BoardAction::MoveDown => {
            state.current_row += 1;
            state.clamp_row();
        }
        BoardAction::GoToTop => {
            state.current_row = 0;
        }
        BoardAction::GoToBottom => {
            state.current_row = state.column_len(state.current_column).saturating_sub(1);
        }

        BoardAction::FocusSearch => {
            state.search_focused = true;
        }
        BoardAction::UpdateSearch(query) => {
            state.search_query = query;
            state.clamp_row();
        }
        BoardAction::ExitSearch => {
            state.search_focused = false;
        }
        BoardAction::ClearSearchAndExit => {
            state.search_query.clear();
            state.search_focused = false;
            state.clamp_row();
        }

        BoardAction::ItemsLoaded(items) => {
            state.items = items;
            state.is_loading = false;
            state.clamp_row();
        }
        BoardAction::FollowCard(id) => {
            if let Some((col, row)) = state.columns().iter().enumerate().find_map(|(c, column)| {
                column
                    .items
                    .iter()
                    .position(|item| item.id == id)
                    .map(|r| (c, r))
            }) {
                state.current_column = col;
                state.current_row = row;
            }
        }
        BoardAction::ShowToast(toast) => {
            state.toast = Some(toast);
        }
        BoardAction::DismissToast => {
            state.toast = None;
        }

        BoardAction::Reload => {
            state.is_loading = true;
        }
        BoardAction::MoveCardLeft | BoardAction::MoveCardRight | BoardAction::Quit => {}
    }
    state
}

/// The drop a keyboard card move corresponds to.
///
/// The selected card lands at the top of the neighbouring column. Returns
/// `None` when nothing is selected or there is no column in that direction.
pub fn drop_for_move(state: &BoardState, action: &BoardAction) -> Option<DropEvent> {
    let target = match action {
        BoardAction::MoveCardLeft => state.current_column.checked_sub(1)?,
        BoardAction::MoveCardRight => state.current_column + 1,
        _ => return None,
    };
    let destination = *COLUMNS.get(target)?;
    let item = state.selected_item()?;

    let source = DropLocation::new(item.status, state.current_row);

    Some(DropEvent::new(
        item.id,
        source,
        Some(DropLocation::new(destination, 0)),
    ))
}
