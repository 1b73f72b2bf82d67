//! Kanban board command (`folio board`)

use std::sync::Arc;

use iocraft::prelude::*;

use super::{AppContext, TASKS_ROUTE};
use crate::cli::OutputOptions;
use crate::error::{FolioError, Result};
use crate::tui::KanbanBoard;

/// Launch the kanban board TUI
pub async fn cmd_board(ctx: &AppContext, search: Option<String>) -> Result<()> {
    if !ctx.enter_route(TASKS_ROUTE, OutputOptions::default())? {
        return Ok(());
    }
    let board = Arc::new(ctx.board()?);

    element!(KanbanBoard(board: Some(board), initial_search: search.unwrap_or_default()))
        .fullscreen()
        .await
        .map_err(|e| FolioError::Tui(e.to_string()))
}
