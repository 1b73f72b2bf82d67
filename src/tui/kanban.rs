//! Kanban board view (`folio board`)
//!
//! Three status columns over the cached task collection. Moving a card
//! updates the cache at once and persists in the background; the card
//! shows as pending until the server answers.

use std::pin::pin;
use std::sync::Arc;
use std::task::Poll;

use iocraft::prelude::*;

use crate::api::ApiClient;
use crate::board::{
    BoardAction, BoardState, COLUMNS, DropEvent, DropOutcome, TaskBoard, drop_for_move,
    reduce_board_state,
};
use crate::notify::Toast;
use crate::tui::components::{
    Footer, InlineSearchBox, TaskCard, ToastNotification, board_shortcuts, search_shortcuts,
};
use crate::tui::handlers::key_to_action;
use crate::tui::theme::theme;

#[derive(Default, Props)]
pub struct KanbanBoardProps {
    pub board: Option<Arc<TaskBoard<ApiClient>>>,
    /// Search text to start with
    pub initial_search: String,
}

fn dispatch(state: &mut State<BoardState>, action: BoardAction) {
    let current = state.read().clone();
    state.set(reduce_board_state(current, action));
}

/// Main kanban board component
///
/// ```text
/// +------------------------------------------+
/// | Folio - Board                   12 tasks |
/// | / search...                              |
/// +-------------+--------------+-------------+
/// |    To Do    | In Progress  |  Completed  |
/// |      3      |      1       |      8      |
/// +-------------+--------------+-------------+
/// | Card        | Card         | Card        |
/// | ...         |              | ...         |
/// +-------------+--------------+-------------+
/// | Footer with shortcuts                    |
/// +------------------------------------------+
/// ```
#[component]
pub fn KanbanBoard<'a>(props: &KanbanBoardProps, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();

    let mut board_state: State<BoardState> = hooks.use_state(|| BoardState {
        is_loading: true,
        ..BoardState::default()
    });
    let mut search_query = hooks.use_state(|| props.initial_search.clone());
    let mut should_exit = hooks.use_state(|| false);
    let board = props.board.clone();

    // Load tasks; `true` bypasses the cache
    let load_handler: Handler<bool> = hooks.use_async_handler({
        let board = board.clone();
        move |force: bool| {
            let board = board.clone();
            let mut board_state = board_state;
            async move {
                let Some(board) = board else {
                    dispatch(&mut board_state, BoardAction::ItemsLoaded(Vec::new()));
                    return;
                };
                let result = if force {
                    board.refresh().await
                } else {
                    board.load().await
                };
                match result {
                    Ok(items) => {
                        let count = items.len();
                        dispatch(&mut board_state, BoardAction::ItemsLoaded(items));
                        if force {
                            dispatch(
                                &mut board_state,
                                BoardAction::ShowToast(Toast::info(format!(
                                    "Reloaded {count} tasks"
                                ))),
                            );
                        }
                    }
                    Err(e) => {
                        tracing::warn!("loading tasks failed: {e}");
                        dispatch(&mut board_state, BoardAction::ItemsLoaded(board.items()));
                        dispatch(
                            &mut board_state,
                            BoardAction::ShowToast(Toast::error(format!(
                                "Failed to load tasks: {e}"
                            ))),
                        );
                    }
                }
            }
        }
    });

    let mut load_started = hooks.use_state(|| false);
    if !load_started.get() {
        load_started.set(true);
        load_handler.clone()(false);
    }

    // Persist a card move. The first poll applies the optimistic patch, so
    // the new column is shown while the request is still pending.
    let drop_handler: Handler<DropEvent> = hooks.use_async_handler({
        let board = board.clone();
        move |event: DropEvent| {
            let board = board.clone();
            let mut board_state = board_state;
            async move {
                let Some(board) = board else { return };
                let id = event.item_id.clone();

                let mut pending = pin!(board.handle_drop(event));
                let outcome = match futures::poll!(pending.as_mut()) {
                    Poll::Ready(outcome) => outcome,
                    Poll::Pending => {
                        dispatch(&mut board_state, BoardAction::ItemsLoaded(board.items()));
                        dispatch(&mut board_state, BoardAction::FollowCard(id.clone()));
                        pending.await
                    }
                };

                if let DropOutcome::Ignored(reason) = &outcome {
                    tracing::debug!(%id, %reason, "move ignored");
                    return;
                }
                dispatch(&mut board_state, BoardAction::ItemsLoaded(board.items()));
                dispatch(&mut board_state, BoardAction::FollowCard(id));
                if let Some(toast) = board.notifications().drain().pop() {
                    dispatch(&mut board_state, BoardAction::ShowToast(toast));
                }
            }
        }
    });

    // Keep the reducer's query in step with the text input
    let query = search_query.to_string();
    if board_state.read().search_query != query {
        dispatch(&mut board_state, BoardAction::UpdateSearch(query.clone()));
    }

    hooks.use_terminal_events({
        let load_handler = load_handler.clone();
        let drop_handler = drop_handler.clone();
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                let search_focused = board_state.read().search_focused;
                let Some(action) = key_to_action(code, modifiers, search_focused) else {
                    return;
                };
                if board_state.read().toast.is_some() {
                    dispatch(&mut board_state, BoardAction::DismissToast);
                }

                match action {
                    BoardAction::Quit => should_exit.set(true),
                    BoardAction::Reload => {
                        dispatch(&mut board_state, BoardAction::Reload);
                        load_handler(true);
                    }
                    BoardAction::MoveCardLeft | BoardAction::MoveCardRight => {
                        let event = drop_for_move(&board_state.read(), &action);
                        if let Some(event) = event {
                            drop_handler(event);
                        }
                    }
                    BoardAction::ClearSearchAndExit => {
                        search_query.set(String::new());
                        dispatch(&mut board_state, action);
                    }
                    other => dispatch(&mut board_state, other),
                }
            }
            _ => {}
        }
    });

    if should_exit.get() {
        system.exit();
    }

    let theme = theme();
    let snapshot = board_state.read().clone();
    let columns = snapshot.columns();
    let shown: usize = columns.iter().map(|c| c.len()).sum();
    let total = snapshot.items.len();

    let available_height = height.saturating_sub(7);
    let cards_per_column = (available_height / 5).max(1) as usize;
    let card_width = (u32::from(width) / COLUMNS.len() as u32).saturating_sub(2);

    let shortcuts = if snapshot.search_focused {
        search_shortcuts()
    } else {
        board_shortcuts()
    };

    let saving = props.board.as_ref().map_or(0, |b| {
        snapshot
            .items
            .iter()
            .filter(|item| b.is_in_flight(&item.id))
            .count()
    });
    let saving_note = (saving > 0).then(|| format!("saving {saving}…"));

    let count_label = if snapshot.is_loading {
        "Loading...".to_string()
    } else if shown == total {
        format!("{total} tasks")
    } else {
        format!("{shown} of {total} tasks")
    };

    element! {
        View(
            width: width,
            height: height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            View(
                width: 100pct,
                height: 1,
                flex_direction: FlexDirection::Row,
                flex_shrink: 0.0,
                justify_content: JustifyContent::SpaceBetween,
                padding_left: 1,
                padding_right: 1,
                background_color: theme.highlight,
            ) {
                Text(
                    content: "Folio - Board",
                    color: theme.text,
                    weight: Weight::Bold,
                )
                Text(content: count_label, color: theme.text)
            }

            View(
                width: 100pct,
                height: 1,
                padding_left: 1,
                padding_right: 1,
                margin_top: 1,
            ) {
                InlineSearchBox(
                    value: Some(search_query),
                    has_focus: snapshot.search_focused,
                    matches: Some(shown),
                )
            }

            View(
                width: 100pct,
                height: 2,
                flex_direction: FlexDirection::Row,
                margin_top: 1,
            ) {
                #(columns.iter().enumerate().map(|(col_idx, column)| {
                    let is_active = snapshot.current_column == col_idx && !snapshot.search_focused;
                    let status_color = theme.status_color(column.status);
                    element! {
                        View(
                            flex_grow: 1.0,
                            flex_shrink: 0.0,
                            flex_direction: FlexDirection::Column,
                            align_items: AlignItems::Center,
                            border_edges: Edges::Bottom,
                            border_style: BorderStyle::Single,
                            border_color: if is_active { theme.border_focused } else { theme.border },
                        ) {
                            Text(
                                content: column.title(),
                                color: if is_active { status_color } else { theme.text_dimmed },
                                weight: if is_active { Weight::Bold } else { Weight::Normal },
                            )
                            Text(
                                content: column.len().to_string(),
                                color: theme.text_dimmed,
                            )
                        }
                    }
                }))
            }

            View(
                flex_grow: 1.0,
                width: 100pct,
                flex_direction: FlexDirection::Row,
                overflow: Overflow::Hidden,
            ) {
                #(columns.iter().enumerate().map(|(col_idx, column)| {
                    let is_active_column = snapshot.current_column == col_idx && !snapshot.search_focused;
                    let total_count = column.len();
                    let start = if is_active_column {
                        snapshot.current_row.saturating_sub(cards_per_column - 1)
                    } else {
                        0
                    };
                    let end = (start + cards_per_column).min(total_count);
                    let hidden_above = start;
                    let hidden_below = total_count.saturating_sub(end);

                    element! {
                        View(
                            flex_grow: 1.0,
                            flex_shrink: 0.0,
                            height: 100pct,
                            flex_direction: FlexDirection::Column,
                            padding_left: 1,
                            padding_right: 1,
                            border_edges: Edges::Right,
                            border_style: BorderStyle::Single,
                            border_color: theme.border,
                            overflow: Overflow::Hidden,
                        ) {
                            #(if hidden_above > 0 {
                                Some(element! {
                                    View(height: 1) {
                                        Text(
                                            content: format!("  {} more above", hidden_above),
                                            color: theme.text_dimmed,
                                        )
                                    }
                                })
                            } else {
                                None
                            })

                            #(column.items.iter().enumerate().skip(start).take(end - start).map(|(row_idx, item)| {
                                let is_selected = is_active_column && row_idx == snapshot.current_row;
                                let is_pending = props
                                    .board
                                    .as_ref()
                                    .is_some_and(|b| b.is_in_flight(&item.id));
                                element! {
                                    View(margin_top: 1) {
                                        TaskCard(
                                            item: item.clone(),
                                            is_selected: is_selected,
                                            is_pending: is_pending,
                                            width: Some(card_width),
                                        )
                                    }
                                }
                            }))

                            View(flex_grow: 1.0)

                            #(if hidden_below > 0 {
                                Some(element! {
                                    View(height: 1) {
                                        Text(
                                            content: format!("  {} more below", hidden_below),
                                            color: theme.text_dimmed,
                                        )
                                    }
                                })
                            } else {
                                None
                            })
                        }
                    }
                }))
            }

            #(snapshot.toast.clone().map(|toast| element! {
                ToastNotification(toast: Some(toast))
            }))

            Footer(shortcuts: shortcuts, note: saving_note)
        }
    }
}
