//! Bottom bar: key hints on the left, an optional status note on the right

use iocraft::prelude::*;

use crate::tui::theme::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    pub action: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub shortcuts: Vec<Shortcut>,
    /// Shown right-aligned, e.g. how many moves are still saving
    pub note: Option<String>,
}

#[component]
pub fn Footer(props: &FooterProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let hints = props
        .shortcuts
        .iter()
        .map(|s| format!("{} {}", s.key, s.action))
        .collect::<Vec<_>>()
        .join("  ·  ");

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_shrink: 0.0,
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::SpaceBetween,
            padding_left: 1,
            padding_right: 1,
            background_color: theme.border,
        ) {
            Text(content: hints, color: theme.text)
            #(props.note.clone().map(|note| element! {
                Text(content: note, color: theme.highlight_text, weight: Weight::Bold)
            }))
        }
    }
}

const BOARD_SHORTCUTS: [Shortcut; 5] = [
    Shortcut::new("hjkl", "move"),
    Shortcut::new("s/S", "change status"),
    Shortcut::new("/", "filter"),
    Shortcut::new("r", "reload"),
    Shortcut::new("q", "quit"),
];

const SEARCH_SHORTCUTS: [Shortcut; 3] = [
    Shortcut::new("enter", "keep filter"),
    Shortcut::new("esc", "clear"),
    Shortcut::new("C-q", "quit"),
];

pub fn board_shortcuts() -> Vec<Shortcut> {
    BOARD_SHORTCUTS.to_vec()
}

pub fn search_shortcuts() -> Vec<Shortcut> {
    SEARCH_SHORTCUTS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_shortcuts_include_status_move() {
        assert!(board_shortcuts().iter().any(|s| s.key == "s/S"));
        assert!(search_shortcuts().iter().all(|s| s.key != "s/S"));
    }
}
