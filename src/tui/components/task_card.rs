//! Task card component for the board
//!
//! A compact card showing the task id, a wrapped title, priority and due
//! date. Cards with a save in flight are marked as pending.

use iocraft::prelude::*;

use crate::tui::theme::theme;
use crate::types::WorkItem;

#[derive(Default, Props)]
pub struct TaskCardProps {
    pub item: WorkItem,
    pub is_selected: bool,
    /// An update for this card has not been confirmed yet
    pub is_pending: bool,
    /// Available width for the card content (in characters)
    pub width: Option<u32>,
}

/// Word-wrap `text` into at most `max_lines` lines of `width` characters.
///
/// Words longer than a line are split. When text is cut off the last line
/// ends with an ellipsis.
pub fn wrap_title(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return vec![];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let used = current.chars().count();
            let gap = usize::from(used > 0);
            if used + gap + word.len() <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.extend(word.iter());
                break;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut current));
                continue;
            }
            // A single word wider than the line
            current = word.drain(..width).collect();
            lines.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let keep = width.saturating_sub(1);
            *last = last.chars().take(keep).collect::<String>() + "…";
        }
    }
    lines
}

/// Compact task card for board columns
///
/// ```text
/// +-------------------+
/// |>#12               |
/// | Fix the login bug |
/// | on mobile         |
/// | High  2024-06-03  |
/// +-------------------+
/// ```
#[component]
pub fn TaskCard(props: &TaskCardProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let item = &props.item;

    let border_color = if props.is_selected {
        theme.border_focused
    } else {
        theme.border
    };
    let bg_color = if props.is_selected {
        Some(theme.highlight)
    } else {
        None
    };
    let text_color = if props.is_selected {
        theme.highlight_text
    } else {
        theme.text
    };
    let priority_color = if props.is_selected {
        theme.highlight_text
    } else {
        theme.priority_color(item.priority)
    };

    let card_width = props.width.unwrap_or(20);
    let title_width = (card_width.saturating_sub(4) as usize).max(8);
    let title_lines = wrap_title(&item.title, title_width, 3);

    let indicator = if props.is_selected { ">" } else { " " };
    let id = format!("#{}", item.id);
    let due = item.due_date.map(|d| d.to_string()).unwrap_or_default();

    element! {
        View(
            width: 100pct,
            min_height: 3,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: border_color,
            background_color: bg_color,
            padding_left: 1,
            padding_right: 1,
        ) {
            View(flex_direction: FlexDirection::Row, gap: 1) {
                Text(
                    content: format!("{indicator}{id}"),
                    color: if props.is_selected { theme.highlight_text } else { theme.card_number },
                    weight: Weight::Bold,
                )
                #(if props.is_pending {
                    Some(element! {
                        Text(content: "saving…", color: theme.pending)
                    })
                } else {
                    None
                })
            }
            #(title_lines.iter().map(|line| {
                element! {
                    Text(
                        content: line.clone(),
                        color: text_color,
                    )
                }
            }))
            View(flex_direction: FlexDirection::Row, gap: 2) {
                Text(
                    content: item.priority.to_string(),
                    color: priority_color,
                )
                Text(
                    content: due,
                    color: if props.is_selected { theme.highlight_text } else { theme.text_dimmed },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_title_fits_on_one_line() {
        assert_eq!(wrap_title("Fix login", 20, 3), vec!["Fix login"]);
    }

    #[test]
    fn test_wrap_title_breaks_on_words() {
        assert_eq!(
            wrap_title("Write the quarterly report", 12, 3),
            vec!["Write the", "quarterly", "report"]
        );
    }

    #[test]
    fn test_wrap_title_splits_long_words() {
        assert_eq!(wrap_title("abcdefghij", 4, 3), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_title_truncates_with_ellipsis() {
        let lines = wrap_title("one two three four five", 5, 2);
        assert_eq!(lines, vec!["one", "two…"]);
    }

    #[test]
    fn test_wrap_title_empty() {
        assert!(wrap_title("   ", 10, 3).is_empty());
        assert!(wrap_title("text", 0, 3).is_empty());
    }
}
