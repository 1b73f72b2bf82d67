//! Title filter shown under the board header

use iocraft::prelude::*;

use crate::tui::theme::theme;

const PLACEHOLDER: &str = "press / to filter by title";

#[derive(Default, Props)]
pub struct InlineSearchBoxProps {
    pub value: Option<State<String>>,
    pub has_focus: bool,
    /// Cards left visible by the current filter; hidden when not filtering
    pub matches: Option<usize>,
}

#[component]
pub fn InlineSearchBox(props: &InlineSearchBoxProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let focused = props.has_focus;
    let prompt_color = if focused {
        theme.border_focused
    } else {
        theme.text_dimmed
    };

    let Some(mut query) = props.value else {
        return element! {
            View(height: 1) {
                Text(content: PLACEHOLDER, color: theme.text_dimmed)
            }
        };
    };
    let show_placeholder = !focused && query.read().is_empty();
    let matches_label = props
        .matches
        .filter(|_| !query.read().is_empty())
        .map(|n| format!("{n} match{}", if n == 1 { "" } else { "es" }));

    element! {
        View(width: 100pct, height: 1, flex_direction: FlexDirection::Row) {
            Text(content: "/ ", color: prompt_color, weight: Weight::Bold)
            View(flex_grow: 1.0) {
                #(show_placeholder.then(|| element! {
                    Text(content: PLACEHOLDER, color: theme.text_dimmed)
                }))
                #((!show_placeholder).then(|| element! {
                    TextInput(
                        value: query.to_string(),
                        has_focus: focused,
                        on_change: move |text| query.set(text),
                        color: theme.text,
                    )
                }))
            }
            #(matches_label.map(|label| element! {
                Text(content: label, color: theme.text_dimmed)
            }))
        }
    }
}
