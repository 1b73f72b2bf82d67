//! One-line notice for the last mutation's outcome

use iocraft::prelude::*;

use crate::notify::{Toast, ToastLevel};
use crate::tui::theme::theme;

fn marker(level: ToastLevel) -> &'static str {
    match level {
        ToastLevel::Success => "✓",
        ToastLevel::Error => "✗",
        ToastLevel::Warning => "!",
        ToastLevel::Info => "i",
    }
}

#[derive(Default, Props)]
pub struct ToastNotificationProps {
    pub toast: Option<Toast>,
}

/// Rendered above the footer until the next key press dismisses it
#[component]
pub fn ToastNotification(props: &ToastNotificationProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let Some(toast) = props.toast.as_ref() else {
        return element!(View).into_any();
    };
    let color = theme.toast_color(toast.level);

    element! {
        View(
            width: 100pct,
            height: 1,
            flex_shrink: 0.0,
            flex_direction: FlexDirection::Row,
            padding_left: 1,
            background_color: theme.background,
        ) {
            Text(
                content: format!("{} ", marker(toast.level)),
                color: color,
                weight: Weight::Bold,
            )
            Text(content: toast.message.clone(), color: color)
            Text(content: "  (any key to dismiss)", color: theme.text_dimmed)
        }
    }
    .into_any()
}
