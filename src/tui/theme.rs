//! Colors for the board view
//!
//! Status and priority colors line up with the CLI output in `display.rs`.

use std::sync::LazyLock;

use iocraft::prelude::Color;

use crate::notify::ToastLevel;
use crate::types::{ItemPriority, ItemStatus};

const GRAY: Color = Color::Rgb {
    r: 120,
    g: 120,
    b: 120,
};

#[derive(Debug, Clone)]
pub struct Theme {
    pub status: [Color; 3],
    pub priority_high: Color,
    pub priority_medium: Color,
    pub priority_low: Color,
    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub highlight_text: Color,
    pub card_number: Color,
    /// Marker on cards whose move has not been confirmed
    pub pending: Color,
    pub toast_success: Color,
    pub toast_error: Color,
    pub toast_warning: Color,
    pub toast_info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Todo, InProgress, Completed
            status: [Color::Yellow, Color::Cyan, Color::Green],
            priority_high: Color::Red,
            priority_medium: Color::Yellow,
            priority_low: GRAY,
            border: GRAY,
            border_focused: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: GRAY,
            highlight: Color::Blue,
            highlight_text: Color::White,
            card_number: Color::Cyan,
            pending: Color::Magenta,
            toast_success: Color::Green,
            toast_error: Color::Red,
            toast_warning: Color::Yellow,
            toast_info: Color::Cyan,
        }
    }
}

impl Theme {
    pub fn status_color(&self, status: ItemStatus) -> Color {
        let slot = match status {
            ItemStatus::Todo => 0,
            ItemStatus::InProgress => 1,
            ItemStatus::Completed => 2,
        };
        self.status[slot]
    }

    pub fn priority_color(&self, priority: ItemPriority) -> Color {
        match priority {
            ItemPriority::High => self.priority_high,
            ItemPriority::Medium => self.priority_medium,
            ItemPriority::Low => self.priority_low,
        }
    }

    pub fn toast_color(&self, level: ToastLevel) -> Color {
        match level {
            ToastLevel::Success => self.toast_success,
            ToastLevel::Error => self.toast_error,
            ToastLevel::Warning => self.toast_warning,
            ToastLevel::Info => self.toast_info,
        }
    }
}

static THEME: LazyLock<Theme> = LazyLock::new(Theme::default);

pub fn theme() -> &'static Theme {
    &THEME
}
