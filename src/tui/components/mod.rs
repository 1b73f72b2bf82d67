//! Board UI components

pub mod footer;
pub mod search_box;
pub mod task_card;
pub mod toast;

pub use footer::{Footer, FooterProps, Shortcut, board_shortcuts, search_shortcuts};
pub use search_box::{InlineSearchBox, InlineSearchBoxProps};
pub use task_card::{TaskCard, TaskCardProps, wrap_title};
pub use toast::{ToastNotification, ToastNotificationProps};
