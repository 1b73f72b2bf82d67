pub mod access;
pub mod api;
pub mod board;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod notify;
pub mod session;
pub mod tui;
pub mod types;
pub mod validate;

pub use access::{Navigation, Permission, PermissionTable, RouteGuard, filter_menu};
pub use api::{ApiClient, TaskBackend};
pub use board::{DropEvent, DropLocation, DropOutcome, TaskBoard};
pub use cache::{PatchHandle, QueryCache, QueryKey, Tag};
pub use config::Config;
pub use error::{FolioError, Result};
pub use notify::{Notifications, Toast, ToastLevel};
pub use session::{Session, SessionHandle, SessionStore};
pub use types::{ItemPriority, ItemStatus, NewWorkItem, RecordId, User, WorkItem};
