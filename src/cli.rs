use clap::{Args, Parser, Subcommand};

use crate::types::{ItemStatus, RecordId, VALID_STATUSES};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Task board and account tools for the admin dashboard API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output flags
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Forget the stored session
    Logout {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show the signed-in user
    Whoami {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Work with tasks
    #[command(visible_alias = "t")]
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Interactive Kanban board
    Board {
        /// Start with this search text
        #[arg(long)]
        search: Option<String>,
    },

    /// Inspect role-based access
    Access {
        #[command(subcommand)]
        action: AccessAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks
    Ls {
        /// Filter by status (todo, in-progress, completed)
        #[arg(long, value_parser = parse_status)]
        status: Option<ItemStatus>,

        /// Only tasks whose title contains this text
        #[arg(long)]
        search: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show one task
    Show {
        id: RecordId,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Create a task
    Create {
        /// Task title
        title: String,

        /// Description text
        #[arg(short, long)]
        description: Option<String>,

        /// Status (todo, in-progress, completed)
        #[arg(short, long, default_value = "todo")]
        status: String,

        /// Priority (Low, Medium, High)
        #[arg(short, long, default_value = "Medium")]
        priority: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Change fields of a task
    Edit {
        id: RecordId,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD); an empty value clears it
        #[arg(long)]
        due: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Move a task to another column
    Move {
        id: RecordId,

        /// Target status (todo, in-progress, completed)
        #[arg(value_parser = parse_status)]
        status: ItemStatus,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Delete a task
    Rm {
        id: RecordId,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum AccessAction {
    /// Check whether a role may open a route
    Check {
        /// Route path, e.g. /tasks
        path: String,

        /// Role to check; defaults to the signed-in user's role
        #[arg(long)]
        role: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show the navigation menu a role sees
    Menu {
        /// Role to render for; defaults to the signed-in user's role
        #[arg(long)]
        role: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (api_url, request_timeout, default_route, login_route)
        key: String,

        #[command(flatten)]
        output: OutputOptions,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, request_timeout, default_route, login_route)
        key: String,
        /// Value to set
        value: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            AppContext, EditOptions, NewTaskOptions, cmd_access_check, cmd_access_menu, cmd_board,
            cmd_config_get, cmd_config_set, cmd_config_show, cmd_login, cmd_logout,
            cmd_task_create, cmd_task_edit, cmd_task_ls, cmd_task_move, cmd_task_rm,
            cmd_task_show, cmd_whoami,
        };

        // Config commands must work even when the stored session is unreadable
        let ctx = match self {
            Commands::Config { action } => {
                return match action {
                    ConfigAction::Show { output } => cmd_config_show(output),
                    ConfigAction::Get { key, output } => cmd_config_get(&key, output),
                    ConfigAction::Set { key, value, output } => {
                        cmd_config_set(&key, &value, output)
                    }
                };
            }
            _ => AppContext::load()?,
        };

        match self {
            Commands::Login {
                email,
                password,
                output,
            } => cmd_login(&ctx, &email, &password, output).await,
            Commands::Logout { output } => cmd_logout(&ctx, output),
            Commands::Whoami { output } => cmd_whoami(&ctx, output),

            Commands::Tasks { action } => match action {
                TaskAction::Ls {
                    status,
                    search,
                    output,
                } => cmd_task_ls(&ctx, status, search.as_deref(), output).await,
                TaskAction::Show { id, output } => cmd_task_show(&ctx, &id, output).await,
                TaskAction::Create {
                    title,
                    description,
                    status,
                    priority,
                    due,
                    output,
                } => {
                    cmd_task_create(
                        &ctx,
                        NewTaskOptions {
                            title,
                            description,
                            status,
                            priority,
                            due,
                        },
                        output,
                    )
                    .await
                }
                TaskAction::Edit {
                    id,
                    title,
                    description,
                    status,
                    priority,
                    due,
                    output,
                } => {
                    cmd_task_edit(
                        &ctx,
                        &id,
                        EditOptions {
                            title,
                            description,
                            status,
                            priority,
                            due,
                        },
                        output,
                    )
                    .await
                }
                TaskAction::Move { id, status, output } => {
                    cmd_task_move(&ctx, &id, status, output).await
                }
                TaskAction::Rm { id, output } => cmd_task_rm(&ctx, &id, output).await,
            },

            Commands::Board { search } => cmd_board(&ctx, search).await,

            Commands::Access { action } => match action {
                AccessAction::Check { path, role, output } => {
                    cmd_access_check(&ctx, &path, role.as_deref(), output)
                }
                AccessAction::Menu { role, output } => {
                    cmd_access_menu(&ctx, role.as_deref(), output)
                }
            },

            Commands::Config { .. } => Ok(()),
        }
    }
}

/// Generic validation helper for parsing values with a standard error message format.
fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_status(s: &str) -> Result<ItemStatus, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        VALID_STATUSES,
    )
}
