use clap::{Args, Parser, Subcommand};

use crate::model::{Priority, TaskStatus};

#[derive(Parser)]
#[command(name = "tm", about = concat!("[>] taskmaster v", env!("CARGO_PKG_VERSION"), " - your tasks, in the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use the built-in offline backend (demo data, nothing persists)
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store the service token (and optionally the service URL)
    Login(LoginArgs),
    /// Show who is signed in
    Whoami,
    /// List tasks
    List(ListArgs),
    /// List projects
    Projects,
    /// Create a task
    Add(AddArgs),
    /// Update fields on a task
    Edit(EditArgs),
    /// Mark a task completed
    Done(DoneArgs),
    /// Delete a task
    Rm(RmArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    /// Bearer token issued by the service
    pub token: String,

    /// Also set the service base URL
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks with this status (pending, in_progress, completed)
    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,

    /// Only tasks in this project id
    #[arg(long)]
    pub project: Option<i64>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,

    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,

    /// Due date as YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,

    /// Project id (defaults to the first listed project)
    #[arg(long)]
    pub project: Option<i64>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id
    pub id: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,

    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,

    /// Due date as YYYY-MM-DD, or "none" to clear it
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub project: Option<i64>,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task id
    pub id: i64,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task id
    pub id: i64,
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(s)
        .ok_or_else(|| format!("'{s}' is not a status (pending, in_progress, completed)"))
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse(s).ok_or_else(|| format!("'{s}' is not a priority (low, medium, high)"))
}
