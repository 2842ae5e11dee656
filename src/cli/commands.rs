use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::event::Status;

#[derive(Parser)]
#[command(name = "daymap", about = concat!("daymap v", env!("CARGO_PKG_VERSION"), " - today's tasks as a mind map"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: <config dir>/daymap/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Mind map directory, overriding the config
    #[arg(short = 'C', long = "root", global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create today's mind map if it does not exist
    Init,
    /// Add a task under Work
    Add(AddArgs),
    /// Add a subtask under an existing task
    Sub(SubArgs),
    /// Report a task's new status
    Status(StatusArgs),
    /// Print a day's mind map
    Show(ShowArgs),
    /// Validate a day's mind map
    Check(ShowArgs),
    /// List days that have a mind map
    Days,
    /// Print the identity a task line maps to
    Clean(CleanArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title (status markers are stripped)
    pub title: String,
    /// Identity to match on, if different from the title
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args)]
pub struct SubArgs {
    /// Parent task identity
    pub parent: String,
    /// Subtask title
    pub title: String,
    /// Identity to match on, if different from the title
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task identity
    pub task: String,
    /// New status: scheduled, started, completed or unscheduled
    pub status: Status,
    /// Parent task, when the task is a subtask
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Day to read, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<chrono::NaiveDate>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Decorated task line
    pub text: String,
}
