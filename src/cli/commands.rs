use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::model::task::{TaskId, ViewMode};

#[derive(Parser)]
#[command(name = "tl", about = concat!("tasklist v", env!("CARGO_PKG_VERSION"), " - one list, kept in order"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a task list in the current directory
    Init(InitArgs),
    /// Show tasks, in list order
    List(ListArgs),
    /// Append a task to the end of the list
    Add(AddArgs),
    /// Flip a task between active and completed
    Toggle(IdArgs),
    /// Replace a task's text (empty text deletes it)
    Edit(EditArgs),
    /// Delete a task
    Rm(IdArgs),
    /// Delete every completed task
    Clear,
    /// Move a task before or after another one
    Mv(MvArgs),
    /// Show how many tasks are left
    Count,
    /// Set the filter `tl list` uses by default
    Filter(FilterArgs),
    /// Print the recovery log
    Recovery,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite the config of an existing list
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// all, active or completed (defaults to the configured filter)
    #[arg(long, short)]
    pub filter: Option<ViewMode>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: TaskId,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: TaskId,
    /// New text
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("position").required(true).args(["before", "after"])))]
pub struct MvArgs {
    /// Task to move
    pub id: TaskId,
    /// Place it just before this task
    #[arg(long)]
    pub before: Option<TaskId>,
    /// Place it just after this task
    #[arg(long)]
    pub after: Option<TaskId>,
}

#[derive(Args)]
pub struct FilterArgs {
    /// all, active or completed
    pub mode: ViewMode,
}
