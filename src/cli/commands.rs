use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todo", about = concat!("todo v", env!("CARGO_PKG_VERSION"), " - a pinned, sortable task list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks, pinned first (the default command)
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Edit a task's fields
    Edit(EditArgs),
    /// Delete a task
    Rm(IndexArg),
    /// Pin or unpin a task
    Pin(IndexArg),
    /// Set a task's status
    Status(StatusArgs),
    /// Mark a task in progress (shortcut for status <N> "In Progress")
    Start(IndexArg),
    /// Mark a task completed (shortcut for status <N> Completed)
    Done(IndexArg),
    /// Sort by a column; sorting by the active column again flips direction
    Sort(SortArgs),
    /// Export tasks to a CSV or text file
    Export(ExportArgs),
    /// Import tasks from a CSV or text file
    Import(ImportArgs),
    /// Show task statistics
    Stats,
    /// Validate the data file
    Check,
    /// Show or change preferences
    Config(ConfigCmd),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args, Default)]
pub struct ListArgs {
    /// Sort column for this listing (name, due, priority, status)
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Case-insensitive regex matched against every column
    #[arg(long)]
    pub filter: Option<String>,
    /// Only tasks with this status
    #[arg(long)]
    pub status: Option<String>,
    /// Only tasks with this priority
    #[arg(long)]
    pub priority: Option<String>,
    /// Only tasks due on this date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Only pinned tasks
    #[arg(long)]
    pub pinned: bool,
    /// Only overdue tasks
    #[arg(long)]
    pub overdue: bool,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task name
    pub name: String,
    /// Due date (YYYY-MM-DD); defaults to today when auto-fill is on
    #[arg(long, conflicts_with = "no_due")]
    pub due: Option<String>,
    /// Leave the due date empty
    #[arg(long)]
    pub no_due: bool,
    /// Priority (High, Medium, Low)
    #[arg(long)]
    pub priority: Option<String>,
    /// Status (Pending, "In Progress", Completed)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task number as shown by `todo list`
    pub index: usize,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// New priority
    #[arg(long)]
    pub priority: Option<String>,
    /// New status
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct IndexArg {
    /// Task number as shown by `todo list`
    pub index: usize,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task number as shown by `todo list`
    pub index: usize,
    /// New status (Pending, "In Progress", Completed)
    pub status: String,
}

#[derive(Args)]
pub struct SortArgs {
    /// Column to sort by (name, due, priority, status)
    pub column: String,
}

// ---------------------------------------------------------------------------
// Transfer args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ExportArgs {
    /// Destination file; the format's extension is added when missing
    pub file: String,
    /// Output format (csv, text); default from the file extension
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// File to import; `.csv` files are read as CSV
    pub file: String,
    /// Replace the current list instead of appending
    #[arg(long)]
    pub replace: bool,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Pre-fill today's date on new tasks (true/false)
    AutoFillToday(ToggleArg),
}

#[derive(Args)]
pub struct ToggleArg {
    /// true or false
    pub value: String,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
