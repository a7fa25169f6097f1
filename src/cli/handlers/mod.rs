mod recovery;
pub use recovery::cmd_recovery;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::state::{load_ui_state, write_ui_state};
use crate::io::storage::TaskStorage;
use crate::io::transfer::{self, ExportFormat};
use crate::model::form::TaskForm;
use crate::model::task::{Status, parse_date};
use crate::ops::filter::{TaskFilter, filter_rows};
use crate::ops::import::import_file;
use crate::ops::ordering::{SortColumn, SortDirection, SortKey, sort_view};
use crate::ops::stats::task_stats;
use crate::ops::store::{ImportMode, TaskStore};
use crate::parse::{parse_data_file, validate_data_file};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let dir = resolve_dir(cli.dir.as_deref())?;

    match cli.command {
        None => cmd_list(&dir, ListArgs::default(), json),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&dir, args, json),
            Commands::Stats => cmd_stats(&dir, json),
            Commands::Check => cmd_check(&dir, json),

            // Write commands
            Commands::Add(args) => cmd_add(&dir, args),
            Commands::Edit(args) => cmd_edit(&dir, args),
            Commands::Rm(args) => cmd_rm(&dir, args),
            Commands::Pin(args) => cmd_pin(&dir, args),
            Commands::Status(args) => {
                let status = parse_status_arg(&args.status)?;
                cmd_set_status(&dir, args.index, status)
            }
            Commands::Start(args) => cmd_set_status(&dir, args.index, Status::InProgress),
            Commands::Done(args) => cmd_set_status(&dir, args.index, Status::Completed),
            Commands::Sort(args) => cmd_sort(&dir, args),

            // Transfer
            Commands::Export(args) => cmd_export(&dir, args),
            Commands::Import(args) => cmd_import(&dir, args),

            // Settings and maintenance
            Commands::Config(args) => cmd_config(&dir, args, json),
            Commands::Recovery(args) => cmd_recovery(&dir, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Load the task list kept in `dir`
fn open_store(dir: &Path) -> Result<(TaskStorage, TaskStore), Box<dyn std::error::Error>> {
    let storage = TaskStorage::in_dir(dir);
    let mut store = TaskStore::new();
    store.load(&storage)?;
    Ok((storage, store))
}

/// Write the store back if anything changed
fn save_store(storage: &TaskStorage, store: &mut TaskStore) -> CmdResult {
    if store.has_unsaved_changes() {
        store.save(storage)?;
    }
    Ok(())
}

/// Turn a task number from the command line into a model row
fn row_for(store: &TaskStore, number: usize) -> Result<usize, String> {
    if number == 0 || number > store.len() {
        Err(format!("no task #{} (list has {} tasks)", number, store.len()))
    } else {
        Ok(number - 1)
    }
}

fn parse_sort_column(s: &str) -> Result<SortColumn, Box<dyn std::error::Error>> {
    Ok(s.parse::<SortColumn>()?)
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(dir: &Path, args: ListArgs, json: bool) -> CmdResult {
    let (_storage, store) = open_store(dir)?;
    let today = today();

    let saved = load_ui_state(dir).sort;
    let key = match args.sort.as_deref() {
        Some(column) => SortKey::new(
            parse_sort_column(column)?,
            if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        ),
        None if args.desc => SortKey::new(saved.column, SortDirection::Descending),
        None => saved,
    };

    let mut filter = TaskFilter {
        status: args.status.as_deref().map(parse_status_arg).transpose()?,
        priority: args.priority.as_deref().map(parse_priority_arg).transpose()?,
        pinned_only: args.pinned,
        overdue_as_of: args.overdue.then_some(today),
        ..Default::default()
    };
    if let Some(ref due) = args.due {
        filter.due_on = Some(parse_date(due).ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD)", due))?);
    }
    if let Some(ref pattern) = args.filter {
        filter = filter.with_keyword(pattern);
    }

    let mut rows = filter_rows(store.tasks(), store.pins(), &filter);
    sort_view(store.tasks(), store.pins(), key, &mut rows);

    if json {
        let tasks: Vec<TaskJson> = rows
            .iter()
            .map(|&row| task_to_json(store.tasks(), store.pins(), row, today))
            .collect();
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else if rows.is_empty() {
        if store.is_empty() {
            println!("no tasks");
        } else {
            println!("no matching tasks");
        }
    } else {
        for line in format_task_table(store.tasks(), store.pins(), &rows, today) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_stats(dir: &Path, json: bool) -> CmdResult {
    let (_storage, store) = open_store(dir)?;
    let today = today();
    let stats = task_stats(store.tasks());
    let overdue = store.tasks().iter().filter(|t| t.is_overdue(today)).count();
    let pinned = store.pins().len();

    if json {
        let output = StatsJson {
            counts: stats,
            pinned,
            overdue,
            completion_percentage: stats.completion_percentage(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for line in format_stats(&stats, pinned, overdue) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_check(dir: &Path, json: bool) -> CmdResult {
    let storage = TaskStorage::in_dir(dir);
    let path = storage.path().display().to_string();

    if !storage.path().exists() {
        if json {
            let output = CheckJson {
                path,
                exists: false,
                valid: false,
                tasks: 0,
                issues: Vec::new(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("no data file at {}", path);
        }
        return Ok(());
    }

    let source = fs::read_to_string(storage.path())?;
    let parsed = parse_data_file(&source);
    let valid = validate_data_file(&source);

    if json {
        let output = CheckJson {
            path,
            exists: true,
            valid,
            tasks: parsed.tasks.len(),
            issues: parsed.issues.iter().map(issue_to_json).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if !parsed.issues.is_empty() {
            println!("Problems:");
            for issue in &parsed.issues {
                println!("  line {}: {} ({})", issue.line_number, issue.text, issue.issue.describe());
            }
        }
        if valid {
            println!("✓ data file is valid ({} tasks)", parsed.tasks.len());
        } else {
            println!("✗ data file has problems");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(dir: &Path, args: AddArgs) -> CmdResult {
    let (storage, mut store) = open_store(dir)?;
    let defaults = config_io::load_preferences(dir).new_task_form(today());

    let due_text = if args.no_due {
        String::new()
    } else {
        args.due
            .unwrap_or_else(|| defaults.due_date.map(|d| d.to_string()).unwrap_or_default())
    };
    let priority = match args.priority {
        Some(ref p) => parse_priority_arg(p)?,
        None => defaults.priority,
    };
    let status = match args.status {
        Some(ref s) => parse_status_arg(s)?,
        None => defaults.status,
    };

    let form = TaskForm::validate(&args.name, &due_text, priority, status)?;
    store.add(Some(form.into_task()));
    save_store(&storage, &mut store)?;
    println!("{}", store.len());
    Ok(())
}

fn cmd_edit(dir: &Path, args: EditArgs) -> CmdResult {
    let (storage, mut store) = open_store(dir)?;
    let row = row_for(&store, args.index)?;
    let current = store
        .get(row)
        .map(TaskForm::from_task)
        .ok_or_else(|| format!("no task #{}", args.index))?;

    let name = args.name.unwrap_or(current.name);
    let due_text = if args.clear_due {
        String::new()
    } else {
        args.due
            .unwrap_or_else(|| current.due_date.map(|d| d.to_string()).unwrap_or_default())
    };
    let priority = match args.priority {
        Some(ref p) => parse_priority_arg(p)?,
        None => current.priority,
    };
    let status = match args.status {
        Some(ref s) => parse_status_arg(s)?,
        None => current.status,
    };

    let form = TaskForm::validate(&name, &due_text, priority, status)?;
    store.try_update(row, form.into_task())?;
    save_store(&storage, &mut store)?;
    println!("#{} updated", args.index);
    Ok(())
}

fn cmd_rm(dir: &Path, args: IndexArg) -> CmdResult {
    let (storage, mut store) = open_store(dir)?;
    let row = row_for(&store, args.index)?;
    let removed = store.try_delete(row)?;
    save_store(&storage, &mut store)?;
    println!("deleted: {}", removed.name);
    Ok(())
}

fn cmd_pin(dir: &Path, args: IndexArg) -> CmdResult {
    let (storage, mut store) = open_store(dir)?;
    let row = row_for(&store, args.index)?;
    let pinned = store.toggle_pin(row)?;
    save_store(&storage, &mut store)?;
    println!("#{} {}", args.index, if pinned { "pinned" } else { "unpinned" });
    Ok(())
}

fn cmd_set_status(dir: &Path, number: usize, status: Status) -> CmdResult {
    let (storage, mut store) = open_store(dir)?;
    let row = row_for(&store, number)?;
    store.set_status(row, status.clone())?;
    save_store(&storage, &mut store)?;
    println!("#{} → {}", number, status);
    Ok(())
}

fn cmd_sort(dir: &Path, args: SortArgs) -> CmdResult {
    let column = parse_sort_column(&args.column)?;
    let mut state = load_ui_state(dir);
    state.sort.toggle(column);
    write_ui_state(dir, &state)?;

    let direction = match state.sort.direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    };
    println!("sorted by {} ({})", state.sort.column, direction);
    Ok(())
}

// ---------------------------------------------------------------------------
// Transfer handlers
// ---------------------------------------------------------------------------

fn cmd_export(dir: &Path, args: ExportArgs) -> CmdResult {
    let (_storage, store) = open_store(dir)?;
    let path = PathBuf::from(&args.file);
    let format = match args.format.as_deref() {
        None => ExportFormat::for_path(&path),
        Some(f) if f.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
        Some(f) if f.eq_ignore_ascii_case("text") || f.eq_ignore_ascii_case("txt") => {
            ExportFormat::Text
        }
        Some(f) => return Err(format!("unknown format '{}' (expected: csv, text)", f).into()),
    };

    let written = transfer::export_tasks(&path, &store.all(), format)?;
    println!("exported {} tasks to {}", store.len(), written.display());
    Ok(())
}

fn cmd_import(dir: &Path, args: ImportArgs) -> CmdResult {
    let (storage, mut store) = open_store(dir)?;
    let mode = if args.replace {
        ImportMode::Replace
    } else {
        ImportMode::Append
    };

    let result = import_file(&mut store, Path::new(&args.file), dir, mode)?;
    save_store(&storage, &mut store)?;
    if result.skipped > 0 {
        println!(
            "imported {} tasks ({} lines skipped, see `todo recovery`)",
            result.imported, result.skipped
        );
    } else {
        println!("imported {} tasks", result.imported);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

fn cmd_config(dir: &Path, args: ConfigCmd, json: bool) -> CmdResult {
    match args.action {
        None => {
            let (config, _doc) = config_io::read_config(dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("auto_fill_today = {}", config.preferences.auto_fill_today);
            }
        }
        Some(ConfigAction::AutoFillToday(arg)) => {
            let enabled = parse_bool_arg(&arg.value)?;
            let (_config, mut doc) = config_io::read_config(dir)?;
            config_io::set_auto_fill_today(&mut doc, enabled);
            config_io::write_config(dir, &doc)?;
            println!("auto_fill_today = {}", enabled);
        }
    }
    Ok(())
}
