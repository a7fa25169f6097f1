use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::commands::{RecoveryAction, RecoveryCmd};
use crate::io::recovery::{prune_recovery, read_recovery_entries, recovery_log_path};

const DEFAULT_LIMIT: usize = 10;

pub fn cmd_recovery(dir: &Path, args: RecoveryCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        Some(RecoveryAction::Path) => {
            println!("{}", recovery_log_path(dir).display());
        }
        Some(RecoveryAction::Prune(prune)) => {
            let before = prune.before.as_deref().map(parse_timestamp).transpose()?;
            let removed = prune_recovery(dir, before, prune.all)?;
            println!("pruned {} entries", removed);
        }
        None => {
            let entries = read_recovery_entries(dir, Some(args.limit.unwrap_or(DEFAULT_LIMIT)));
            if json {
                let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else if entries.is_empty() {
                println!("recovery log is empty");
            } else {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    print!("{}", entry.to_markdown());
                }
            }
        }
    }
    Ok(())
}

/// Accept an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC)
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{}' (expected ISO-8601)", s))
}
