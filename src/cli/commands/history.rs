//! `mault history` — display the operation history.
//!
//! Usage:
//!   mault history               # show last 50 entries
//!   mault history --last 20     # show last 20
//!   mault history --since 7d    # entries from last 7 days

use chrono::{TimeDelta, Utc};

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::Session;
use crate::errors::{MaultError, Result};

/// Execute the `history` command.
pub fn execute(session: &Session, last: usize, since: Option<&str>) -> Result<()> {
    session.context().check()?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = AuditLog::new(session.database()).query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No history entries found.");
        return Ok(());
    }

    print_history_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, duration): (&str, fn(i64) -> Option<TimeDelta>) =
        if let Some(s) = input.strip_suffix('d') {
            (s, TimeDelta::try_days)
        } else if let Some(s) = input.strip_suffix('h') {
            (s, TimeDelta::try_hours)
        } else if let Some(s) = input.strip_suffix('m') {
            (s, TimeDelta::try_minutes)
        } else {
            return Err(MaultError::CommandFailed(format!(
                "invalid duration '{input}', use a format like 7d, 24h, or 30m"
            )));
        };

    let num: i64 = num_str.parse().map_err(|_| {
        MaultError::CommandFailed(format!(
            "invalid duration '{input}', the number part is not valid"
        ))
    })?;
    if num < 0 {
        return Err(MaultError::CommandFailed(format!(
            "invalid duration '{input}', it cannot be negative"
        )));
    }

    duration(num)
        .and_then(|delta| Utc::now().checked_sub_signed(delta))
        .ok_or_else(|| {
            MaultError::CommandFailed(format!("invalid duration '{input}', it is too far back"))
        })
}

/// Print history entries in a formatted table.
pub fn print_history_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Key", "Details"]);

    for entry in entries {
        let time = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        let op = colorize_operation(&entry.operation);
        let key = entry.key_name.as_deref().unwrap_or("-");
        let details = entry.details.as_deref().unwrap_or("-");

        table.add_row(vec![time, op, key.to_string(), details.to_string()]);
    }

    println!(
        "{}",
        style(format!("{} history entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" => style(op).green().to_string(),
        "create" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "auth-failed" => style(op).yellow().to_string(),
        _ => op.to_string(),
    }
}
