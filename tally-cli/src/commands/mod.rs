pub mod finance;
pub mod health;
pub mod inventory;
pub mod warehouse;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Print `rows` as a rounded table, or `empty` when there are none.
pub(crate) fn print_table<R: Tabled>(rows: Vec<R>, empty: &str) {
    if rows.is_empty() {
        println!("{empty}");
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize JSON output")?
    );
    Ok(())
}

/// One-line confirmation for a verb that changed state.
pub(crate) fn done(message: impl std::fmt::Display) {
    println!("{} {message}", "✓".green());
}
