//! Formatted output utilities.

use console::style;
use serde::Serialize;

use rentadmin_core::envelope::AdapterResult;

/// Print a success message with checkmark.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message with X.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header/section title.
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair.
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).bold(), value);
}

/// Print a table row.
pub fn table_row(cols: &[(&str, usize)]) {
    for (text, width) in cols {
        print!("{text:width$}");
    }
    println!();
}

/// Print a bold table header row.
pub fn table_header(cols: &[(&str, usize)]) {
    for (text, width) in cols {
        print!("{}", style(format!("{text:width$}")).bold());
    }
    println!();
}

/// Print an adapter result as a one-line notification and return its data.
///
/// Failures always print the result message.
pub fn toast<T>(result: AdapterResult<T>, done: &str) -> Option<T> {
    if result.success {
        success(result.message.as_deref().unwrap_or(done));
        result.data
    } else {
        error(result.message_or_default());
        None
    }
}

/// Print a value as pretty JSON.
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render an optional field.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
