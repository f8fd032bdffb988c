//! CSV export.
//!
//! Renders transactions in the request's display currency. The document is
//! deterministic for a given input: rows are ordered by date then creation
//! time, amounts are rounded to cents and always printed with two decimals.

use chrono_tz::Tz;

use daybook_shared::types::Currency;

use crate::calendar::MonthRef;
use crate::currency::{CurrencyError, DisplayContext};
use crate::ledger::{Transaction, sort_chronologically};

/// MIME type of the rendered document.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Renders transactions as CSV, one line per entry after the header.
///
/// Zero transactions produce a header-only document.
///
/// # Errors
///
/// Returns `CurrencyError::Overflow` if an amount cannot be converted.
pub fn render_csv(
    transactions: &[Transaction],
    ctx: &DisplayContext,
    tz: Tz,
) -> Result<String, CurrencyError> {
    let mut rows = transactions.to_vec();
    sort_chronologically(&mut rows);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!(
        "Date,Type,Amount ({}),Note,Timestamp",
        ctx.display().code()
    ));

    for tx in &rows {
        lines.push(format!(
            "{},{},{:.2},{},{}",
            tx.date,
            tx.kind,
            ctx.to_display_rounded(tx.amount)?,
            quote(tx.note.as_deref()),
            tx.created_at.with_timezone(&tz).format(TIMESTAMP_FORMAT)
        ));
    }

    Ok(lines.join("\n"))
}

/// Suggested download name, e.g. `income-tracker-October-2025-usd.csv`.
#[must_use]
pub fn export_filename(month: MonthRef, currency: Currency) -> String {
    format!(
        "income-tracker-{}-{}-{}.csv",
        month.name(),
        month.year(),
        currency.code().to_lowercase()
    )
}

fn quote(note: Option<&str>) -> String {
    match note {
        Some(text) => format!("\"{}\"", text.replace('"', "\"\"")),
        None => String::new(),
    }
}
