//! Human-readable console report.
//!
//! Rendering returns strings so the binary decides where they go; the
//! report is informational and not meant to be parsed.

use chrono::{DateTime, TimeZone};
use comfy_table::{Cell, CellAlignment, Table};

use crate::aggregate::{CategorySummary, Extremes};
use crate::config::Columns;
use crate::plz::Plz;

pub const RULE: &str = "--------------------------------------------------------";

/// `"<label> time: Sat, 17 Oct 2026 09:30:00"`.
pub fn timestamp_line<Tz>(label: &str, time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{label} time: {}", time.format("%a, %d %b %Y %H:%M:%S"))
}

pub fn extremes_report(extremes: &Extremes<Plz>) -> String {
    format!(
        "The most schools ({}) are located in ZIP code(s) {}\n\
         The fewest schools ({}) are located in ZIP code(s) {}",
        extremes.max,
        plz_list(&extremes.max_keys),
        extremes.min,
        plz_list(&extremes.min_keys),
    )
}

/// Full per-type breakdown, one row per (postal code, school type).
pub fn category_table(summary: &CategorySummary, columns: &Columns) -> Table {
    let mut table = Table::new();
    table.set_header(vec![&columns.postal_code, &columns.category, &columns.count]);

    for row in summary.rows() {
        table.add_row(vec![
            Cell::new(row.plz),
            Cell::new(row.category),
            Cell::new(row.count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn plz_list(keys: &[Plz]) -> String {
    let joined: Vec<String> = keys.iter().map(Plz::to_string).collect();
    format!("[{}]", joined.join(", "))
}
