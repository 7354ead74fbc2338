//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Rows as a table; `empty_message` when there are none.
pub fn format_table<T: Tabled>(rows: &[T], empty_message: &str) -> String {
    if rows.is_empty() {
        return empty_message.to_string();
    }

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Rows with no borders, one line each, for piping to other tools.
pub fn format_plain<T: Tabled>(rows: &[T]) -> String {
    let mut table = Table::new(rows);
    table.with(Style::blank());
    table.to_string()
}
