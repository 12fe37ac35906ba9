//! Plain-text rendering of a query result for the `list` command.

use unicode_width::UnicodeWidthStr;

use crate::models::{format_quantity, InventoryRecord};

const COLUMNS: [&str; 7] = [
    "Branch", "Item", "Category", "Unit", "Current", "Minimum", "Note",
];

/// Align records into a fixed-width table. Rows at or below their minimum
/// are prefixed with `!`, everything else with a space.
pub fn render_table<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    let rows: Vec<(bool, [String; 7])> = records
        .into_iter()
        .map(|r| {
            (
                r.is_below_threshold(),
                [
                    r.branch.clone(),
                    r.item_name.clone(),
                    r.category.clone(),
                    r.unit.clone(),
                    format_quantity(r.current_qty),
                    format_quantity(r.min_qty),
                    r.note.clone(),
                ],
            )
        })
        .collect();

    let mut widths = COLUMNS.map(|c| c.width());
    for (_, cells) in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    push_line(&mut out, ' ', COLUMNS.map(str::to_string).iter(), &widths);
    for (low, cells) in &rows {
        push_line(&mut out, if *low { '!' } else { ' ' }, cells.iter(), &widths);
    }
    out
}

fn push_line<'a>(
    out: &mut String,
    marker: char,
    cells: impl Iterator<Item = &'a String>,
    widths: &[usize; 7],
) {
    out.push(marker);
    for (idx, (cell, width)) in cells.zip(widths).enumerate() {
        out.push(' ');
        out.push_str(cell);
        if idx + 1 < widths.len() {
            let pad = width - cell.width();
            out.extend(std::iter::repeat(' ').take(pad));
        }
    }
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}
