use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};

use crate::models::InventoryRecord;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error. Store
/// errors are already phrased for the user, so the outermost message wins
/// when it is one of them.
pub(crate) fn surface_error(err: &Error) -> String {
    if let Some(inventory) = err.downcast_ref::<crate::error::InventoryError>() {
        if inventory.is_user_error() {
            return inventory.to_string();
        }
    }
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Row style for the stock table. Below-threshold rows get the single
/// reorder highlight.
pub(crate) fn row_style(record: &InventoryRecord) -> Style {
    if record.is_below_threshold() {
        Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Label for an optional filter selection.
pub(crate) fn selection_label(value: Option<&str>) -> &str {
    value.unwrap_or("All")
}
