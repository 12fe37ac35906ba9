use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::models::{format_quantity, parse_quantity, InventoryRecord, BRANCHES, CATEGORIES};

/// State of the Entry tab form. Branch and category are picked from the
/// catalogs; the rest is typed.
#[derive(Clone)]
pub(crate) struct EntryForm {
    pub(crate) branch: String,
    pub(crate) item_name: String,
    pub(crate) category: String,
    pub(crate) unit: String,
    pub(crate) current_qty: String,
    pub(crate) min_qty: String,
    pub(crate) note: String,
    pub(crate) active: EntryField,
    pub(crate) error: Option<String>,
    /// Exact stored key when the form was filled from a record, so a name
    /// with stray whitespace still addresses that record.
    loaded_key: Option<(String, String)>,
}

/// Fields available within the entry form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum EntryField {
    #[default]
    Branch,
    ItemName,
    Category,
    Unit,
    CurrentQty,
    MinQty,
    Note,
}

impl EntryField {
    pub(crate) const ALL: [EntryField; 7] = [
        EntryField::Branch,
        EntryField::ItemName,
        EntryField::Category,
        EntryField::Unit,
        EntryField::CurrentQty,
        EntryField::MinQty,
        EntryField::Note,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            EntryField::Branch => "Branch",
            EntryField::ItemName => "Item",
            EntryField::Category => "Category",
            EntryField::Unit => "Unit",
            EntryField::CurrentQty => "Current qty",
            EntryField::MinQty => "Minimum qty",
            EntryField::Note => "Note",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn is_selector(self) -> bool {
        matches!(self, EntryField::Branch | EntryField::Category)
    }
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            branch: BRANCHES[0].to_string(),
            item_name: String::new(),
            category: CATEGORIES[0].to_string(),
            unit: String::new(),
            current_qty: String::new(),
            min_qty: String::new(),
            note: String::new(),
            active: EntryField::default(),
            error: None,
            loaded_key: None,
        }
    }
}

impl EntryForm {
    /// Populate the form from an existing record so the user can edit it.
    pub(crate) fn from_record(record: &InventoryRecord) -> Self {
        Self {
            branch: record.branch.clone(),
            item_name: record.item_name.clone(),
            category: record.category.clone(),
            unit: record.unit.clone(),
            current_qty: format_quantity(record.current_qty),
            min_qty: format_quantity(record.min_qty),
            note: record.note.clone(),
            active: EntryField::ItemName,
            error: None,
            loaded_key: Some((record.branch.clone(), record.item_name.clone())),
        }
    }

    /// Blank the typed fields but keep the branch and category selections,
    /// which tend to repeat while entering a batch of items.
    pub(crate) fn clear(&mut self) {
        *self = Self {
            branch: self.branch.clone(),
            category: self.category.clone(),
            ..Self::default()
        };
        self.active = EntryField::ItemName;
    }

    pub(crate) fn next_field(&mut self) {
        let idx = (self.active.index() + 1) % EntryField::ALL.len();
        self.active = EntryField::ALL[idx];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = EntryField::ALL.len();
        let idx = (self.active.index() + len - 1) % len;
        self.active = EntryField::ALL[idx];
    }

    /// Step a selector through its catalog. Values outside the catalog (from
    /// a hand-edited file) restart at the first entry.
    pub(crate) fn cycle_choice(&mut self, offset: isize) -> bool {
        let (value, catalog) = match self.active {
            EntryField::Branch => (&mut self.branch, BRANCHES),
            EntryField::Category => (&mut self.category, CATEGORIES),
            _ => return false,
        };
        let len = catalog.len() as isize;
        let next = match catalog.iter().position(|c| *c == value.as_str()) {
            Some(idx) => (idx as isize + offset).rem_euclid(len),
            None => 0,
        };
        *value = catalog[next as usize].to_string();
        true
    }

    /// Append a character to the active field. Quantity fields take digits
    /// and a single decimal point; selectors take nothing.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() || self.active.is_selector() {
            return false;
        }
        match self.active {
            EntryField::CurrentQty | EntryField::MinQty => {
                let target = self.field_mut(self.active);
                if ch.is_ascii_digit() || (ch == '.' && !target.contains('.')) {
                    target.push(ch);
                    true
                } else {
                    false
                }
            }
            field => {
                self.field_mut(field).push(ch);
                true
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        if !self.active.is_selector() {
            self.field_mut(self.active).pop();
        }
    }

    /// Build the record this form describes. Text is trimmed and quantities
    /// are coerced; an empty item name is left for the store to reject.
    pub(crate) fn to_record(&self) -> InventoryRecord {
        InventoryRecord::new(
            self.branch.clone(),
            self.key_item_name(),
            self.category.clone(),
            self.unit.trim(),
            parse_quantity(&self.current_qty),
            parse_quantity(&self.min_qty),
            self.note.trim(),
        )
    }

    /// The `(branch, item_name)` key used by delete.
    pub(crate) fn key(&self) -> (String, String) {
        (self.branch.clone(), self.key_item_name())
    }

    /// The trimmed item name, or the stored spelling when it still names the
    /// record the form was loaded from.
    fn key_item_name(&self) -> String {
        let trimmed = self.item_name.trim();
        match &self.loaded_key {
            Some((branch, name)) if *branch == self.branch && name.trim() == trimmed => {
                name.clone()
            }
            _ => trimmed.to_string(),
        }
    }

    pub(crate) fn value(&self, field: EntryField) -> &str {
        match field {
            EntryField::Branch => &self.branch,
            EntryField::ItemName => &self.item_name,
            EntryField::Category => &self.category,
            EntryField::Unit => &self.unit,
            EntryField::CurrentQty => &self.current_qty,
            EntryField::MinQty => &self.min_qty,
            EntryField::Note => &self.note,
        }
    }

    fn field_mut(&mut self, field: EntryField) -> &mut String {
        match field {
            EntryField::Branch => &mut self.branch,
            EntryField::ItemName => &mut self.item_name,
            EntryField::Category => &mut self.category,
            EntryField::Unit => &mut self.unit,
            EntryField::CurrentQty => &mut self.current_qty,
            EntryField::MinQty => &mut self.min_qty,
            EntryField::Note => &mut self.note,
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: EntryField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let placeholder = match field {
            EntryField::ItemName => "<required>",
            EntryField::CurrentQty | EntryField::MinQty => "0",
            _ => "<optional>",
        };
        let display = if field.is_selector() {
            format!("< {value} >")
        } else if value.is_empty() {
            placeholder.to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{:<13}", format!("{}:", field.label()))),
            Span::styled(display, style),
        ])
    }

    /// Display width of the requested field, used to place the cursor.
    pub(crate) fn value_width(&self, field: EntryField) -> usize {
        self.value(field).width()
    }
}

/// Pending delete awaiting a y/n answer.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) branch: String,
    pub(crate) item_name: String,
}
