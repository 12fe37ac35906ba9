use std::mem;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::InventoryError;
use crate::models::format_quantity;
use crate::storage;
use crate::store::{InventoryStore, RecordField, UpsertOutcome};

use super::forms::{ConfirmDelete, EntryField, EntryForm};
use super::helpers::{centered_rect, row_style, selection_label, surface_error};
use super::screens::StockScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab strip at the top.
const TABS_HEIGHT: u16 = 3;
/// Width of the label column in the entry form, including the colon.
const LABEL_WIDTH: u16 = 13;
const TABLE_HEADER: [&str; 7] = [
    "Branch", "Item", "Category", "Unit", "Current", "Minimum", "Note",
];

/// The two top-level views.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Tab {
    Entry,
    Stock,
}

impl Tab {
    fn index(self) -> usize {
        match self {
            Tab::Entry => 0,
            Tab::Stock => 1,
        }
    }
}

/// Modal overlays on top of the current tab.
enum Mode {
    Normal,
    ConfirmDelete(ConfirmDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. Owns the store; when persistence is enabled
/// every successful mutation is written straight back to the data file.
pub struct App {
    store: InventoryStore,
    config: AppConfig,
    tab: Tab,
    form: EntryForm,
    stock: StockScreen,
    mode: Mode,
    status: Option<StatusMessage>,
    last_export: Option<PathBuf>,
}

impl App {
    pub fn new(store: InventoryStore, config: AppConfig) -> Self {
        let stock = StockScreen::new(&store);
        Self {
            store,
            config,
            tab: Tab::Entry,
            form: EntryForm::default(),
            stock,
            mode: Mode::Normal,
            status: None,
            last_export: None,
        }
    }

    /// Show a startup problem (for example an unreadable data file) in the
    /// footer.
    pub fn warn<S: Into<String>>(&mut self, text: S) {
        self.set_status(text, StatusKind::Warning);
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Route a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => match self.tab {
                Tab::Entry => self.handle_entry_key(code)?,
                Tab::Stock => self.handle_stock_key(code, &mut exit)?,
            },
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        Ok(exit)
    }

    fn handle_entry_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                self.tab = Tab::Stock;
            }
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.previous_field(),
            KeyCode::Left => {
                self.form.cycle_choice(-1);
            }
            KeyCode::Right => {
                self.form.cycle_choice(1);
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(ch) => {
                if self.form.push_char(ch) {
                    self.form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_stock_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.clear_status();
                self.tab = Tab::Entry;
            }
            KeyCode::Up => self.stock.move_selection(-1),
            KeyCode::Down => self.stock.move_selection(1),
            KeyCode::PageUp => self.stock.move_selection(-10),
            KeyCode::PageDown => self.stock.move_selection(10),
            KeyCode::Home => self.stock.select_first(),
            KeyCode::End => self.stock.select_last(),
            KeyCode::Char('b') => self.stock.cycle(&self.store, RecordField::Branch, 1),
            KeyCode::Char('B') => self.stock.cycle(&self.store, RecordField::Branch, -1),
            KeyCode::Char('c') => self.stock.cycle(&self.store, RecordField::Category, 1),
            KeyCode::Char('C') => self.stock.cycle(&self.store, RecordField::Category, -1),
            KeyCode::Char('i') => self.stock.cycle(&self.store, RecordField::ItemName, 1),
            KeyCode::Char('I') => self.stock.cycle(&self.store, RecordField::ItemName, -1),
            KeyCode::Char('l') | KeyCode::Char('L') => {
                let active = self.stock.toggle_below_threshold(&self.store);
                let message = if active {
                    "Showing items at or below their minimum."
                } else {
                    "Showing all items."
                };
                self.set_status(message, StatusKind::Info);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.stock.reset_filters(&self.store);
                self.set_status("Filters cleared.", StatusKind::Info);
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(record) = self.stock.current_row() {
                    self.form = EntryForm::from_record(record);
                    self.tab = Tab::Entry;
                    self.clear_status();
                } else {
                    self.set_status("No item selected to edit.", StatusKind::Warning);
                }
            }
            KeyCode::Char('d') | KeyCode::Char('-') => {
                if let Some(record) = self.stock.current_row() {
                    return Ok(Mode::ConfirmDelete(ConfirmDelete {
                        branch: record.branch.clone(),
                        item_name: record.item_name.clone(),
                    }));
                }
                self.set_status("No item selected to delete.", StatusKind::Warning);
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                if let Err(err) = self.export_view() {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            }
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_last_export(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm);
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    /// Ctrl+D on the Entry tab: delete the record the form's branch and item
    /// name point at, after confirmation.
    pub(crate) fn handle_ctrl_d(&mut self) {
        if !matches!(self.mode, Mode::Normal) || self.tab != Tab::Entry {
            return;
        }
        let (branch, item_name) = self.form.key();
        if self.store.get(&branch, &item_name).is_none() {
            let err = InventoryError::NotFound { branch, item_name };
            self.set_status(err.to_string(), StatusKind::Warning);
            return;
        }
        self.mode = Mode::ConfirmDelete(ConfirmDelete { branch, item_name });
    }

    /// Ctrl+N on the Entry tab: start a fresh entry.
    pub(crate) fn handle_ctrl_n(&mut self) {
        if matches!(self.mode, Mode::Normal) && self.tab == Tab::Entry {
            self.form.clear();
            self.clear_status();
        }
    }

    /// Last chance to flush changes that an earlier save failed to write.
    pub fn finish(&mut self) -> Result<()> {
        if self.config.persist && self.store.is_dirty() {
            self.persist()?;
        }
        Ok(())
    }

    fn submit_form(&mut self) {
        match self.store.upsert(self.form.to_record()) {
            Ok(outcome) => {
                self.form.error = None;
                self.stock.refresh(&self.store);
                let text = match outcome {
                    UpsertOutcome::Inserted => "Added new item.",
                    UpsertOutcome::Updated => "Updated existing item.",
                };
                self.after_mutation(text.to_string());
            }
            Err(err) => {
                let message = err.to_string();
                self.form.error = Some(message.clone());
                self.set_status(message, StatusKind::Warning);
            }
        }
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) {
        match self.store.delete(&confirm.branch, &confirm.item_name) {
            Ok(removed) => {
                self.stock.refresh(&self.store);
                if self.form.key() == (removed.branch.clone(), removed.item_name.clone()) {
                    self.form.clear();
                }
                self.after_mutation(format!("Deleted {removed}."));
            }
            Err(err) => self.set_status(err.to_string(), StatusKind::Warning),
        }
    }

    /// Save after a store mutation and report the combined outcome.
    fn after_mutation(&mut self, text: String) {
        match self.persist() {
            Ok(()) => self.set_status(text, StatusKind::Info),
            Err(err) => {
                error!(error = %err, "save failed");
                self.set_status(
                    format!("{text} Save failed: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn persist(&mut self) -> Result<()> {
        if !self.config.persist {
            return Ok(());
        }
        storage::save(&self.config.data_file, self.store.records())
            .context("failed to save inventory")?;
        self.store.mark_clean();
        Ok(())
    }

    fn export_view(&mut self) -> Result<()> {
        if self.store.is_empty() {
            self.set_status(
                "No inventory yet. Add items on the Entry tab first.",
                StatusKind::Info,
            );
            return Ok(());
        }
        let path = self.config.export_file();
        let filter = self.stock.filter();
        let count = storage::export_to_path(&path, self.store.query(&filter))
            .context("failed to export inventory view")?;
        self.set_status(
            format!("Exported {count} rows to {}.", path.display()),
            StatusKind::Info,
        );
        self.last_export = Some(path);
        Ok(())
    }

    fn open_last_export(&mut self) {
        let Some(path) = self.last_export.clone() else {
            self.set_status("Nothing exported yet. Press x first.", StatusKind::Warning);
            return;
        };
        match open_path(&path) {
            Ok(()) => {
                info!(path = %path.display(), "opened export");
                self.set_status(format!("Opened {}.", path.display()), StatusKind::Info);
            }
            Err(err) => {
                self.set_status(format!("Failed to open export: {err}"), StatusKind::Error)
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TABS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.tab {
            Tab::Entry => self.draw_entry(frame, chunks[1]),
            Tab::Stock => self.draw_stock(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        if let Mode::ConfirmDelete(confirm) = &self.mode {
            self.draw_confirm_delete(frame, area, confirm);
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " Branch Inventory | {} items | {} at or below minimum ",
            self.store.len(),
            self.store.below_threshold_count()
        );
        let tabs = Tabs::new(vec!["Entry", "Stock"])
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_entry(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Register / Update")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines: Vec<Line> = EntryField::ALL
            .iter()
            .map(|field| self.form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &self.form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • ←→ to pick • Ctrl+D to delete • Ctrl+N to clear",
                Style::default().fg(Color::Gray),
            )));
        }

        let caption = if self.config.persist {
            format!("Saved to {}", self.config.data_file.display())
        } else {
            "Memory only: changes are lost when the program exits.".to_string()
        };
        lines.push(Line::from(Span::styled(
            caption,
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);

        let active = self.form.active;
        if matches!(self.mode, Mode::Normal)
            && !matches!(active, EntryField::Branch | EntryField::Category)
        {
            let row = EntryField::ALL
                .iter()
                .position(|field| *field == active)
                .unwrap_or(0) as u16;
            let cursor_x = inner.x + LABEL_WIDTH + self.form.value_width(active) as u16;
            frame.set_cursor_position((cursor_x.min(inner.right()), inner.y + row));
        }
    }

    fn draw_stock(&self, frame: &mut Frame, area: Rect) {
        if self.store.is_empty() {
            let message = Paragraph::new("No inventory yet. Add items on the Entry tab first.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Stock"));
            frame.render_widget(message, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let on_off = if self.stock.below_threshold_only { "on" } else { "off" };
        let filters = Line::from(vec![
            Span::raw("Branch: "),
            Span::styled(
                selection_label(self.stock.branch.as_deref()).to_string(),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("   Category: "),
            Span::styled(
                selection_label(self.stock.category.as_deref()).to_string(),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("   Item: "),
            Span::styled(
                selection_label(self.stock.item.as_deref()).to_string(),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("   At/below minimum only: "),
            Span::styled(on_off, Style::default().fg(Color::Cyan)),
            Span::raw(format!("   ({} rows)", self.stock.rows.len())),
        ]);
        let filter_bar =
            Paragraph::new(filters).block(Block::default().borders(Borders::ALL).title("Filters"));
        frame.render_widget(filter_bar, chunks[0]);

        let header = Row::new(TABLE_HEADER).style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.stock.rows.iter().map(|record| {
            Row::new(vec![
                Cell::from(record.branch.clone()),
                Cell::from(record.item_name.clone()),
                Cell::from(record.category.clone()),
                Cell::from(record.unit.clone()),
                Cell::from(
                    Line::from(format_quantity(record.current_qty)).alignment(Alignment::Right),
                ),
                Cell::from(Line::from(format_quantity(record.min_qty)).alignment(Alignment::Right)),
                Cell::from(record.note.clone()),
            ])
            .style(row_style(record))
        });
        let widths = [
            Constraint::Length(16),
            Constraint::Percentage(20),
            Constraint::Length(15),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Min(8),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Stock"))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.stock.selected));
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else if !self.config.persist {
            Line::from(Span::styled(
                "Memory only",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.mode, self.tab) {
            (Mode::ConfirmDelete(_), _) => Line::from(vec![
                Span::styled("[y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[n/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Tab::Entry) => Line::from(vec![
                Span::styled("[↑↓/Tab]", key_style),
                Span::raw(" Field   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Ctrl+D]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[Ctrl+N]", key_style),
                Span::raw(" Clear   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Stock   "),
                Span::styled("[Ctrl+C]", key_style),
                Span::raw(" Quit"),
            ]),
            (_, Tab::Stock) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[b/c/i]", key_style),
                Span::raw(" Branch/Category/Item   "),
                Span::styled("[l]", key_style),
                Span::raw(" Low Stock   "),
                Span::styled("[r]", key_style),
                Span::raw(" Reset   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[d]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[x]", key_style),
                Span::raw(" Export   "),
                Span::styled("[o]", key_style),
                Span::raw(" Open Export   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Entry   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete {} at {}?",
                confirm.item_name, confirm.branch
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    use crate::models::{InventoryRecord, BRANCHES};

    fn app_in(dir: &TempDir, persist: bool) -> App {
        let config = AppConfig {
            data_file: dir.path().join("inventory.csv"),
            persist,
        };
        App::new(InventoryStore::new(), config)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    /// Fill item name and both quantities, leaving branch and category at
    /// their defaults.
    fn enter_item(app: &mut App, name: &str, current: &str, min: &str) {
        app.handle_ctrl_n();
        type_text(app, name);
        for _ in 0..3 {
            app.handle_key(KeyCode::Tab).unwrap();
        }
        type_text(app, current);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, min);
        app.handle_key(KeyCode::Enter).unwrap();
    }

    #[test]
    fn submitting_the_form_inserts_then_updates_and_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, true);

        enter_item(&mut app, "Rice", "5", "10");
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.status.as_ref().unwrap().text, "Added new item.");

        enter_item(&mut app, "Rice", "20", "10");
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.store().records()[0].current_qty, 20.0);
        assert_eq!(app.status.as_ref().unwrap().text, "Updated existing item.");

        let saved = storage::load(&dir.path().join("inventory.csv")).unwrap();
        assert_eq!(saved, app.store().records());
        assert!(!app.store().is_dirty());
    }

    #[test]
    fn blank_item_name_shows_warning() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, true);

        enter_item(&mut app, "   ", "1", "1");

        assert!(app.store().is_empty());
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Warning);
        assert_eq!(app.form.error.as_deref(), Some("item name required"));
        assert!(!dir.path().join("inventory.csv").exists());
    }

    #[test]
    fn ctrl_d_on_unknown_key_warns_without_dialog() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);
        app.handle_ctrl_n();
        type_text(&mut app, "Ghost");

        app.handle_ctrl_d();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Warning);
    }

    #[test]
    fn delete_requires_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);
        enter_item(&mut app, "Rice", "5", "10");

        app.handle_ctrl_d();
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.store().len(), 1);

        app.handle_ctrl_d();
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert!(app.store().is_empty());
        assert_eq!(
            app.status.as_ref().unwrap().text,
            format!("Deleted {} / Rice.", BRANCHES[0])
        );
    }

    #[test]
    fn stock_tab_edit_and_export() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);
        enter_item(&mut app, "Rice", "5", "10");
        enter_item(&mut app, "Beef", "50", "10");

        app.handle_key(KeyCode::Esc).unwrap();
        assert_eq!(app.tab, Tab::Stock);
        app.handle_key(KeyCode::Char('l')).unwrap();
        assert_eq!(app.stock.rows.len(), 1);

        app.handle_key(KeyCode::Char('x')).unwrap();
        let exported = storage::load(&dir.path().join(storage::EXPORT_FILE_NAME)).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].item_name, "Rice");

        app.handle_key(KeyCode::Char('e')).unwrap();
        assert_eq!(app.tab, Tab::Entry);
        assert_eq!(app.form.item_name, "Rice");
        assert_eq!(app.form.current_qty, "5");

        // memory-only runs never write the data file
        assert!(!dir.path().join("inventory.csv").exists());
    }

    #[test]
    fn editing_a_padded_name_updates_and_deletes_that_record() {
        let dir = TempDir::new().unwrap();
        let store = InventoryStore::from_records(vec![InventoryRecord::new(
            BRANCHES[0], " Rice ", "Other", "kg", 5.0, 10.0, "",
        )]);
        let config = AppConfig {
            data_file: dir.path().join("inventory.csv"),
            persist: false,
        };
        let mut app = App::new(store, config);

        app.handle_key(KeyCode::Esc).unwrap();
        app.handle_key(KeyCode::Char('e')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.status.as_ref().unwrap().text, "Updated existing item.");

        app.handle_ctrl_d();
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert!(app.store().is_empty());
    }

    #[test]
    fn quit_from_stock_tab() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, false);
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
        app.handle_key(KeyCode::Esc).unwrap();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn draws_both_tabs_without_panicking() {
        let dir = TempDir::new().unwrap();
        let mut store = InventoryStore::new();
        store
            .upsert(InventoryRecord::new(
                BRANCHES[0], "김치", "Other", "box", 1.0, 3.0, "냉장 보관",
            ))
            .unwrap();
        let config = AppConfig {
            data_file: dir.path().join("inventory.csv"),
            persist: true,
        };
        let mut app = App::new(store, config);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|frame| app.draw(frame)).unwrap();
        app.handle_key(KeyCode::Esc).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        app.handle_key(KeyCode::Char('d')).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
    }
}
