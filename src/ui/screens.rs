use std::cmp::min;

use crate::models::InventoryRecord;
use crate::store::{InventoryFilter, InventoryStore, RecordField};

/// State behind the Stock tab: the cascading filter selections plus the
/// materialized rows they currently select.
#[derive(Default)]
pub(crate) struct StockScreen {
    pub(crate) branch: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) item: Option<String>,
    pub(crate) below_threshold_only: bool,
    pub(crate) rows: Vec<InventoryRecord>,
    pub(crate) selected: usize,
}

impl StockScreen {
    pub(crate) fn new(store: &InventoryStore) -> Self {
        let mut screen = Self::default();
        screen.refresh(store);
        screen
    }

    /// Filter covering branch and category only; the prefix for item options.
    fn category_prefix(&self) -> InventoryFilter {
        let mut filter = InventoryFilter::all();
        if let Some(branch) = &self.branch {
            filter = filter.with_branches([branch.clone()]);
        }
        filter
    }

    fn item_prefix(&self) -> InventoryFilter {
        let mut filter = self.category_prefix();
        if let Some(category) = &self.category {
            filter = filter.with_categories([category.clone()]);
        }
        filter
    }

    /// The full filter for the table.
    pub(crate) fn filter(&self) -> InventoryFilter {
        let mut filter = self.item_prefix().below_threshold_only(self.below_threshold_only);
        if let Some(item) = &self.item {
            filter = filter.with_item_name(item.clone());
        }
        filter
    }

    /// Re-run the query after the store or a selection changed. Selections
    /// that no longer occur within their narrower prefix fall back to "All".
    pub(crate) fn refresh(&mut self, store: &InventoryStore) {
        if let Some(branch) = &self.branch {
            if !store
                .options(RecordField::Branch, &InventoryFilter::all())
                .contains(branch)
            {
                self.branch = None;
            }
        }
        if let Some(category) = &self.category {
            if !store
                .options(RecordField::Category, &self.category_prefix())
                .contains(category)
            {
                self.category = None;
            }
        }
        if let Some(item) = &self.item {
            if !store
                .options(RecordField::ItemName, &self.item_prefix())
                .contains(item)
            {
                self.item = None;
            }
        }

        let filter = self.filter();
        self.rows = store.query(&filter).cloned().collect();
        self.ensure_in_bounds();
    }

    /// Step one of the cascading selectors through `All` followed by the
    /// values present under its prefix.
    pub(crate) fn cycle(&mut self, store: &InventoryStore, field: RecordField, offset: isize) {
        let (options, current) = match field {
            RecordField::Branch => (
                store.options(RecordField::Branch, &InventoryFilter::all()),
                &mut self.branch,
            ),
            RecordField::Category => (
                store.options(RecordField::Category, &self.category_prefix()),
                &mut self.category,
            ),
            RecordField::ItemName => (
                store.options(RecordField::ItemName, &self.item_prefix()),
                &mut self.item,
            ),
        };
        *current = step_option(&options, current.as_deref(), offset);
        self.refresh(store);
    }

    pub(crate) fn toggle_below_threshold(&mut self, store: &InventoryStore) -> bool {
        self.below_threshold_only = !self.below_threshold_only;
        self.refresh(store);
        self.below_threshold_only
    }

    pub(crate) fn reset_filters(&mut self, store: &InventoryStore) {
        self.branch = None;
        self.category = None;
        self.item = None;
        self.below_threshold_only = false;
        self.refresh(store);
    }

    pub(crate) fn current_row(&self) -> Option<&InventoryRecord> {
        self.rows.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let len = self.rows.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        self.selected = min(self.selected, self.rows.len().saturating_sub(1));
    }
}

/// Cycle over `[All, options...]`, wrapping at both ends.
fn step_option(options: &[String], current: Option<&str>, offset: isize) -> Option<String> {
    let slots = options.len() as isize + 1;
    let position = current
        .and_then(|value| options.iter().position(|o| o == value))
        .map(|idx| idx as isize + 1)
        .unwrap_or(0);
    let next = (position + offset).rem_euclid(slots);
    if next == 0 {
        None
    } else {
        options.get(next as usize - 1).cloned()
    }
}
