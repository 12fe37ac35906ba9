//! In-memory inventory table. The store is an explicit object owned by
//! whoever drives it (the TUI or a headless command); nothing here touches
//! the filesystem, persistence lives in [`crate::storage`].

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::error::{InventoryError, InventoryResult};
use crate::models::{coerce_quantity, InventoryRecord};

/// Which branch of an upsert ran, used for user feedback only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Record fields that can feed a cascading option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Branch,
    Category,
    ItemName,
}

impl RecordField {
    fn value(self, record: &InventoryRecord) -> &str {
        match self {
            RecordField::Branch => &record.branch,
            RecordField::Category => &record.category,
            RecordField::ItemName => &record.item_name,
        }
    }
}

/// Read-side filter. `None` means "no restriction"; `Some` of an empty set
/// is an explicit empty selection and matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryFilter {
    pub branches: Option<BTreeSet<String>>,
    pub categories: Option<BTreeSet<String>>,
    pub item_name: Option<String>,
    pub below_threshold_only: bool,
}

impl InventoryFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_branches<I, S>(mut self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.branches = Some(branches.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_item_name(mut self, item_name: impl Into<String>) -> Self {
        self.item_name = Some(item_name.into());
        self
    }

    pub fn below_threshold_only(mut self, enabled: bool) -> Self {
        self.below_threshold_only = enabled;
        self
    }

    /// AND of every active criterion.
    pub fn matches(&self, record: &InventoryRecord) -> bool {
        if let Some(branches) = &self.branches {
            if !branches.contains(&record.branch) {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&record.category) {
                return false;
            }
        }
        if let Some(item_name) = &self.item_name {
            if record.item_name != *item_name {
                return false;
            }
        }
        !self.below_threshold_only || record.is_below_threshold()
    }
}

/// Ordered collection of records keyed by `(branch, item_name)`.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    records: Vec<InventoryRecord>,
    dirty: bool,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap records read from disk. A later row with an already seen key
    /// replaces the earlier one so the identity invariant holds even for
    /// hand-edited files, and rows without an item name are dropped. The
    /// result starts clean.
    pub fn from_records(records: impl IntoIterator<Item = InventoryRecord>) -> Self {
        let mut store = Self::new();
        for mut record in records {
            if record.item_name.trim().is_empty() {
                warn!(branch = %record.branch, "dropping record without an item name");
                continue;
            }
            record.current_qty = coerce_quantity(record.current_qty);
            record.min_qty = coerce_quantity(record.min_qty);
            match store.position(&record.branch, &record.item_name) {
                Some(idx) => store.records[idx] = record,
                None => store.records.push(record),
            }
        }
        store
    }

    /// Drop every record. Counts as a mutation.
    pub fn reset(&mut self) {
        self.records.clear();
        self.dirty = true;
    }

    /// Insert a new record or overwrite every field of the existing one with
    /// the same `(branch, item_name)`.
    pub fn upsert(&mut self, mut record: InventoryRecord) -> InventoryResult<UpsertOutcome> {
        if record.item_name.trim().is_empty() {
            return Err(InventoryError::Validation("item name required".to_string()));
        }
        record.current_qty = coerce_quantity(record.current_qty);
        record.min_qty = coerce_quantity(record.min_qty);

        let outcome = match self.position(&record.branch, &record.item_name) {
            Some(idx) => {
                self.records[idx] = record;
                UpsertOutcome::Updated
            }
            None => {
                self.records.push(record);
                UpsertOutcome::Inserted
            }
        };
        self.dirty = true;
        info!(?outcome, count = self.records.len(), "upserted inventory record");
        Ok(outcome)
    }

    /// Remove the record with this exact key and hand it back.
    pub fn delete(&mut self, branch: &str, item_name: &str) -> InventoryResult<InventoryRecord> {
        let idx = self
            .position(branch, item_name)
            .ok_or_else(|| InventoryError::NotFound {
                branch: branch.to_string(),
                item_name: item_name.to_string(),
            })?;
        let removed = self.records.remove(idx);
        self.dirty = true;
        info!(branch, item_name, count = self.records.len(), "deleted inventory record");
        Ok(removed)
    }

    /// Lazily yield the records accepted by `filter`, in store order.
    pub fn query<'a>(
        &'a self,
        filter: &'a InventoryFilter,
    ) -> impl Iterator<Item = &'a InventoryRecord> + 'a {
        debug!(?filter, "querying inventory");
        self.records.iter().filter(move |record| filter.matches(record))
    }

    /// Sorted distinct values of `field` among records matching `prefix`.
    /// Feeding the branch selection back in as the prefix for categories, and
    /// branch plus category for items, gives progressively narrower lists.
    pub fn options(&self, field: RecordField, prefix: &InventoryFilter) -> Vec<String> {
        self.query(prefix)
            .map(|record| field.value(record))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn get(&self, branch: &str, item_name: &str) -> Option<&InventoryRecord> {
        self.records.iter().find(|r| r.has_key(branch, item_name))
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn below_threshold_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_below_threshold()).count()
    }

    /// Whether mutations happened since the last successful save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn position(&self, branch: &str, item_name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.has_key(branch, item_name))
    }
}
