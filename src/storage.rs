//! CSV flat-file persistence. Every function in this module either reads the
//! whole file or replaces it wholesale; there is no append or patch path.
//! The same writer backs the export feature so a saved file and an exported
//! view share one format.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{InventoryError, InventoryResult};
use crate::models::InventoryRecord;

/// Column order of every file this module writes.
pub const HEADER: [&str; 7] = [
    "branch",
    "itemName",
    "category",
    "unit",
    "currentQty",
    "minQty",
    "note",
];

/// File name used when the TUI exports the current view.
pub const EXPORT_FILE_NAME: &str = "everest_inventory.csv";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const ITEM_NAME_COLUMN: &str = HEADER[1];

/// Outcome of a lenient load. `warning` is set when the file existed but
/// could not be read, in which case `records` is empty. `skipped` counts rows
/// dropped because they had no item name.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<InventoryRecord>,
    pub skipped: usize,
    pub warning: Option<InventoryError>,
}

/// Read every record from `path`. A missing or empty file is an empty
/// inventory, not an error. A header without an `itemName` column is
/// rejected since no row could be keyed; rows with a blank item name are
/// skipped.
pub fn load(path: &Path) -> InventoryResult<Vec<InventoryRecord>> {
    read_rows(path).map(|(records, _)| records)
}

/// Like [`load`] but never fails: unreadable files become an empty set and
/// the error travels back in the report so the caller can show it.
pub fn load_or_empty(path: &Path) -> LoadReport {
    match read_rows(path) {
        Ok((records, skipped)) => LoadReport {
            records,
            skipped,
            warning: None,
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "starting with an empty inventory");
            LoadReport {
                warning: Some(err),
                ..LoadReport::default()
            }
        }
    }
}

fn read_rows(path: &Path) -> InventoryResult<(Vec<InventoryRecord>, usize)> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
        Err(err) => return Err(InventoryError::read(path, err)),
    };
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(body);

    let headers = reader
        .headers()
        .map_err(|err| InventoryError::read(path, err))?;
    if headers.iter().all(str::is_empty) {
        return Ok((Vec::new(), 0));
    }
    if !headers.iter().any(|name| name == ITEM_NAME_COLUMN) {
        return Err(InventoryError::read(
            path,
            format!("header has no '{ITEM_NAME_COLUMN}' column"),
        ));
    }

    let mut records = Vec::new();
    let mut skipped = 0;
    for row in reader.deserialize::<InventoryRecord>() {
        let record = row.map_err(|err| InventoryError::read(path, err))?;
        if record.item_name.trim().is_empty() {
            skipped += 1;
        } else {
            records.push(record);
        }
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "skipped rows without an item name");
    }
    info!(path = %path.display(), count = records.len(), "loaded inventory");
    Ok((records, skipped))
}

/// Replace the file at `path` with `records`. Rows are written to a sibling
/// temporary file first and renamed into place, so a failure leaves the
/// previous contents untouched.
pub fn save(path: &Path, records: &[InventoryRecord]) -> InventoryResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| InventoryError::write(path, err))?;
    }

    let tmp_path = temp_path_for(path);
    let result = File::create(&tmp_path)
        .map_err(|err| InventoryError::write(path, err))
        .and_then(|file| export(file, records).map_err(|err| InventoryError::write(path, err)))
        .and_then(|_| fs::rename(&tmp_path, path).map_err(|err| InventoryError::write(path, err)));

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    } else {
        info!(path = %path.display(), count = records.len(), "saved inventory");
    }
    result
}

/// Serialize records as BOM-prefixed UTF-8 CSV with the fixed header. Works
/// on any query result, not just the full table.
pub fn export<'a, W, I>(mut writer: W, records: I) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    writer.write_all(UTF8_BOM)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write an export to a file, creating parent directories as needed.
pub fn export_to_path<'a, I>(path: &Path, records: I) -> InventoryResult<usize>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| InventoryError::write(path, err))?;
    }
    let records: Vec<_> = records.into_iter().collect();
    let file = File::create(path).map_err(|err| InventoryError::write(path, err))?;
    export(file, records.iter().copied()).map_err(|err| InventoryError::write(path, err))?;
    info!(path = %path.display(), count = records.len(), "exported inventory view");
    Ok(records.len())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
