use std::path::PathBuf;

use thiserror::Error;

/// Failures the store and the CSV layer report. Validation and not-found are
/// user mistakes the UI shows as warnings; the persistence variants wrap the
/// underlying I/O or CSV problem together with the file involved.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{0}")]
    Validation(String),

    #[error("no item '{item_name}' at branch '{branch}'")]
    NotFound { branch: String, item_name: String },

    #[error("failed to read inventory file {}", path.display())]
    PersistenceRead {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to write inventory file {}", path.display())]
    PersistenceWrite {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl InventoryError {
    pub(crate) fn read(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        InventoryError::PersistenceRead {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        InventoryError::PersistenceWrite {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Validation and not-found errors leave the store untouched and only
    /// warrant a warning.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            InventoryError::Validation(_) | InventoryError::NotFound { .. }
        )
    }
}

pub type InventoryResult<T> = Result<T, InventoryError>;
