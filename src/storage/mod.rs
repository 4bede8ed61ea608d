//! File-backed word store
//!
//! Keeps, per category, five level buckets and three append-only stats logs
//! as plain text files (one word per line):
//! - `<root>/<category>/Level1` .. `Level5`
//! - `<root>/<category>/Mastered`, `Faulted`, `Failed`
//!
//! The in-memory mirror held by [`LevelStore`] is authoritative for the
//! lifetime of the process; files are written through on every mutation.

// ============================================================
// Submodules
// ============================================================

pub mod layout;
pub mod level_store;

// ============================================================
// Re-exports
// ============================================================

pub use layout::CategoryPaths;
pub use level_store::LevelStore;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================
// Errors
// ============================================================

/// Storage error type
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
        move |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
