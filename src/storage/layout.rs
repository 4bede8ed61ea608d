//! On-disk layout of one category and the low-level file helpers.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{StorageError, StorageResult};
use crate::types::{Category, Level, Outcome, Word, LEVEL_COUNT, OUTCOME_COUNT};

/// Paths of every file belonging to a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPaths {
    pub folder: PathBuf,
    pub levels: [PathBuf; LEVEL_COUNT],
    pub stats: [PathBuf; OUTCOME_COUNT],
}

impl CategoryPaths {
    pub fn new(root: &Path, category: Category) -> Self {
        let folder = root.join(category.folder_name());
        let levels = Level::ALL.map(|level| folder.join(format!("Level{}", level.value())));
        let stats = Outcome::ALL.map(|outcome| folder.join(outcome.file_name()));
        Self {
            folder,
            levels,
            stats,
        }
    }

    pub fn level(&self, level: Level) -> &Path {
        &self.levels[level.index()]
    }

    pub fn stats(&self, outcome: Outcome) -> &Path {
        &self.stats[outcome.index()]
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.levels
            .iter()
            .chain(self.stats.iter())
            .map(PathBuf::as_path)
    }

    /// Create the folder and any missing file. Existing files are untouched.
    pub fn bootstrap(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.folder).map_err(StorageError::io(&self.folder))?;
        for path in self.files() {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(StorageError::io(path))?;
        }
        Ok(())
    }
}

/// Read a word file, skipping blank lines. Bytes that are not UTF-8 are
/// replaced rather than rejected.
pub(crate) fn read_words(path: &Path) -> StorageResult<Vec<Word>> {
    let bytes = fs::read(path).map_err(StorageError::io(path))?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .filter_map(Word::from_stored)
        .collect())
}

/// Replace a file's content through a sibling temp file and rename
pub(crate) fn write_words(path: &Path, words: &[Word]) -> StorageResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(StorageError::io(dir))?;
    for word in words {
        writeln!(tmp, "{word}").map_err(StorageError::io(tmp.path()))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(StorageError::io(path))?;
    tmp.persist(path)
        .map_err(|e| StorageError::io(path)(e.error))?;
    Ok(())
}

/// Append one line. A file whose last line has no terminator gets one
/// first, so the new word never joins the previous one.
pub(crate) fn append_word(path: &Path, word: &Word) -> StorageResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(StorageError::io(path))?;

    let len = file.metadata().map_err(StorageError::io(path))?.len();
    if len > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).map_err(StorageError::io(path))?;
        file.read_exact(&mut last).map_err(StorageError::io(path))?;
        if last[0] != b'\n' {
            file.write_all(b"\n").map_err(StorageError::io(path))?;
        }
    }
    writeln!(file, "{word}").map_err(StorageError::io(path))
}
