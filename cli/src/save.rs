//! Writing exported workbooks to disk.

use std::path::{Path, PathBuf};

use stratfin_core::{ExportFile, SaveError, SaveTarget};

/// Saves exports into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct FileSave {
    dir: PathBuf,
}

impl FileSave {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Destination for `file_name`; path separators are replaced so the
    /// file always lands directly inside the export directory.
    pub fn destination(&self, file_name: &str) -> PathBuf {
        let safe: String = file_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.dir.join(safe)
    }
}

impl SaveTarget for FileSave {
    fn save(&self, file: &ExportFile) -> Result<String, SaveError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| SaveError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.destination(&file.file_name);
        std::fs::write(&path, &file.bytes).map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path.display().to_string())
    }
}
