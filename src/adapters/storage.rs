use crate::domain::ports::Storage;
use crate::utils::error::{ProcError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem storage. Writes go to a temporary sibling first and are
/// renamed into place, so a failed export never leaves a partial file
/// that could be mistaken for a complete one.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

fn export_error(path: &Path, source: std::io::Error) -> ProcError {
    ProcError::ExportError {
        path: path.display().to_string(),
        source,
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| export_error(&full_path, e))?;
            }
        }

        let mut tmp_name = full_path.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, data).map_err(|e| export_error(&full_path, e))?;
        fs::rename(&tmp_path, &full_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            export_error(&full_path, e)
        })
    }
}
