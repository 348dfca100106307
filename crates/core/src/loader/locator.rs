use crate::errors::CoreError;
use std::io;
use std::path::{Path, PathBuf};

/// Resolves document names against an ordered list of base directories
#[derive(Debug, Clone)]
pub struct FileLocator {
    paths: Vec<PathBuf>,
}

impl FileLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![path.into()],
        }
    }

    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Find the first existing file for `name`; absolute names are checked as-is
    pub fn locate(&self, name: &str) -> Result<PathBuf, CoreError> {
        let candidate = Path::new(name);
        if candidate.is_absolute() {
            return if candidate.is_file() {
                Ok(candidate.to_path_buf())
            } else {
                Err(not_found(candidate, "file does not exist"))
            };
        }

        self.paths
            .iter()
            .map(|base| base.join(candidate))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                let searched: Vec<String> = self.paths.iter().map(|p| p.display().to_string()).collect();
                not_found(candidate, &format!("not found in [{}]", searched.join(", ")))
            })
    }
}

fn not_found(path: &Path, message: &str) -> CoreError {
    CoreError::document_load(path, io::Error::new(io::ErrorKind::NotFound, message.to_string()))
}
