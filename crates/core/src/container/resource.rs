use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Something the assembled container depends on; a cached container must be
/// rebuilt once any of its resources is no longer fresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resource {
    /// A file on disk, stale once modified after the cache was written
    File { path: PathBuf },
    /// Compiled-in assembly logic, stale once the crate version differs
    Code { location: String, version: String },
}

impl Resource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Resource::File { path: path.into() }
    }

    /// Identity of the source file that invoked this function
    #[track_caller]
    pub fn this_code() -> Self {
        let caller = std::panic::Location::caller();
        Resource::Code {
            location: caller.file().to_string(),
            version: crate::VERSION.to_string(),
        }
    }

    /// Check whether the resource is unchanged since the given time
    pub fn is_fresh(&self, since: SystemTime) -> bool {
        match self {
            Resource::File { path } => file_unchanged_since(path, since),
            Resource::Code { version, .. } => version == crate::VERSION,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Resource::File { path } => format!("file: {}", path.display()),
            Resource::Code { location, version } => format!("code: {} ({})", location, version),
        }
    }
}

fn file_unchanged_since(path: &Path, since: SystemTime) -> bool {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(|modified| modified <= since)
        .unwrap_or(false)
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
