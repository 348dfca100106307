use serde::{Deserialize, Serialize};

/// A freshly created content version.
///
/// The version itself is owned by the repository; this value only carries it
/// to the response visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedVersion<V> {
    version: V,
}

impl<V> CreatedVersion<V> {
    pub fn new(version: V) -> Self {
        Self { version }
    }

    /// The created version
    pub fn version(&self) -> &V {
        &self.version
    }

    pub fn into_version(self) -> V {
        self.version
    }
}
