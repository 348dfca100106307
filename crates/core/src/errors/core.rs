use std::path::PathBuf;
use thiserror::Error;

/// Core error type for container assembly and compilation
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Install directory not provided to the container assembler")]
    MissingInstallDir,

    #[error("Failed to load configuration document '{}': {source}", .path.display())]
    DocumentLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration document '{}': {message}", .path.display())]
    InvalidDocument { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service not found: {service_id}{}", referenced_suffix(.referenced_by))]
    ServiceNotFound {
        service_id: String,
        referenced_by: Option<String>,
    },

    #[error("Parameter not found: {name}")]
    ParameterNotFound { name: String },

    #[error("Service '{service_id}' is tagged '{tag}' but has no '{attribute}' attribute")]
    MissingTagAttribute {
        service_id: String,
        tag: String,
        attribute: String,
    },

    #[error("Circular alias detected: {path}")]
    CircularAlias { path: String },

    #[error("Circular parameter reference detected: {path}")]
    CircularParameter { path: String },

    #[error("Compiler pass '{pass}' failed: {source}")]
    CompilerPass {
        pass: String,
        source: Box<CoreError>,
    },
}

fn referenced_suffix(referenced_by: &Option<String>) -> String {
    referenced_by
        .as_ref()
        .map(|id| format!(" (referenced by '{}')", id))
        .unwrap_or_default()
}

impl CoreError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a document load error wrapping the underlying cause
    pub fn document_load(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::DocumentLoad {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create an invalid document error
    pub fn invalid_document(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new service not found error
    pub fn service_not_found(service_id: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service_id: service_id.into(),
            referenced_by: None,
        }
    }

    /// Create a service not found error for a dangling reference
    pub fn dangling_reference(service_id: impl Into<String>, referenced_by: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service_id: service_id.into(),
            referenced_by: Some(referenced_by.into()),
        }
    }

    /// Create a new parameter not found error
    pub fn parameter_not_found(name: impl Into<String>) -> Self {
        Self::ParameterNotFound { name: name.into() }
    }

    /// Create a missing tag attribute error
    pub fn missing_tag_attribute(
        service_id: impl Into<String>,
        tag: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self::MissingTagAttribute {
            service_id: service_id.into(),
            tag: tag.into(),
            attribute: attribute.into(),
        }
    }

    /// Wrap an error raised inside a compiler pass
    pub fn in_pass(self, pass: impl Into<String>) -> Self {
        Self::CompilerPass {
            pass: pass.into(),
            source: Box::new(self),
        }
    }

    /// Check if the error is a document load or parse error
    pub fn is_document_error(&self) -> bool {
        matches!(self, Self::DocumentLoad { .. } | Self::InvalidDocument { .. })
    }

    /// Check if the error is a service error
    pub fn is_service(&self) -> bool {
        match self {
            Self::ServiceNotFound { .. } => true,
            Self::CompilerPass { source, .. } => source.is_service(),
            _ => false,
        }
    }
}
