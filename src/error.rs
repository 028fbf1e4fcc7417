//! Error handling for clustergrid
//!
//! Every error carries enough context for the caller to decide on a retry,
//! and most come with recovery suggestions.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for clustergrid operations
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Main error type for clustergrid operations
#[derive(Error, Debug)]
pub enum ClusterError {
    // Input Errors
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("No image loaded for cluster member: {key}")]
    MissingImage { key: String },

    // Resource Errors
    #[error(
        "Size of plot array ({:.1} MiB) exceeds memory limit ({:.1} MiB)",
        mib(*required_bytes),
        mib(*limit_bytes)
    )]
    MemoryBudgetExceeded {
        required_bytes: u64,
        limit_bytes: u64,
    },

    // Filesystem Errors
    #[error("Failed to build link tree at {}: {source}", link_entry(path, target.as_deref()))]
    LinkCreationError {
        path: PathBuf,
        /// Link target, `None` when a directory of the tree failed
        target: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory operation failed: {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Image Errors
    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn link_entry(path: &Path, target: Option<&Path>) -> String {
    match target {
        Some(target) => format!("{} -> {}", path.display(), target.display()),
        None => path.display().to_string(),
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

impl ClusterError {
    /// Shorthand for a [`ClusterError::InvalidInput`] with the given reason
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        ClusterError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ClusterError::InvalidInput { .. } => "INVALID_INPUT",
            ClusterError::MissingImage { .. } => "MISSING_IMAGE",
            ClusterError::MemoryBudgetExceeded { .. } => "MEMORY_BUDGET_EXCEEDED",
            ClusterError::LinkCreationError { .. } => "LINK_CREATION_ERROR",
            ClusterError::DirectoryError { .. } => "DIRECTORY_ERROR",
            ClusterError::FileReadError { .. } => "FILE_READ_ERROR",
            ClusterError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            ClusterError::ImageDecode { .. } => "IMAGE_DECODE_ERROR",
            ClusterError::ImageEncode { .. } => "IMAGE_ENCODE_ERROR",
            ClusterError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller can retry with different parameters
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClusterError::MemoryBudgetExceeded { .. }
                | ClusterError::MissingImage { .. }
                | ClusterError::LinkCreationError { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ClusterError::InvalidInput { .. } => vec![
                "Check that the cluster file contains at least one non-empty cluster",
                "Loosen --max-cluster-size so that some clusters remain",
            ],
            ClusterError::MissingImage { .. } => vec![
                "Load every image referenced by the cluster file",
                "Check that cluster members use the same paths as the image directory",
            ],
            ClusterError::MemoryBudgetExceeded { .. } => vec![
                "Increase --memory-limit if enough memory is available",
                "Lower --max-cluster-size to drop large clusters",
                "Lower --examples to show fewer images per cluster",
            ],
            ClusterError::LinkCreationError { .. } => vec![
                "Check that two members of one cluster do not share a file name",
                "Verify write permission on the target directory",
                "Use a filesystem that supports symbolic links",
            ],
            ClusterError::DirectoryError { .. } => vec![
                "Verify write permission on the target directory",
                "Make sure no other process is using the target directory",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ClusterError::invalid_input("`clusters` is empty");
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_memory_budget_message_in_mib() {
        let err = ClusterError::MemoryBudgetExceeded {
            required_bytes: 3 * 1024 * 1024,
            limit_bytes: 1024 * 1024,
        };
        assert_eq!(
            err.to_string(),
            "Size of plot array (3.0 MiB) exceeds memory limit (1.0 MiB)"
        );
        assert!(err.is_recoverable());
        assert_eq!(err.recovery_suggestions().len(), 3);
    }

    #[test]
    fn test_link_error_keeps_source() {
        let err = ClusterError::LinkCreationError {
            path: PathBuf::from("out/cluster_with_2/cluster_0/a.jpg"),
            target: Some(PathBuf::from("/data/a.jpg")),
            source: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
        };
        assert_eq!(err.error_code(), "LINK_CREATION_ERROR");
        assert!(std::error::Error::source(&err).is_some());
        assert!(err
            .to_string()
            .starts_with("Failed to build link tree at out/cluster_with_2/cluster_0/a.jpg -> /data/a.jpg"));
    }

    #[test]
    fn test_link_error_for_directory() {
        let err = ClusterError::LinkCreationError {
            path: PathBuf::from("out/cluster_with_2"),
            target: None,
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err
            .to_string()
            .starts_with("Failed to build link tree at out/cluster_with_2: "));
    }
}
