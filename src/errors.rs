// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the depth replay tool

use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Frame directory or frame file problems
    Io(FrameIoError),
    /// Invalid configuration or command-line arguments
    Config(String),
    /// Failure reported by the skeleton tracker
    Tracker(TrackerError),
    /// Writing a snapshot image failed
    Export(String),
}

/// Errors raised while loading recorded depth frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameIoError {
    /// The frame directory could not be listed
    DirectoryUnreadable { path: PathBuf, reason: String },
    /// A frame file could not be opened or read
    FileUnreadable { path: PathBuf, reason: String },
    /// A frame file does not hold exactly `width * height` samples
    SizeMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}

/// Errors returned by a skeleton tracker for a single frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// Tracking ran but did not produce a result
    Failed(String),
    /// The depth buffer handed to the tracker was unusable
    InvalidInput(String),
}

impl FrameIoError {
    /// Path of the directory or file that caused the error
    pub fn path(&self) -> &std::path::Path {
        match self {
            FrameIoError::DirectoryUnreadable { path, .. }
            | FrameIoError::FileUnreadable { path, .. }
            | FrameIoError::SizeMismatch { path, .. } => path,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "I/O error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Tracker(e) => write!(f, "Tracker error: {}", e),
            AppError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl fmt::Display for FrameIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameIoError::DirectoryUnreadable { path, reason } => {
                write!(f, "cannot list {}: {}", path.display(), reason)
            }
            FrameIoError::FileUnreadable { path, reason } => {
                write!(f, "cannot read {}: {}", path.display(), reason)
            }
            FrameIoError::SizeMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "{} has {} bytes, expected {}",
                path.display(),
                actual,
                expected
            ),
        }
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Failed(msg) => write!(f, "Tracking failed: {}", msg),
            TrackerError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for FrameIoError {}
impl std::error::Error for TrackerError {}

// Conversions from sub-errors to AppError
impl From<FrameIoError> for AppError {
    fn from(err: FrameIoError) -> Self {
        AppError::Io(err)
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        AppError::Tracker(err)
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_names_file() {
        let err = AppError::from(FrameIoError::SizeMismatch {
            path: PathBuf::from("/tmp/frames/0003.raw"),
            expected: 614_400,
            actual: 1024,
        });
        let text = err.to_string();
        assert!(text.contains("0003.raw"));
        assert!(text.contains("614400"));
    }

    #[test]
    fn test_io_error_path() {
        let err = FrameIoError::DirectoryUnreadable {
            path: PathBuf::from("/missing"),
            reason: "not found".into(),
        };
        assert_eq!(err.path(), std::path::Path::new("/missing"));
    }
}
