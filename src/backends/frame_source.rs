// SPDX-License-Identifier: GPL-3.0-only

//! Recorded frame loading
//!
//! A [`FrameSource`] lists and reads raw frame files. [`load_frames`] turns
//! a source into an ordered list of decoded frames, or fails as a whole.

use crate::depth::{DepthFrame, Dimensions};
use crate::errors::FrameIoError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supplier of raw frame files
pub trait FrameSource {
    /// Paths of all frame files, in any order
    fn list(&self) -> Result<Vec<PathBuf>, FrameIoError>;

    /// Entire contents of one frame file
    fn read(&self, path: &Path) -> Result<Vec<u8>, FrameIoError>;
}

/// Frame files in a directory on disk
#[derive(Debug, Clone)]
pub struct DirectorySource {
    directory: PathBuf,
}

impl DirectorySource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl FrameSource for DirectorySource {
    fn list(&self) -> Result<Vec<PathBuf>, FrameIoError> {
        let unreadable = |e: std::io::Error| FrameIoError::DirectoryUnreadable {
            path: self.directory.clone(),
            reason: e.to_string(),
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.directory).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let path = entry.path();
            if path.is_dir() {
                debug!(path = %path.display(), "Skipping subdirectory");
                continue;
            }
            paths.push(path);
        }
        Ok(paths)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FrameIoError> {
        std::fs::read(path).map_err(|e| FrameIoError::FileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// A decoded frame and the file it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFrame {
    pub path: PathBuf,
    pub frame: DepthFrame,
}

/// Sort paths by file name so playback order does not depend on the filesystem
pub fn sort_by_file_name(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| {
        a.file_name()
            .cmp(&b.file_name())
            .then_with(|| a.as_os_str().cmp(b.as_os_str()))
    });
}

/// Read every frame from `source`
///
/// Every file must hold exactly `width * height` native-endian `u16`
/// samples. The first unreadable or mis-sized file aborts the whole load.
pub fn load_frames(
    source: &dyn FrameSource,
    dimensions: Dimensions,
) -> Result<Vec<LoadedFrame>, FrameIoError> {
    let mut paths = source.list()?;
    sort_by_file_name(&mut paths);

    let expected = dimensions.byte_len();
    let mut frames = Vec::with_capacity(paths.len());

    for path in paths {
        let bytes = source.read(&path)?;
        let frame = DepthFrame::from_ne_bytes(dimensions, &bytes).ok_or_else(|| {
            FrameIoError::SizeMismatch {
                path: path.clone(),
                expected,
                actual: bytes.len(),
            }
        })?;
        debug!(path = %path.display(), "Loaded frame");
        frames.push(LoadedFrame { path, frame });
    }

    info!(count = frames.len(), dimensions = %dimensions, "Loaded depth frames");
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory source returning files in insertion order
    struct MemorySource {
        order: Vec<PathBuf>,
        files: HashMap<PathBuf, Vec<u8>>,
    }

    impl MemorySource {
        fn new(files: &[(&str, Vec<u8>)]) -> Self {
            Self {
                order: files.iter().map(|(p, _)| PathBuf::from(p)).collect(),
                files: files
                    .iter()
                    .map(|(p, b)| (PathBuf::from(p), b.clone()))
                    .collect(),
            }
        }
    }

    impl FrameSource for MemorySource {
        fn list(&self) -> Result<Vec<PathBuf>, FrameIoError> {
            Ok(self.order.clone())
        }

        fn read(&self, path: &Path) -> Result<Vec<u8>, FrameIoError> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| FrameIoError::FileUnreadable {
                    path: path.to_path_buf(),
                    reason: "missing".into(),
                })
        }
    }

    fn raw(samples: &[u16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
    }

    #[test]
    fn test_frames_sorted_by_file_name() {
        let source = MemorySource::new(&[
            ("rec/b.raw", raw(&[2, 2])),
            ("rec/a.raw", raw(&[1, 1])),
            ("rec/c.raw", raw(&[3, 3])),
        ]);
        let frames = load_frames(&source, Dimensions::new(2, 1)).unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.raw", "b.raw", "c.raw"]);
        assert_eq!(frames[0].frame.samples(), &[1, 1]);
    }

    #[test]
    fn test_short_file_aborts_load() {
        let source = MemorySource::new(&[
            ("a.raw", raw(&[1, 1])),
            ("b.raw", raw(&[2])),
        ]);
        let err = load_frames(&source, Dimensions::new(2, 1)).unwrap_err();
        assert_eq!(
            err,
            FrameIoError::SizeMismatch {
                path: PathBuf::from("b.raw"),
                expected: 4,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_missing_directory() {
        let source = DirectorySource::new("/nonexistent/depth-replay-frames");
        let err = load_frames(&source, Dimensions::new(2, 1)).unwrap_err();
        assert!(matches!(err, FrameIoError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn test_directory_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("0002.raw"), raw(&[7, 8])).unwrap();
        std::fs::write(dir.path().join("0001.raw"), raw(&[5, 6])).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let frames = load_frames(&DirectorySource::new(dir.path()), Dimensions::new(2, 1)).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].path, dir.path().join("0001.raw"));
        assert_eq!(frames[1].frame.samples(), &[7, 8]);
    }
}
