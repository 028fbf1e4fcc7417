//! Link Materializer Module
//!
//! Rebuilds a directory tree of symbolic links that mirrors a
//! [`ClusterSet`], so clusters can be browsed with a file manager:
//!
//! ```text
//! <target>/cluster_with_<size>/cluster_<index>/<basename> -> <absolute member path>
//! ```
//!
//! The target directory is owned by the materializer for the duration of
//! the call. Whatever it contained before is deleted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{ClusterError, Result};
use crate::model::ClusterSet;

/// Counts of what [`materialize`] created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Cluster directories created
    pub directories: usize,
    /// Symbolic links created
    pub links: usize,
}

/// Path of the directory holding cluster `index` of the `size` bucket
pub fn cluster_dir(target_dir: &Path, size: usize, index: usize) -> PathBuf {
    target_dir
        .join(format!("cluster_with_{}", size))
        .join(format!("cluster_{}", index))
}

/// Delete `target_dir` and recreate it as a link tree for `clusters`
///
/// Buckets are visited in ascending size, so directory indices match the
/// compositor's column order within each size.
///
/// # Errors
/// * `LinkCreationError` - any filesystem failure while building the tree:
///   the old tree could not be removed, a directory could not be created,
///   or a link could not be created (e.g. two members of one cluster share
///   a file name). `target` is `None` for directory failures.
///
/// On error the partially built tree is removed before returning.
pub fn materialize(clusters: &ClusterSet, target_dir: &Path) -> Result<LinkReport> {
    info!("cluster dir: {}", target_dir.display());

    remove_existing(target_dir)?;
    fs::create_dir_all(target_dir).map_err(|e| directory_error(target_dir, e))?;

    let guard = TreeGuard::new(target_dir);
    let mut report = LinkReport::default();

    for (size, group) in clusters.buckets() {
        for (index, cluster) in group.iter().enumerate() {
            let dir = cluster_dir(target_dir, size, index);
            fs::create_dir_all(&dir).map_err(|e| directory_error(&dir, e))?;
            report.directories += 1;
            debug!("{}: {} links", dir.display(), cluster.len());

            for key in cluster {
                let file_name = key.file_name().ok_or_else(|| ClusterError::LinkCreationError {
                    path: dir.clone(),
                    target: Some(key.path().to_path_buf()),
                    source: io::Error::new(io::ErrorKind::InvalidInput, "member has no file name"),
                })?;
                let link = dir.join(file_name);
                let target = key.absolute().map_err(|e| ClusterError::LinkCreationError {
                    path: link.clone(),
                    target: Some(key.path().to_path_buf()),
                    source: e,
                })?;

                symlink(&target, &link).map_err(|e| ClusterError::LinkCreationError {
                    path: link,
                    target: Some(target),
                    source: e,
                })?;
                report.links += 1;
            }
        }
    }

    guard.commit();
    info!(
        "created {} links in {} cluster directories",
        report.links, report.directories
    );
    Ok(report)
}

/// Remove whatever lives at `path`, following no links
fn remove_existing(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(directory_error(path, e)),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| directory_error(path, e))
}

fn directory_error(path: &Path, source: io::Error) -> ClusterError {
    ClusterError::LinkCreationError {
        path: path.to_path_buf(),
        target: None,
        source,
    }
}

/// Removes the tree rooted at `root` on drop unless committed
struct TreeGuard {
    root: PathBuf,
    armed: bool,
}

impl TreeGuard {
    fn new(root: &Path) -> Self {
        TreeGuard {
            root: root.to_path_buf(),
            armed: true,
        }
    }

    fn commit(mut self) {
        self.armed = false;
    }
}

impl Drop for TreeGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("removing partial cluster dir: {}", self.root.display());
        if let Err(e) = fs::remove_dir_all(&self.root) {
            warn!("failed to remove {}: {}", self.root.display(), e);
        }
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symbolic links are not supported on this platform",
    ))
}
