//! Archiving folders out of the watch root.
//!
//! A move is a rename when source and destination share a volume. When the
//! rename fails the mover looks at what is left on disk before deciding:
//!
//! | source | destination | result |
//! |--------|-------------|--------|
//! | gone   | present     | success, the rename completed anyway |
//! | gone   | missing     | [`MoveError::Lost`] |
//! | present| any         | recursive copy, then remove the source |

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, error, info, warn};

use crate::error::MoveError;

/// The rename primitive used by a [`FolderMover`].
pub type RenameFn = fn(&Utf8Path, &Utf8Path) -> io::Result<()>;

fn std_rename(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    fs::rename(from, to)
}

/// How a successful move was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A plain rename.
    Renamed,
    /// The rename reported an error but the folder arrived.
    RenamedDespiteError,
    /// The folder was copied and the source removed.
    Copied,
}

/// What a successful move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    /// How the folder got there.
    pub outcome: MoveOutcome,
    /// Whether an earlier folder at the destination was removed first.
    pub replaced_existing: bool,
}

/// Moves whole folders, falling back to copy-and-delete across volumes.
///
/// An existing destination is replaced: the latest import wins.
#[derive(Debug, Clone, Copy)]
pub struct FolderMover {
    rename: RenameFn,
}

impl Default for FolderMover {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderMover {
    /// Creates a mover using [`std::fs::rename`].
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { rename: std_rename }
    }

    /// Creates a mover with a custom rename primitive.
    #[inline]
    #[must_use]
    pub const fn with_rename(rename: RenameFn) -> Self {
        Self { rename }
    }

    /// Moves `source` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::SourceMissing`] when there is nothing to move,
    /// [`MoveError::Lost`] when a failed rename left nothing behind, and
    /// [`MoveError::Io`] when preparing the destination or the fallback copy
    /// fails. In the last case the source is still in place.
    pub fn try_move(&self, source: &Utf8Path, destination: &Utf8Path) -> Result<MoveReport, MoveError> {
        if !source.exists() {
            return Err(MoveError::SourceMissing(source.to_path_buf()));
        }

        if let Some(parent) = destination.parent().filter(|p| !p.as_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| MoveError::io("create", parent, e))?;
        }

        let replaced_existing = destination.exists();
        if replaced_existing {
            warn!(destination = %destination, "Destination already exists, replacing it");
            remove_path(destination).map_err(|e| MoveError::io("remove", destination, e))?;
        }

        let rename_error = match (self.rename)(source, destination) {
            Ok(()) => {
                debug!(source = %source, destination = %destination, "Folder renamed");
                return Ok(MoveReport {
                    outcome: MoveOutcome::Renamed,
                    replaced_existing,
                });
            }
            Err(e) => e,
        };

        if !source.exists() {
            if destination.exists() {
                info!(
                    destination = %destination,
                    error = %rename_error,
                    "Rename reported an error but the folder arrived"
                );
                return Ok(MoveReport {
                    outcome: MoveOutcome::RenamedDespiteError,
                    replaced_existing,
                });
            }
            return Err(MoveError::Lost {
                source_path: source.to_path_buf(),
                destination: destination.to_path_buf(),
            });
        }

        debug!(
            source = %source,
            error = %rename_error,
            "Rename failed, copying instead"
        );
        copy_tree(source, destination)?;
        fs::remove_dir_all(source).map_err(|e| MoveError::io("remove", source, e))?;
        Ok(MoveReport {
            outcome: MoveOutcome::Copied,
            replaced_existing,
        })
    }

    /// Moves `source` to `destination`, returning `false` and logging on failure.
    pub fn move_folder(&self, source: &Utf8Path, destination: &Utf8Path) -> bool {
        match self.try_move(source, destination) {
            Ok(_) => true,
            Err(e) if e.is_loss() => {
                error!(error = %e, "Folder lost during move");
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to move folder");
                false
            }
        }
    }
}

fn remove_path(path: &Utf8Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Copies `source` into `destination` depth-first, keeping the subtree shape.
fn copy_tree(source: &Utf8Path, destination: &Utf8Path) -> Result<(), MoveError> {
    fs::create_dir_all(destination).map_err(|e| MoveError::io("create", destination, e))?;

    let entries = source
        .read_dir_utf8()
        .map_err(|e| MoveError::io("read", source, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| MoveError::io("read", source, e))?;
        let from = entry.path();
        let to: Utf8PathBuf = destination.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| MoveError::io("inspect", from, e))?;

        if file_type.is_dir() {
            copy_tree(from, &to)?;
        } else {
            fs::copy(from, &to).map_err(|e| MoveError::io("copy", from, e))?;
        }
    }
    Ok(())
}
