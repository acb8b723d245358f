use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::ArchiveError;

/// How a source file is placed into the storage root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArchiveMode {
    /// Duplicate the bytes; the source stays where it is.
    #[default]
    Copy,
    /// Relocate the source into the storage root.
    Move,
}

impl fmt::Display for ArchiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => f.write_str("copy"),
            Self::Move => f.write_str("move"),
        }
    }
}

/// Where a file ended up after [`Archiver::place`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub path: PathBuf,
    pub mode: ArchiveMode,
    /// A file of the same name was already in the storage root and was replaced.
    pub replaced: bool,
    /// The source already was the archived file; nothing was touched.
    pub unchanged: bool,
}

impl Placement {
    pub fn message(&self) -> &'static str {
        if self.unchanged {
            return "File is already in the archive";
        }
        match self.mode {
            ArchiveMode::Copy => "File copied successfully",
            ArchiveMode::Move => "File moved successfully",
        }
    }
}

/// Outcome of removing an archived file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed(PathBuf),
    AlreadyAbsent(PathBuf),
}

/// Move a file from `src` to `dst`. Uses `rename` first (fast, atomic on same
/// filesystem). Falls back to copy + delete when rename fails, which handles
/// cross-device moves.
fn move_file(src: &Path, dst: &Path) -> Result<(), ArchiveError> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    std::fs::copy(src, dst).map_err(|e| io_error("move", src, dst, e))?;
    std::fs::remove_file(src).map_err(|e| io_error("move", src, dst, e))?;
    Ok(())
}

fn io_error(action: &'static str, from: &Path, to: &Path, source: std::io::Error) -> ArchiveError {
    ArchiveError::Io {
        action,
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}

/// Checks that `name` is a plain file name usable inside the flat storage root.
pub fn validate_name(name: &str) -> Result<(), ArchiveError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
        || db::is_catalog_file(name);

    if invalid {
        return Err(ArchiveError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Owns the storage-root namespace: places files into it and removes them.
#[derive(Debug, Clone)]
pub struct Archiver {
    root: PathBuf,
}

impl Archiver {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the archived file called `name`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, ArchiveError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Places `source` into the storage root under its own file name.
    ///
    /// `Copy` overwrites an existing file of that name in place. `Move`
    /// removes the existing file first, then relocates the source.
    pub fn place(&self, source: &Path, mode: ArchiveMode) -> Result<Placement, ArchiveError> {
        self.check_root()?;

        let metadata = match std::fs::metadata(source) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ArchiveError::SourceNotFound(source.to_path_buf()));
            }
            Err(e) => return Err(io_error("inspect", source, source, e)),
        };
        if !metadata.is_file() {
            return Err(ArchiveError::NotAFile(source.to_path_buf()));
        }

        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ArchiveError::InvalidName(source.to_string_lossy().into_owned()))?;
        let destination = self.path_for(name)?;

        let replaced = std::fs::symlink_metadata(&destination).is_ok();
        if replaced && same_file(source, &destination) {
            log::info!("{} is already archived, leaving it in place", name);
            return Ok(Placement {
                path: destination,
                mode,
                replaced: false,
                unchanged: true,
            });
        }

        match mode {
            ArchiveMode::Copy => {
                std::fs::copy(source, &destination)
                    .map_err(|e| io_error("copy", source, &destination, e))?;
            }
            ArchiveMode::Move => {
                if replaced {
                    std::fs::remove_file(&destination)
                        .map_err(|e| io_error("replace", source, &destination, e))?;
                }
                move_file(source, &destination)?;
            }
        }

        log::info!(
            "Archived {} ({}{})",
            name,
            mode,
            if replaced { ", replaced existing" } else { "" }
        );

        Ok(Placement {
            path: destination,
            mode,
            replaced,
            unchanged: false,
        })
    }

    /// Removes the archived file `name`. A file that is already gone is
    /// reported as [`Removal::AlreadyAbsent`], not as an error.
    pub fn remove(&self, name: &str) -> Result<Removal, ArchiveError> {
        let path = self.path_for(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Removed archived file {}", name);
                Ok(Removal::Removed(path))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Removal::AlreadyAbsent(path)),
            Err(e) => Err(io_error("remove", &path, &path, e)),
        }
    }

    fn check_root(&self) -> Result<(), ArchiveError> {
        match std::fs::metadata(&self.root) {
            Ok(m) if m.is_dir() => Ok(()),
            _ => Err(ArchiveError::StorageRootUnavailable(self.root.clone())),
        }
    }
}

/// True when both paths name the same file, including hard links.
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
