//! The crate-wide error taxonomy. One variant per diagnostic template; no `thiserror` --
//! manual `Display` impls, matching the style of `Guid`/`User`/`Group` in the teacher crate.

use std::fmt;
use std::path::PathBuf;

use crate::inode::Name;

fn name_str(name: &Name) -> String {
    String::from_utf8_lossy(name)
        .trim_end_matches('\0')
        .to_string()
}

/// Every way a core operation can fail.
#[derive(Debug)]
pub enum Error {
    /// Any operation but `mount` invoked without a mounted volume.
    NotMounted,
    /// `mount` could not open the image at the given path.
    ImageUnreadable { path: PathBuf },
    /// `mount` read the image but a consistency check failed.
    Inconsistent { path: PathBuf, code: u8 },
    /// `create` found an existing sibling with the same name.
    NameCollision { name: Name },
    /// `create` has no free inode slot.
    NoFreeInode,
    /// `create`/`resize` could not find `n` contiguous free blocks.
    NoFreeRun { blocks: u8 },
    /// The target file or directory does not exist in the current directory.
    NotFound { name: Name },
    /// A block index for read/write was out of `[0, size)`.
    BlockOutOfRange { name: Name, block: i64 },
    /// A requested file size was outside `[0, 127]`.
    SizeOutOfRange { size: i64 },
    /// `resize` could neither extend in place nor relocate.
    CannotExpand { name: Name },
    /// An underlying I/O failure while reading or writing the backing image.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotMounted => write!(f, "no file system is mounted"),
            Error::ImageUnreadable { path } => {
                write!(f, "Error: Cannot find disk {}", path.display())
            }
            Error::Inconsistent { path, code } => write!(
                f,
                "Error: File system in {} is inconsistent (error code: {code})",
                path.display()
            ),
            Error::NameCollision { name } => {
                write!(f, "File or directory {} already exists", name_str(name))
            }
            Error::NoFreeInode => write!(f, "superblock full"),
            Error::NoFreeRun { blocks } => write!(f, "cannot allocate {blocks} blocks"),
            Error::NotFound { name } => write!(f, "{} does not exist", name_str(name)),
            Error::BlockOutOfRange { .. } => write!(f, "index out of bounds"),
            Error::SizeOutOfRange { .. } => write!(f, "size out of range"),
            Error::CannotExpand { name } => {
                write!(f, "cannot expand {}", name_str(name))
            }
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// The crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
