//! The mounted volume: the in-memory superblock, the backing image handle, the current working
//! directory, and the shared I/O buffer. This is the process-wide state a successful `mount`
//! creates and a later `mount` replaces wholesale.

use std::path::Path;
use std::path::PathBuf;

use crate::codec::{Superblock, BLOCK_SIZE};
use crate::defrag;
use crate::disk::Disk;
use crate::error::{Error, Result};
use crate::fileops;
use crate::inode::{Dir, Name};
use crate::navigate;
use crate::verify;

/// The successful result of an operation. The core never prints; callers render this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Mounted { path: PathBuf },
    Created { name: Name, size: u8 },
    Deleted { name: Name },
    BlockRead { name: Name, block: u8 },
    BlockWritten { name: Name, block: u8 },
    BufferLoaded,
    Listing(Vec<LsEntry>),
    Resized { name: Name, size: u8 },
    ResizeNoop { name: Name, size: u8 },
    Defragged,
    ChangedDir { name: Name },
}

/// One line of `ls` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsEntry {
    pub name: Name,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory, with its `ls`-style child count (children + 2, for `.` and `..`).
    Dir(u32),
    /// A file, with its size in blocks.
    File(u8),
}

/// The mounted volume.
pub struct Volume {
    pub(crate) disk: Disk,
    pub(crate) sb: Superblock,
    pub(crate) cwd: Dir,
    pub(crate) buffer: [u8; BLOCK_SIZE],
    pub(crate) path: PathBuf,
}

impl Volume {
    /// Opens the image at `path`, runs the six consistency checks, and returns a freshly
    /// mounted volume with the current directory reset to root. Leaves the disk untouched on
    /// any failure.
    pub fn mount(path: &Path) -> Result<Self> {
        let mut disk = Disk::open(path).map_err(|_| Error::ImageUnreadable {
            path: path.to_path_buf(),
        })?;
        let bytes = disk.read_block(0).map_err(|_| Error::ImageUnreadable {
            path: path.to_path_buf(),
        })?;
        let sb = Superblock::from_bytes(&bytes);
        verify::verify(&sb).map_err(|code| Error::Inconsistent {
            path: path.to_path_buf(),
            code,
        })?;
        Ok(Self {
            disk,
            sb,
            cwd: Dir::Root,
            buffer: [0u8; BLOCK_SIZE],
            path: path.to_path_buf(),
        })
    }

    /// Rewrites the superblock to block 0 of the backing image.
    pub(crate) fn flush(&mut self) -> Result<()> {
        let bytes = self.sb.to_bytes();
        self.disk.write_block(0, &bytes)?;
        Ok(())
    }

    pub fn create(&mut self, name: Name, size: i64) -> Result<Outcome> {
        fileops::create(self, name, size)
    }

    pub fn delete(&mut self, name: Name) -> Result<Outcome> {
        fileops::delete(self, name)
    }

    pub fn read(&mut self, name: Name, block: i64) -> Result<Outcome> {
        fileops::read(self, name, block)
    }

    pub fn write(&mut self, name: Name, block: i64) -> Result<Outcome> {
        fileops::write(self, name, block)
    }

    pub fn buff(&mut self, data: &[u8]) -> Result<Outcome> {
        fileops::buff(self, data)
    }

    pub fn resize(&mut self, name: Name, new_size: i64) -> Result<Outcome> {
        fileops::resize(self, name, new_size)
    }

    pub fn defrag(&mut self) -> Result<Outcome> {
        defrag::defrag(self)
    }

    pub fn cd(&mut self, name: Name) -> Result<Outcome> {
        navigate::cd(self, name)
    }

    pub fn ls(&self) -> Vec<LsEntry> {
        navigate::ls(self)
    }

    /// The shared 1024-byte I/O buffer.
    pub fn buffer(&self) -> &[u8; BLOCK_SIZE] {
        &self.buffer
    }

    /// The path the active image was mounted from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
