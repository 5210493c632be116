//! A simulated single-volume block filesystem: a 128 KiB disk image with a packed superblock
//! (bitmap + fixed inode table), mount-time consistency checking, and the create/delete/read/
//! write/resize/defragment/cd/ls operations over it.

pub mod alloc;
pub mod bitmap;
pub mod codec;
pub mod defrag;
pub mod disk;
pub mod error;
pub mod fileops;
pub mod fs;
pub mod inode;
pub mod navigate;
pub mod verify;
pub mod volume;

pub use codec::{Superblock, BLOCK_SIZE, DISK_SIZE, NUM_BLOCKS};
pub use error::{Error, Result};
pub use fs::FileSystem;
pub use inode::{Dir, Inode, Name, NUM_INODES};
pub use volume::{EntryKind, LsEntry, Outcome, Volume};
