//! Serialization of the 1024-byte superblock: the first 16 bytes are the free-block bitmap,
//! followed by 126 * 8 = 1008 bytes of inodes.

use crate::bitmap::{Bitmap, BITMAP_BYTES};
use crate::inode::{Inode, NUM_INODES};

/// Size in bytes of one block, including the superblock itself.
pub const BLOCK_SIZE: usize = 1024;
/// Number of blocks on the disk image, block 0 included.
pub const NUM_BLOCKS: usize = 128;
/// Total size in bytes of a disk image.
pub const DISK_SIZE: usize = BLOCK_SIZE * NUM_BLOCKS;

const INODE_TABLE_OFFSET: usize = BITMAP_BYTES;

/// The in-memory superblock: the free-block bitmap plus the fixed 126-entry inode table.
#[derive(Clone)]
pub struct Superblock {
    pub bitmap: Bitmap,
    pub inodes: [Inode; NUM_INODES],
}

impl Superblock {
    /// A superblock with no files or directories and only block 0 marked used.
    pub fn empty() -> Self {
        let mut bitmap = Bitmap::zeroed();
        bitmap.mark(0);
        Self {
            bitmap,
            inodes: [Inode::FREE; NUM_INODES],
        }
    }

    pub fn from_bytes(bytes: &[u8; BLOCK_SIZE]) -> Self {
        let mut bitmap_bytes = [0u8; BITMAP_BYTES];
        bitmap_bytes.copy_from_slice(&bytes[0..BITMAP_BYTES]);
        let bitmap = Bitmap::from_bytes(bitmap_bytes);

        let mut inodes = [Inode::FREE; NUM_INODES];
        for (i, inode) in inodes.iter_mut().enumerate() {
            let off = INODE_TABLE_OFFSET + i * 8;
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[off..off + 8]);
            *inode = Inode::from_bytes(raw);
        }

        Self { bitmap, inodes }
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE] {
        let mut out = [0u8; BLOCK_SIZE];
        out[0..BITMAP_BYTES].copy_from_slice(&self.bitmap.to_bytes());
        for (i, inode) in self.inodes.iter().enumerate() {
            let off = INODE_TABLE_OFFSET + i * 8;
            out[off..off + 8].copy_from_slice(&inode.to_bytes());
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::inode::Dir;

    #[test]
    fn empty_superblock_roundtrips() {
        let sb = Superblock::empty();
        let bytes = sb.to_bytes();
        let back = Superblock::from_bytes(&bytes);
        assert_eq!(back.to_bytes(), bytes);
        assert!(back.bitmap.is_used(0));
        assert!(back.inodes.iter().all(Inode::is_free));
    }

    #[test]
    fn inode_table_occupies_expected_offset() {
        let mut sb = Superblock::empty();
        sb.inodes[0] = Inode::new_file(*b"a\0\0\0\0", 1, 1, Dir::Root);
        let bytes = sb.to_bytes();
        assert_eq!(&bytes[16..24], &sb.inodes[0].to_bytes());
    }

    #[test]
    fn total_layout_is_1024_bytes() {
        assert_eq!(BITMAP_BYTES + NUM_INODES * 8, BLOCK_SIZE);
    }
}
