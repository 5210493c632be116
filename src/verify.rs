//! The six numbered mount-time consistency checks, run in fixed order. The first failure is
//! reported; a single image with multiple defects always reports the lowest-numbered one.

use crate::codec::Superblock;
use crate::inode::{Dir, Inode, NUM_INODES};

/// Runs every check in order. Returns the failing check's number on the first defect found.
pub fn verify(sb: &Superblock) -> Result<(), u8> {
    check_free_inodes_zero(sb)?;
    check_file_extents(sb)?;
    check_directory_shape(sb)?;
    check_parent_validity(sb)?;
    check_name_uniqueness(sb)?;
    check_bitmap_agreement(sb)?;
    Ok(())
}

/// Check 1: every inode with the in-use flag clear is all-zero.
fn check_free_inodes_zero(sb: &Superblock) -> Result<(), u8> {
    for inode in &sb.inodes {
        if !inode.used() && !inode.is_free() {
            return Err(1);
        }
    }
    Ok(())
}

/// Check 2: every in-use file inode has a valid extent.
fn check_file_extents(sb: &Superblock) -> Result<(), u8> {
    for inode in &sb.inodes {
        if inode.used() && !inode.is_dir() {
            let start = inode.start_block;
            let size = inode.size();
            if start < 1 || start > 127 {
                return Err(2);
            }
            let last = start as u16 + size as u16 - 1;
            if last < 1 || last > 127 {
                return Err(2);
            }
        }
    }
    Ok(())
}

/// Check 3: every in-use directory inode has `start_block = 0` and `size = 0`.
fn check_directory_shape(sb: &Superblock) -> Result<(), u8> {
    for inode in &sb.inodes {
        if inode.used() && inode.is_dir() && (inode.start_block != 0 || inode.size() != 0) {
            return Err(3);
        }
    }
    Ok(())
}

/// Check 4: every in-use inode's parent is either the root sentinel or an in-use directory.
fn check_parent_validity(sb: &Superblock) -> Result<(), u8> {
    for inode in &sb.inodes {
        if !inode.used() {
            continue;
        }
        match inode.parent() {
            None => return Err(4),
            Some(Dir::Root) => {}
            Some(Dir::Inode(i)) => {
                let parent = &sb.inodes[i as usize];
                if !parent.used() || !parent.is_dir() {
                    return Err(4);
                }
            }
        }
    }
    Ok(())
}

/// Check 5: siblings (same parent) have pairwise distinct 5-byte names.
fn check_name_uniqueness(sb: &Superblock) -> Result<(), u8> {
    for i in 0..NUM_INODES {
        let a = &sb.inodes[i];
        if !a.used() {
            continue;
        }
        for b in &sb.inodes[i + 1..] {
            if b.used() && a.parent_raw() == b.parent_raw() && a.name == b.name {
                return Err(5);
            }
        }
    }
    Ok(())
}

/// Check 6: the stored bitmap matches the bitmap implied by the in-use file inodes exactly,
/// and no block is claimed by more than one file.
fn check_bitmap_agreement(sb: &Superblock) -> Result<(), u8> {
    let mut expected = crate::bitmap::Bitmap::zeroed();
    expected.mark(0);
    for inode in &sb.inodes {
        if !inode.used() || inode.is_dir() {
            continue;
        }
        for b in inode.start_block..inode.start_block.saturating_add(inode.size()) {
            if expected.is_used(b as usize) {
                return Err(6);
            }
            expected.mark(b as usize);
        }
    }
    if expected.to_bytes() != sb.bitmap.to_bytes() {
        return Err(6);
    }
    Ok(())
}
