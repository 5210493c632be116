//! create / delete / read / write / buff / resize: the operations that touch files and their
//! backing blocks.

use crate::alloc;
use crate::codec::BLOCK_SIZE;
use crate::error::{Error, Result};
use crate::inode::{self, Dir, Inode, Name, NUM_INODES};
use crate::volume::{Outcome, Volume};

pub fn create(vol: &mut Volume, name: Name, size: i64) -> Result<Outcome> {
    if !(0..=127).contains(&size) {
        return Err(Error::SizeOutOfRange { size });
    }
    let size = size as u8;

    let slot = inode::find_free_slot(&vol.sb.inodes).ok_or(Error::NoFreeInode)?;
    if inode::find_child(&vol.sb.inodes, vol.cwd, name).is_some() {
        return Err(Error::NameCollision { name });
    }

    let start_block = if size > 0 {
        alloc::allocate(&mut vol.sb.bitmap, size)?
    } else {
        0
    };

    vol.sb.inodes[slot] = if size == 0 {
        Inode::new_dir(name, vol.cwd)
    } else {
        Inode::new_file(name, size, start_block, vol.cwd)
    };
    vol.flush()?;
    Ok(Outcome::Created { name, size })
}

/// Collects the index of `root` plus every strict descendant, via a traversal over the
/// parent-index relation. Snapshotting the whole set up front lets the caller free inodes
/// without mutating the table mid-iteration.
fn collect_subtree(inodes: &[Inode; NUM_INODES], root: usize) -> Vec<usize> {
    let mut stack = vec![root];
    let mut out = Vec::new();
    while let Some(idx) = stack.pop() {
        out.push(idx);
        stack.extend(inode::children_of(inodes, Dir::Inode(idx as u8)));
    }
    out
}

pub fn delete(vol: &mut Volume, name: Name) -> Result<Outcome> {
    let idx = inode::find_child(&vol.sb.inodes, vol.cwd, name).ok_or(Error::NotFound { name })?;

    let victims = if vol.sb.inodes[idx].is_dir() {
        collect_subtree(&vol.sb.inodes, idx)
    } else {
        vec![idx]
    };

    for victim in victims {
        let inode = vol.sb.inodes[victim];
        if inode.used() && !inode.is_dir() {
            alloc::free(&mut vol.sb.bitmap, &mut vol.disk, inode.start_block, inode.size())?;
        }
        vol.sb.inodes[victim] = Inode::FREE;
    }

    vol.flush()?;
    Ok(Outcome::Deleted { name })
}

fn find_file(vol: &Volume, name: Name) -> Result<(usize, Inode)> {
    let idx = inode::find_child(&vol.sb.inodes, vol.cwd, name).ok_or(Error::NotFound { name })?;
    let inode = vol.sb.inodes[idx];
    if inode.is_dir() {
        return Err(Error::NotFound { name });
    }
    Ok((idx, inode))
}

pub fn read(vol: &mut Volume, name: Name, block: i64) -> Result<Outcome> {
    let (_, inode) = find_file(vol, name)?;
    if block < 0 || block as u32 >= inode.size() as u32 {
        return Err(Error::BlockOutOfRange { name, block });
    }
    let abs = inode.start_block as usize + block as usize;
    vol.buffer = vol.disk.read_block(abs)?;
    Ok(Outcome::BlockRead {
        name,
        block: block as u8,
    })
}

pub fn write(vol: &mut Volume, name: Name, block: i64) -> Result<Outcome> {
    let (_, inode) = find_file(vol, name)?;
    if block < 0 || block as u32 >= inode.size() as u32 {
        return Err(Error::BlockOutOfRange { name, block });
    }
    let abs = inode.start_block as usize + block as usize;
    let data = vol.buffer;
    vol.disk.write_block(abs, &data)?;
    Ok(Outcome::BlockWritten {
        name,
        block: block as u8,
    })
}

pub fn buff(vol: &mut Volume, data: &[u8]) -> Result<Outcome> {
    let mut buffer = [0u8; BLOCK_SIZE];
    let n = data.len().min(BLOCK_SIZE);
    buffer[..n].copy_from_slice(&data[..n]);
    vol.buffer = buffer;
    Ok(Outcome::BufferLoaded)
}

pub fn resize(vol: &mut Volume, name: Name, new_size: i64) -> Result<Outcome> {
    if !(0..=127).contains(&new_size) {
        return Err(Error::SizeOutOfRange { size: new_size });
    }
    let new_size = new_size as u8;

    let (idx, inode) = find_file(vol, name)?;
    let cur = inode.size();
    let start = inode.start_block;

    if new_size == cur {
        return Ok(Outcome::ResizeNoop { name, size: cur });
    }

    if new_size > cur {
        grow(vol, idx, name, start, cur, new_size)?;
    } else {
        shrink(vol, idx, start, cur, new_size)?;
    }

    vol.flush()?;
    Ok(Outcome::Resized { name, size: new_size })
}

fn grow(
    vol: &mut Volume,
    idx: usize,
    name: Name,
    start: u8,
    cur: u8,
    new_size: u8,
) -> Result<()> {
    let extra = new_size - cur;
    let extension_start = start as u16 + cur as u16;
    let fits_in_place = extension_start + extra as u16 <= 128
        && (extension_start..extension_start + extra as u16)
            .all(|b| !vol.sb.bitmap.is_used(b as usize));

    if fits_in_place {
        vol.sb.bitmap.mark_run(extension_start as u8, extra);
        vol.sb.inodes[idx].set_size(new_size);
    } else {
        // The new run must fit `new_size`, not just `cur`: the relocated file is bigger than
        // the one being moved, so reuse the first-fit search but hand off the actual data
        // move to `alloc::relocate`, then grow the freshly moved file in place.
        let new_start = vol
            .sb
            .bitmap
            .find_run(new_size)
            .ok_or(Error::CannotExpand { name })?;
        alloc::relocate(&mut vol.sb.bitmap, &mut vol.disk, start, new_start, cur)?;
        vol.sb.bitmap.mark_run(new_start + cur, extra);
        vol.sb.inodes[idx].start_block = new_start;
        vol.sb.inodes[idx].set_size(new_size);
    }
    Ok(())
}

fn shrink(vol: &mut Volume, idx: usize, start: u8, cur: u8, new_size: u8) -> Result<()> {
    let freed_start = start + new_size;
    let freed_len = cur - new_size;
    for b in freed_start..freed_start + freed_len {
        vol.disk.zero_block(b as usize)?;
    }
    vol.sb.bitmap.clear_run(freed_start, freed_len);
    vol.sb.inodes[idx].set_size(new_size);
    Ok(())
}
