//! Stable-order compaction: reassigns every file's start block so that files end up packed
//! from block 1 upward in ascending order of their *current* start block, leaving a single
//! maximal free suffix.

use crate::error::Result;
use crate::volume::{Outcome, Volume};

pub fn defrag(vol: &mut Volume) -> Result<Outcome> {
    let mut files: Vec<usize> = vol
        .sb
        .inodes
        .iter()
        .enumerate()
        .filter(|(_, i)| i.used() && !i.is_dir())
        .map(|(idx, _)| idx)
        .collect();
    files.sort_by_key(|&idx| vol.sb.inodes[idx].start_block);

    let mut watermark: u8 = 1;
    for idx in files {
        let inode = vol.sb.inodes[idx];
        let old_start = inode.start_block;
        let size = inode.size();
        let new_start = watermark;

        if new_start != old_start {
            // `new_start <= old_start` always holds here (compaction only moves files toward
            // block 1), so copying in ascending order never reads a block after it has been
            // overwritten by an earlier step.
            for i in 0..size {
                vol.disk
                    .copy_block((old_start + i) as usize, (new_start + i) as usize)?;
            }
            // Zero whatever part of the old run the new run doesn't cover -- the ranges may
            // overlap when the move distance is smaller than the file's size.
            let old_end = old_start as u16 + size as u16;
            let new_end = new_start as u16 + size as u16;
            let zero_from = old_start.max(new_end as u8);
            for b in zero_from as u16..old_end {
                vol.disk.zero_block(b as usize)?;
            }
            vol.sb.bitmap.clear_run(old_start, size);
            vol.sb.bitmap.mark_run(new_start, size);
            vol.sb.inodes[idx].start_block = new_start;
        }

        watermark += size;
    }

    vol.flush()?;
    Ok(Outcome::Defragged)
}
