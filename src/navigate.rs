//! `cd` and `ls`: resolving `.`/`..`/named children and listing the current directory.

use crate::error::{Error, Result};
use crate::inode::{self, Dir, Name};
use crate::volume::{EntryKind, LsEntry, Outcome, Volume};

const DOT: Name = *b".\0\0\0\0";
const DOTDOT: Name = *b"..\0\0\0";

pub fn cd(vol: &mut Volume, name: Name) -> Result<Outcome> {
    if name == DOT {
        return Ok(Outcome::ChangedDir { name });
    }
    if name == DOTDOT {
        vol.cwd = match vol.cwd {
            Dir::Root => Dir::Root,
            Dir::Inode(i) => vol.sb.inodes[i as usize]
                .parent()
                .unwrap_or(Dir::Root),
        };
        return Ok(Outcome::ChangedDir { name });
    }

    let idx = inode::children_of(&vol.sb.inodes, vol.cwd)
        .find(|&i| vol.sb.inodes[i].is_dir() && vol.sb.inodes[i].name == name)
        .ok_or(Error::NotFound { name })?;
    vol.cwd = Dir::Inode(idx as u8);
    Ok(Outcome::ChangedDir { name })
}

/// Returns the parent of `dir`, treating the root's parent as itself.
fn parent_of(vol: &Volume, dir: Dir) -> Dir {
    match dir {
        Dir::Root => Dir::Root,
        Dir::Inode(i) => vol.sb.inodes[i as usize].parent().unwrap_or(Dir::Root),
    }
}

pub fn ls(vol: &Volume) -> Vec<LsEntry> {
    let mut out = Vec::new();

    let self_count = inode::child_count(&vol.sb.inodes, vol.cwd) as u32 + 2;
    out.push(LsEntry {
        name: DOT,
        kind: EntryKind::Dir(self_count),
    });

    let parent = parent_of(vol, vol.cwd);
    let parent_count = inode::child_count(&vol.sb.inodes, parent) as u32 + 2;
    out.push(LsEntry {
        name: DOTDOT,
        kind: EntryKind::Dir(parent_count),
    });

    for idx in inode::children_of(&vol.sb.inodes, vol.cwd) {
        let inode = &vol.sb.inodes[idx];
        let kind = if inode.is_dir() {
            EntryKind::Dir(inode::child_count(&vol.sb.inodes, Dir::Inode(idx as u8)) as u32 + 2)
        } else {
            EntryKind::File(inode.size())
        };
        out.push(LsEntry {
            name: inode.name,
            kind,
        });
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::volume::test::mount_blank;

    #[test]
    fn dot_is_noop() {
        let (mut vol, path) = mount_blank();
        vol.create(*b"d\0\0\0\0", 0).unwrap();
        vol.cd(*b"d\0\0\0\0").unwrap();
        vol.cd(DOT).unwrap();
        assert_eq!(vol.cwd, Dir::Inode(0));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn cd_into_and_back_out() {
        let (mut vol, path) = mount_blank();
        vol.create(*b"d\0\0\0\0", 0).unwrap();
        vol.cd(*b"d\0\0\0\0").unwrap();
        assert_eq!(vol.cwd, Dir::Inode(0));
        vol.cd(DOTDOT).unwrap();
        assert_eq!(vol.cwd, Dir::Root);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn dotdot_at_root_stays_at_root() {
        let (mut vol, path) = mount_blank();
        vol.cd(DOTDOT).unwrap();
        assert_eq!(vol.cwd, Dir::Root);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn cd_rejects_missing_directory() {
        let (mut vol, path) = mount_blank();
        let err = vol.cd(*b"z\0\0\0\0").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn ls_reports_dot_and_dotdot_counts() {
        let (mut vol, path) = mount_blank();
        vol.create(*b"a\0\0\0\0", 3).unwrap();
        let entries = vol.ls();
        assert_eq!(entries[0], LsEntry { name: DOT, kind: EntryKind::Dir(3) });
        assert_eq!(entries[1], LsEntry { name: DOTDOT, kind: EntryKind::Dir(3) });
        assert_eq!(
            entries[2],
            LsEntry { name: *b"a\0\0\0\0", kind: EntryKind::File(3) }
        );
        std::fs::remove_file(&path).ok();
    }
}
