//! The top-level mount state machine: `Unmounted` or `Mounted(Volume)`. Every operation other
//! than `mount` requires `Mounted`; invoked while `Unmounted` they fail cleanly and leave no
//! trace. There is no explicit unmount -- a second `mount` simply replaces the active volume,
//! dropping (and so closing) the previous one.

use std::path::Path;

use crate::error::{Error, Result};
use crate::inode::Name;
use crate::volume::{LsEntry, Outcome, Volume};

/// Owns at most one mounted volume at a time.
#[derive(Default)]
pub struct FileSystem {
    volume: Option<Volume>,
}

impl FileSystem {
    pub fn new() -> Self {
        Self { volume: None }
    }

    /// Attempts to mount the image at `path`. On any failure -- the file can't be opened, or
    /// any of the six consistency checks fails -- the previously mounted volume, if any, is
    /// left untouched.
    pub fn mount(&mut self, path: impl AsRef<Path>) -> Result<Outcome> {
        let volume = Volume::mount(path.as_ref())?;
        let outcome = Outcome::Mounted {
            path: path.as_ref().to_path_buf(),
        };
        self.volume = Some(volume);
        Ok(outcome)
    }

    fn volume_mut(&mut self) -> Result<&mut Volume> {
        self.volume.as_mut().ok_or(Error::NotMounted)
    }

    pub fn create(&mut self, name: Name, size: i64) -> Result<Outcome> {
        self.volume_mut()?.create(name, size)
    }

    pub fn delete(&mut self, name: Name) -> Result<Outcome> {
        self.volume_mut()?.delete(name)
    }

    pub fn read(&mut self, name: Name, block: i64) -> Result<Outcome> {
        self.volume_mut()?.read(name, block)
    }

    pub fn write(&mut self, name: Name, block: i64) -> Result<Outcome> {
        self.volume_mut()?.write(name, block)
    }

    pub fn buff(&mut self, data: &[u8]) -> Result<Outcome> {
        self.volume_mut()?.buff(data)
    }

    pub fn resize(&mut self, name: Name, new_size: i64) -> Result<Outcome> {
        self.volume_mut()?.resize(name, new_size)
    }

    pub fn defrag(&mut self) -> Result<Outcome> {
        self.volume_mut()?.defrag()
    }

    pub fn cd(&mut self, name: Name) -> Result<Outcome> {
        self.volume_mut()?.cd(name)
    }

    pub fn ls(&self) -> Result<Vec<LsEntry>> {
        Ok(self.volume.as_ref().ok_or(Error::NotMounted)?.ls())
    }

    /// The shared 1024-byte I/O buffer, if a volume is mounted.
    pub fn buffer(&self) -> Option<&[u8; crate::codec::BLOCK_SIZE]> {
        self.volume.as_ref().map(Volume::buffer)
    }

    pub fn is_mounted(&self) -> bool {
        self.volume.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn scratch_image() -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "blockfs-fs-test-{:?}-{}",
            std::thread::current().id(),
            std::process::id()
        ));
        let sb = crate::codec::Superblock::empty();
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&sb.to_bytes()).unwrap();
        f.write_all(&[0u8; crate::codec::DISK_SIZE - crate::codec::BLOCK_SIZE])
            .unwrap();
        path
    }

    #[test]
    fn operations_fail_before_mount() {
        let mut fs = FileSystem::new();
        assert!(matches!(
            fs.create(*b"a\0\0\0\0", 1),
            Err(Error::NotMounted)
        ));
        assert!(matches!(fs.ls(), Err(Error::NotMounted)));
    }

    #[test]
    fn mount_then_operate_succeeds() {
        let path = scratch_image();
        let mut fs = FileSystem::new();
        fs.mount(&path).unwrap();
        assert!(fs.is_mounted());
        fs.create(*b"a\0\0\0\0", 1).unwrap();
        assert_eq!(fs.ls().unwrap().len(), 3);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn failed_remount_preserves_previous_volume() {
        let path = scratch_image();
        let mut fs = FileSystem::new();
        fs.mount(&path).unwrap();
        fs.create(*b"a\0\0\0\0", 1).unwrap();

        let err = fs.mount(Path::new("/nonexistent/blockfs-missing.img"));
        assert!(err.is_err());
        // The original volume (with "a" created) must still be mounted and usable.
        assert!(fs.is_mounted());
        assert_eq!(fs.ls().unwrap().len(), 3);
        std::fs::remove_file(&path).ok();
    }
}
