//! Low-level fixed-size block I/O against the backing image file.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;

use crate::codec::BLOCK_SIZE;

/// An open handle to a 128 * 1024 byte disk image, addressed in whole blocks.
pub struct Disk {
    file: File,
}

impl Disk {
    /// Opens the image at `path` for random-access reads and writes.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self { file })
    }

    /// Reads block `b` (0-indexed) into a fresh buffer.
    pub fn read_block(&mut self, b: usize) -> io::Result<[u8; BLOCK_SIZE]> {
        let mut buf = [0u8; BLOCK_SIZE];
        self.file.seek(SeekFrom::Start((b * BLOCK_SIZE) as u64))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Writes `data` to block `b` (0-indexed).
    pub fn write_block(&mut self, b: usize, data: &[u8; BLOCK_SIZE]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start((b * BLOCK_SIZE) as u64))?;
        self.file.write_all(data)?;
        Ok(())
    }

    /// Writes all-zero bytes to block `b`.
    pub fn zero_block(&mut self, b: usize) -> io::Result<()> {
        self.write_block(b, &[0u8; BLOCK_SIZE])
    }

    /// Copies the contents of block `from` to block `to`.
    pub fn copy_block(&mut self, from: usize, to: usize) -> io::Result<()> {
        let data = self.read_block(from)?;
        self.write_block(to, &data)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as _;

    fn scratch_image() -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "blockfs-disk-test-{:?}",
            std::thread::current().id()
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&[0u8; crate::codec::DISK_SIZE]).unwrap();
        path
    }

    #[test]
    fn write_then_read_roundtrips() {
        let path = scratch_image();
        let mut disk = Disk::open(&path).unwrap();
        let mut data = [0u8; BLOCK_SIZE];
        data[0] = 0xAB;
        data[1023] = 0xCD;
        disk.write_block(3, &data).unwrap();
        let back = disk.read_block(3).unwrap();
        assert_eq!(back, data);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn copy_block_duplicates_contents() {
        let path = scratch_image();
        let mut disk = Disk::open(&path).unwrap();
        let mut data = [0u8; BLOCK_SIZE];
        data[5] = 42;
        disk.write_block(1, &data).unwrap();
        disk.copy_block(1, 2).unwrap();
        assert_eq!(disk.read_block(2).unwrap(), data);
        std::fs::remove_file(&path).ok();
    }
}
