use std::fs::File;
use std::io::Write;

use tracing::trace;
use vfs_core::{Errno, FileStatus, FsFile, OpenFlags, VfsResult};

use crate::platform;

/// An open host file or directory.
#[derive(Debug)]
pub struct HostFile {
    file: Option<File>,
    readable: bool,
    writable: bool,
    append: bool,
    is_dir: bool,
}

impl HostFile {
    pub(crate) fn new(file: File, flags: OpenFlags, is_dir: bool) -> Self {
        Self {
            file: Some(file),
            readable: flags.is_readable(),
            writable: flags.is_writable(),
            append: flags.contains(OpenFlags::APPEND),
            is_dir,
        }
    }

    fn file(&self) -> VfsResult<&File> {
        self.file.as_ref().ok_or(Errno::Badf)
    }
}

impl FsFile for HostFile {
    fn stat(&self) -> VfsResult<FileStatus> {
        let meta = self.file()?.metadata()?;
        Ok(platform::status(&meta))
    }

    fn close(&mut self) -> VfsResult<()> {
        let file = self.file.take().ok_or(Errno::Badf)?;
        trace!("closing host file");
        drop(file);
        Ok(())
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> VfsResult<usize> {
        let file = self.file()?;
        if !self.readable {
            return Err(Errno::Badf);
        }
        if self.is_dir {
            return Err(Errno::IsDir);
        }
        Ok(platform::read_at(file, buf, offset)?)
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> VfsResult<usize> {
        let mut file = self.file()?;
        if !self.writable || self.is_dir {
            return Err(Errno::Badf);
        }
        if self.append {
            return Ok(file.write(buf)?);
        }
        Ok(platform::write_at(file, buf, offset)?)
    }
}
