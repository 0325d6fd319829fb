use tracing::trace;

use crate::{Errno, FileMode, FileStatus, FileSystem, FsFile, OpenFlags, Times, VfsResult};

/// A read-only view of another backend.
///
/// Queries and read-only opens pass through. Mutations fail with `Rofs`
/// before reaching the inner backend.
#[derive(Debug, Clone)]
pub struct ReadOnlyFs<F> {
    inner: F,
}

impl<F: FileSystem> ReadOnlyFs<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

fn rofs<T>(op: &'static str, path: &str) -> VfsResult<T> {
    trace!(op, path, "rejected on read-only view");
    Err(Errno::Rofs)
}

impl<F: FileSystem> FileSystem for ReadOnlyFs<F> {
    fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode) -> VfsResult<Box<dyn FsFile>> {
        if flags.is_mutating() {
            return rofs("open_file", path);
        }
        self.inner.open_file(path, flags, perm)
    }

    fn lstat(&self, path: &str) -> VfsResult<FileStatus> {
        self.inner.lstat(path)
    }

    fn stat(&self, path: &str) -> VfsResult<FileStatus> {
        self.inner.stat(path)
    }

    fn mkdir(&self, path: &str, _perm: FileMode) -> VfsResult<()> {
        rofs("mkdir", path)
    }

    fn chmod(&self, path: &str, _perm: FileMode) -> VfsResult<()> {
        rofs("chmod", path)
    }

    fn rename(&self, from: &str, _to: &str) -> VfsResult<()> {
        rofs("rename", from)
    }

    fn rmdir(&self, path: &str) -> VfsResult<()> {
        rofs("rmdir", path)
    }

    fn unlink(&self, path: &str) -> VfsResult<()> {
        rofs("unlink", path)
    }

    fn link(&self, old: &str, _new: &str) -> VfsResult<()> {
        rofs("link", old)
    }

    fn symlink(&self, _target: &str, link: &str) -> VfsResult<()> {
        rofs("symlink", link)
    }

    fn readlink(&self, path: &str) -> VfsResult<String> {
        self.inner.readlink(path)
    }

    fn utimens(&self, path: &str, _times: Times, _follow: bool) -> VfsResult<()> {
        rofs("utimens", path)
    }
}
