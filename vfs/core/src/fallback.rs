use tracing::trace;

use crate::{Errno, FileMode, FileStatus, FileSystem, FsFile, OpenFlags, Times, VfsResult};

/// Tries `primary` first and falls back to `secondary` only when the primary
/// reports `NoSys`. Any other outcome of the primary is final.
#[derive(Debug, Clone)]
pub struct FallbackFs<P, S> {
    primary: P,
    secondary: S,
}

impl<P: FileSystem, S: FileSystem> FallbackFs<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    fn call<T>(
        &self,
        op: &'static str,
        f: impl Fn(&dyn FileSystem) -> VfsResult<T>,
    ) -> VfsResult<T> {
        match f(&self.primary) {
            Err(Errno::NoSys) => {
                trace!(op, "primary backend lacks operation, using secondary");
                f(&self.secondary)
            }
            other => other,
        }
    }
}

impl<P: FileSystem, S: FileSystem> FileSystem for FallbackFs<P, S> {
    fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode) -> VfsResult<Box<dyn FsFile>> {
        self.call("open_file", |fs| fs.open_file(path, flags, perm))
    }

    fn lstat(&self, path: &str) -> VfsResult<FileStatus> {
        self.call("lstat", |fs| fs.lstat(path))
    }

    fn stat(&self, path: &str) -> VfsResult<FileStatus> {
        self.call("stat", |fs| fs.stat(path))
    }

    fn mkdir(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        self.call("mkdir", |fs| fs.mkdir(path, perm))
    }

    fn chmod(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        self.call("chmod", |fs| fs.chmod(path, perm))
    }

    fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
        self.call("rename", |fs| fs.rename(from, to))
    }

    fn rmdir(&self, path: &str) -> VfsResult<()> {
        self.call("rmdir", |fs| fs.rmdir(path))
    }

    fn unlink(&self, path: &str) -> VfsResult<()> {
        self.call("unlink", |fs| fs.unlink(path))
    }

    fn link(&self, old: &str, new: &str) -> VfsResult<()> {
        self.call("link", |fs| fs.link(old, new))
    }

    fn symlink(&self, target: &str, link: &str) -> VfsResult<()> {
        self.call("symlink", |fs| fs.symlink(target, link))
    }

    fn readlink(&self, path: &str) -> VfsResult<String> {
        self.call("readlink", |fs| fs.readlink(path))
    }

    fn utimens(&self, path: &str, times: Times, follow: bool) -> VfsResult<()> {
        self.call("utimens", |fs| fs.utimens(path, times, follow))
    }
}
