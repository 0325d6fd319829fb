use tracing::trace;

use crate::{Errno, FileMode, FileStatus, FileSystem, FsFile, OpenFlags, Times, VfsResult};

/// A backend that implements nothing: every operation fails with `NoSys` and
/// has no side effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnimplementedFs;

fn nosys<T>(op: &'static str) -> VfsResult<T> {
    trace!(op, "operation not implemented");
    Err(Errno::NoSys)
}

impl FileSystem for UnimplementedFs {
    fn open_file(&self, _path: &str, _flags: OpenFlags, _perm: FileMode) -> VfsResult<Box<dyn FsFile>> {
        nosys("open_file")
    }

    fn lstat(&self, _path: &str) -> VfsResult<FileStatus> {
        nosys("lstat")
    }

    fn stat(&self, _path: &str) -> VfsResult<FileStatus> {
        nosys("stat")
    }

    fn mkdir(&self, _path: &str, _perm: FileMode) -> VfsResult<()> {
        nosys("mkdir")
    }

    fn chmod(&self, _path: &str, _perm: FileMode) -> VfsResult<()> {
        nosys("chmod")
    }

    fn rename(&self, _from: &str, _to: &str) -> VfsResult<()> {
        nosys("rename")
    }

    fn rmdir(&self, _path: &str) -> VfsResult<()> {
        nosys("rmdir")
    }

    fn unlink(&self, _path: &str) -> VfsResult<()> {
        nosys("unlink")
    }

    fn link(&self, _old: &str, _new: &str) -> VfsResult<()> {
        nosys("link")
    }

    fn symlink(&self, _target: &str, _link: &str) -> VfsResult<()> {
        nosys("symlink")
    }

    fn readlink(&self, _path: &str) -> VfsResult<String> {
        nosys("readlink")
    }

    fn utimens(&self, _path: &str, _times: Times, _follow: bool) -> VfsResult<()> {
        nosys("utimens")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Overrides nothing; relies on the provided trait bodies.
    #[derive(Debug)]
    struct Bare;

    impl FileSystem for Bare {}

    #[test]
    fn provided_methods_report_nosys() {
        let fs = Bare;
        assert_eq!(fs.lstat("a").err(), Some(Errno::NoSys));
        assert_eq!(fs.mkdir("a", FileMode(0o755)), Err(Errno::NoSys));
        assert_eq!(fs.utimens("a", None, true), Err(Errno::NoSys));
        assert_eq!(
            fs.open_file("a", OpenFlags::READ, FileMode(0)).err(),
            Some(Errno::NoSys)
        );
    }
}
