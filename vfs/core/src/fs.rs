use std::fmt::Debug;
use std::sync::Arc;

use crate::{FileMode, FileStatus, OpenFlags, Times, UnimplementedFs, VfsResult};

/// The filesystem contract.
///
/// Every operation either succeeds or fails with exactly one [`crate::Errno`];
/// no operation panics on any input. Paths are relative to the backend root
/// and use `/` as separator (see [`crate::path`]).
///
/// All methods have a provided body that reports `NoSys` through
/// [`UnimplementedFs`], so a backend only overrides what it supports and
/// callers can probe capabilities by looking for `NoSys`.
pub trait FileSystem: Debug + Send + Sync {
    /// Opens `path`, creating it with `perm` when `CREATE` is set and the
    /// entry is absent.
    ///
    /// Fails with `NoEnt` when absent without `CREATE`, `Exist` for
    /// `CREATE|EXCL` on an existing entry, `IsDir` when a directory is opened
    /// with write intent, `NotDir` when `DIRECTORY` is set and the entry is
    /// not a directory, `Loop` when `NOFOLLOW` is set and the entry is a
    /// symbolic link, and `Inval` for malformed paths or flag combinations.
    fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode) -> VfsResult<Box<dyn FsFile>> {
        UnimplementedFs.open_file(path, flags, perm)
    }

    /// Status of the entry itself; a symbolic link is not followed.
    fn lstat(&self, path: &str) -> VfsResult<FileStatus> {
        UnimplementedFs.lstat(path)
    }

    /// Status of the entry, following a terminal symbolic link.
    fn stat(&self, path: &str) -> VfsResult<FileStatus> {
        UnimplementedFs.stat(path)
    }

    /// Creates a directory. `Exist` if `path` is a directory already,
    /// `NotDir` if it is anything else.
    fn mkdir(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        UnimplementedFs.mkdir(path, perm)
    }

    fn chmod(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        UnimplementedFs.chmod(path, perm)
    }

    /// Renames `from` to `to`, replacing `to` when the kinds allow it.
    ///
    /// A file onto a directory is `IsDir`, a directory onto a non-directory
    /// is `NotDir`, and a directory onto a non-empty directory is `NotEmpty`.
    /// A failed rename leaves both entries as they were.
    fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
        UnimplementedFs.rename(from, to)
    }

    fn rmdir(&self, path: &str) -> VfsResult<()> {
        UnimplementedFs.rmdir(path)
    }

    /// Removes a non-directory entry. A symbolic link is removed, not its
    /// target.
    fn unlink(&self, path: &str) -> VfsResult<()> {
        UnimplementedFs.unlink(path)
    }

    /// Creates a hard link `new` to the existing non-directory `old`.
    fn link(&self, old: &str, new: &str) -> VfsResult<()> {
        UnimplementedFs.link(old, new)
    }

    /// Creates a symbolic link at `link` pointing to `target`. The target is
    /// stored as given and need not exist.
    fn symlink(&self, target: &str, link: &str) -> VfsResult<()> {
        UnimplementedFs.symlink(target, link)
    }

    /// Target of the symbolic link at `path`, with `/` separators. `Inval`
    /// when `path` is not a symbolic link.
    fn readlink(&self, path: &str) -> VfsResult<String> {
        UnimplementedFs.readlink(path)
    }

    /// Sets access and modification times. `None` sets both to now.
    fn utimens(&self, path: &str, times: Times, follow: bool) -> VfsResult<()> {
        UnimplementedFs.utimens(path, times, follow)
    }
}

/// An open file or directory.
///
/// The capability is owned by whoever opened it. `close` releases it
/// explicitly; dropping it releases it too.
pub trait FsFile: Debug + Send + Sync {
    fn stat(&self) -> VfsResult<FileStatus>;

    /// Releases the handle. A second call fails with `Badf`.
    fn close(&mut self) -> VfsResult<()>;

    /// Reads at `offset` without moving any cursor. `Badf` when the handle is
    /// closed or not readable.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> VfsResult<usize> {
        let _ = (buf, offset);
        Err(crate::Errno::NoSys)
    }

    /// Writes at `offset`, or at the end for append handles. `Badf` when the
    /// handle is closed, read-only or a directory.
    fn write_at(&self, buf: &[u8], offset: u64) -> VfsResult<usize> {
        let _ = (buf, offset);
        Err(crate::Errno::NoSys)
    }
}

impl<T: FileSystem + ?Sized> FileSystem for Arc<T> {
    fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode) -> VfsResult<Box<dyn FsFile>> {
        (**self).open_file(path, flags, perm)
    }

    fn lstat(&self, path: &str) -> VfsResult<FileStatus> {
        (**self).lstat(path)
    }

    fn stat(&self, path: &str) -> VfsResult<FileStatus> {
        (**self).stat(path)
    }

    fn mkdir(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        (**self).mkdir(path, perm)
    }

    fn chmod(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        (**self).chmod(path, perm)
    }

    fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
        (**self).rename(from, to)
    }

    fn rmdir(&self, path: &str) -> VfsResult<()> {
        (**self).rmdir(path)
    }

    fn unlink(&self, path: &str) -> VfsResult<()> {
        (**self).unlink(path)
    }

    fn link(&self, old: &str, new: &str) -> VfsResult<()> {
        (**self).link(old, new)
    }

    fn symlink(&self, target: &str, link: &str) -> VfsResult<()> {
        (**self).symlink(target, link)
    }

    fn readlink(&self, path: &str) -> VfsResult<String> {
        (**self).readlink(path)
    }

    fn utimens(&self, path: &str, times: Times, follow: bool) -> VfsResult<()> {
        (**self).utimens(path, times, follow)
    }
}
