//! The host-backed filesystem.

use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;
use vfs_core::translate::{self, Op, Operands, Platform};
use vfs_core::{
    Errno, FileMode, FileStatus, FileSystem, FsFile, OpenFlags, Times, VfsResult, expand_times,
    path, sanitize_open_flags,
};

use crate::handle::HostFile;
use crate::platform;
use crate::probe::HostProbe;
use crate::HostFsConfig;

/// A backend rooted at a host directory.
///
/// Backend paths are resolved lexically below the root: `..` never climbs
/// above it. Native failures are translated through the quirk table of the
/// configured platform.
#[derive(Clone, Debug)]
pub struct HostFs {
    root: PathBuf,
    platform: Platform,
}

impl HostFs {
    pub fn new(config: HostFsConfig) -> VfsResult<Self> {
        config.validate()?;
        Ok(Self {
            platform: config.platform(),
            root: config.root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub(crate) fn host_path(&self, path: &str) -> VfsResult<PathBuf> {
        path::validate(path)?;
        let mut host = self.root.clone();
        host.extend(path::normalize(path));
        Ok(host)
    }

    fn fail(&self, op: Op, err: io::Error, operands: Operands<'_>) -> Errno {
        let errno = translate::translate_io_error(
            op,
            self.platform,
            &err,
            &operands,
            &HostProbe { fs: self },
        );
        trace!(
            op = op.name(),
            path = operands.path,
            error = %err,
            errno = errno.name(),
            "host call failed"
        );
        errno
    }

    fn one<T>(&self, op: Op, path: &str, result: io::Result<T>) -> VfsResult<T> {
        result.map_err(|err| self.fail(op, err, Operands::one(path)))
    }

    fn two<T>(&self, op: Op, path: &str, other: &str, result: io::Result<T>) -> VfsResult<T> {
        result.map_err(|err| self.fail(op, err, Operands::two(path, other)))
    }
}

impl FileSystem for HostFs {
    fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode) -> VfsResult<Box<dyn FsFile>> {
        flags.validate()?;
        let host = self.host_path(path)?;
        let sanitized = sanitize_open_flags(flags, platform::NATIVE_OPEN_FLAGS);
        if sanitized.deferred.contains(OpenFlags::NOFOLLOW) {
            let link = std::fs::symlink_metadata(&host).ok().map(|m| platform::status(&m));
            sanitized.check_link(link.as_ref())?;
        }

        let file = self.one(Op::OpenFile, path, platform::open(&host, sanitized.native, perm))?;
        let status = self.one(Op::OpenFile, path, file.metadata()).map(|m| platform::status(&m))?;
        sanitized.check_opened(&status)?;
        if status.is_dir() && flags.has_write_intent() {
            return Err(Errno::IsDir);
        }
        Ok(Box::new(HostFile::new(file, flags, status.is_dir())))
    }

    fn lstat(&self, path: &str) -> VfsResult<FileStatus> {
        let host = self.host_path(path)?;
        let meta = self.one(Op::Lstat, path, std::fs::symlink_metadata(host))?;
        Ok(platform::status(&meta))
    }

    fn stat(&self, path: &str) -> VfsResult<FileStatus> {
        let host = self.host_path(path)?;
        let meta = self.one(Op::Stat, path, std::fs::metadata(host))?;
        Ok(platform::status(&meta))
    }

    fn mkdir(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        let host = self.host_path(path)?;
        self.one(Op::Mkdir, path, platform::mkdir(&host, perm))
    }

    fn chmod(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        let host = self.host_path(path)?;
        self.one(Op::Chmod, path, platform::chmod(&host, perm))
    }

    fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
        let source = self.host_path(from)?;
        let target = self.host_path(to)?;
        if path::is_root(from) || path::is_root(to) {
            return Err(Errno::Inval);
        }
        self.two(Op::Rename, from, to, std::fs::rename(source, target))
    }

    fn rmdir(&self, path: &str) -> VfsResult<()> {
        let host = self.host_path(path)?;
        // The root is the backend itself and is never removed.
        if path::is_root(path) {
            return Err(Errno::Inval);
        }
        self.one(Op::Rmdir, path, std::fs::remove_dir(host))
    }

    fn unlink(&self, path: &str) -> VfsResult<()> {
        let host = self.host_path(path)?;
        self.one(Op::Unlink, path, platform::unlink(&host))
    }

    fn link(&self, old: &str, new: &str) -> VfsResult<()> {
        let source = self.host_path(old)?;
        let target = self.host_path(new)?;
        self.two(Op::Link, old, new, std::fs::hard_link(source, target))
    }

    fn symlink(&self, target: &str, link: &str) -> VfsResult<()> {
        if target.is_empty() || target.contains('\0') {
            return Err(Errno::Perm);
        }
        let host = self.host_path(link)?;
        self.two(Op::Symlink, target, link, platform::symlink(target, &host))
    }

    fn readlink(&self, path: &str) -> VfsResult<String> {
        let host = self.host_path(path)?;
        let target = self.one(Op::Readlink, path, std::fs::read_link(host))?;
        Ok(path::to_slash(&target.to_string_lossy(), self.platform))
    }

    fn utimens(&self, path: &str, times: Times, follow: bool) -> VfsResult<()> {
        let host = self.host_path(path)?;
        self.one(
            Op::Utimens,
            path,
            platform::set_times(&host, expand_times(times), follow),
        )
    }
}
