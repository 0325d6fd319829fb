use std::ffi::CString;
use std::fs::{DirBuilder, File, Metadata, OpenOptions, Permissions};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{DirBuilderExt, FileExt, MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

use vfs_core::{FileMode, FileStatus, OpenFlags, SetTime, Timespec};

use super::kind_of;

/// Every flag maps onto an `open(2)` flag, the placeholders included.
pub(crate) const NATIVE_OPEN_FLAGS: OpenFlags = OpenFlags::all();

pub(crate) fn open(path: &Path, flags: OpenFlags, perm: FileMode) -> io::Result<File> {
    let mut custom = 0;
    if flags.contains(OpenFlags::CREATE) {
        custom |= libc::O_CREAT;
        if flags.contains(OpenFlags::EXCL) {
            custom |= libc::O_EXCL;
        }
    }
    if flags.contains(OpenFlags::TRUNC) {
        custom |= libc::O_TRUNC;
    }
    if flags.contains(OpenFlags::DIRECTORY) {
        custom |= libc::O_DIRECTORY;
    }
    if flags.contains(OpenFlags::NOFOLLOW) {
        custom |= libc::O_NOFOLLOW;
    }
    if flags.contains(OpenFlags::SYNC) {
        custom |= libc::O_SYNC;
    }
    #[cfg(target_os = "linux")]
    if flags.contains(OpenFlags::DSYNC) {
        custom |= libc::O_DSYNC;
    }
    if flags.contains(OpenFlags::NONBLOCK) {
        custom |= libc::O_NONBLOCK;
    }

    // Creation flags go through `custom_flags` so a read-only create or
    // truncate reaches the kernel instead of being refused by std.
    OpenOptions::new()
        .read(flags.is_readable())
        .write(flags.contains(OpenFlags::WRITE))
        .append(flags.contains(OpenFlags::APPEND))
        .custom_flags(custom)
        .mode(perm.bits())
        .open(path)
}

pub(crate) fn status(meta: &Metadata) -> FileStatus {
    FileStatus {
        dev: meta.dev(),
        ino: meta.ino(),
        kind: kind_of(meta.file_type()),
        mode: FileMode::new(meta.mode()),
        nlink: meta.nlink(),
        size: meta.size(),
        atime: Timespec::new(meta.atime(), meta.atime_nsec() as u32),
        mtime: Timespec::new(meta.mtime(), meta.mtime_nsec() as u32),
        ctime: Timespec::new(meta.ctime(), meta.ctime_nsec() as u32),
    }
}

pub(crate) fn mkdir(path: &Path, perm: FileMode) -> io::Result<()> {
    DirBuilder::new().mode(perm.bits()).create(path)
}

pub(crate) fn chmod(path: &Path, perm: FileMode) -> io::Result<()> {
    std::fs::set_permissions(path, Permissions::from_mode(perm.bits()))
}

pub(crate) fn unlink(path: &Path) -> io::Result<()> {
    std::fs::remove_file(path)
}

pub(crate) fn symlink(target: &str, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

pub(crate) fn set_times(path: &Path, times: [SetTime; 2], follow: bool) -> io::Result<()> {
    let cstr = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))?;
    let spec = times.map(make_timespec);
    let flags = if follow { 0 } else { libc::AT_SYMLINK_NOFOLLOW };
    // `cstr` and `spec` outlive the call; `spec` holds exactly two entries.
    let res = unsafe { libc::utimensat(libc::AT_FDCWD, cstr.as_ptr(), spec.as_ptr(), flags) };
    if res < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn make_timespec(time: SetTime) -> libc::timespec {
    match time {
        SetTime::Now => libc::timespec {
            tv_sec: 0,
            tv_nsec: libc::UTIME_NOW,
        },
        SetTime::Omit => libc::timespec {
            tv_sec: 0,
            tv_nsec: libc::UTIME_OMIT,
        },
        SetTime::At(ts) => libc::timespec {
            tv_sec: ts.secs as _,
            tv_nsec: ts.nanos as _,
        },
    }
}

pub(crate) fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    file.read_at(buf, offset)
}

pub(crate) fn write_at(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    file.write_at(buf, offset)
}
