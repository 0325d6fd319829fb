//! Hosts without POSIX file APIs.
//!
//! Permissions are approximated by the read-only attribute: a file reads
//! back as `0o444` or `0o666` (directories `0o555` or `0o777`), and only the
//! owner-write bit of a requested mode is honored. The change time is not
//! tracked separately and reads back as the modification time.

use std::fs::{File, Metadata, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use filetime::FileTime;
use vfs_core::{FileMode, FileStatus, OpenFlags, SetTime, Timespec};

use super::kind_of;

/// `DIRECTORY` and `NOFOLLOW` have no native equivalent here.
pub(crate) const NATIVE_OPEN_FLAGS: OpenFlags = OpenFlags::all().difference(OpenFlags::PLACEHOLDERS);

#[cfg(windows)]
const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x0200_0000;

pub(crate) fn open(path: &Path, flags: OpenFlags, perm: FileMode) -> io::Result<File> {
    let create = flags.contains(OpenFlags::CREATE);
    let trunc = flags.contains(OpenFlags::TRUNC);
    let append = flags.contains(OpenFlags::APPEND);
    // std refuses to create or truncate without write access.
    let write = flags.contains(OpenFlags::WRITE) || ((create || trunc) && !append);

    let mut options = OpenOptions::new();
    options
        .read(flags.is_readable())
        .write(write)
        .append(append)
        .truncate(trunc);
    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;
        options.custom_flags(FILE_FLAG_BACKUP_SEMANTICS);
    }

    // `created` is decided by the open itself.
    let (file, created) = if !create {
        (options.open(path)?, false)
    } else if flags.contains(OpenFlags::EXCL) {
        (options.create_new(true).open(path)?, true)
    } else {
        match options.clone().create_new(true).open(path) {
            Ok(file) => (file, true),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => (options.open(path)?, false),
            Err(err) => return Err(err),
        }
    };
    if created && !perm.is_owner_writable() {
        let mut permissions = file.metadata()?.permissions();
        permissions.set_readonly(true);
        file.set_permissions(permissions)?;
    }
    Ok(file)
}

pub(crate) fn status(meta: &Metadata) -> FileStatus {
    let kind = kind_of(meta.file_type());
    let readonly = meta.permissions().readonly();
    let mode = match (kind.is_dir(), readonly) {
        (true, true) => 0o555,
        (true, false) => 0o777,
        (false, true) => 0o444,
        (false, false) => 0o666,
    };
    let mtime = meta
        .modified()
        .map(Timespec::from_system_time)
        .unwrap_or_default();
    let atime = meta
        .accessed()
        .map(Timespec::from_system_time)
        .unwrap_or(mtime);
    FileStatus {
        dev: 0,
        ino: 0,
        kind,
        mode: FileMode(mode),
        nlink: 1,
        size: meta.len(),
        atime,
        mtime,
        ctime: mtime,
    }
}

pub(crate) fn mkdir(path: &Path, perm: FileMode) -> io::Result<()> {
    std::fs::create_dir(path)?;
    if !perm.is_owner_writable() {
        chmod(path, perm)?;
    }
    Ok(())
}

pub(crate) fn chmod(path: &Path, perm: FileMode) -> io::Result<()> {
    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_readonly(!perm.is_owner_writable());
    std::fs::set_permissions(path, permissions)
}

/// Removes a non-directory entry. A symbolic link to a directory is itself a
/// directory entry on Windows and needs `remove_dir`.
pub(crate) fn unlink(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(err) if is_dir_symlink(path) => {
            std::fs::remove_dir(path).map_err(|_| err)
        }
        other => other,
    }
}

fn is_dir_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
        && std::fs::metadata(path).is_ok_and(|m| m.is_dir())
}

#[cfg(windows)]
pub(crate) fn symlink(target: &str, link: &Path) -> io::Result<()> {
    let resolved = link
        .parent()
        .map(|parent| parent.join(target))
        .unwrap_or_else(|| target.into());
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(windows))]
pub(crate) fn symlink(_target: &str, _link: &Path) -> io::Result<()> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

pub(crate) fn set_times(path: &Path, times: [SetTime; 2], follow: bool) -> io::Result<()> {
    let meta = if follow {
        std::fs::metadata(path)?
    } else {
        std::fs::symlink_metadata(path)?
    };
    let now = Timespec::now();
    let current = status(&meta);
    let [atime, mtime] = times;
    let atime = to_file_time(atime.resolve(now).unwrap_or(current.atime));
    let mtime = to_file_time(mtime.resolve(now).unwrap_or(current.mtime));
    if follow {
        filetime::set_file_times(path, atime, mtime)
    } else {
        filetime::set_symlink_file_times(path, atime, mtime)
    }
}

fn to_file_time(ts: Timespec) -> FileTime {
    FileTime::from_unix_time(ts.secs, ts.nanos)
}

pub(crate) fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut file = file;
    file.seek(SeekFrom::Start(offset))?;
    file.read(buf)
}

pub(crate) fn write_at(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    let mut file = file;
    file.seek(SeekFrom::Start(offset))?;
    file.write(buf)
}
