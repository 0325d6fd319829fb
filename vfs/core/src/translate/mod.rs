//! Native error → [`Errno`] translation.
//!
//! Translation happens in two steps. A base table maps the raw native error
//! to one `Errno` ([`posix`], [`windows`], or the [`kind`] fallback when the
//! error carries no OS code). The [`quirks`] table then rewrites that value
//! for known `(operation, platform)` irregularities, optionally probing the
//! kind of an operand through [`KindProbe`]. Both steps are pure; a probe only
//! reads.

pub mod kind;
pub mod posix;
pub mod quirks;
pub mod windows;

use std::io;

use tracing::debug;

use crate::{Errno, FileKind};

pub use quirks::{Operand, QuirkRule, Resolution};

/// Which family of native semantics produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// The platform this crate was compiled for.
    pub const fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

/// Contract operations, as keys of the quirk table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    OpenFile,
    Lstat,
    Stat,
    Mkdir,
    Chmod,
    Rename,
    Rmdir,
    Unlink,
    Link,
    Symlink,
    Readlink,
    Utimens,
}

impl Op {
    pub const fn name(self) -> &'static str {
        match self {
            Op::OpenFile => "open_file",
            Op::Lstat => "lstat",
            Op::Stat => "stat",
            Op::Mkdir => "mkdir",
            Op::Chmod => "chmod",
            Op::Rename => "rename",
            Op::Rmdir => "rmdir",
            Op::Unlink => "unlink",
            Op::Link => "link",
            Op::Symlink => "symlink",
            Op::Readlink => "readlink",
            Op::Utimens => "utimens",
        }
    }
}

/// The path operands of the failed call.
///
/// `other` is the second path of two-operand operations: the destination of
/// `rename`, the new name of `link` and the link path of `symlink`.
#[derive(Clone, Copy, Debug)]
pub struct Operands<'a> {
    pub path: &'a str,
    pub other: Option<&'a str>,
}

impl<'a> Operands<'a> {
    pub fn one(path: &'a str) -> Self {
        Self { path, other: None }
    }

    pub fn two(path: &'a str, other: &'a str) -> Self {
        Self {
            path,
            other: Some(other),
        }
    }
}

/// Read-only follow-up queries used to disambiguate a native error.
pub trait KindProbe {
    /// Kind of the entry at `path`, or `None` when it cannot be observed.
    fn kind(&self, path: &str, follow: bool) -> Option<FileKind>;

    /// True when `path` is a directory without entries.
    fn is_empty_dir(&self, path: &str) -> bool;
}

/// A probe that never observes anything; rules needing it keep the native
/// value.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProbe;

impl KindProbe for NoProbe {
    fn kind(&self, _path: &str, _follow: bool) -> Option<FileKind> {
        None
    }

    fn is_empty_dir(&self, _path: &str) -> bool {
        false
    }
}

/// Base-table translation of an `io::Error` produced on this host.
pub fn io_error_errno(err: &io::Error) -> Errno {
    match err.raw_os_error() {
        Some(code) if cfg!(windows) => windows::errno_from_win32(code as u32),
        Some(code) => posix::errno_from_raw(code),
        None => kind::errno_from_kind(err.kind()),
    }
}

/// Applies the quirk table to an already base-translated error.
pub fn translate(
    op: Op,
    platform: Platform,
    native: Errno,
    operands: &Operands<'_>,
    probe: &dyn KindProbe,
) -> Errno {
    let Some(rule) = quirks::rule_for(op, platform, native) else {
        return native;
    };
    let resolved = rule.resolution.resolve(native, operands, probe);
    if resolved != native {
        debug!(
            op = op.name(),
            ?platform,
            native = native.name(),
            resolved = resolved.name(),
            "normalized native error"
        );
    }
    resolved
}

/// Full translation of a host `io::Error` for `op`.
pub fn translate_io_error(
    op: Op,
    platform: Platform,
    err: &io::Error,
    operands: &Operands<'_>,
    probe: &dyn KindProbe,
) -> Errno {
    translate(op, platform, io_error_errno(err), operands, probe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    pub(crate) struct FakeProbe {
        kinds: HashMap<&'static str, FileKind>,
        empty: Vec<&'static str>,
    }

    impl FakeProbe {
        pub(crate) fn with(mut self, path: &'static str, kind: FileKind) -> Self {
            self.kinds.insert(path, kind);
            self
        }

        pub(crate) fn empty_dir(mut self, path: &'static str) -> Self {
            self.kinds.insert(path, FileKind::Directory);
            self.empty.push(path);
            self
        }
    }

    impl KindProbe for FakeProbe {
        fn kind(&self, path: &str, _follow: bool) -> Option<FileKind> {
            self.kinds.get(path).copied()
        }

        fn is_empty_dir(&self, path: &str) -> bool {
            self.empty.contains(&path)
        }
    }

    #[test]
    fn untouched_without_rule() {
        let probe = FakeProbe::default();
        for platform in [Platform::Posix, Platform::Windows] {
            assert_eq!(
                translate(Op::Stat, platform, Errno::NoEnt, &Operands::one("a"), &probe),
                Errno::NoEnt
            );
        }
    }

    #[test]
    fn mkdir_over_file_is_not_dir() {
        let probe = FakeProbe::default().with("f", FileKind::RegularFile).with("d", FileKind::Directory);
        for platform in [Platform::Posix, Platform::Windows] {
            assert_eq!(
                translate(Op::Mkdir, platform, Errno::Exist, &Operands::one("f"), &probe),
                Errno::NotDir
            );
            assert_eq!(
                translate(Op::Mkdir, platform, Errno::Exist, &Operands::one("d"), &probe),
                Errno::Exist
            );
        }
    }

    #[test]
    fn windows_rmdir_on_file_is_not_dir() {
        let probe = FakeProbe::default().with("f", FileKind::RegularFile);
        assert_eq!(
            translate(Op::Rmdir, Platform::Windows, Errno::NoEnt, &Operands::one("f"), &probe),
            Errno::NotDir
        );
        assert_eq!(
            translate(Op::Rmdir, Platform::Windows, Errno::NoEnt, &Operands::one("gone"), &probe),
            Errno::NoEnt
        );
        // POSIX already reports ENOTDIR, no probe involved.
        assert_eq!(
            translate(Op::Rmdir, Platform::Posix, Errno::NoEnt, &Operands::one("f"), &probe),
            Errno::NoEnt
        );
    }

    #[test]
    fn rmdir_exist_means_not_empty_on_posix() {
        assert_eq!(
            translate(Op::Rmdir, Platform::Posix, Errno::Exist, &Operands::one("d"), &NoProbe),
            Errno::NotEmpty
        );
    }

    #[test]
    fn rename_conflicts() {
        let probe = FakeProbe::default()
            .with("file", FileKind::RegularFile)
            .with("dir", FileKind::Directory)
            .with("full", FileKind::Directory)
            .empty_dir("empty");

        let rename = |platform, native, from, to| {
            translate(Op::Rename, platform, native, &Operands::two(from, to), &probe)
        };

        assert_eq!(rename(Platform::Windows, Errno::Access, "file", "dir"), Errno::IsDir);
        assert_eq!(rename(Platform::Windows, Errno::Access, "dir", "file"), Errno::NotDir);
        assert_eq!(rename(Platform::Windows, Errno::Access, "dir", "full"), Errno::NotEmpty);
        assert_eq!(rename(Platform::Windows, Errno::Access, "dir", "empty"), Errno::Exist);
        assert_eq!(rename(Platform::Posix, Errno::Exist, "dir", "full"), Errno::NotEmpty);
        // Plain access failures stay as they are.
        assert_eq!(rename(Platform::Windows, Errno::Access, "file", "file"), Errno::Access);
        // Access is not a conflict code on POSIX.
        assert_eq!(rename(Platform::Posix, Errno::Access, "file", "dir"), Errno::Access);
    }

    #[test]
    fn unlink_of_directory_is_is_dir() {
        let probe = FakeProbe::default().with("d", FileKind::Directory).with("f", FileKind::RegularFile);
        assert_eq!(
            translate(Op::Unlink, Platform::Posix, Errno::Perm, &Operands::one("d"), &probe),
            Errno::IsDir
        );
        assert_eq!(
            translate(Op::Unlink, Platform::Posix, Errno::Perm, &Operands::one("f"), &probe),
            Errno::Perm
        );
        assert_eq!(
            translate(Op::Unlink, Platform::Windows, Errno::Access, &Operands::one("d"), &probe),
            Errno::IsDir
        );
    }

    #[test]
    fn link_onto_directory_is_is_dir() {
        let probe = FakeProbe::default().with("d", FileKind::Directory).with("f", FileKind::RegularFile);
        assert_eq!(
            translate(Op::Link, Platform::Posix, Errno::Exist, &Operands::two("f", "d"), &probe),
            Errno::IsDir
        );
        assert_eq!(
            translate(Op::Link, Platform::Posix, Errno::Exist, &Operands::two("d", "f"), &probe),
            Errno::Exist
        );
    }

    #[test]
    fn windows_symlink_privilege_is_perm() {
        assert_eq!(
            translate(Op::Symlink, Platform::Windows, Errno::Access, &Operands::two("t", "l"), &NoProbe),
            Errno::Perm
        );
        assert_eq!(
            translate(Op::Symlink, Platform::Posix, Errno::Access, &Operands::two("t", "l"), &NoProbe),
            Errno::Access
        );
    }

    #[test]
    fn windows_open_directory_for_write_is_is_dir() {
        let probe = FakeProbe::default().with("d", FileKind::Directory);
        assert_eq!(
            translate(Op::OpenFile, Platform::Windows, Errno::Access, &Operands::one("d"), &probe),
            Errno::IsDir
        );
    }

    #[test]
    fn io_errors_without_os_code_use_kind() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(io_error_errno(&err), Errno::NoEnt);
        let err = io::Error::other("boom");
        assert_eq!(io_error_errno(&err), Errno::Io);
        assert_eq!(Errno::from(io::Error::from(io::ErrorKind::AlreadyExists)), Errno::Exist);
    }

    #[cfg(unix)]
    #[test]
    fn io_errors_with_os_code_use_posix_table() {
        let err = io::Error::from_raw_os_error(libc::ENOTEMPTY);
        assert_eq!(io_error_errno(&err), Errno::NotEmpty);
    }
}
