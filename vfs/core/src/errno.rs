//! Canonical error taxonomy.
//!
//! Every backend maps its native failures onto this closed set; nothing else
//! crosses the contract boundary. Success is `Ok(_)`. Callers that need the
//! numeric view use [`errno_code`], where `0` and only `0` means success.

use thiserror::Error;

pub type VfsResult<T> = Result<T, Errno>;

/// A filesystem error code.
///
/// The discriminants are stable and start at `1`, so `0` stays free to mean
/// success when the value is re-encoded for a guest.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum Errno {
    /// Access control denied the operation.
    #[error("permission denied")]
    Access = 1,
    /// The resource is temporarily unavailable.
    #[error("resource temporarily unavailable")]
    Again = 2,
    /// The handle is closed or was not opened for this kind of access.
    #[error("bad file descriptor")]
    Badf = 3,
    /// The target of a create, link or symlink already exists.
    #[error("file exists")]
    Exist = 4,
    /// A buffer argument was outside the accessible address space.
    #[error("bad address")]
    Fault = 5,
    /// The call was interrupted.
    #[error("interrupted system call")]
    Intr = 6,
    /// A path or flag combination is malformed.
    #[error("invalid argument")]
    Inval = 7,
    /// The backing medium failed, or the native error has no closer match.
    #[error("input/output error")]
    Io = 8,
    /// Expected a non-directory but found a directory.
    #[error("is a directory")]
    IsDir = 9,
    /// Too many symbolic links, or `NOFOLLOW` met a symbolic link.
    #[error("too many levels of symbolic links")]
    Loop = 10,
    #[error("file name too long")]
    NameTooLong = 11,
    /// The path does not resolve to an existing entry.
    #[error("no such file or directory")]
    NoEnt = 12,
    /// The backend does not implement the operation.
    #[error("function not implemented")]
    NoSys = 13,
    /// Expected a directory but found something else.
    #[error("not a directory")]
    NotDir = 14,
    #[error("result out of range")]
    Range = 15,
    /// A removal or overwrite was blocked by a non-empty directory.
    #[error("directory not empty")]
    NotEmpty = 16,
    #[error("not a socket")]
    NotSock = 17,
    /// The backend implements the operation but not for these arguments.
    #[error("operation not supported")]
    NotSup = 18,
    /// The operation is not permitted, e.g. a missing privilege or an
    /// invalid link operand.
    #[error("operation not permitted")]
    Perm = 19,
    /// The backend, or the view of it, is read-only.
    #[error("read-only file system")]
    Rofs = 20,
}

impl Errno {
    /// Every variant, ordered by [`Errno::code`].
    pub const ALL: [Errno; 20] = [
        Errno::Access,
        Errno::Again,
        Errno::Badf,
        Errno::Exist,
        Errno::Fault,
        Errno::Intr,
        Errno::Inval,
        Errno::Io,
        Errno::IsDir,
        Errno::Loop,
        Errno::NameTooLong,
        Errno::NoEnt,
        Errno::NoSys,
        Errno::NotDir,
        Errno::Range,
        Errno::NotEmpty,
        Errno::NotSock,
        Errno::NotSup,
        Errno::Perm,
        Errno::Rofs,
    ];

    /// The stable, non-zero numeric code of this error.
    #[inline]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Inverse of [`Errno::code`]. `0` (success) and unknown values yield `None`.
    pub fn from_code(code: u16) -> Option<Self> {
        let index = usize::from(code.checked_sub(1)?);
        Self::ALL.get(index).copied()
    }

    /// POSIX-style symbolic name, used as a stable label in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Errno::Access => "EACCES",
            Errno::Again => "EAGAIN",
            Errno::Badf => "EBADF",
            Errno::Exist => "EEXIST",
            Errno::Fault => "EFAULT",
            Errno::Intr => "EINTR",
            Errno::Inval => "EINVAL",
            Errno::Io => "EIO",
            Errno::IsDir => "EISDIR",
            Errno::Loop => "ELOOP",
            Errno::NameTooLong => "ENAMETOOLONG",
            Errno::NoEnt => "ENOENT",
            Errno::NoSys => "ENOSYS",
            Errno::NotDir => "ENOTDIR",
            Errno::Range => "ERANGE",
            Errno::NotEmpty => "ENOTEMPTY",
            Errno::NotSock => "ENOTSOCK",
            Errno::NotSup => "ENOTSUP",
            Errno::Perm => "EPERM",
            Errno::Rofs => "EROFS",
        }
    }
}

/// Numeric view of an operation result: `0` on success, [`Errno::code`]
/// otherwise.
pub fn errno_code<T>(result: &VfsResult<T>) -> u16 {
    match result {
        Ok(_) => 0,
        Err(errno) => errno.code(),
    }
}

impl From<std::io::Error> for Errno {
    fn from(err: std::io::Error) -> Self {
        crate::translate::io_error_errno(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dense_and_non_zero() {
        for (index, errno) in Errno::ALL.iter().enumerate() {
            assert_eq!(usize::from(errno.code()), index + 1, "{errno:?}");
            assert_eq!(Errno::from_code(errno.code()), Some(*errno));
        }
        assert_eq!(Errno::from_code(0), None);
        assert_eq!(Errno::from_code(21), None);
    }

    #[test]
    fn zero_only_means_success() {
        let ok: VfsResult<()> = Ok(());
        assert_eq!(errno_code(&ok), 0);
        for errno in Errno::ALL {
            assert_ne!(errno_code::<()>(&Err(errno)), 0);
        }
    }

    #[test]
    fn display_matches_posix_wording() {
        assert_eq!(Errno::NoEnt.to_string(), "no such file or directory");
        assert_eq!(Errno::NotEmpty.name(), "ENOTEMPTY");
    }
}
