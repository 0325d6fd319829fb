//! POSIX `errno` base table.

use crate::Errno;

/// Raw POSIX errno → canonical errno. Codes not listed map to `Io`.
#[cfg(unix)]
pub const POSIX_ERRNO_TABLE: &[(i32, Errno)] = &[
    (libc::EACCES, Errno::Access),
    (libc::EAGAIN, Errno::Again),
    (libc::EBADF, Errno::Badf),
    (libc::EEXIST, Errno::Exist),
    (libc::EFAULT, Errno::Fault),
    (libc::EINTR, Errno::Intr),
    (libc::EINVAL, Errno::Inval),
    (libc::EIO, Errno::Io),
    (libc::EISDIR, Errno::IsDir),
    (libc::ELOOP, Errno::Loop),
    (libc::ENAMETOOLONG, Errno::NameTooLong),
    (libc::ENOENT, Errno::NoEnt),
    (libc::ENOSYS, Errno::NoSys),
    (libc::ENOTDIR, Errno::NotDir),
    (libc::ERANGE, Errno::Range),
    (libc::ENOTEMPTY, Errno::NotEmpty),
    (libc::ENOTSOCK, Errno::NotSock),
    (libc::ENOTSUP, Errno::NotSup),
    (libc::EOPNOTSUPP, Errno::NotSup),
    (libc::EPERM, Errno::Perm),
    (libc::EROFS, Errno::Rofs),
];

/// Translates a raw POSIX errno produced on this host.
#[cfg(unix)]
pub fn errno_from_raw(code: i32) -> Errno {
    POSIX_ERRNO_TABLE
        .iter()
        .find(|(raw, _)| *raw == code)
        .map(|(_, errno)| *errno)
        .unwrap_or(Errno::Io)
}

/// Without a POSIX host there is no raw table to consult; the numeric values
/// are meaningless here, so the error kind is used instead.
#[cfg(not(unix))]
pub fn errno_from_raw(code: i32) -> Errno {
    super::kind::errno_from_kind(std::io::Error::from_raw_os_error(code).kind())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn every_errno_has_a_posix_source() {
        for errno in Errno::ALL {
            assert!(
                POSIX_ERRNO_TABLE.iter().any(|(_, e)| *e == errno),
                "{errno:?} has no POSIX source"
            );
        }
    }

    #[test]
    fn unknown_codes_are_io() {
        assert_eq!(errno_from_raw(libc::EMLINK), Errno::Io);
        assert_eq!(errno_from_raw(libc::EXDEV), Errno::Io);
        assert_eq!(errno_from_raw(-1), Errno::Io);
    }

    #[test]
    fn common_codes() {
        assert_eq!(errno_from_raw(libc::ENOENT), Errno::NoEnt);
        assert_eq!(errno_from_raw(libc::EOPNOTSUPP), Errno::NotSup);
        assert_eq!(errno_from_raw(libc::EROFS), Errno::Rofs);
    }
}
