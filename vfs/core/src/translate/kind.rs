//! `std::io::ErrorKind` fallback, for errors that carry no OS code.

use std::io::ErrorKind;

use crate::Errno;

pub const KIND_TABLE: &[(ErrorKind, Errno)] = &[
    (ErrorKind::NotFound, Errno::NoEnt),
    (ErrorKind::PermissionDenied, Errno::Access),
    (ErrorKind::AlreadyExists, Errno::Exist),
    (ErrorKind::WouldBlock, Errno::Again),
    (ErrorKind::InvalidInput, Errno::Inval),
    (ErrorKind::InvalidData, Errno::Inval),
    (ErrorKind::Interrupted, Errno::Intr),
    (ErrorKind::Unsupported, Errno::NoSys),
    (ErrorKind::NotADirectory, Errno::NotDir),
    (ErrorKind::IsADirectory, Errno::IsDir),
    (ErrorKind::DirectoryNotEmpty, Errno::NotEmpty),
    (ErrorKind::ReadOnlyFilesystem, Errno::Rofs),
    (ErrorKind::InvalidFilename, Errno::Inval),
];

pub fn errno_from_kind(kind: ErrorKind) -> Errno {
    KIND_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, errno)| *errno)
        .unwrap_or(Errno::Io)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(errno_from_kind(ErrorKind::NotFound), Errno::NoEnt);
        assert_eq!(errno_from_kind(ErrorKind::DirectoryNotEmpty), Errno::NotEmpty);
        assert_eq!(errno_from_kind(ErrorKind::Unsupported), Errno::NoSys);
        assert_eq!(errno_from_kind(ErrorKind::TimedOut), Errno::Io);
    }
}
