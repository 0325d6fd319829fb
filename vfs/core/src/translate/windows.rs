//! Win32 error base table.
//!
//! The codes are plain numbers so the table can be exercised from any host.

use crate::Errno;

pub const ERROR_FILE_NOT_FOUND: u32 = 2;
pub const ERROR_PATH_NOT_FOUND: u32 = 3;
pub const ERROR_ACCESS_DENIED: u32 = 5;
pub const ERROR_INVALID_HANDLE: u32 = 6;
pub const ERROR_SHARING_VIOLATION: u32 = 32;
pub const ERROR_LOCK_VIOLATION: u32 = 33;
pub const ERROR_NOT_SUPPORTED: u32 = 50;
pub const ERROR_BAD_NETPATH: u32 = 53;
pub const ERROR_FILE_EXISTS: u32 = 80;
pub const ERROR_INVALID_PARAMETER: u32 = 87;
pub const ERROR_CALL_NOT_IMPLEMENTED: u32 = 120;
pub const ERROR_INVALID_NAME: u32 = 123;
pub const ERROR_NEGATIVE_SEEK: u32 = 131;
pub const ERROR_DIR_NOT_EMPTY: u32 = 145;
pub const ERROR_ALREADY_EXISTS: u32 = 183;
pub const ERROR_FILENAME_EXCED_RANGE: u32 = 206;
pub const ERROR_DIRECTORY: u32 = 267;
pub const ERROR_PRIVILEGE_NOT_HELD: u32 = 1314;
pub const ERROR_CANT_RESOLVE_FILENAME: u32 = 1921;
pub const ERROR_NOT_A_REPARSE_POINT: u32 = 4390;

pub const WIN32_ERROR_TABLE: &[(u32, Errno)] = &[
    (ERROR_FILE_NOT_FOUND, Errno::NoEnt),
    (ERROR_PATH_NOT_FOUND, Errno::NoEnt),
    (ERROR_ACCESS_DENIED, Errno::Access),
    (ERROR_INVALID_HANDLE, Errno::Badf),
    (ERROR_SHARING_VIOLATION, Errno::Access),
    (ERROR_LOCK_VIOLATION, Errno::Access),
    (ERROR_NOT_SUPPORTED, Errno::NotSup),
    (ERROR_BAD_NETPATH, Errno::NoEnt),
    (ERROR_FILE_EXISTS, Errno::Exist),
    (ERROR_INVALID_PARAMETER, Errno::Inval),
    (ERROR_CALL_NOT_IMPLEMENTED, Errno::NoSys),
    (ERROR_INVALID_NAME, Errno::Inval),
    (ERROR_NEGATIVE_SEEK, Errno::Inval),
    (ERROR_DIR_NOT_EMPTY, Errno::NotEmpty),
    (ERROR_ALREADY_EXISTS, Errno::Exist),
    (ERROR_FILENAME_EXCED_RANGE, Errno::NameTooLong),
    // "The directory name is invalid": a file was used where a directory was
    // expected.
    (ERROR_DIRECTORY, Errno::NotDir),
    (ERROR_PRIVILEGE_NOT_HELD, Errno::Perm),
    (ERROR_CANT_RESOLVE_FILENAME, Errno::Loop),
    // readlink on something that is not a symbolic link.
    (ERROR_NOT_A_REPARSE_POINT, Errno::Inval),
];

/// Translates a Win32 error code. Codes not listed map to `Io`.
pub fn errno_from_win32(code: u32) -> Errno {
    WIN32_ERROR_TABLE
        .iter()
        .find(|(raw, _)| *raw == code)
        .map(|(_, errno)| *errno)
        .unwrap_or(Errno::Io)
}
