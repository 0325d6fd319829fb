//! Native calls whose shape differs between host families.

use std::fs::FileType;

use vfs_core::FileKind;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use unix::*;

#[cfg(not(unix))]
mod other;
#[cfg(not(unix))]
pub(crate) use other::*;

pub(crate) fn kind_of(file_type: FileType) -> FileKind {
    if file_type.is_symlink() {
        FileKind::Symlink
    } else if file_type.is_dir() {
        FileKind::Directory
    } else if file_type.is_file() {
        FileKind::RegularFile
    } else {
        FileKind::Other
    }
}
