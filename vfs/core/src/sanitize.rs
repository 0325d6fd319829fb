//! Open-flag sanitization for backends whose native open lacks some bits.
//!
//! `DIRECTORY` and `NOFOLLOW` are placeholders: a backend that cannot pass
//! them to its native open strips them before the call and enforces them
//! itself, `NOFOLLOW` against the link status before opening and `DIRECTORY`
//! against the opened object.

use crate::{Errno, FileStatus, OpenFlags, VfsResult};

/// Flags split into what goes to the native open and what the caller must
/// enforce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SanitizedFlags {
    pub requested: OpenFlags,
    pub native: OpenFlags,
    pub deferred: OpenFlags,
}

/// Splits `flags` for a backend supporting `native_support`. Non-placeholder
/// bits are always passed through; the caller's value is not modified.
pub fn sanitize_open_flags(flags: OpenFlags, native_support: OpenFlags) -> SanitizedFlags {
    let stripped = OpenFlags::PLACEHOLDERS - native_support;
    SanitizedFlags {
        requested: flags,
        native: flags - stripped,
        deferred: flags & stripped,
    }
}

impl SanitizedFlags {
    /// Enforces a deferred `NOFOLLOW` against the status of the final
    /// component, as returned by `lstat`. An absent entry passes.
    pub fn check_link(&self, link: Option<&FileStatus>) -> VfsResult<()> {
        if self.deferred.contains(OpenFlags::NOFOLLOW) && link.is_some_and(FileStatus::is_symlink) {
            return Err(Errno::Loop);
        }
        Ok(())
    }

    /// Enforces a deferred `DIRECTORY` against the object that was opened.
    pub fn check_opened(&self, opened: &FileStatus) -> VfsResult<()> {
        if self.deferred.contains(OpenFlags::DIRECTORY) && !opened.is_dir() {
            return Err(Errno::NotDir);
        }
        Ok(())
    }
}
