use bitflags::bitflags;

use crate::{Errno, VfsResult};

bitflags! {
    /// Open flags as seen by the contract.
    ///
    /// Neither `READ` nor `WRITE` means read-only; both means read-write.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const CREATE = 1 << 2;
        const EXCL = 1 << 3;
        const TRUNC = 1 << 4;
        const APPEND = 1 << 5;
        /// Fail with `NotDir` unless the opened entry is a directory.
        const DIRECTORY = 1 << 6;
        /// Fail with `Loop` if the final path component is a symbolic link.
        const NOFOLLOW = 1 << 7;
        const SYNC = 1 << 8;
        const DSYNC = 1 << 9;
        const NONBLOCK = 1 << 10;
    }
}

impl OpenFlags {
    /// Bits some backends cannot pass to their native open and must enforce
    /// themselves. See [`crate::sanitize_open_flags`].
    pub const PLACEHOLDERS: OpenFlags =
        OpenFlags::from_bits_truncate(OpenFlags::DIRECTORY.bits() | OpenFlags::NOFOLLOW.bits());

    /// True when the handle may be written through.
    pub fn is_writable(self) -> bool {
        self.contains(OpenFlags::WRITE) || self.contains(OpenFlags::APPEND)
    }

    /// True when the handle may be read through.
    pub fn is_readable(self) -> bool {
        self.contains(OpenFlags::READ) || !self.is_writable()
    }

    /// True when opening with these flags can change the filesystem.
    pub fn is_mutating(self) -> bool {
        self.intersects(OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNC | OpenFlags::APPEND)
    }

    /// True when the flags demand write access to an existing entry.
    pub fn has_write_intent(self) -> bool {
        self.intersects(OpenFlags::WRITE | OpenFlags::APPEND | OpenFlags::TRUNC)
    }

    /// Rejects combinations no backend can honor.
    pub fn validate(self) -> VfsResult<()> {
        if self.contains(OpenFlags::CREATE | OpenFlags::DIRECTORY) {
            return Err(Errno::Inval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_directory_and_nofollow() {
        assert_eq!(
            OpenFlags::PLACEHOLDERS,
            OpenFlags::DIRECTORY | OpenFlags::NOFOLLOW
        );
    }

    #[test]
    fn access_mode_defaults_to_read_only() {
        let flags = OpenFlags::empty();
        assert!(flags.is_readable());
        assert!(!flags.is_writable());

        let flags = OpenFlags::WRITE;
        assert!(!flags.is_readable());
        assert!(flags.is_writable());

        let flags = OpenFlags::READ | OpenFlags::WRITE;
        assert!(flags.is_readable() && flags.is_writable());
    }

    #[test]
    fn create_directory_is_invalid() {
        assert_eq!(
            (OpenFlags::CREATE | OpenFlags::DIRECTORY).validate(),
            Err(Errno::Inval)
        );
        assert_eq!(OpenFlags::EXCL.validate(), Ok(()));
    }

    #[test]
    fn trunc_counts_as_write_intent() {
        assert!(OpenFlags::TRUNC.has_write_intent());
        assert!(!OpenFlags::CREATE.has_write_intent());
        assert!(OpenFlags::CREATE.is_mutating());
    }
}
