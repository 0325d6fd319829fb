//! Capability-scoped filesystem contract.
//!
//! A sandboxed guest reaches files only through a [`FileSystem`]. Backends
//! report failures as one [`Errno`] from a closed set; [`translate`] turns
//! native errors into that set and irons out platform differences, and
//! [`sanitize_open_flags`] lets a backend emulate open flags its native call
//! lacks.

mod errno;
mod fallback;
mod flags;
mod fs;
mod metadata;
mod readonly;
mod sanitize;
mod unimplemented;

pub mod path;
pub mod translate;

#[cfg(feature = "conformance")]
pub mod conformance;

pub use errno::{Errno, VfsResult, errno_code};
pub use fallback::FallbackFs;
pub use flags::OpenFlags;
pub use fs::{FileSystem, FsFile};
pub use metadata::{FileKind, FileMode, FileStatus, SetTime, Times, Timespec, expand_times};
pub use readonly::ReadOnlyFs;
pub use sanitize::{SanitizedFlags, sanitize_open_flags};
pub use translate::Platform;
pub use unimplemented::UnimplementedFs;
