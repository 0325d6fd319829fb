//! In-memory backend for the `vfs-core` contract.
//!
//! Wrap it in [`vfs_core::ReadOnlyFs`] to serve a prepared tree read-only.

mod config;
mod fs;
mod handle;
mod inode;

pub use config::MemFsConfig;
pub use fs::MemFs;
pub use handle::MemFile;
