//! Host-directory backend for the `vfs-core` contract.

mod config;
mod fs;
mod handle;
mod platform;
mod probe;

pub use config::HostFsConfig;
pub use fs::HostFs;
pub use handle::HostFile;
