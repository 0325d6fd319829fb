use std::path::PathBuf;

use vfs_core::{Errno, Platform, VfsResult};

#[derive(Clone, Debug)]
pub struct HostFsConfig {
    /// Host directory every backend path is resolved against.
    pub root: PathBuf,
    /// Which quirk rules apply to native errors. Defaults to the platform
    /// the crate was compiled for.
    pub platform: Option<Platform>,
}

impl HostFsConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            platform: None,
        }
    }

    pub fn validate(&self) -> VfsResult<()> {
        let meta = std::fs::metadata(&self.root).map_err(Errno::from)?;
        if !meta.is_dir() {
            return Err(Errno::NotDir);
        }
        Ok(())
    }

    pub(crate) fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_noent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = HostFsConfig::new(dir.path().join("missing"));
        assert_eq!(cfg.validate(), Err(Errno::NoEnt));
    }

    #[test]
    fn file_root_is_not_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("file");
        std::fs::write(&file, b"").expect("write");
        assert_eq!(HostFsConfig::new(file).validate(), Err(Errno::NotDir));
    }

    #[test]
    fn platform_defaults_to_host() {
        let cfg = HostFsConfig::new("/");
        assert_eq!(cfg.platform(), Platform::host());
        let cfg = HostFsConfig {
            platform: Some(Platform::Windows),
            ..cfg
        };
        assert_eq!(cfg.platform(), Platform::Windows);
    }
}
