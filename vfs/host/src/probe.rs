use vfs_core::FileKind;
use vfs_core::translate::KindProbe;

use crate::HostFs;
use crate::platform;

/// Follow-up queries against the host, used to disambiguate native errors.
pub(crate) struct HostProbe<'a> {
    pub(crate) fs: &'a HostFs,
}

impl KindProbe for HostProbe<'_> {
    fn kind(&self, path: &str, follow: bool) -> Option<FileKind> {
        let host = self.fs.host_path(path).ok()?;
        let meta = if follow {
            std::fs::metadata(host)
        } else {
            std::fs::symlink_metadata(host)
        };
        meta.ok().map(|meta| platform::kind_of(meta.file_type()))
    }

    fn is_empty_dir(&self, path: &str) -> bool {
        let Ok(host) = self.fs.host_path(path) else {
            return false;
        };
        std::fs::read_dir(host).is_ok_and(|mut entries| entries.next().is_none())
    }
}
