#![cfg(unix)]

use std::sync::atomic::{AtomicUsize, Ordering};

use vfs_core::conformance;
use vfs_host::{HostFs, HostFsConfig};

#[test_log::test]
fn hostfs_conforms() {
    let temp = tempfile::tempdir().expect("tempdir");
    let next = AtomicUsize::new(0);
    conformance::run_all(|| {
        let root = temp
            .path()
            .join(format!("case-{}", next.fetch_add(1, Ordering::Relaxed)));
        std::fs::create_dir(&root).expect("create case dir");
        HostFs::new(HostFsConfig::new(root)).expect("hostfs")
    });
}
