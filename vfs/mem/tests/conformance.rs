use vfs_core::conformance;
use vfs_core::{FallbackFs, UnimplementedFs};
use vfs_mem::{MemFs, MemFsConfig};

#[test_log::test]
fn memfs_conforms() {
    conformance::run_all(|| MemFs::new(MemFsConfig::default()));
}

#[test_log::test]
fn memfs_behind_fallback_conforms() {
    conformance::run_all(|| FallbackFs::new(UnimplementedFs, MemFs::default()));
}

#[test_log::test]
fn unimplemented_backends_report_nosys() {
    conformance::check_unimplemented(&UnimplementedFs);
    conformance::check_unimplemented(&FallbackFs::new(UnimplementedFs, UnimplementedFs));
}
