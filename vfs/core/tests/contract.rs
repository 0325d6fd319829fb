use std::sync::Arc;

use pretty_assertions::assert_eq;
use vfs_core::translate::{self, KindProbe, Op, Operands, Platform};
use vfs_core::{
    Errno, FallbackFs, FileKind, FileMode, FileSystem, OpenFlags, ReadOnlyFs, SetTime, Timespec,
    UnimplementedFs, VfsResult, errno_code,
};

fn all_results(fs: &dyn FileSystem) -> Vec<(&'static str, u16)> {
    fn code<T>(r: VfsResult<T>) -> u16 {
        errno_code(&r)
    }
    let times = Some([SetTime::Omit, SetTime::At(Timespec::new(1, 0))]);
    vec![
        ("open_file", code(fs.open_file("a", OpenFlags::READ, FileMode(0)))),
        ("lstat", code(fs.lstat("a"))),
        ("stat", code(fs.stat("a"))),
        ("mkdir", code(fs.mkdir("a", FileMode(0o755)))),
        ("chmod", code(fs.chmod("a", FileMode(0o644)))),
        ("rename", code(fs.rename("a", "b"))),
        ("rmdir", code(fs.rmdir("a"))),
        ("unlink", code(fs.unlink("a"))),
        ("link", code(fs.link("a", "b"))),
        ("symlink", code(fs.symlink("a", "b"))),
        ("readlink", code(fs.readlink("a"))),
        ("utimens", code(fs.utimens("a", times, false))),
    ]
}

#[test_log::test]
fn unimplemented_reports_nosys_everywhere() {
    let fs: Arc<dyn FileSystem> = Arc::new(UnimplementedFs);
    for (op, code) in all_results(&fs) {
        assert_eq!((op, code), (op, Errno::NoSys.code()));
    }
}

#[test_log::test]
fn fallback_of_two_unimplemented_is_unimplemented() {
    let fs = FallbackFs::new(UnimplementedFs, Arc::new(UnimplementedFs));
    for (op, code) in all_results(&fs) {
        assert_eq!((op, code), (op, Errno::NoSys.code()));
    }
}

#[test_log::test]
fn read_only_view_splits_queries_and_mutations() {
    let fs = ReadOnlyFs::new(UnimplementedFs);
    let expected: Vec<_> = [
        ("open_file", Errno::NoSys),
        ("lstat", Errno::NoSys),
        ("stat", Errno::NoSys),
        ("mkdir", Errno::Rofs),
        ("chmod", Errno::Rofs),
        ("rename", Errno::Rofs),
        ("rmdir", Errno::Rofs),
        ("unlink", Errno::Rofs),
        ("link", Errno::Rofs),
        ("symlink", Errno::Rofs),
        ("readlink", Errno::NoSys),
        ("utimens", Errno::Rofs),
    ]
    .into_iter()
    .map(|(op, errno)| (op, errno.code()))
    .collect();
    assert_eq!(all_results(&fs), expected);
}

/// A probe over a fixed listing.
struct Listing(&'static [(&'static str, FileKind, bool)]);

impl KindProbe for Listing {
    fn kind(&self, path: &str, _follow: bool) -> Option<FileKind> {
        self.0.iter().find(|(p, ..)| *p == path).map(|(_, k, _)| *k)
    }

    fn is_empty_dir(&self, path: &str) -> bool {
        self.0.iter().any(|(p, k, empty)| *p == path && k.is_dir() && *empty)
    }
}

#[test_log::test]
fn windows_rename_over_directory_is_normalized() {
    let probe = Listing(&[
        ("src", FileKind::Directory, true),
        ("dst", FileKind::Directory, false),
        ("file", FileKind::RegularFile, false),
    ]);
    let denied = std::io::Error::from_raw_os_error(5);
    let native = if cfg!(windows) {
        translate::io_error_errno(&denied)
    } else {
        translate::windows::errno_from_win32(translate::windows::ERROR_ACCESS_DENIED)
    };
    assert_eq!(native, Errno::Access);

    let got = translate::translate(
        Op::Rename,
        Platform::Windows,
        native,
        &Operands::two("src", "dst"),
        &probe,
    );
    assert_eq!(got, Errno::NotEmpty);

    let got = translate::translate(
        Op::Rename,
        Platform::Windows,
        native,
        &Operands::two("file", "dst"),
        &probe,
    );
    assert_eq!(got, Errno::IsDir);
}
