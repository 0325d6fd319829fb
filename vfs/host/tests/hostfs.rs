#![cfg(unix)]

use std::sync::{Arc, Barrier};
use std::thread;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vfs_core::{
    Errno, FileKind, FileMode, FileSystem, OpenFlags, Platform, ReadOnlyFs, SetTime, Timespec,
};
use vfs_host::{HostFs, HostFsConfig};

fn host() -> (TempDir, HostFs) {
    let temp = tempfile::tempdir().expect("tempdir");
    let fs = HostFs::new(HostFsConfig::new(temp.path())).expect("hostfs");
    (temp, fs)
}

#[test_log::test]
fn config_rejects_bad_roots() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = HostFs::new(HostFsConfig::new(temp.path().join("missing")));
    assert_eq!(missing.err(), Some(Errno::NoEnt));

    let file = temp.path().join("file");
    std::fs::write(&file, b"").expect("write");
    assert_eq!(HostFs::new(HostFsConfig::new(file)).err(), Some(Errno::NotDir));
}

#[test_log::test]
fn dot_dot_stays_below_the_root() {
    let (temp, fs) = host();
    std::fs::write(temp.path().join("inside"), b"x").expect("write");
    assert_eq!(fs.lstat("../../inside").expect("lstat").size, 1);
    assert_eq!(fs.lstat("/inside").expect("lstat").size, 1);
    fs.mkdir("../escape", FileMode(0o755)).expect("mkdir");
    assert!(temp.path().join("escape").is_dir());
}

#[test_log::test]
fn root_is_never_removed() {
    let (temp, fs) = host();
    for root in ["/", "", "sub/.."] {
        assert_eq!(fs.rmdir(root), Err(Errno::Inval));
    }
    assert_eq!(fs.rename("/", "moved"), Err(Errno::Inval));
    assert_eq!(fs.rename("missing", ".."), Err(Errno::Inval));
    assert!(temp.path().is_dir());
    assert_eq!(fs.stat("").expect("stat").kind, FileKind::Directory);
}

#[test_log::test]
fn dot_dot_after_symlink_is_lexical() {
    let (temp, fs) = host();
    std::fs::create_dir_all(temp.path().join("a/b")).expect("mkdir");
    fs.symlink("a/b", "l").expect("symlink");
    let root = fs.stat("").expect("stat root");
    assert_eq!(fs.stat("l/..").expect("stat").ino, root.ino);
}

#[test_log::test]
fn exclusive_create_does_not_follow_symlinks() {
    let (temp, fs) = host();
    fs.symlink("target", "dangling").expect("symlink");
    assert_eq!(
        fs.open_file(
            "dangling",
            OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::EXCL,
            FileMode(0o644)
        )
        .err(),
        Some(Errno::Exist)
    );
    assert!(!temp.path().join("target").exists());
}

#[test_log::test]
fn writes_land_on_the_host() {
    let (temp, fs) = host();
    let mut file = fs
        .open_file(
            "data",
            OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::EXCL,
            FileMode(0o640),
        )
        .expect("create");
    file.write_at(b"hello", 0).expect("write");
    file.write_at(b"J", 0).expect("overwrite");
    file.close().expect("close");

    assert_eq!(std::fs::read(temp.path().join("data")).expect("read"), b"Jello");
    assert_eq!(
        fs.open_file("data", OpenFlags::CREATE | OpenFlags::EXCL, FileMode(0o640))
            .err(),
        Some(Errno::Exist)
    );
}

#[test_log::test]
fn nul_in_path_is_invalid() {
    let (_temp, fs) = host();
    assert_eq!(fs.lstat("a\0b").err(), Some(Errno::Inval));
    assert_eq!(fs.unlink("a\0b"), Err(Errno::Inval));
    assert_eq!(fs.symlink("a\0b", "link"), Err(Errno::Perm));
    assert_eq!(fs.symlink("", "link"), Err(Errno::Perm));
}

#[test_log::test]
fn mkdir_through_symlink_to_file_is_not_dir() {
    let (temp, fs) = host();
    std::fs::write(temp.path().join("file"), b"").expect("write");
    fs.symlink("file", "link").expect("symlink");
    assert_eq!(fs.mkdir("link", FileMode(0o755)), Err(Errno::NotDir));
}

#[test_log::test]
fn unlink_removes_the_link_not_the_target() {
    let (temp, fs) = host();
    fs.mkdir("dir", FileMode(0o755)).expect("mkdir");
    fs.symlink("dir", "link").expect("symlink");
    assert_eq!(fs.stat("link").expect("stat").kind, FileKind::Directory);
    assert_eq!(fs.rmdir("link"), Err(Errno::NotDir));
    fs.unlink("link").expect("unlink");
    assert!(temp.path().join("dir").is_dir());
}

#[test_log::test]
fn utimens_keeps_nanoseconds() {
    let (_temp, fs) = host();
    drop(
        fs.open_file("file", OpenFlags::WRITE | OpenFlags::CREATE, FileMode(0o644))
            .expect("create"),
    );
    let ts = Timespec::new(1_600_000_000, 123_456_789);
    fs.utimens("file", Some([SetTime::At(ts), SetTime::At(ts)]), true)
        .expect("utimens");
    let status = fs.stat("file").expect("stat");
    assert_eq!(status.atime, ts);
    assert_eq!(status.mtime, ts);
}

#[test_log::test]
fn windows_quirks_can_be_selected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let fs = HostFs::new(HostFsConfig {
        root: temp.path().to_owned(),
        platform: Some(Platform::Windows),
    })
    .expect("hostfs");
    assert_eq!(fs.platform(), Platform::Windows);
    // Windows rmdir reports a file as missing; here the probe sees nothing.
    assert_eq!(fs.rmdir("missing"), Err(Errno::NoEnt));
    fs.mkdir("dir", FileMode(0o755)).expect("mkdir");
    assert_eq!(fs.mkdir("dir", FileMode(0o755)), Err(Errno::Exist));
}

#[test_log::test]
fn exclusive_create_has_one_winner() {
    let (_temp, fs) = host();
    let fs = Arc::new(fs);
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let fs = Arc::clone(&fs);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                fs.open_file(
                    "race",
                    OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::EXCL,
                    FileMode(0o644),
                )
                .map(drop)
            })
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("join"))
        .collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().filter_map(|r| r.err()).all(|e| e == Errno::Exist));
}

#[test_log::test]
fn read_only_view_over_host() {
    let (temp, fs) = host();
    std::fs::write(temp.path().join("file"), b"ro").expect("write");
    let view = ReadOnlyFs::new(fs);
    assert_eq!(view.stat("file").expect("stat").size, 2);
    assert_eq!(view.unlink("file"), Err(Errno::Rofs));
    assert_eq!(
        view.open_file("file", OpenFlags::WRITE, FileMode(0)).err(),
        Some(Errno::Rofs)
    );
    assert!(temp.path().join("file").exists());
}
