//! Backend-agnostic behavioral checks.
//!
//! Each check receives a fresh, empty backend and panics on the first
//! deviation, so backend crates can run the whole suite from a plain `#[test]`:
//!
//! ```ignore
//! vfs_core::conformance::run_all(|| MemFs::new(MemFsConfig::default()));
//! ```

use tracing::debug;

use crate::{Errno, FileKind, FileMode, FileSystem, OpenFlags, SetTime, Timespec, VfsResult};

pub type Check = fn(&dyn FileSystem);

pub const CHECKS: &[(&str, Check)] = &[
    ("root_is_a_directory", root_is_a_directory),
    ("missing_entries_are_noent", missing_entries_are_noent),
    ("unlink_twice", unlink_twice),
    ("mkdir_conflicts", mkdir_conflicts),
    ("rename_replaces_files", rename_replaces_files),
    ("rename_kind_conflicts", rename_kind_conflicts),
    ("rmdir_rules", rmdir_rules),
    ("unlink_directory", unlink_directory),
    ("symlinks", symlinks),
    ("dot_dot_after_symlink", dot_dot_after_symlink),
    ("hard_links", hard_links),
    ("open_rules", open_rules),
    ("exclusive_create_on_symlink", exclusive_create_on_symlink),
    ("handle_lifecycle", handle_lifecycle),
    ("utimens", utimens),
    ("chmod_reads_back", chmod_reads_back),
];

/// Runs every check, each against a backend freshly produced by `make`.
pub fn run_all<B: FileSystem>(make: impl Fn() -> B) {
    for (name, check) in CHECKS {
        debug!(check = name, "running conformance check");
        let fs = make();
        check(&fs);
    }
}

/// Every operation of a backend that implements nothing reports `NoSys`.
pub fn check_unimplemented(fs: &dyn FileSystem) {
    let nosys = Err::<(), _>(Errno::NoSys);
    assert_eq!(fs.open_file("f", OpenFlags::READ, FileMode(0)).err(), Some(Errno::NoSys));
    assert_eq!(fs.lstat("f").err(), Some(Errno::NoSys));
    assert_eq!(fs.stat("f").err(), Some(Errno::NoSys));
    assert_eq!(fs.mkdir("d", FileMode(0o755)), nosys);
    assert_eq!(fs.chmod("f", FileMode(0o644)), nosys);
    assert_eq!(fs.rename("f", "g"), nosys);
    assert_eq!(fs.rmdir("d"), nosys);
    assert_eq!(fs.unlink("f"), nosys);
    assert_eq!(fs.link("f", "g"), nosys);
    assert_eq!(fs.symlink("f", "l"), nosys);
    assert_eq!(fs.readlink("l").err(), Some(Errno::NoSys));
    assert_eq!(fs.utimens("f", None, true), nosys);
}

fn ok<T>(result: VfsResult<T>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(errno) => panic!("{what}: unexpected {}", errno.name()),
    }
}

fn errno<T>(result: VfsResult<T>) -> Option<Errno> {
    result.err()
}

fn kind(fs: &dyn FileSystem, path: &str) -> FileKind {
    ok(fs.lstat(path), path).kind
}

fn write_file(fs: &dyn FileSystem, path: &str, contents: &[u8]) {
    let mut file = ok(
        fs.open_file(
            path,
            OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNC,
            FileMode(0o644),
        ),
        "create file",
    );
    let written = ok(file.write_at(contents, 0), "write file");
    assert_eq!(written, contents.len());
    ok(file.close(), "close file");
}

fn read_file(fs: &dyn FileSystem, path: &str) -> Vec<u8> {
    let mut file = ok(fs.open_file(path, OpenFlags::READ, FileMode(0)), "open file");
    let size = ok(file.stat(), "stat handle").size as usize;
    let mut buf = vec![0; size];
    let mut read = 0;
    while read < size {
        let n = ok(file.read_at(&mut buf[read..], read as u64), "read file");
        if n == 0 {
            break;
        }
        read += n;
    }
    buf.truncate(read);
    ok(file.close(), "close file");
    buf
}

fn root_is_a_directory(fs: &dyn FileSystem) {
    for root in ["", ".", "/"] {
        assert_eq!(ok(fs.stat(root), "stat root").kind, FileKind::Directory);
    }
}

fn missing_entries_are_noent(fs: &dyn FileSystem) {
    let noent = Some(Errno::NoEnt);
    assert_eq!(errno(fs.lstat("missing")), noent);
    assert_eq!(errno(fs.stat("missing")), noent);
    assert_eq!(errno(fs.chmod("missing", FileMode(0o644))), noent);
    assert_eq!(errno(fs.rmdir("missing")), noent);
    assert_eq!(errno(fs.unlink("missing")), noent);
    assert_eq!(errno(fs.readlink("missing")), noent);
    assert_eq!(errno(fs.utimens("missing", None, true)), noent);
    assert_eq!(errno(fs.rename("missing", "other")), noent);
    assert_eq!(errno(fs.link("missing", "other")), noent);
    assert_eq!(errno(fs.open_file("missing", OpenFlags::READ, FileMode(0))), noent);
    assert_eq!(errno(fs.mkdir("missing/dir", FileMode(0o755))), noent);
    assert_eq!(
        errno(fs.open_file("missing/file", OpenFlags::WRITE | OpenFlags::CREATE, FileMode(0o644))),
        noent
    );
}

fn unlink_twice(fs: &dyn FileSystem) {
    write_file(fs, "file", b"data");
    ok(fs.unlink("file"), "first unlink");
    assert_eq!(errno(fs.unlink("file")), Some(Errno::NoEnt));
    assert_eq!(errno(fs.lstat("file")), Some(Errno::NoEnt));
}

fn mkdir_conflicts(fs: &dyn FileSystem) {
    ok(fs.mkdir("dir", FileMode(0o755)), "mkdir");
    assert_eq!(kind(fs, "dir"), FileKind::Directory);
    assert_eq!(errno(fs.mkdir("dir", FileMode(0o755))), Some(Errno::Exist));

    write_file(fs, "file", b"");
    assert_eq!(errno(fs.mkdir("file", FileMode(0o755))), Some(Errno::NotDir));
    assert_eq!(kind(fs, "file"), FileKind::RegularFile);

    ok(fs.mkdir("dir/nested", FileMode(0o755)), "mkdir nested");
    assert_eq!(kind(fs, "dir/nested"), FileKind::Directory);
}

fn rename_replaces_files(fs: &dyn FileSystem) {
    write_file(fs, "a", b"alpha");
    write_file(fs, "b", b"beta");
    ok(fs.rename("a", "b"), "rename over file");
    assert_eq!(errno(fs.lstat("a")), Some(Errno::NoEnt));
    assert_eq!(read_file(fs, "b"), b"alpha");

    ok(fs.mkdir("dir", FileMode(0o755)), "mkdir");
    ok(fs.rename("b", "dir/c"), "rename into dir");
    assert_eq!(read_file(fs, "dir/c"), b"alpha");

    ok(fs.rename("dir", "moved"), "rename dir");
    assert_eq!(read_file(fs, "moved/c"), b"alpha");

    assert_eq!(errno(fs.rename("moved/c", "nowhere/c")), Some(Errno::NoEnt));
    assert_eq!(read_file(fs, "moved/c"), b"alpha");
}

fn rename_kind_conflicts(fs: &dyn FileSystem) {
    write_file(fs, "file", b"keep");
    ok(fs.mkdir("full", FileMode(0o755)), "mkdir full");
    write_file(fs, "full/child", b"child");
    ok(fs.mkdir("dir", FileMode(0o755)), "mkdir dir");

    assert_eq!(errno(fs.rename("file", "full")), Some(Errno::IsDir));
    assert_eq!(errno(fs.rename("dir", "file")), Some(Errno::NotDir));
    assert_eq!(errno(fs.rename("dir", "full")), Some(Errno::NotEmpty));

    // Nothing moved.
    assert_eq!(read_file(fs, "file"), b"keep");
    assert_eq!(read_file(fs, "full/child"), b"child");
    assert_eq!(kind(fs, "dir"), FileKind::Directory);
}

fn rmdir_rules(fs: &dyn FileSystem) {
    ok(fs.mkdir("dir", FileMode(0o755)), "mkdir");
    write_file(fs, "dir/file", b"");
    assert_eq!(errno(fs.rmdir("dir")), Some(Errno::NotEmpty));
    assert_eq!(errno(fs.rmdir("dir/file")), Some(Errno::NotDir));
    ok(fs.unlink("dir/file"), "unlink");
    ok(fs.rmdir("dir"), "rmdir");
    assert_eq!(errno(fs.lstat("dir")), Some(Errno::NoEnt));

    // The root stays, even when empty.
    for root in ["", "/", "dir/.."] {
        assert_eq!(errno(fs.rmdir(root)), Some(Errno::Inval), "rmdir {root:?}");
    }
    assert_eq!(errno(fs.rename("/", "moved")), Some(Errno::Inval));
    assert_eq!(errno(fs.rename("missing", "..")), Some(Errno::Inval));
    assert_eq!(ok(fs.stat(""), "stat root").kind, FileKind::Directory);
    assert_eq!(errno(fs.lstat("moved")), Some(Errno::NoEnt));
}

fn unlink_directory(fs: &dyn FileSystem) {
    ok(fs.mkdir("dir", FileMode(0o755)), "mkdir");
    assert_eq!(errno(fs.unlink("dir")), Some(Errno::IsDir));
    assert_eq!(kind(fs, "dir"), FileKind::Directory);
}

fn symlinks(fs: &dyn FileSystem) {
    write_file(fs, "file", b"data");
    ok(fs.symlink("file", "link"), "symlink");
    assert_eq!(ok(fs.readlink("link"), "readlink"), "file");
    assert_eq!(kind(fs, "link"), FileKind::Symlink);
    assert_eq!(ok(fs.stat("link"), "stat link").kind, FileKind::RegularFile);
    assert_eq!(read_file(fs, "link"), b"data");
    assert_eq!(errno(fs.symlink("file", "link")), Some(Errno::Exist));
    assert_eq!(errno(fs.symlink("elsewhere", "file")), Some(Errno::Exist));

    ok(fs.symlink("nowhere", "dangling"), "dangling symlink");
    assert_eq!(kind(fs, "dangling"), FileKind::Symlink);
    assert_eq!(errno(fs.stat("dangling")), Some(Errno::NoEnt));

    ok(fs.symlink("a/../b", "verbatim"), "symlink with dot-dot");
    assert_eq!(ok(fs.readlink("verbatim"), "readlink"), "a/../b");

    assert_eq!(errno(fs.readlink("file")), Some(Errno::Inval));

    ok(fs.unlink("link"), "unlink link");
    assert_eq!(read_file(fs, "file"), b"data");
}

fn dot_dot_after_symlink(fs: &dyn FileSystem) {
    ok(fs.mkdir("a", FileMode(0o755)), "mkdir a");
    ok(fs.mkdir("a/b", FileMode(0o755)), "mkdir a/b");
    ok(fs.symlink("a/b", "l"), "symlink");
    let root = ok(fs.stat(""), "stat root");
    assert_eq!(ok(fs.stat("l/.."), "stat l/..").ino, root.ino);
    assert_eq!(ok(fs.stat("a/b/.."), "stat a/b/..").ino, ok(fs.stat("a"), "stat a").ino);
    assert_eq!(ok(fs.stat("l"), "stat l").ino, ok(fs.stat("a/b"), "stat a/b").ino);
}

fn hard_links(fs: &dyn FileSystem) {
    write_file(fs, "file", b"shared");
    ok(fs.link("file", "alias"), "link");
    let original = ok(fs.lstat("file"), "lstat file");
    let alias = ok(fs.lstat("alias"), "lstat alias");
    assert_eq!(original.nlink, 2);
    assert_eq!(original.ino, alias.ino);
    assert_eq!(read_file(fs, "alias"), b"shared");

    assert_eq!(errno(fs.link("file", "alias")), Some(Errno::Exist));
    ok(fs.mkdir("dir", FileMode(0o755)), "mkdir");
    assert_eq!(errno(fs.link("file", "dir")), Some(Errno::IsDir));
    assert_eq!(errno(fs.link("dir", "dir2")), Some(Errno::Perm));

    ok(fs.unlink("file"), "unlink original");
    assert_eq!(read_file(fs, "alias"), b"shared");
    assert_eq!(ok(fs.lstat("alias"), "lstat alias").nlink, 1);
}

fn open_rules(fs: &dyn FileSystem) {
    let create = OpenFlags::WRITE | OpenFlags::CREATE;
    let mut file = ok(fs.open_file("new", create, FileMode(0o644)), "create");
    ok(file.close(), "close");
    assert_eq!(kind(fs, "new"), FileKind::RegularFile);
    assert_eq!(
        errno(fs.open_file("new", create | OpenFlags::EXCL, FileMode(0o644))),
        Some(Errno::Exist)
    );

    ok(fs.mkdir("dir", FileMode(0o755)), "mkdir");
    assert_eq!(errno(fs.open_file("dir", OpenFlags::WRITE, FileMode(0))), Some(Errno::IsDir));
    let mut dir = ok(fs.open_file("dir", OpenFlags::READ, FileMode(0)), "open dir");
    assert_eq!(ok(dir.stat(), "stat dir handle").kind, FileKind::Directory);
    ok(dir.close(), "close dir");

    let directory = OpenFlags::READ | OpenFlags::DIRECTORY;
    assert_eq!(errno(fs.open_file("new", directory, FileMode(0))), Some(Errno::NotDir));
    let mut dir = ok(fs.open_file("dir", directory, FileMode(0)), "open with DIRECTORY");
    ok(dir.close(), "close dir");
    assert_eq!(
        errno(fs.open_file("fresh", OpenFlags::CREATE | OpenFlags::DIRECTORY, FileMode(0o755))),
        Some(Errno::Inval)
    );

    ok(fs.symlink("new", "link"), "symlink");
    assert_eq!(
        errno(fs.open_file("link", OpenFlags::READ | OpenFlags::NOFOLLOW, FileMode(0))),
        Some(Errno::Loop)
    );
    let mut via_link = ok(fs.open_file("link", OpenFlags::READ, FileMode(0)), "open via link");
    assert_eq!(ok(via_link.stat(), "stat").kind, FileKind::RegularFile);
    ok(via_link.close(), "close");

    write_file(fs, "trunc", b"hello");
    let mut file = ok(
        fs.open_file("trunc", OpenFlags::WRITE | OpenFlags::TRUNC, FileMode(0)),
        "open with TRUNC",
    );
    assert_eq!(ok(file.stat(), "stat").size, 0);
    ok(file.close(), "close");
}

fn exclusive_create_on_symlink(fs: &dyn FileSystem) {
    let exclusive = OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::EXCL;
    ok(fs.symlink("target", "dangling"), "dangling symlink");
    assert_eq!(errno(fs.open_file("dangling", exclusive, FileMode(0o644))), Some(Errno::Exist));
    assert_eq!(errno(fs.lstat("target")), Some(Errno::NoEnt));

    write_file(fs, "file", b"keep");
    ok(fs.symlink("file", "live"), "symlink");
    assert_eq!(errno(fs.open_file("live", exclusive, FileMode(0o644))), Some(Errno::Exist));
    assert_eq!(read_file(fs, "file"), b"keep");
}

fn handle_lifecycle(fs: &dyn FileSystem) {
    write_file(fs, "file", b"abc");

    let mut reader = ok(fs.open_file("file", OpenFlags::READ, FileMode(0)), "open");
    assert_eq!(errno(reader.write_at(b"x", 0)), Some(Errno::Badf));
    ok(reader.close(), "close");
    assert_eq!(errno(reader.close()), Some(Errno::Badf));
    let mut buf = [0u8; 3];
    assert_eq!(errno(reader.read_at(&mut buf, 0)), Some(Errno::Badf));

    let mut appender = ok(
        fs.open_file("file", OpenFlags::WRITE | OpenFlags::APPEND, FileMode(0)),
        "open for append",
    );
    ok(appender.write_at(b"def", 0), "append");
    ok(appender.close(), "close");
    assert_eq!(read_file(fs, "file"), b"abcdef");
}

fn utimens(fs: &dyn FileSystem) {
    write_file(fs, "file", b"");
    let at = |secs| SetTime::At(Timespec::new(secs, 0));

    ok(fs.utimens("file", Some([at(1_000), at(2_000)]), true), "utimens at");
    let status = ok(fs.stat("file"), "stat");
    assert_eq!(status.atime, Timespec::new(1_000, 0));
    assert_eq!(status.mtime, Timespec::new(2_000, 0));

    ok(fs.utimens("file", Some([SetTime::Omit, at(3_000)]), true), "utimens omit");
    let status = ok(fs.stat("file"), "stat");
    assert_eq!(status.atime, Timespec::new(1_000, 0));
    assert_eq!(status.mtime, Timespec::new(3_000, 0));

    ok(fs.utimens("file", None, true), "utimens now");
    let status = ok(fs.stat("file"), "stat");
    assert!(status.atime > Timespec::new(3_000, 0));
    assert!(status.mtime > Timespec::new(3_000, 0));

    ok(fs.utimens("file", Some([at(5_000), at(5_000)]), true), "reset");
    ok(fs.symlink("file", "link"), "symlink");
    ok(fs.utimens("link", Some([at(7_000), at(7_000)]), false), "utimens nofollow");
    assert_eq!(ok(fs.lstat("link"), "lstat").mtime, Timespec::new(7_000, 0));
    assert_eq!(ok(fs.stat("file"), "stat").mtime, Timespec::new(5_000, 0));

    ok(fs.utimens("link", Some([at(9_000), at(9_000)]), true), "utimens follow");
    assert_eq!(ok(fs.stat("file"), "stat").mtime, Timespec::new(9_000, 0));

    ok(fs.utimens("file", None, false), "utimens now without following");
    let status = ok(fs.stat("file"), "stat");
    assert!(status.atime > Timespec::new(9_000, 0));
    assert!(status.mtime > Timespec::new(9_000, 0));
}

fn chmod_reads_back(fs: &dyn FileSystem) {
    write_file(fs, "file", b"");
    ok(fs.chmod("file", FileMode(0o600)), "chmod");
    assert_eq!(ok(fs.lstat("file"), "lstat").mode, FileMode(0o600));
    ok(fs.chmod("file", FileMode(0o644)), "chmod");
    assert_eq!(ok(fs.lstat("file"), "lstat").mode, FileMode(0o644));

    ok(fs.mkdir("dir", FileMode(0o755)), "mkdir");
    ok(fs.chmod("dir", FileMode(0o700)), "chmod dir");
    assert_eq!(ok(fs.stat("dir"), "stat").mode, FileMode(0o700));
}
