use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of a directory entry, as observed by `lstat` or `stat`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    RegularFile,
    Directory,
    Symlink,
    /// Devices, sockets, FIFOs and anything else a backend cannot classify.
    Other,
}

impl FileKind {
    pub fn is_dir(self) -> bool {
        self == FileKind::Directory
    }

    pub fn is_symlink(self) -> bool {
        self == FileKind::Symlink
    }
}

/// POSIX permission bits (`0o7777`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileMode(pub u32);

impl FileMode {
    pub const MASK: u32 = 0o7777;
    pub const OWNER_WRITE: u32 = 0o200;

    pub const fn new(bits: u32) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(self) -> u32 {
        self.0 & Self::MASK
    }

    pub const fn is_owner_writable(self) -> bool {
        self.0 & Self::OWNER_WRITE != 0
    }

    pub const fn without(self, umask: u32) -> Self {
        Self::new(self.0 & !umask)
    }
}

impl From<u32> for FileMode {
    fn from(bits: u32) -> Self {
        Self::new(bits)
    }
}

/// A point in time relative to the Unix epoch, with nanosecond precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timespec {
    pub secs: i64,
    pub nanos: u32,
}

impl Timespec {
    pub const fn new(secs: i64, nanos: u32) -> Self {
        Self { secs, nanos }
    }

    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Self {
                secs: d.as_secs() as i64,
                nanos: d.subsec_nanos(),
            },
            Err(before) => {
                let d = before.duration();
                let mut secs = -(d.as_secs() as i64);
                let mut nanos = d.subsec_nanos();
                if nanos > 0 {
                    secs -= 1;
                    nanos = 1_000_000_000 - nanos;
                }
                Self { secs, nanos }
            }
        }
    }

    pub fn to_system_time(self) -> SystemTime {
        let nanos = std::time::Duration::from_nanos(u64::from(self.nanos));
        if self.secs >= 0 {
            UNIX_EPOCH + std::time::Duration::from_secs(self.secs as u64) + nanos
        } else {
            UNIX_EPOCH - std::time::Duration::from_secs(self.secs.unsigned_abs()) + nanos
        }
    }
}

/// One half of a `utimens` request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetTime {
    /// Use the current time.
    Now,
    /// Leave the timestamp unchanged.
    Omit,
    At(Timespec),
}

impl SetTime {
    /// The new value of the timestamp, or `None` when it should stay as it is.
    pub fn resolve(self, now: Timespec) -> Option<Timespec> {
        match self {
            SetTime::Now => Some(now),
            SetTime::Omit => None,
            SetTime::At(ts) => Some(ts),
        }
    }
}

/// `[atime, mtime]`; `None` means both are set to the current time.
pub type Times = Option<[SetTime; 2]>;

/// Expands the `None` shorthand of a [`Times`] value.
pub fn expand_times(times: Times) -> [SetTime; 2] {
    times.unwrap_or([SetTime::Now, SetTime::Now])
}

/// Attributes of a directory entry.
///
/// Backends that cannot tell the three timestamps apart report the same
/// value for all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStatus {
    pub dev: u64,
    pub ino: u64,
    pub kind: FileKind,
    pub mode: FileMode,
    pub nlink: u64,
    pub size: u64,
    pub atime: Timespec,
    pub mtime: Timespec,
    pub ctime: Timespec,
}

impl FileStatus {
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn timespec_before_epoch_keeps_nanos_positive() {
        let t = UNIX_EPOCH - Duration::from_millis(1500);
        let ts = Timespec::from_system_time(t);
        assert_eq!(ts, Timespec::new(-2, 500_000_000));
        assert_eq!(ts.to_system_time(), t);
    }

    #[test]
    fn timespec_after_epoch() {
        let t = UNIX_EPOCH + Duration::new(10, 7);
        assert_eq!(Timespec::from_system_time(t), Timespec::new(10, 7));
    }

    #[test]
    fn omitted_time_resolves_to_none() {
        let now = Timespec::new(5, 0);
        assert_eq!(SetTime::Omit.resolve(now), None);
        assert_eq!(SetTime::Now.resolve(now), Some(now));
        assert_eq!(
            SetTime::At(Timespec::new(1, 2)).resolve(now),
            Some(Timespec::new(1, 2))
        );
        assert_eq!(expand_times(None), [SetTime::Now, SetTime::Now]);
    }

    #[test]
    fn mode_is_masked() {
        assert_eq!(FileMode::new(0o170644).bits(), 0o644);
        assert_eq!(FileMode::new(0o666).without(0o022), FileMode(0o644));
        assert!(!FileMode(0o444).is_owner_writable());
    }
}
