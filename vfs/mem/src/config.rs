#[derive(Clone, Debug)]
pub struct MemFsConfig {
    /// Bits cleared from the permission of newly created files.
    ///
    /// Directories and permission changes use the requested bits as given.
    pub umask: u32,
    /// How many symbolic links a single path resolution may follow before
    /// failing with `Loop`.
    pub max_symlink_depth: u16,
    /// Largest size a single file may grow to. Writes past it fail with
    /// `Inval`; `None` leaves only the allocator's limit.
    pub max_file_size: Option<u64>,
}

impl Default for MemFsConfig {
    fn default() -> Self {
        Self {
            umask: 0o022,
            max_symlink_depth: 40,
            max_file_size: None,
        }
    }
}
