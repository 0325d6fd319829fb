use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;
use vfs_core::{Errno, FileStatus, FsFile, OpenFlags, Timespec, VfsResult};

use crate::inode::{Inode, NodeKind, Tree};

/// An open node of a [`crate::MemFs`].
///
/// The node stays allocated while the handle is open, even if it is
/// unlinked in the meantime.
#[derive(Debug)]
pub struct MemFile {
    tree: Arc<RwLock<Tree>>,
    inode: Inode,
    readable: bool,
    writable: bool,
    append: bool,
    closed: bool,
}

impl MemFile {
    /// Registers a new handle on `inode`. The caller holds the write guard.
    pub(crate) fn open(
        tree: &Arc<RwLock<Tree>>,
        guard: &mut Tree,
        inode: Inode,
        flags: OpenFlags,
    ) -> VfsResult<Self> {
        guard.node_mut(inode)?.open_handles += 1;
        Ok(Self {
            tree: Arc::clone(tree),
            inode,
            readable: flags.is_readable(),
            writable: flags.is_writable(),
            append: flags.contains(OpenFlags::APPEND),
            closed: false,
        })
    }

    fn release(&mut self) {
        self.closed = true;
        let mut tree = self.tree.write();
        if let Ok(node) = tree.node_mut(self.inode) {
            node.open_handles = node.open_handles.saturating_sub(1);
        }
        tree.collect(self.inode);
    }
}

impl FsFile for MemFile {
    fn stat(&self) -> VfsResult<FileStatus> {
        if self.closed {
            return Err(Errno::Badf);
        }
        self.tree.read().status(self.inode)
    }

    fn close(&mut self) -> VfsResult<()> {
        if self.closed {
            return Err(Errno::Badf);
        }
        trace!(inode = self.inode, "closing memfs handle");
        self.release();
        Ok(())
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> VfsResult<usize> {
        if self.closed || !self.readable {
            return Err(Errno::Badf);
        }
        let tree = self.tree.read();
        match &tree.node(self.inode)?.kind {
            NodeKind::File(data) => {
                let start = usize::try_from(offset).map_err(|_| Errno::Inval)?;
                if start >= data.len() {
                    return Ok(0);
                }
                let n = buf.len().min(data.len() - start);
                buf[..n].copy_from_slice(&data[start..start + n]);
                Ok(n)
            }
            NodeKind::Directory(_) => Err(Errno::IsDir),
            NodeKind::Symlink(_) => Err(Errno::Badf),
        }
    }

    fn write_at(&self, buf: &[u8], offset: u64) -> VfsResult<usize> {
        if self.closed || !self.writable {
            return Err(Errno::Badf);
        }
        let mut tree = self.tree.write();
        let limit = tree.max_file_size;
        let node = tree.node_mut(self.inode)?;
        let NodeKind::File(data) = &mut node.kind else {
            return Err(Errno::Badf);
        };
        let start = if self.append {
            data.len()
        } else {
            usize::try_from(offset).map_err(|_| Errno::Inval)?
        };
        let end = start.checked_add(buf.len()).ok_or(Errno::Inval)?;
        if limit.is_some_and(|limit| end as u64 > limit) {
            return Err(Errno::Inval);
        }
        if data.len() < end {
            data.try_reserve(end - data.len()).map_err(|err| {
                trace!(inode = self.inode, end, %err, "memfs file cannot grow");
                Errno::Inval
            })?;
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(buf);
        node.touch(Timespec::now());
        Ok(buf.len())
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        if !self.closed {
            self.release();
        }
    }
}
