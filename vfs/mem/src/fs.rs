//! The in-memory backend.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::trace;
use vfs_core::{
    Errno, FileKind, FileMode, FileStatus, FileSystem, FsFile, OpenFlags, Times, Timespec,
    VfsResult, expand_times, sanitize_open_flags,
};

use crate::MemFsConfig;
use crate::handle::MemFile;
use crate::inode::{Node, NodeKind, Tree};

static NEXT_DEV: AtomicU64 = AtomicU64::new(1);

/// Open flags the node open honors itself; the placeholders are enforced
/// through the sanitization shim.
const NATIVE_OPEN_FLAGS: OpenFlags = OpenFlags::all().difference(OpenFlags::PLACEHOLDERS);

/// An in-memory filesystem.
///
/// Cloning is cheap and yields a second view of the same tree. Every
/// namespace operation runs its checks and its mutation under one write
/// guard.
#[derive(Clone, Debug)]
pub struct MemFs {
    tree: Arc<RwLock<Tree>>,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new(MemFsConfig::default())
    }
}

impl MemFs {
    pub fn new(config: MemFsConfig) -> Self {
        let dev = NEXT_DEV.fetch_add(1, Ordering::Relaxed);
        Self {
            tree: Arc::new(RwLock::new(Tree::new(dev, &config))),
        }
    }
}

impl FileSystem for MemFs {
    fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode) -> VfsResult<Box<dyn FsFile>> {
        flags.validate()?;
        let sanitized = sanitize_open_flags(flags, NATIVE_OPEN_FLAGS);
        let mut tree = self.tree.write();

        let link = tree.walk(path, false)?;
        if link.entry.is_some() && flags.contains(OpenFlags::CREATE | OpenFlags::EXCL) {
            // Exclusive creation never follows the final component.
            return Err(Errno::Exist);
        }
        let link_status = link.entry.map(|inode| tree.status(inode)).transpose()?;
        sanitized.check_link(link_status.as_ref())?;

        let walk = tree.walk(path, true)?;
        let parent = walk.parent();
        let inode = match (walk.entry, walk.name) {
            (Some(inode), _) => {
                let node = tree.node(inode)?;
                sanitized.check_opened(&tree.status(inode)?)?;
                if node.is_dir() && flags.has_write_intent() {
                    return Err(Errno::IsDir);
                }
                if flags.contains(OpenFlags::TRUNC) {
                    let node = tree.node_mut(inode)?;
                    if let NodeKind::File(data) = &mut node.kind {
                        data.clear();
                        node.touch(Timespec::now());
                    }
                }
                inode
            }
            (None, Some(name)) if flags.contains(OpenFlags::CREATE) => {
                let mode = perm.without(tree.umask);
                trace!(path, mode = mode.bits(), "creating memfs file");
                tree.insert(parent, name, Node::new(NodeKind::File(Vec::new()), mode))?
            }
            (None, _) => return Err(Errno::NoEnt),
        };

        let file = MemFile::open(&self.tree, &mut tree, inode, sanitized.native)?;
        Ok(Box::new(file))
    }

    fn lstat(&self, path: &str) -> VfsResult<FileStatus> {
        let tree = self.tree.read();
        let inode = tree.walk(path, false)?.existing()?;
        tree.status(inode)
    }

    fn stat(&self, path: &str) -> VfsResult<FileStatus> {
        let tree = self.tree.read();
        let inode = tree.walk(path, true)?.existing()?;
        tree.status(inode)
    }

    fn mkdir(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        let mut tree = self.tree.write();
        let walk = tree.walk(path, false)?;
        if let Some(inode) = walk.entry {
            return match tree.followed_kind(inode, &walk.dirs) {
                Some(kind) if !kind.is_dir() => Err(Errno::NotDir),
                _ => Err(Errno::Exist),
            };
        }
        let parent = walk.parent();
        let Some(name) = walk.name else {
            return Err(Errno::Exist);
        };
        let node = Node::new(NodeKind::Directory(BTreeMap::new()), FileMode::new(perm.bits()));
        tree.insert(parent, name, node)?;
        Ok(())
    }

    fn chmod(&self, path: &str, perm: FileMode) -> VfsResult<()> {
        let mut tree = self.tree.write();
        let inode = tree.walk(path, true)?.existing()?;
        let node = tree.node_mut(inode)?;
        node.mode = FileMode::new(perm.bits());
        node.ctime = Timespec::now();
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> VfsResult<()> {
        let mut tree = self.tree.write();
        let source = tree.walk(from, false)?;
        let target = tree.walk(to, false)?;
        // Only the root lacks a name; it is neither moved nor replaced.
        let (Some(source_name), Some(target_name)) = (source.name.clone(), target.name.clone())
        else {
            return Err(Errno::Inval);
        };
        let source_inode = source.existing()?;

        let source_is_dir = tree.node(source_inode)?.is_dir();
        if source_is_dir && target.dirs.contains(&source_inode) {
            // A directory cannot move beneath itself.
            return Err(Errno::Inval);
        }

        if let Some(existing) = target.entry {
            if existing == source_inode {
                return Ok(());
            }
            let existing_node = tree.node(existing)?;
            match (source_is_dir, existing_node.is_dir()) {
                (false, true) => return Err(Errno::IsDir),
                (true, false) => return Err(Errno::NotDir),
                (true, true)
                    if existing_node
                        .children()
                        .is_some_and(|children| !children.is_empty()) =>
                {
                    return Err(Errno::NotEmpty);
                }
                _ => {}
            }
            tree.detach(target.parent(), &target_name)?;
        }

        let now = Timespec::now();
        let parent = tree.node_mut(source.parent())?;
        if let Some(children) = parent.children_mut() {
            children.remove(&source_name);
        }
        parent.touch(now);
        let parent = tree.node_mut(target.parent())?;
        if let Some(children) = parent.children_mut() {
            children.insert(target_name, source_inode);
        }
        parent.touch(now);
        tree.node_mut(source_inode)?.ctime = now;
        Ok(())
    }

    fn rmdir(&self, path: &str) -> VfsResult<()> {
        let mut tree = self.tree.write();
        let walk = tree.walk(path, false)?;
        let inode = walk.existing()?;
        let Some(name) = walk.name.as_deref() else {
            return Err(Errno::Inval);
        };
        match tree.node(inode)?.children() {
            None => return Err(Errno::NotDir),
            Some(children) if !children.is_empty() => return Err(Errno::NotEmpty),
            Some(_) => {}
        }
        tree.detach(walk.parent(), name)?;
        Ok(())
    }

    fn unlink(&self, path: &str) -> VfsResult<()> {
        let mut tree = self.tree.write();
        let walk = tree.walk(path, false)?;
        let inode = walk.existing()?;
        let Some(name) = walk.name.as_deref() else {
            return Err(Errno::IsDir);
        };
        if tree.node(inode)?.is_dir() {
            return Err(Errno::IsDir);
        }
        tree.detach(walk.parent(), name)?;
        Ok(())
    }

    fn link(&self, old: &str, new: &str) -> VfsResult<()> {
        let mut tree = self.tree.write();
        let source = tree.walk(old, false)?;
        let inode = source.existing()?;
        if source.name.is_none() || tree.node(inode)?.is_dir() {
            return Err(Errno::Perm);
        }

        let target = tree.walk(new, false)?;
        if let Some(existing) = target.entry {
            return match tree.node(existing)?.file_kind() {
                FileKind::Directory => Err(Errno::IsDir),
                _ => Err(Errno::Exist),
            };
        }
        let parent = target.parent();
        let Some(name) = target.name else {
            return Err(Errno::IsDir);
        };

        let now = Timespec::now();
        let parent = tree.node_mut(parent)?;
        if let Some(children) = parent.children_mut() {
            children.insert(name, inode);
        }
        parent.touch(now);
        let node = tree.node_mut(inode)?;
        node.links += 1;
        node.ctime = now;
        Ok(())
    }

    fn symlink(&self, target: &str, link: &str) -> VfsResult<()> {
        if target.is_empty() || target.contains('\0') {
            return Err(Errno::Perm);
        }
        let mut tree = self.tree.write();
        let walk = tree.walk(link, false)?;
        if walk.entry.is_some() {
            return Err(Errno::Exist);
        }
        let parent = walk.parent();
        let Some(name) = walk.name else {
            return Err(Errno::Exist);
        };
        let node = Node::new(NodeKind::Symlink(target.to_owned()), FileMode(0o777));
        tree.insert(parent, name, node)?;
        Ok(())
    }

    fn readlink(&self, path: &str) -> VfsResult<String> {
        let tree = self.tree.read();
        let inode = tree.walk(path, false)?.existing()?;
        match &tree.node(inode)?.kind {
            NodeKind::Symlink(target) => Ok(target.clone()),
            _ => Err(Errno::Inval),
        }
    }

    fn utimens(&self, path: &str, times: Times, follow: bool) -> VfsResult<()> {
        let [atime, mtime] = expand_times(times);
        let mut tree = self.tree.write();
        let inode = tree.walk(path, follow)?.existing()?;
        let now = Timespec::now();
        let node = tree.node_mut(inode)?;
        if let Some(atime) = atime.resolve(now) {
            node.atime = atime;
        }
        if let Some(mtime) = mtime.resolve(now) {
            node.mtime = mtime;
        }
        node.ctime = now;
        Ok(())
    }
}
