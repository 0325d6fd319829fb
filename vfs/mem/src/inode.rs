//! The node tree and path resolution.

use std::collections::{BTreeMap, VecDeque};

use slab::Slab;
use vfs_core::{Errno, FileKind, FileMode, FileStatus, Timespec, VfsResult, path};

use crate::MemFsConfig;

pub(crate) type Inode = usize;

/// The root directory. It is created with the tree and never freed.
pub(crate) const ROOT_INODE: Inode = 0;

#[derive(Debug)]
pub(crate) enum NodeKind {
    File(Vec<u8>),
    Directory(BTreeMap<String, Inode>),
    Symlink(String),
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) mode: FileMode,
    /// Directory entries naming this node.
    pub(crate) links: u64,
    pub(crate) open_handles: u32,
    pub(crate) atime: Timespec,
    pub(crate) mtime: Timespec,
    pub(crate) ctime: Timespec,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, mode: FileMode) -> Self {
        let now = Timespec::now();
        Self {
            kind,
            mode,
            links: 1,
            open_handles: 0,
            atime: now,
            mtime: now,
            ctime: now,
        }
    }

    pub(crate) fn file_kind(&self) -> FileKind {
        match self.kind {
            NodeKind::File(_) => FileKind::RegularFile,
            NodeKind::Directory(_) => FileKind::Directory,
            NodeKind::Symlink(_) => FileKind::Symlink,
        }
    }

    pub(crate) fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    pub(crate) fn children(&self) -> Option<&BTreeMap<String, Inode>> {
        match &self.kind {
            NodeKind::Directory(children) => Some(children),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Inode>> {
        match &mut self.kind {
            NodeKind::Directory(children) => Some(children),
            _ => None,
        }
    }

    pub(crate) fn touch(&mut self, now: Timespec) {
        self.mtime = now;
        self.ctime = now;
    }
}

/// Outcome of resolving a path.
///
/// `dirs` is the chain of directories walked to reach the final component,
/// root first; its last element is the parent of `name`. `name` is `None`
/// when the path does not end in a nameable entry (the root, or a trailing
/// `..`), in which case `entry` is that directory.
#[derive(Debug)]
pub(crate) struct Walk {
    pub(crate) dirs: Vec<Inode>,
    pub(crate) name: Option<String>,
    pub(crate) entry: Option<Inode>,
}

impl Walk {
    pub(crate) fn parent(&self) -> Inode {
        self.dirs.last().copied().unwrap_or(ROOT_INODE)
    }

    pub(crate) fn existing(&self) -> VfsResult<Inode> {
        self.entry.ok_or(Errno::NoEnt)
    }
}

#[derive(Debug)]
pub(crate) struct Tree {
    pub(crate) nodes: Slab<Node>,
    pub(crate) dev: u64,
    pub(crate) umask: u32,
    pub(crate) max_symlink_depth: u16,
    pub(crate) max_file_size: Option<u64>,
}

impl Tree {
    pub(crate) fn new(dev: u64, config: &MemFsConfig) -> Self {
        let mut nodes = Slab::new();
        let root = nodes.insert(Node::new(
            NodeKind::Directory(BTreeMap::new()),
            FileMode(0o755),
        ));
        debug_assert_eq!(root, ROOT_INODE);
        Self {
            nodes,
            dev,
            umask: config.umask,
            max_symlink_depth: config.max_symlink_depth,
            max_file_size: config.max_file_size,
        }
    }

    pub(crate) fn node(&self, inode: Inode) -> VfsResult<&Node> {
        self.nodes.get(inode).ok_or(Errno::Badf)
    }

    pub(crate) fn node_mut(&mut self, inode: Inode) -> VfsResult<&mut Node> {
        self.nodes.get_mut(inode).ok_or(Errno::Badf)
    }

    pub(crate) fn status(&self, inode: Inode) -> VfsResult<FileStatus> {
        let node = self.node(inode)?;
        let (size, nlink) = match &node.kind {
            NodeKind::File(data) => (data.len() as u64, node.links),
            NodeKind::Symlink(target) => (target.len() as u64, node.links),
            NodeKind::Directory(children) => {
                let subdirs = children
                    .values()
                    .filter(|child| self.nodes.get(**child).is_some_and(Node::is_dir))
                    .count() as u64;
                (0, 2 + subdirs)
            }
        };
        Ok(FileStatus {
            dev: self.dev,
            ino: inode as u64 + 1,
            kind: node.file_kind(),
            mode: node.mode,
            nlink,
            size,
            atime: node.atime,
            mtime: node.mtime,
            ctime: node.ctime,
        })
    }

    /// Kind of `inode` after following symbolic links, or `None` if the chain
    /// dangles or loops.
    pub(crate) fn followed_kind(&self, inode: Inode, dirs: &[Inode]) -> Option<FileKind> {
        let node = self.nodes.get(inode)?;
        let NodeKind::Symlink(target) = &node.kind else {
            return Some(node.file_kind());
        };
        let walk = self.walk_from(dirs.to_vec(), target, true).ok()?;
        walk.entry
            .and_then(|inode| self.nodes.get(inode))
            .map(Node::file_kind)
    }

    /// Resolves `path` from the root. `..` in `path` is lexical; symbolic
    /// links in intermediate components are always followed, the final one
    /// only when `follow_last` is set.
    pub(crate) fn walk(&self, path: &str, follow_last: bool) -> VfsResult<Walk> {
        path::validate(path)?;
        self.walk_from(vec![ROOT_INODE], &path::normalize(path).join("/"), follow_last)
    }

    fn walk_from(&self, mut dirs: Vec<Inode>, path: &str, follow_last: bool) -> VfsResult<Walk> {
        if path.starts_with('/') {
            dirs.truncate(1);
        }
        let mut pending: VecDeque<String> = path::components(path).map(str::to_owned).collect();
        let mut budget = self.max_symlink_depth;

        while let Some(component) = pending.pop_front() {
            if component == ".." {
                if dirs.len() > 1 {
                    dirs.pop();
                }
                continue;
            }

            let dir = dirs.last().copied().unwrap_or(ROOT_INODE);
            let children = self.node(dir)?.children().ok_or(Errno::NotDir)?;
            let is_last = pending.is_empty();

            let Some(&child) = children.get(&component) else {
                if is_last {
                    return Ok(Walk {
                        dirs,
                        name: Some(component),
                        entry: None,
                    });
                }
                return Err(Errno::NoEnt);
            };

            let node = self.node(child)?;
            match &node.kind {
                NodeKind::Symlink(target) if !is_last || follow_last => {
                    budget = budget.checked_sub(1).ok_or(Errno::Loop)?;
                    if target.starts_with('/') {
                        dirs.truncate(1);
                    }
                    for part in path::components(target).rev() {
                        pending.push_front(part.to_owned());
                    }
                }
                _ if is_last => {
                    return Ok(Walk {
                        dirs,
                        name: Some(component),
                        entry: Some(child),
                    });
                }
                NodeKind::Directory(_) => dirs.push(child),
                _ => return Err(Errno::NotDir),
            }
        }

        let entry = dirs.last().copied().unwrap_or(ROOT_INODE);
        Ok(Walk {
            dirs,
            name: None,
            entry: Some(entry),
        })
    }

    /// Inserts a new node under `parent` as `name`.
    pub(crate) fn insert(&mut self, parent: Inode, name: String, node: Node) -> VfsResult<Inode> {
        if !self.node(parent)?.is_dir() {
            return Err(Errno::NotDir);
        }
        let inode = self.nodes.insert(node);
        let dir = self.node_mut(parent)?;
        dir.touch(Timespec::now());
        if let Some(children) = dir.children_mut() {
            children.insert(name, inode);
        }
        Ok(inode)
    }

    /// Removes the entry `name` from `parent` and drops one link from the
    /// node it named.
    pub(crate) fn detach(&mut self, parent: Inode, name: &str) -> VfsResult<Inode> {
        let now = Timespec::now();
        let dir = self.node_mut(parent)?;
        let inode = dir
            .children_mut()
            .and_then(|children| children.remove(name))
            .ok_or(Errno::NoEnt)?;
        dir.touch(now);

        let node = self.node_mut(inode)?;
        node.links = node.links.saturating_sub(1);
        node.ctime = now;
        self.collect(inode);
        Ok(inode)
    }

    /// Frees `inode` once nothing names it and no handle holds it.
    pub(crate) fn collect(&mut self, inode: Inode) {
        if inode == ROOT_INODE {
            return;
        }
        let unreferenced = self
            .nodes
            .get(inode)
            .is_some_and(|node| node.links == 0 && node.open_handles == 0);
        if unreferenced {
            self.nodes.remove(inode);
        }
    }
}
