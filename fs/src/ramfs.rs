//! In-memory file store backing the simulator target.
//!
//! Nodes live in an inode map; directories map names to inode numbers, so
//! hard links are simply extra directory entries. A node whose last link is
//! removed while it is still open stays alive until the last close.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use gloss_abi::{Errno, FileType, Ino, Mode, Off, Stat, SysResult, Time};
use gloss_lib::klog_trace;

pub const MAX_PATH: usize = 512;
pub const MAX_NAME: usize = 255;
pub const ROOT_INO: Ino = 1;
/// Largest size a regular file may reach.
pub const MAX_FILE_SIZE: usize = 16 * 1024 * 1024;
const BLOCK_SIZE: i32 = 512;

/// Zero-extend `data` to `len` bytes. Past [`MAX_FILE_SIZE`] is `EFBIG`;
/// an allocation failure is `ENOSPC`.
fn grow(data: &mut Vec<u8>, len: usize) -> SysResult<()> {
    if len > MAX_FILE_SIZE {
        return Err(Errno::EFBIG);
    }
    data.try_reserve(len - data.len()).map_err(|_| Errno::ENOSPC)?;
    data.resize(len, 0);
    Ok(())
}

enum NodeKind {
    File(Vec<u8>),
    Directory(BTreeMap<Vec<u8>, Ino>),
}

struct Node {
    kind: NodeKind,
    mode: Mode,
    nlink: u16,
    open_count: u32,
    parent: Ino,
    mtime: Time,
}

impl Node {
    fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }
}

fn component_is_dot(comp: &[u8]) -> bool {
    comp == b"."
}

fn component_is_dotdot(comp: &[u8]) -> bool {
    comp == b".."
}

fn components(path: &[u8]) -> impl Iterator<Item = &[u8]> {
    path.split(|&b| b == b'/').filter(|c| !c.is_empty())
}

fn validate_path(path: &[u8]) -> SysResult<()> {
    if path.len() > MAX_PATH {
        return Err(Errno::ENAMETOOLONG);
    }
    if path.first() != Some(&b'/') {
        return Err(Errno::ENOENT);
    }
    Ok(())
}

pub struct RamFs {
    nodes: BTreeMap<Ino, Node>,
    next_ino: Ino,
    now: Time,
}

impl RamFs {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            ROOT_INO,
            Node {
                kind: NodeKind::Directory(BTreeMap::new()),
                mode: Mode::DIR_DEFAULT,
                nlink: 2,
                open_count: 0,
                parent: ROOT_INO,
                mtime: 0,
            },
        );
        Self {
            nodes,
            next_ino: ROOT_INO + 1,
            now: 0,
        }
    }

    /// Timestamp applied to nodes modified from now on.
    pub fn set_time(&mut self, now: Time) {
        self.now = now;
    }

    fn node(&self, ino: Ino) -> SysResult<&Node> {
        self.nodes.get(&ino).ok_or(Errno::ENOENT)
    }

    fn node_mut(&mut self, ino: Ino) -> SysResult<&mut Node> {
        self.nodes.get_mut(&ino).ok_or(Errno::ENOENT)
    }

    fn child(&self, dir: Ino, name: &[u8]) -> SysResult<Option<Ino>> {
        match &self.node(dir)?.kind {
            NodeKind::Directory(entries) => Ok(entries.get(name).copied()),
            NodeKind::File(_) => Err(Errno::ENOTDIR),
        }
    }

    fn walk<'p>(&self, comps: impl Iterator<Item = &'p [u8]>) -> SysResult<Ino> {
        let mut current = ROOT_INO;
        for comp in comps {
            if component_is_dot(comp) {
                continue;
            }
            if component_is_dotdot(comp) {
                current = self.node(current)?.parent;
                continue;
            }
            current = self.child(current, comp)?.ok_or(Errno::ENOENT)?;
        }
        Ok(current)
    }

    /// Resolve an absolute path to its inode.
    pub fn lookup(&self, path: &[u8]) -> SysResult<Ino> {
        validate_path(path)?;
        self.walk(components(path))
    }

    /// Resolve everything but the last component: (parent dir, final name).
    fn split_parent<'p>(&self, path: &'p [u8]) -> SysResult<(Ino, &'p [u8])> {
        validate_path(path)?;
        let comps: Vec<&[u8]> = components(path).collect();
        let Some((&last, init)) = comps.split_last() else {
            return Err(Errno::EEXIST);
        };
        if component_is_dot(last) || component_is_dotdot(last) {
            return Err(Errno::EINVAL);
        }
        if last.len() > MAX_NAME {
            return Err(Errno::ENAMETOOLONG);
        }
        let parent = self.walk(init.iter().copied())?;
        if !self.node(parent)?.is_dir() {
            return Err(Errno::ENOTDIR);
        }
        Ok((parent, last))
    }

    fn insert_entry(&mut self, dir: Ino, name: &[u8], ino: Ino) -> SysResult<()> {
        let now = self.now;
        let parent = self.node_mut(dir)?;
        parent.mtime = now;
        match &mut parent.kind {
            NodeKind::Directory(entries) => {
                entries.insert(name.to_vec(), ino);
                Ok(())
            }
            NodeKind::File(_) => Err(Errno::ENOTDIR),
        }
    }

    fn remove_entry(&mut self, dir: Ino, name: &[u8]) -> SysResult<()> {
        let now = self.now;
        let parent = self.node_mut(dir)?;
        parent.mtime = now;
        match &mut parent.kind {
            NodeKind::Directory(entries) => {
                entries.remove(name);
                Ok(())
            }
            NodeKind::File(_) => Err(Errno::ENOTDIR),
        }
    }

    fn alloc_node(&mut self, kind: NodeKind, mode: Mode, parent: Ino) -> Ino {
        let ino = self.next_ino;
        self.next_ino += 1;
        let nlink = if matches!(kind, NodeKind::Directory(_)) { 2 } else { 1 };
        self.nodes.insert(
            ino,
            Node {
                kind,
                mode,
                nlink,
                open_count: 0,
                parent,
                mtime: self.now,
            },
        );
        ino
    }

    /// Create a regular file. With `exclusive`, an existing entry is `EEXIST`;
    /// otherwise an existing regular file is returned as-is.
    pub fn create_file(&mut self, path: &[u8], mode: Mode, exclusive: bool) -> SysResult<Ino> {
        let (parent, name) = self.split_parent(path)?;
        if let Some(existing) = self.child(parent, name)? {
            if exclusive {
                return Err(Errno::EEXIST);
            }
            if self.node(existing)?.is_dir() {
                return Err(Errno::EISDIR);
            }
            return Ok(existing);
        }
        let ino = self.alloc_node(NodeKind::File(Vec::new()), mode, parent);
        self.insert_entry(parent, name, ino)?;
        klog_trace!("ramfs: created inode {}", ino);
        Ok(ino)
    }

    pub fn mkdir(&mut self, path: &[u8], mode: Mode) -> SysResult<Ino> {
        let (parent, name) = self.split_parent(path)?;
        if self.child(parent, name)?.is_some() {
            return Err(Errno::EEXIST);
        }
        let ino = self.alloc_node(NodeKind::Directory(BTreeMap::new()), mode, parent);
        self.insert_entry(parent, name, ino)?;
        let parent_node = self.node_mut(parent)?;
        parent_node.nlink = parent_node.nlink.saturating_add(1);
        Ok(ino)
    }

    /// Add a second name for an existing regular file.
    pub fn link(&mut self, existing: &[u8], new: &[u8]) -> SysResult<()> {
        let ino = self.lookup(existing)?;
        if self.node(ino)?.is_dir() {
            return Err(Errno::EPERM);
        }
        let (parent, name) = self.split_parent(new)?;
        if self.child(parent, name)?.is_some() {
            return Err(Errno::EEXIST);
        }
        let node = self.node_mut(ino)?;
        if node.nlink == u16::MAX {
            return Err(Errno::EMLINK);
        }
        node.nlink += 1;
        self.insert_entry(parent, name, ino)
    }

    pub fn unlink(&mut self, path: &[u8]) -> SysResult<()> {
        let (parent, name) = self.split_parent(path)?;
        let ino = self.child(parent, name)?.ok_or(Errno::ENOENT)?;
        if self.node(ino)?.is_dir() {
            return Err(Errno::EISDIR);
        }
        self.remove_entry(parent, name)?;
        let node = self.node_mut(ino)?;
        node.nlink = node.nlink.saturating_sub(1);
        self.reap(ino);
        Ok(())
    }

    pub fn rename(&mut self, old: &[u8], new: &[u8]) -> SysResult<()> {
        let (old_parent, old_name) = self.split_parent(old)?;
        let ino = self.child(old_parent, old_name)?.ok_or(Errno::ENOENT)?;
        let (new_parent, new_name) = self.split_parent(new)?;
        if old_parent == new_parent && old_name == new_name {
            return Ok(());
        }
        let moving_dir = self.node(ino)?.is_dir();
        if moving_dir && self.is_ancestor(ino, new_parent)? {
            return Err(Errno::EINVAL);
        }
        if let Some(target) = self.child(new_parent, new_name)? {
            let target_node = self.node(target)?;
            match (&target_node.kind, moving_dir) {
                (NodeKind::Directory(entries), true) if !entries.is_empty() => {
                    return Err(Errno::ENOTEMPTY);
                }
                (NodeKind::Directory(_), false) => return Err(Errno::EISDIR),
                (NodeKind::File(_), true) => return Err(Errno::ENOTDIR),
                _ => {}
            }
            self.remove_entry(new_parent, new_name)?;
            let target_node = self.node_mut(target)?;
            target_node.nlink = target_node.nlink.saturating_sub(1);
            if moving_dir {
                target_node.nlink = 0;
            }
            self.reap(target);
        }
        self.remove_entry(old_parent, old_name)?;
        self.insert_entry(new_parent, new_name, ino)?;
        self.node_mut(ino)?.parent = new_parent;
        Ok(())
    }

    fn is_ancestor(&self, ancestor: Ino, mut ino: Ino) -> SysResult<bool> {
        loop {
            if ino == ancestor {
                return Ok(true);
            }
            if ino == ROOT_INO {
                return Ok(false);
            }
            ino = self.node(ino)?.parent;
        }
    }

    // Drop a node once nothing names it and nothing has it open.
    fn reap(&mut self, ino: Ino) {
        let dead = self
            .nodes
            .get(&ino)
            .is_some_and(|n| n.open_count == 0 && (n.nlink == 0 || (n.is_dir() && n.nlink <= 1)));
        if dead && ino != ROOT_INO {
            self.nodes.remove(&ino);
            klog_trace!("ramfs: released inode {}", ino);
        }
    }

    pub fn retain(&mut self, ino: Ino) -> SysResult<()> {
        let node = self.node_mut(ino)?;
        node.open_count = node.open_count.saturating_add(1);
        Ok(())
    }

    pub fn release(&mut self, ino: Ino) {
        if let Some(node) = self.nodes.get_mut(&ino) {
            node.open_count = node.open_count.saturating_sub(1);
        }
        self.reap(ino);
    }

    pub fn is_dir(&self, ino: Ino) -> SysResult<bool> {
        Ok(self.node(ino)?.is_dir())
    }

    pub fn size(&self, ino: Ino) -> SysResult<usize> {
        match &self.node(ino)?.kind {
            NodeKind::File(data) => Ok(data.len()),
            NodeKind::Directory(entries) => Ok(entries.len()),
        }
    }

    pub fn read_at(&self, ino: Ino, offset: usize, buf: &mut [u8]) -> SysResult<usize> {
        let NodeKind::File(data) = &self.node(ino)?.kind else {
            return Err(Errno::EISDIR);
        };
        if offset >= data.len() {
            return Ok(0);
        }
        let len = buf.len().min(data.len() - offset);
        buf[..len].copy_from_slice(&data[offset..offset + len]);
        Ok(len)
    }

    /// Write at `offset`, zero-filling any gap past the current end.
    pub fn write_at(&mut self, ino: Ino, offset: usize, bytes: &[u8]) -> SysResult<usize> {
        let now = self.now;
        let node = self.node_mut(ino)?;
        let NodeKind::File(data) = &mut node.kind else {
            return Err(Errno::EISDIR);
        };
        let end = offset.checked_add(bytes.len()).ok_or(Errno::EFBIG)?;
        if end > data.len() {
            grow(data, end)?;
        }
        data[offset..end].copy_from_slice(bytes);
        node.mtime = now;
        Ok(bytes.len())
    }

    pub fn truncate(&mut self, ino: Ino, len: usize) -> SysResult<()> {
        let now = self.now;
        let node = self.node_mut(ino)?;
        let NodeKind::File(data) = &mut node.kind else {
            return Err(Errno::EISDIR);
        };
        if len > data.len() {
            grow(data, len)?;
        } else {
            data.truncate(len);
        }
        node.mtime = now;
        Ok(())
    }

    pub fn stat(&self, ino: Ino) -> SysResult<Stat> {
        let node = self.node(ino)?;
        let file_type = if node.is_dir() {
            FileType::Directory
        } else {
            FileType::Regular
        };
        let size = self.size(ino)? as Off;
        Ok(Stat {
            st_dev: 1,
            st_ino: ino,
            st_mode: file_type.bits() | node.mode.bits(),
            st_nlink: node.nlink,
            st_size: size,
            st_atime: node.mtime,
            st_mtime: node.mtime,
            st_ctime: node.mtime,
            st_blksize: BLOCK_SIZE,
            st_blocks: ((size + BLOCK_SIZE as Off - 1) / BLOCK_SIZE as Off) as i32,
            ..Stat::default()
        })
    }

    /// Names in a directory, in byte order.
    pub fn list(&self, path: &[u8]) -> SysResult<Vec<Vec<u8>>> {
        let ino = self.lookup(path)?;
        match &self.node(ino)?.kind {
            NodeKind::Directory(entries) => Ok(entries.keys().cloned().collect()),
            NodeKind::File(_) => Err(Errno::ENOTDIR),
        }
    }
}

impl Default for RamFs {
    fn default() -> Self {
        Self::new()
    }
}
