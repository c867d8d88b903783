//! Descriptor table over a [`RamFs`].
//!
//! The table owns per-descriptor state (inode, position, flags) and keeps the
//! inode's open count in step, so an unlinked file stays readable through
//! descriptors that were open at the time.

use alloc::vec::Vec;
use core::ffi::c_int;

use gloss_abi::{
    Errno, F_DUPFD, F_GETFD, F_GETFL, F_SETFD, F_SETFL, FD_CLOEXEC, Fd, Ino, Mode, Off,
    OpenFlags, Stat, SysResult, Whence,
};
use gloss_lib::klog_debug;

use crate::ramfs::RamFs;

pub const MAX_OPEN_FILES: usize = 32;

// Only these status flags may change after open.
const SETFL_MASK: OpenFlags = OpenFlags::APPEND.union(OpenFlags::NONBLOCK);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFile {
    pub ino: Ino,
    pub position: usize,
    pub flags: OpenFlags,
    pub fd_flags: c_int,
}

pub struct FileTable {
    slots: Vec<Option<OpenFile>>,
    first_fd: Fd,
}

impl FileTable {
    /// Descriptors below `first_fd` are left to the caller (stdio).
    pub fn new(first_fd: Fd) -> Self {
        let mut slots = Vec::with_capacity(MAX_OPEN_FILES);
        slots.resize(MAX_OPEN_FILES, None);
        Self { slots, first_fd }
    }

    pub fn first_fd(&self) -> Fd {
        self.first_fd
    }

    pub fn owns(&self, fd: Fd) -> bool {
        self.index(fd).is_some()
    }

    fn index(&self, fd: Fd) -> Option<usize> {
        let idx = fd.checked_sub(self.first_fd)?;
        let idx = usize::try_from(idx).ok()?;
        (idx < self.slots.len()).then_some(idx)
    }

    fn slot(&self, fd: Fd) -> SysResult<&OpenFile> {
        self.index(fd)
            .and_then(|idx| self.slots[idx].as_ref())
            .ok_or(Errno::EBADF)
    }

    fn slot_mut(&mut self, fd: Fd) -> SysResult<&mut OpenFile> {
        let idx = self.index(fd).ok_or(Errno::EBADF)?;
        self.slots[idx].as_mut().ok_or(Errno::EBADF)
    }

    fn install(&mut self, from: Fd, file: OpenFile) -> SysResult<Fd> {
        let start = self.index(from).unwrap_or(0);
        let idx = self.slots[start..]
            .iter()
            .position(Option::is_none)
            .map(|i| i + start)
            .ok_or(Errno::EMFILE)?;
        self.slots[idx] = Some(file);
        Ok(self.first_fd + idx as Fd)
    }

    pub fn get(&self, fd: Fd) -> SysResult<OpenFile> {
        self.slot(fd).copied()
    }

    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn open(&mut self, fs: &mut RamFs, path: &[u8], flags: OpenFlags, mode: Mode) -> SysResult<Fd> {
        if self.slots.iter().all(Option::is_some) {
            return Err(Errno::EMFILE);
        }
        let access = flags.access_mode();
        let ino = if flags.contains(OpenFlags::CREAT) {
            fs.create_file(path, mode, flags.contains(OpenFlags::EXCL))?
        } else {
            fs.lookup(path)?
        };
        if fs.is_dir(ino)? && access.can_write() {
            return Err(Errno::EISDIR);
        }
        if flags.contains(OpenFlags::TRUNC) && access.can_write() {
            fs.truncate(ino, 0)?;
        }
        fs.retain(ino)?;
        let file = OpenFile {
            ino,
            position: 0,
            flags,
            fd_flags: 0,
        };
        match self.install(self.first_fd, file) {
            Ok(fd) => {
                klog_debug!("fileio: fd {} -> inode {}", fd, ino);
                Ok(fd)
            }
            Err(err) => {
                fs.release(ino);
                Err(err)
            }
        }
    }

    pub fn close(&mut self, fs: &mut RamFs, fd: Fd) -> SysResult<()> {
        let idx = self.index(fd).ok_or(Errno::EBADF)?;
        let file = self.slots[idx].take().ok_or(Errno::EBADF)?;
        fs.release(file.ino);
        Ok(())
    }

    pub fn read(&mut self, fs: &RamFs, fd: Fd, buf: &mut [u8]) -> SysResult<usize> {
        let file = self.slot_mut(fd)?;
        if !file.flags.access_mode().can_read() {
            return Err(Errno::EBADF);
        }
        if fs.is_dir(file.ino)? {
            return Err(Errno::EISDIR);
        }
        let n = fs.read_at(file.ino, file.position, buf)?;
        file.position += n;
        Ok(n)
    }

    pub fn write(&mut self, fs: &mut RamFs, fd: Fd, bytes: &[u8]) -> SysResult<usize> {
        let file = self.slot_mut(fd)?;
        if !file.flags.access_mode().can_write() {
            return Err(Errno::EBADF);
        }
        if file.flags.contains(OpenFlags::APPEND) {
            file.position = fs.size(file.ino)?;
        }
        let n = fs.write_at(file.ino, file.position, bytes)?;
        file.position += n;
        Ok(n)
    }

    /// Reposition and return the new offset. Seeking past the end is allowed;
    /// the gap reads back as zeros once written over.
    pub fn lseek(&mut self, fs: &RamFs, fd: Fd, offset: Off, whence: Whence) -> SysResult<Off> {
        let file = self.slot_mut(fd)?;
        let base = match whence {
            Whence::Set => 0,
            Whence::Cur => file.position as Off,
            Whence::End => fs.size(file.ino)? as Off,
        };
        let target = base.checked_add(offset).ok_or(Errno::EOVERFLOW)?;
        if target < 0 {
            return Err(Errno::EINVAL);
        }
        file.position = usize::try_from(target).map_err(|_| Errno::EOVERFLOW)?;
        Ok(target)
    }

    pub fn fstat(&self, fs: &RamFs, fd: Fd) -> SysResult<Stat> {
        fs.stat(self.slot(fd)?.ino)
    }

    pub fn fcntl(&mut self, fs: &mut RamFs, fd: Fd, cmd: c_int, arg: c_int) -> SysResult<c_int> {
        match cmd {
            F_DUPFD => {
                let mut dup = *self.slot(fd)?;
                dup.fd_flags = 0;
                let from = arg.max(self.first_fd);
                if self.index(from).is_none() {
                    return Err(Errno::EINVAL);
                }
                fs.retain(dup.ino)?;
                self.install(from, dup).inspect_err(|_| fs.release(dup.ino))
            }
            F_GETFD => Ok(self.slot(fd)?.fd_flags),
            F_SETFD => {
                self.slot_mut(fd)?.fd_flags = arg & FD_CLOEXEC;
                Ok(0)
            }
            F_GETFL => Ok(self.slot(fd)?.flags.bits()),
            F_SETFL => {
                let file = self.slot_mut(fd)?;
                let requested = OpenFlags::from_c_int(arg) & SETFL_MASK;
                file.flags = (file.flags - SETFL_MASK) | requested;
                Ok(0)
            }
            _ => Err(Errno::EINVAL),
        }
    }

    /// Close every descriptor, releasing their inodes.
    pub fn close_all(&mut self, fs: &mut RamFs) {
        for slot in self.slots.iter_mut() {
            if let Some(file) = slot.take() {
                fs.release(file.ino);
            }
        }
    }
}
