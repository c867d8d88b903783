//! `struct stat` and mode bits.

use bitflags::bitflags;

use crate::time::Time;

pub type Off = i64;
pub type Dev = u32;
pub type Ino = u32;

pub const S_IFMT: u32 = 0o170000;
pub const S_IFIFO: u32 = 0o010000;
pub const S_IFCHR: u32 = 0o020000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFLNK: u32 = 0o120000;

bitflags! {
    /// Permission bits of `st_mode` (the type bits are [`FileType`]).
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Mode: u32 {
        const ISUID = 0o4000;
        const ISGID = 0o2000;
        const ISVTX = 0o1000;
        const IRUSR = 0o0400;
        const IWUSR = 0o0200;
        const IXUSR = 0o0100;
        const IRGRP = 0o0040;
        const IWGRP = 0o0020;
        const IXGRP = 0o0010;
        const IROTH = 0o0004;
        const IWOTH = 0o0002;
        const IXOTH = 0o0001;
    }
}

impl Mode {
    pub const RWXU: Mode = Mode::IRUSR.union(Mode::IWUSR).union(Mode::IXUSR);
    /// 0644, the default for files a target creates without an explicit mode.
    pub const FILE_DEFAULT: Mode = Mode::IRUSR
        .union(Mode::IWUSR)
        .union(Mode::IRGRP)
        .union(Mode::IROTH);
    /// 0755
    pub const DIR_DEFAULT: Mode = Mode::RWXU
        .union(Mode::IRGRP)
        .union(Mode::IXGRP)
        .union(Mode::IROTH)
        .union(Mode::IXOTH);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Fifo,
    CharDevice,
    Directory,
    Regular,
    Symlink,
}

impl FileType {
    pub const fn bits(self) -> u32 {
        match self {
            Self::Fifo => S_IFIFO,
            Self::CharDevice => S_IFCHR,
            Self::Directory => S_IFDIR,
            Self::Regular => S_IFREG,
            Self::Symlink => S_IFLNK,
        }
    }

    pub fn from_mode(mode: u32) -> Option<Self> {
        match mode & S_IFMT {
            S_IFIFO => Some(Self::Fifo),
            S_IFCHR => Some(Self::CharDevice),
            S_IFDIR => Some(Self::Directory),
            S_IFREG => Some(Self::Regular),
            S_IFLNK => Some(Self::Symlink),
            _ => None,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
    pub st_dev: Dev,
    pub st_ino: Ino,
    pub st_mode: u32,
    pub st_nlink: u16,
    pub st_uid: u16,
    pub st_gid: u16,
    pub st_rdev: Dev,
    pub st_size: Off,
    pub st_atime: Time,
    pub st_mtime: Time,
    pub st_ctime: Time,
    pub st_blksize: i32,
    pub st_blocks: i32,
}

impl Stat {
    /// What bare-metal consoles report from `fstat`: a character device and nothing else.
    pub fn char_device() -> Self {
        Self {
            st_mode: S_IFCHR,
            ..Self::default()
        }
    }

    #[inline]
    pub fn file_type(&self) -> Option<FileType> {
        FileType::from_mode(self.st_mode)
    }

    #[inline]
    pub fn permissions(&self) -> Mode {
        Mode::from_bits_truncate(self.st_mode)
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.file_type() == Some(FileType::Directory)
    }
}
