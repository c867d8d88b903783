use gloss_abi::{
    Errno, F_DUPFD, F_GETFD, F_GETFL, F_SETFD, F_SETFL, FD_CLOEXEC, FileType, Mode, O_RDONLY,
    O_RDWR, O_WRONLY, OpenFlags, Whence,
};

use crate::fileio::{FileTable, MAX_OPEN_FILES};
use crate::ramfs::{MAX_FILE_SIZE, MAX_PATH, RamFs, ROOT_INO};

fn flags(raw: i32) -> OpenFlags {
    OpenFlags::from_c_int(raw)
}

fn setup() -> (RamFs, FileTable) {
    (RamFs::new(), FileTable::new(3))
}

#[test]
fn lookup_walks_dot_and_dotdot() {
    let mut fs = RamFs::new();
    fs.mkdir(b"/etc", Mode::DIR_DEFAULT).unwrap();
    let ino = fs.create_file(b"/etc/motd", Mode::FILE_DEFAULT, true).unwrap();

    assert_eq!(fs.lookup(b"/").unwrap(), ROOT_INO);
    assert_eq!(fs.lookup(b"/etc/./motd").unwrap(), ino);
    assert_eq!(fs.lookup(b"/etc/../etc//motd").unwrap(), ino);
    assert_eq!(fs.lookup(b"/../etc/motd").unwrap(), ino);
    assert_eq!(fs.lookup(b"/etc/missing"), Err(Errno::ENOENT));
    assert_eq!(fs.lookup(b"/etc/motd/x"), Err(Errno::ENOTDIR));
}

#[test]
fn relative_and_overlong_paths_rejected() {
    let mut fs = RamFs::new();
    assert_eq!(fs.lookup(b"etc"), Err(Errno::ENOENT));
    assert_eq!(fs.lookup(b""), Err(Errno::ENOENT));

    let mut long = std::vec![b'/'];
    long.extend(std::iter::repeat_n(b'a', MAX_PATH));
    assert_eq!(fs.lookup(&long), Err(Errno::ENAMETOOLONG));
    assert_eq!(
        fs.create_file(&long, Mode::FILE_DEFAULT, false),
        Err(Errno::ENAMETOOLONG)
    );
}

#[test]
fn create_file_exclusive_and_shared() {
    let mut fs = RamFs::new();
    let ino = fs.create_file(b"/a", Mode::FILE_DEFAULT, true).unwrap();
    assert_eq!(fs.create_file(b"/a", Mode::FILE_DEFAULT, true), Err(Errno::EEXIST));
    assert_eq!(fs.create_file(b"/a", Mode::FILE_DEFAULT, false).unwrap(), ino);

    fs.mkdir(b"/d", Mode::DIR_DEFAULT).unwrap();
    assert_eq!(fs.create_file(b"/d", Mode::FILE_DEFAULT, false), Err(Errno::EISDIR));
    assert_eq!(fs.mkdir(b"/d", Mode::DIR_DEFAULT), Err(Errno::EEXIST));
    assert_eq!(fs.create_file(b"/a/b", Mode::FILE_DEFAULT, false), Err(Errno::ENOTDIR));
}

#[test]
fn write_past_end_zero_fills() {
    let mut fs = RamFs::new();
    let ino = fs.create_file(b"/f", Mode::FILE_DEFAULT, true).unwrap();
    fs.write_at(ino, 4, b"xy").unwrap();
    let mut buf = [0xffu8; 8];
    let n = fs.read_at(ino, 0, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"\0\0\0\0xy");
    assert_eq!(fs.read_at(ino, 6, &mut buf).unwrap(), 0);
}

#[test]
fn stat_reports_type_and_links() {
    let mut fs = RamFs::new();
    fs.set_time(1_700_000_000);
    let ino = fs.create_file(b"/f", Mode::FILE_DEFAULT, true).unwrap();
    fs.write_at(ino, 0, b"hello").unwrap();
    fs.link(b"/f", b"/g").unwrap();

    let st = fs.stat(ino).unwrap();
    assert_eq!(st.file_type(), Some(FileType::Regular));
    assert_eq!(st.permissions(), Mode::FILE_DEFAULT);
    assert_eq!(st.st_size, 5);
    assert_eq!(st.st_nlink, 2);
    assert_eq!(st.st_mtime, 1_700_000_000);
    assert_eq!(st.st_ino, ino);

    let root = fs.stat(ROOT_INO).unwrap();
    assert!(root.is_dir());
}

#[test]
fn link_and_unlink_share_contents() {
    let mut fs = RamFs::new();
    let ino = fs.create_file(b"/f", Mode::FILE_DEFAULT, true).unwrap();
    fs.write_at(ino, 0, b"data").unwrap();
    fs.link(b"/f", b"/g").unwrap();
    assert_eq!(fs.link(b"/f", b"/g"), Err(Errno::EEXIST));
    assert_eq!(fs.link(b"/missing", b"/h"), Err(Errno::ENOENT));

    fs.unlink(b"/f").unwrap();
    assert_eq!(fs.lookup(b"/f"), Err(Errno::ENOENT));
    let mut buf = [0u8; 4];
    let g = fs.lookup(b"/g").unwrap();
    assert_eq!(g, ino);
    fs.read_at(g, 0, &mut buf).unwrap();
    assert_eq!(&buf, b"data");
    assert_eq!(fs.stat(g).unwrap().st_nlink, 1);

    fs.unlink(b"/g").unwrap();
    assert_eq!(fs.stat(ino), Err(Errno::ENOENT));
}

#[test]
fn unlink_directory_is_eisdir() {
    let mut fs = RamFs::new();
    fs.mkdir(b"/d", Mode::DIR_DEFAULT).unwrap();
    assert_eq!(fs.unlink(b"/d"), Err(Errno::EISDIR));
    assert_eq!(fs.unlink(b"/nope"), Err(Errno::ENOENT));
    assert_eq!(fs.link(b"/d", b"/e"), Err(Errno::EPERM));
}

#[test]
fn rename_moves_and_replaces() {
    let mut fs = RamFs::new();
    let a = fs.create_file(b"/a", Mode::FILE_DEFAULT, true).unwrap();
    let b = fs.create_file(b"/b", Mode::FILE_DEFAULT, true).unwrap();
    fs.mkdir(b"/d", Mode::DIR_DEFAULT).unwrap();

    fs.rename(b"/a", b"/d/a2").unwrap();
    assert_eq!(fs.lookup(b"/d/a2").unwrap(), a);
    assert_eq!(fs.lookup(b"/a"), Err(Errno::ENOENT));

    fs.rename(b"/d/a2", b"/b").unwrap();
    assert_eq!(fs.lookup(b"/b").unwrap(), a);
    assert_eq!(fs.stat(b), Err(Errno::ENOENT));

    assert_eq!(fs.rename(b"/b", b"/d"), Err(Errno::EISDIR));
    assert_eq!(fs.rename(b"/d", b"/d/sub"), Err(Errno::EINVAL));
    assert_eq!(fs.rename(b"/missing", b"/x"), Err(Errno::ENOENT));
}

#[test]
fn rename_over_non_empty_directory_fails() {
    let mut fs = RamFs::new();
    fs.mkdir(b"/src", Mode::DIR_DEFAULT).unwrap();
    fs.mkdir(b"/dst", Mode::DIR_DEFAULT).unwrap();
    fs.create_file(b"/dst/keep", Mode::FILE_DEFAULT, true).unwrap();
    assert_eq!(fs.rename(b"/src", b"/dst"), Err(Errno::ENOTEMPTY));

    fs.unlink(b"/dst/keep").unwrap();
    fs.rename(b"/src", b"/dst").unwrap();
    assert_eq!(fs.lookup(b"/src"), Err(Errno::ENOENT));
    assert!(fs.list(b"/").unwrap().iter().any(|n| n == b"dst"));
}

#[test]
fn open_create_write_read_back() {
    let (mut fs, mut files) = setup();
    let fd = files
        .open(&mut fs, b"/log", flags(O_RDWR) | OpenFlags::CREAT, Mode::FILE_DEFAULT)
        .unwrap();
    assert_eq!(fd, 3);
    assert_eq!(files.write(&mut fs, fd, b"hello world").unwrap(), 11);
    assert_eq!(files.lseek(&fs, fd, 6, Whence::Set).unwrap(), 6);

    let mut buf = [0u8; 16];
    let n = files.read(&fs, fd, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"world");
    assert_eq!(files.read(&fs, fd, &mut buf).unwrap(), 0);
    files.close(&mut fs, fd).unwrap();
    assert_eq!(files.close(&mut fs, fd), Err(Errno::EBADF));
}

#[test]
fn open_missing_without_creat_is_enoent() {
    let (mut fs, mut files) = setup();
    assert_eq!(
        files.open(&mut fs, b"/nope", flags(O_RDONLY), Mode::FILE_DEFAULT),
        Err(Errno::ENOENT)
    );
    assert_eq!(files.open_count(), 0);
}

#[test]
fn access_mode_is_enforced() {
    let (mut fs, mut files) = setup();
    let w = files
        .open(&mut fs, b"/f", flags(O_WRONLY) | OpenFlags::CREAT, Mode::FILE_DEFAULT)
        .unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(files.read(&fs, w, &mut buf), Err(Errno::EBADF));

    let r = files.open(&mut fs, b"/f", flags(O_RDONLY), Mode::FILE_DEFAULT).unwrap();
    assert_eq!(files.write(&mut fs, r, b"x"), Err(Errno::EBADF));

    fs.mkdir(b"/d", Mode::DIR_DEFAULT).unwrap();
    assert_eq!(
        files.open(&mut fs, b"/d", flags(O_RDWR), Mode::FILE_DEFAULT),
        Err(Errno::EISDIR)
    );
}

#[test]
fn truncate_and_append() {
    let (mut fs, mut files) = setup();
    let fd = files
        .open(&mut fs, b"/f", flags(O_WRONLY) | OpenFlags::CREAT, Mode::FILE_DEFAULT)
        .unwrap();
    files.write(&mut fs, fd, b"0123456789").unwrap();
    files.close(&mut fs, fd).unwrap();

    let fd = files
        .open(&mut fs, b"/f", flags(O_WRONLY) | OpenFlags::APPEND, Mode::FILE_DEFAULT)
        .unwrap();
    files.lseek(&fs, fd, 0, Whence::Set).unwrap();
    files.write(&mut fs, fd, b"ab").unwrap();
    assert_eq!(files.fstat(&fs, fd).unwrap().st_size, 12);
    files.close(&mut fs, fd).unwrap();

    let fd = files
        .open(&mut fs, b"/f", flags(O_RDWR) | OpenFlags::TRUNC, Mode::FILE_DEFAULT)
        .unwrap();
    assert_eq!(files.fstat(&fs, fd).unwrap().st_size, 0);
}

#[test]
fn lseek_whence_and_bounds() {
    let (mut fs, mut files) = setup();
    let fd = files
        .open(&mut fs, b"/f", flags(O_RDWR) | OpenFlags::CREAT, Mode::FILE_DEFAULT)
        .unwrap();
    files.write(&mut fs, fd, b"abcdef").unwrap();
    assert_eq!(files.lseek(&fs, fd, -2, Whence::End).unwrap(), 4);
    assert_eq!(files.lseek(&fs, fd, 1, Whence::Cur).unwrap(), 5);
    assert_eq!(files.lseek(&fs, fd, -10, Whence::Cur), Err(Errno::EINVAL));
    assert_eq!(files.lseek(&fs, fd, 0, Whence::Cur).unwrap(), 5);
    assert_eq!(files.lseek(&fs, 42, 0, Whence::Set), Err(Errno::EBADF));
}

#[test]
fn write_far_past_end_is_efbig() {
    let (mut fs, mut files) = setup();
    let fd = files
        .open(&mut fs, b"/big", flags(O_RDWR) | OpenFlags::CREAT, Mode::FILE_DEFAULT)
        .unwrap();
    let far = isize::MAX as i64 - 8;
    assert_eq!(files.lseek(&fs, fd, far, Whence::Set).unwrap(), far);
    assert_eq!(files.write(&mut fs, fd, b"x"), Err(Errno::EFBIG));
    assert_eq!(files.fstat(&fs, fd).unwrap().st_size, 0);

    let last = MAX_FILE_SIZE as i64 - 1;
    files.lseek(&fs, fd, last, Whence::Set).unwrap();
    assert_eq!(files.write(&mut fs, fd, b"x"), Ok(1));
    assert_eq!(files.write(&mut fs, fd, b"y"), Err(Errno::EFBIG));
    assert_eq!(files.fstat(&fs, fd).unwrap().st_size, MAX_FILE_SIZE as i64);
}

#[test]
fn truncate_is_bounded() {
    let mut fs = RamFs::new();
    let ino = fs.create_file(b"/t", Mode::FILE_DEFAULT, true).unwrap();
    fs.write_at(ino, 0, b"abcdef").unwrap();
    assert_eq!(fs.truncate(ino, MAX_FILE_SIZE + 1), Err(Errno::EFBIG));
    assert_eq!(fs.size(ino).unwrap(), 6);
    fs.truncate(ino, 2).unwrap();
    fs.truncate(ino, 4).unwrap();
    let mut buf = [0xffu8; 8];
    let n = fs.read_at(ino, 0, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"ab\0\0");
}

#[test]
fn unlinked_file_readable_until_close() {
    let (mut fs, mut files) = setup();
    let fd = files
        .open(&mut fs, b"/tmp", flags(O_RDWR) | OpenFlags::CREAT, Mode::FILE_DEFAULT)
        .unwrap();
    files.write(&mut fs, fd, b"scratch").unwrap();
    let ino = files.get(fd).unwrap().ino;

    fs.unlink(b"/tmp").unwrap();
    assert_eq!(fs.lookup(b"/tmp"), Err(Errno::ENOENT));
    files.lseek(&fs, fd, 0, Whence::Set).unwrap();
    let mut buf = [0u8; 7];
    files.read(&fs, fd, &mut buf).unwrap();
    assert_eq!(&buf, b"scratch");
    assert_eq!(files.fstat(&fs, fd).unwrap().st_nlink, 0);

    files.close(&mut fs, fd).unwrap();
    assert_eq!(fs.stat(ino), Err(Errno::ENOENT));
}

#[test]
fn table_exhaustion_is_emfile() {
    let (mut fs, mut files) = setup();
    for _ in 0..MAX_OPEN_FILES {
        files
            .open(&mut fs, b"/f", flags(O_RDONLY) | OpenFlags::CREAT, Mode::FILE_DEFAULT)
            .unwrap();
    }
    assert_eq!(
        files.open(&mut fs, b"/f", flags(O_RDONLY), Mode::FILE_DEFAULT),
        Err(Errno::EMFILE)
    );
    files.close(&mut fs, 10).unwrap();
    assert_eq!(
        files.open(&mut fs, b"/f", flags(O_RDONLY), Mode::FILE_DEFAULT).unwrap(),
        10
    );
    files.close_all(&mut fs);
    assert_eq!(files.open_count(), 0);
}

#[test]
fn fd_below_first_is_not_owned() {
    let files = FileTable::new(3);
    assert!(!files.owns(0));
    assert!(!files.owns(2));
    assert!(files.owns(3));
    assert!(!files.owns(3 + MAX_OPEN_FILES as i32));
    assert_eq!(files.get(1), Err(Errno::EBADF));
}

#[test]
fn fcntl_commands() {
    let (mut fs, mut files) = setup();
    let fd = files
        .open(&mut fs, b"/f", flags(O_RDWR) | OpenFlags::CREAT, Mode::FILE_DEFAULT)
        .unwrap();

    assert_eq!(files.fcntl(&mut fs, fd, F_GETFD, 0).unwrap(), 0);
    files.fcntl(&mut fs, fd, F_SETFD, FD_CLOEXEC).unwrap();
    assert_eq!(files.fcntl(&mut fs, fd, F_GETFD, 0).unwrap(), FD_CLOEXEC);

    files
        .fcntl(&mut fs, fd, F_SETFL, OpenFlags::APPEND.bits() | OpenFlags::CREAT.bits())
        .unwrap();
    let fl = OpenFlags::from_c_int(files.fcntl(&mut fs, fd, F_GETFL, 0).unwrap());
    assert!(fl.contains(OpenFlags::APPEND));
    assert!(fl.contains(OpenFlags::RDWR));

    let dup = files.fcntl(&mut fs, fd, F_DUPFD, 10).unwrap();
    assert_eq!(dup, 10);
    assert_eq!(files.fcntl(&mut fs, dup, F_GETFD, 0).unwrap(), 0);
    assert_eq!(files.get(dup).unwrap().ino, files.get(fd).unwrap().ino);

    assert_eq!(files.fcntl(&mut fs, fd, 99, 0), Err(Errno::EINVAL));
    assert_eq!(files.fcntl(&mut fs, 20, F_GETFD, 0), Err(Errno::EBADF));
}
