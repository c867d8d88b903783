use crate::error::{Errno, strerror};
use crate::fcntl::{AccessMode, O_RDONLY, O_RDWR, O_WRONLY, OpenFlags};
use crate::signal::{SIGABRT, is_valid_signal};
use crate::stat::{FileType, Mode, S_IFCHR, S_IFDIR, Stat};
use crate::time::Timeval;
use crate::unistd::{SEEK_END, Whence};

#[test]
fn errno_numbering_matches_newlib() {
    assert_eq!(Errno::ENOSYS.as_c_int(), 88);
    assert_eq!(Errno::ENOTEMPTY.as_c_int(), 90);
    assert_eq!(Errno::ENAMETOOLONG.as_c_int(), 91);
    assert_eq!(Errno::EOVERFLOW.as_c_int(), 139);
    assert_eq!(Errno::from_raw(88), Errno::ENOSYS);
    // Linux's ENOSYS has no meaning here.
    assert_eq!(Errno::from_raw(38), Errno::EINVAL);
    assert_eq!(Errno::ENOMEM.as_c_int(), 12);
    assert_eq!(Errno::EBADF.as_c_int(), 9);
    assert_eq!(Errno::from_raw(2), Errno::ENOENT);
}

#[test]
fn unknown_errno_collapses_to_einval() {
    assert_eq!(Errno::from_raw(9999), Errno::EINVAL);
    assert_eq!(Errno::from_raw(-1), Errno::EINVAL);
}

#[test]
fn strerror_handles_success_and_unknown() {
    assert_eq!(strerror(0), "Success");
    assert_eq!(strerror(88), "Function not implemented");
    assert_eq!(strerror(9999), "Unknown error");
    assert_eq!(std::format!("{}", Errno::ENOMEM), "Cannot allocate memory");
}

#[test]
fn access_mode_reads_low_bits() {
    assert_eq!(OpenFlags::from_c_int(O_RDONLY).access_mode(), AccessMode::ReadOnly);
    assert_eq!(OpenFlags::from_c_int(O_WRONLY).access_mode(), AccessMode::WriteOnly);
    let flags = OpenFlags::from_c_int(O_RDWR | OpenFlags::CREAT.bits());
    assert_eq!(flags.access_mode(), AccessMode::ReadWrite);
    assert!(flags.contains(OpenFlags::CREAT));
    assert!(!flags.contains(OpenFlags::TRUNC));
    assert!(AccessMode::ReadWrite.can_read() && AccessMode::ReadWrite.can_write());
    assert!(!AccessMode::WriteOnly.can_read());
}

#[test]
fn open_flags_keep_unnamed_bits() {
    let flags = OpenFlags::from_c_int(0x10_0000 | O_WRONLY);
    assert_eq!(flags.bits(), 0x10_0000 | O_WRONLY);
}

#[test]
fn whence_rejects_unknown_values() {
    assert_eq!(Whence::from_c_int(SEEK_END), Ok(Whence::End));
    assert_eq!(Whence::from_c_int(7), Err(Errno::EINVAL));
}

#[test]
fn timeval_splits_microseconds() {
    let tv = Timeval::from_micros(3_000_250);
    assert_eq!(tv.tv_sec, 3);
    assert_eq!(tv.tv_usec, 250);
    assert_eq!(tv.as_micros(), 3_000_250);
}

#[test]
fn stat_file_type_and_permissions() {
    let console = Stat::char_device();
    assert_eq!(console.st_mode, S_IFCHR);
    assert_eq!(console.file_type(), Some(FileType::CharDevice));

    let dir = Stat {
        st_mode: S_IFDIR | Mode::DIR_DEFAULT.bits(),
        ..Stat::default()
    };
    assert!(dir.is_dir());
    assert_eq!(dir.permissions(), Mode::DIR_DEFAULT);
    assert_eq!(Mode::FILE_DEFAULT.bits(), 0o644);
}

#[test]
fn signal_range() {
    assert!(is_valid_signal(0));
    assert!(is_valid_signal(SIGABRT));
    assert!(!is_valid_signal(-3));
    assert!(!is_valid_signal(64));
}
