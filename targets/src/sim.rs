//! Hosted simulator board.
//!
//! Everything a program can observe lives in one locked state: console
//! queues, files, the clock, delivered signals and the heap. The clock only
//! moves when asked (each `gettimeofday` advances it by one tick), so runs
//! are reproducible.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use core::ffi::c_int;

use gloss_abi::signal::is_valid_signal;
use gloss_abi::{
    CLOCKS_PER_SEC, Clock, Errno, Fd, Mode, Off, OpenFlags, Pid, STDERR_FILENO, STDIN_FILENO,
    STDOUT_FILENO, Stat, SysResult, Timeval, Tms, USEC_PER_SEC, Whence,
};
use gloss_core::SyscallProvider;
use gloss_fs::{FileTable, RamFs};
use gloss_lib::{klog_info, klog_trace};
use gloss_mm::{Heap, HeapConfig, HeapStats};
use spin::Mutex;

const FIRST_FILE_FD: Fd = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub pid: Pid,
    /// Wall-clock time at boot, in microseconds since the epoch.
    pub clock_start_micros: u64,
    /// Advance applied after every clock read.
    pub tick_micros: u64,
    pub heap_size: usize,
    pub entropy_seed: u64,
}

impl SimConfig {
    pub const fn new() -> Self {
        Self {
            pid: 1,
            clock_start_micros: 1_700_000_000 * USEC_PER_SEC as u64,
            tick_micros: 1_000,
            heap_size: 64 * 1024,
            entropy_seed: 0x9e37_79b9_7f4a_7c15,
        }
    }

    pub const fn with_pid(mut self, pid: Pid) -> Self {
        self.pid = pid;
        self
    }

    pub const fn with_clock(mut self, start_micros: u64, tick_micros: u64) -> Self {
        self.clock_start_micros = start_micros;
        self.tick_micros = tick_micros;
        self
    }

    pub const fn with_heap_size(mut self, heap_size: usize) -> Self {
        self.heap_size = heap_size;
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

struct SimState {
    stdin: VecDeque<u8>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    fs: RamFs,
    files: FileTable,
    now_micros: u64,
    signals: Vec<c_int>,
    heap: Heap,
    entropy: u64,
}

impl SimState {
    fn now_secs(&self) -> i64 {
        (self.now_micros / USEC_PER_SEC as u64) as i64
    }

    // Stamp the filesystem with the current time before mutating it.
    fn fs_mut(&mut self) -> &mut RamFs {
        let now = self.now_secs();
        self.fs.set_time(now);
        &mut self.fs
    }

    fn next_entropy(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.entropy;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.entropy = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }
}

pub struct SimBoard {
    config: SimConfig,
    state: Mutex<SimState>,
    // Backing memory for the heap; only its address range is used here.
    arena: Vec<u8>,
}

fn is_console(fd: Fd) -> bool {
    matches!(fd, STDIN_FILENO | STDOUT_FILENO | STDERR_FILENO)
}

impl SimBoard {
    pub fn new(config: SimConfig) -> Self {
        let arena = vec![0u8; config.heap_size];
        let start = arena.as_ptr() as usize;
        let heap = Heap::new(HeapConfig::new(start, start + config.heap_size).with_align(16));
        klog_info!(
            "sim: pid {} heap {:#x}+{:#x}",
            config.pid,
            start,
            config.heap_size
        );
        Self {
            config,
            state: Mutex::new(SimState {
                stdin: VecDeque::new(),
                stdout: Vec::new(),
                stderr: Vec::new(),
                fs: RamFs::new(),
                files: FileTable::new(FIRST_FILE_FD),
                now_micros: config.clock_start_micros,
                signals: Vec::new(),
                heap,
                entropy: config.entropy_seed | 1,
            }),
            arena,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Queue bytes for reads on fd 0.
    pub fn push_stdin(&self, bytes: &[u8]) {
        self.state.lock().stdin.extend(bytes.iter().copied());
    }

    pub fn take_stdout(&self) -> Vec<u8> {
        core::mem::take(&mut self.state.lock().stdout)
    }

    pub fn take_stderr(&self) -> Vec<u8> {
        core::mem::take(&mut self.state.lock().stderr)
    }

    /// Signals delivered to this process, oldest first.
    pub fn signals(&self) -> Vec<c_int> {
        self.state.lock().signals.clone()
    }

    pub fn now(&self) -> Timeval {
        Timeval::from_micros(self.state.lock().now_micros)
    }

    pub fn advance_clock(&self, micros: u64) {
        let mut state = self.state.lock();
        state.now_micros = state.now_micros.saturating_add(micros);
    }

    pub fn heap_stats(&self) -> HeapStats {
        self.state.lock().heap.stats()
    }

    pub fn heap_range(&self) -> (usize, usize) {
        let start = self.arena.as_ptr() as usize;
        (start, start + self.config.heap_size)
    }

    pub fn open_files(&self) -> usize {
        self.state.lock().files.open_count()
    }
}

impl SyscallProvider for SimBoard {
    fn read(&self, fd: Fd, buf: &mut [u8]) -> SysResult<usize> {
        let mut state = self.state.lock();
        match fd {
            STDIN_FILENO => {
                let n = buf.len().min(state.stdin.len());
                for (slot, byte) in buf.iter_mut().zip(state.stdin.drain(..n)) {
                    *slot = byte;
                }
                Ok(n)
            }
            STDOUT_FILENO | STDERR_FILENO => Err(Errno::EBADF),
            _ => {
                let SimState { fs, files, .. } = &mut *state;
                files.read(fs, fd, buf)
            }
        }
    }

    fn write(&self, fd: Fd, buf: &[u8]) -> SysResult<usize> {
        let mut state = self.state.lock();
        match fd {
            STDOUT_FILENO => state.stdout.extend_from_slice(buf),
            STDERR_FILENO => state.stderr.extend_from_slice(buf),
            STDIN_FILENO => return Err(Errno::EBADF),
            _ => {
                let state = &mut *state;
                let now = state.now_secs();
                state.fs.set_time(now);
                return state.files.write(&mut state.fs, fd, buf);
            }
        }
        Ok(buf.len())
    }

    fn open(&self, path: &[u8], flags: OpenFlags, mode: Mode) -> SysResult<Fd> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let now = state.now_secs();
        state.fs.set_time(now);
        let fd = state.files.open(&mut state.fs, path, flags, mode)?;
        klog_trace!("sim: open -> fd {}", fd);
        Ok(fd)
    }

    fn close(&self, fd: Fd) -> SysResult<()> {
        if is_console(fd) {
            return Ok(());
        }
        let mut state = self.state.lock();
        let SimState { fs, files, .. } = &mut *state;
        files.close(fs, fd)
    }

    fn lseek(&self, fd: Fd, offset: Off, whence: Whence) -> SysResult<Off> {
        if is_console(fd) {
            return Err(Errno::ESPIPE);
        }
        let mut state = self.state.lock();
        let SimState { fs, files, .. } = &mut *state;
        files.lseek(fs, fd, offset, whence)
    }

    fn stat(&self, path: &[u8]) -> SysResult<Stat> {
        let state = self.state.lock();
        let ino = state.fs.lookup(path)?;
        state.fs.stat(ino)
    }

    fn fstat(&self, fd: Fd) -> SysResult<Stat> {
        if is_console(fd) {
            return Ok(Stat::char_device());
        }
        let state = self.state.lock();
        state.files.fstat(&state.fs, fd)
    }

    fn link(&self, existing: &[u8], new: &[u8]) -> SysResult<()> {
        self.state.lock().fs_mut().link(existing, new)
    }

    fn unlink(&self, path: &[u8]) -> SysResult<()> {
        self.state.lock().fs_mut().unlink(path)
    }

    fn kill(&self, pid: Pid, sig: c_int) -> SysResult<()> {
        if !is_valid_signal(sig) {
            return Err(Errno::EINVAL);
        }
        if pid != self.config.pid {
            return Err(Errno::ESRCH);
        }
        if sig != 0 {
            klog_trace!("sim: signal {} delivered", sig);
            self.state.lock().signals.push(sig);
        }
        Ok(())
    }

    fn getpid(&self) -> SysResult<Pid> {
        Ok(self.config.pid)
    }

    fn gettimeofday(&self) -> SysResult<Timeval> {
        let mut state = self.state.lock();
        let now = state.now_micros;
        state.now_micros = now.saturating_add(self.config.tick_micros);
        Ok(Timeval::from_micros(now))
    }

    fn sbrk(&self, increment: isize) -> SysResult<usize> {
        self.state.lock().heap.sbrk(increment)
    }

    fn isatty(&self, fd: Fd) -> SysResult<bool> {
        if is_console(fd) {
            return Ok(true);
        }
        self.state.lock().files.get(fd).map(|_| false)
    }

    fn times(&self) -> SysResult<(Clock, Tms)> {
        let state = self.state.lock();
        let elapsed = state.now_micros.saturating_sub(self.config.clock_start_micros);
        let ticks = (elapsed / (USEC_PER_SEC as u64 / CLOCKS_PER_SEC as u64)) as Clock;
        let tms = Tms {
            tms_utime: ticks,
            ..Tms::default()
        };
        Ok((ticks, tms))
    }

    fn exit(&self, status: c_int) -> ! {
        klog_info!("sim: exit({})", status);
        panic!("simulation exited with status {status}");
    }

    fn getentropy(&self, buf: &mut [u8]) -> SysResult<()> {
        let mut state = self.state.lock();
        for chunk in buf.chunks_mut(8) {
            let word = state.next_entropy().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
        Ok(())
    }

    fn mkdir(&self, path: &[u8], mode: Mode) -> SysResult<()> {
        self.state.lock().fs_mut().mkdir(path, mode).map(|_| ())
    }

    fn rename(&self, old: &[u8], new: &[u8]) -> SysResult<()> {
        self.state.lock().fs_mut().rename(old, new)
    }

    fn fcntl(&self, fd: Fd, cmd: c_int, arg: c_int) -> SysResult<c_int> {
        let mut state = self.state.lock();
        let SimState { fs, files, .. } = &mut *state;
        files.fcntl(fs, fd, cmd, arg)
    }
}
