//! 16550 UART as a [`SerialLine`].

use uart_16550::SerialPort;

use crate::serial::SerialLine;

pub const COM1_BASE: u16 = 0x3f8;

pub struct Uart16550 {
    port: SerialPort,
}

impl Uart16550 {
    /// Initialise the UART at I/O port `base`.
    ///
    /// # Safety
    /// `base` must be the I/O base of a 16550-compatible UART that nothing
    /// else drives.
    pub unsafe fn new(base: u16) -> Self {
        // SAFETY: forwarded caller contract.
        let mut port = unsafe { SerialPort::new(base) };
        port.init();
        Self { port }
    }

    /// COM1, the port firmware and emulators wire to the console.
    ///
    /// # Safety
    /// See [`Uart16550::new`].
    pub unsafe fn com1() -> Self {
        // SAFETY: forwarded caller contract.
        unsafe { Self::new(COM1_BASE) }
    }
}

impl SerialLine for Uart16550 {
    fn send(&mut self, byte: u8) {
        self.port.send(byte);
    }

    fn receive(&mut self) -> u8 {
        self.port.receive()
    }
}
