//! A flat 64KB memory host and CP/M BDOS-intercepting port stub for
//! exercising [`i8080_cpu::Cpu`] against the classic 8080 conformance
//! ROMs (TST8080, CPUTEST, 8080PRE, 8080EXM).

pub mod cpm;

use i8080_cpu::{Bus, Ports};

/// Errors the harness can encounter loading a ROM image.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The ROM could not be read from disk.
    #[error("failed to read ROM {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The ROM image is larger than fits starting at its load address.
    #[error("ROM is {size} bytes, too large to load at {load_addr:#06X} (max {max} bytes)")]
    RomTooLarge {
        /// Size of the ROM image in bytes.
        size: usize,
        /// Address the ROM would be loaded at.
        load_addr: u16,
        /// Maximum size that would fit.
        max: usize,
    },
}

/// The 64KB byte-addressable memory space, standing in for a real 8080
/// system's RAM/ROM map.
#[derive(Debug, Clone)]
pub struct Memory {
    data: [u8; 0x10000],
}

impl Memory {
    /// An all-zero memory image.
    #[must_use]
    pub fn new() -> Self {
        Self { data: [0; 0x10000] }
    }

    /// Loads `bytes` at `addr`, failing if they would run off the top of
    /// the address space.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) -> Result<(), HarnessError> {
        let max = 0x10000 - addr as usize;
        if bytes.len() > max {
            return Err(HarnessError::RomTooLarge {
                size: bytes.len(),
                load_addr: addr,
                max,
            });
        }
        self.data[addr as usize..addr as usize + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Reads a byte without the side effects `Bus::read` may carry.
    #[must_use]
    pub fn peek_byte(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Memory {
    fn read(&mut self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    fn peek(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }
}

/// The CP/M port stub. The conformance ROMs never actually execute
/// `IN`/`OUT` (BDOS calls are intercepted by peeking at PC/registers
/// before each step, following `original_source/i8080.c`'s own
/// `i8080_run_testrom`), but `Ports` still needs a real implementation
/// so the core's `IN`/`OUT` opcodes remain reachable and exercised by
/// the CPU's own unit tests.
#[derive(Debug, Clone, Default)]
pub struct Io {
    /// Set by the conventional `OUT 0,A` end-of-test sentinel.
    pub done: bool,
}

impl Ports for Io {
    fn read(&mut self, _port: u8) -> u8 {
        0xFF
    }

    fn write(&mut self, port: u8, _value: u8) {
        if port == 0 {
            self.done = true;
        }
    }
}

/// A memory space and port stub bundled together, split into disjoint
/// fields so a caller can borrow `&mut machine.memory` and
/// `&mut machine.io` simultaneously for [`i8080_cpu::Cpu::step`].
#[derive(Debug, Clone, Default)]
pub struct Machine {
    /// The 64KB memory space.
    pub memory: Memory,
    /// The port stub.
    pub io: Io,
}

impl Machine {
    /// A fresh, all-zero machine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_writes_bytes_at_address() {
        let mut mem = Memory::new();
        mem.load(0x100, &[0xC3, 0x00, 0x01]).unwrap();
        assert_eq!(mem.peek_byte(0x100), 0xC3);
        assert_eq!(mem.peek_byte(0x101), 0x00);
        assert_eq!(mem.peek_byte(0x102), 0x01);
    }

    #[test]
    fn load_rejects_oversized_rom() {
        let mut mem = Memory::new();
        let big = vec![0u8; 0x10000];
        let err = mem.load(0x100, &big).unwrap_err();
        assert!(matches!(err, HarnessError::RomTooLarge { .. }));
    }

    #[test]
    fn io_write_to_port_zero_sets_done() {
        let mut io = Io::default();
        io.write(0, 0x01);
        assert!(io.done);
        let mut io2 = Io::default();
        io2.write(3, 0x01);
        assert!(!io2.done);
    }
}
