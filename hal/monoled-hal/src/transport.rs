//! Display transport
//!
//! SSD1306-class controllers on I2C distinguish commands from pixel data with
//! a control byte at the start of each transaction:
//!
//! ```text
//! ┌──────────────┬──────────────────────────┐
//! │ CONTROL (1B) │ PAYLOAD                  │
//! ├──────────────┼──────────────────────────┤
//! │ 0x80         │ one command byte         │
//! │ 0x40         │ up to chunk_size data    │
//! └──────────────┴──────────────────────────┘
//! ```
//!
//! Long data runs are split into several transactions, each tagged as data,
//! so no bus controller ever sees more than `chunk_size + 1` bytes at once.

use crate::i2c::I2cBus;

/// Control byte for a single command (Co=1, D/C#=0)
pub const CONTROL_COMMAND: u8 = 0x80;

/// Control byte for a data stream (Co=0, D/C#=1)
pub const CONTROL_DATA: u8 = 0x40;

/// Default data bytes per I2C transaction
pub const DEFAULT_CHUNK_SIZE: usize = 32;

/// Largest accepted data chunk
pub const MAX_CHUNK_SIZE: usize = 64;

/// Default SSD1306 I2C address (SA0 low)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Command/data write capability of a display controller link
pub trait DisplayTransport {
    /// Error type for transport writes
    type Error;

    /// Send one control byte to the controller
    fn write_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send several control bytes, one write per byte, stopping at the first failure
    fn write_commands(&mut self, commands: &[u8]) -> Result<(), Self::Error> {
        for &command in commands {
            self.write_command(command)?;
        }
        Ok(())
    }

    /// Send a run of display RAM data
    ///
    /// Implementations may split the run into several bus writes but must
    /// preserve byte order and total length.
    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: DisplayTransport + ?Sized> DisplayTransport for &mut T {
    type Error = T::Error;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        (**self).write_command(command)
    }

    fn write_commands(&mut self, commands: &[u8]) -> Result<(), Self::Error> {
        (**self).write_commands(commands)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_data(data)
    }
}

/// I2C link to an SSD1306-class controller
pub struct I2cInterface<B> {
    bus: B,
    address: u8,
    chunk_size: usize,
}

impl<B: I2cBus> I2cInterface<B> {
    /// Create an interface for the controller at `address`
    pub fn new(bus: B, address: u8) -> Self {
        Self {
            bus,
            address,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the data bytes per transaction (clamped to `1..=MAX_CHUNK_SIZE`)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Data bytes per transaction
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Borrow the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> B {
        self.bus
    }
}

impl<B: I2cBus> DisplayTransport for I2cInterface<B> {
    type Error = B::Error;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.bus.write(self.address, &[CONTROL_COMMAND, command])
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let mut frame = [0u8; MAX_CHUNK_SIZE + 1];
        frame[0] = CONTROL_DATA;

        for chunk in data.chunks(self.chunk_size) {
            frame[1..=chunk.len()].copy_from_slice(chunk);
            self.bus.write(self.address, &frame[..=chunk.len()])?;
        }

        Ok(())
    }
}
