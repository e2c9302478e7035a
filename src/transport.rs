// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Chunked register transport
//!
//! The sensor driver reads and writes byte ranges of a 16-bit register space.
//! The bus, however, limits how many bytes a single transaction may carry, and
//! the firmware and configuration uploads run into tens of kilobytes. This
//! module bridges the two:
//!
//! - Writes are split into chunks of at most `write_chunk_size` bytes. Each chunk
//!   is sent as its own transaction, prefixed with the register pointer for
//!   `base + offset`, from a staging buffer reused across chunks and calls.
//! - Reads are a register pointer write followed by a continued read segment,
//!   split the same way when longer than `read_chunk_size`.
//! - A failing chunk aborts the operation; remaining chunks are never sent and
//!   nothing is retried.
//!
//! The device is assumed to accept re-addressed chunks (or to auto-increment its
//! internal pointer in step with the host offset). This is a property of the
//! sensor, not something the transport verifies.
//!
//! ```no_run
//! use rust_vl53l5cx::bus::LinuxDevice;
//! use rust_vl53l5cx::transport::{ChunkedTransport, TransportSettings};
//!
//! let mut transport =
//!     ChunkedTransport::new(LinuxDevice::new("/dev/i2c-1"), TransportSettings::default()).unwrap();
//!
//! let mut id = [0u8; 2];
//! transport.read(0x29, 0x0000, &mut id).unwrap();
//! transport.write(0x29, 0x7fff, &[0x00]).unwrap();
//! transport.sleep(10).unwrap();
//! ```

use log::{debug, error};

use crate::bus::{BusHandle, BusOpener, I2cBus, Segment, SimulatedBus, Transaction};
use crate::config::{Config, I2CBusConfig, I2CBusType};
use crate::delay::{Delay, ThreadDelay};
use crate::error::{BusError, TransportError};

/// Bytes taken by the register pointer at the start of every transaction
pub const REGISTER_POINTER_LEN: usize = 2;

/// Default chunk capacity for reads and writes
pub const DEFAULT_CHUNK_SIZE: usize = 2048;

/// Largest chunk an i2c-dev message can carry alongside the register pointer
pub const MAX_CHUNK_SIZE: usize = u16::MAX as usize - REGISTER_POINTER_LEN;

const REGISTER_SPACE: usize = 0x1_0000;

/// Chunk capacities of a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    pub write_chunk_size: usize,
    pub read_chunk_size: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            write_chunk_size: DEFAULT_CHUNK_SIZE,
            read_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl TransportSettings {
    pub fn validate(&self) -> Result<(), TransportError> {
        for (name, size) in [
            ("write_chunk_size", self.write_chunk_size),
            ("read_chunk_size", self.read_chunk_size),
        ] {
            if size == 0 || size > MAX_CHUNK_SIZE {
                return Err(TransportError::InvalidParam(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_CHUNK_SIZE, size
                )));
            }
        }
        Ok(())
    }
}

/// One bus-sized slice of a larger transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDescriptor {
    /// 1-based chunk index
    pub index: usize,
    /// Register pointer sent with this chunk (base + offset)
    pub register: u16,
    /// Offset of the chunk in the caller's buffer
    pub offset: usize,
    pub length: usize,
}

/// Iterator over the chunks of a transfer of `length` bytes at `base`
///
/// Every chunk is `chunk_size` bytes except the last, which holds the
/// remainder (a full `chunk_size` when `length` is an exact multiple).
/// A zero `chunk_size` is treated as 1. Register addresses wrap at 0xFFFF;
/// the transport rejects requests that would do so.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    base: u16,
    length: usize,
    chunk_size: usize,
    next: usize,
}

impl ChunkPlan {
    pub fn new(base: u16, length: usize, chunk_size: usize) -> Self {
        Self {
            base,
            length,
            chunk_size: chunk_size.max(1),
            next: 0,
        }
    }

    /// `ceil(length / chunk_size)`
    pub fn chunk_count(&self) -> usize {
        self.length.div_ceil(self.chunk_size)
    }
}

impl Iterator for ChunkPlan {
    type Item = ChunkDescriptor;

    fn next(&mut self) -> Option<ChunkDescriptor> {
        let offset = self.next * self.chunk_size;
        if offset >= self.length {
            return None;
        }
        self.next += 1;
        Some(ChunkDescriptor {
            index: self.next,
            register: ((usize::from(self.base) + offset) % REGISTER_SPACE) as u16,
            offset,
            length: self.chunk_size.min(self.length - offset),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chunk_count() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkPlan {}

/// Pointer write followed by a continued read of `buffer.len()` bytes
fn read_transaction<B: I2cBus + ?Sized>(
    bus: &mut B,
    address: u8,
    register: u16,
    buffer: &mut [u8],
) -> Result<(), BusError> {
    let pointer = register.to_be_bytes();
    let mut segments = [Segment::write(&pointer), Segment::read(buffer).continued()];
    bus.submit(Transaction::new(address, &mut segments))
}

/// Single-segment write of a frame that already starts with its register pointer
fn write_transaction<B: I2cBus + ?Sized>(
    bus: &mut B,
    address: u8,
    frame: &[u8],
) -> Result<(), BusError> {
    let mut segments = [Segment::write(frame)];
    bus.submit(Transaction::new(address, &mut segments))
}

fn validate_request(address: u8, register: u16, length: usize) -> Result<(), TransportError> {
    if address > 0x7F {
        return Err(TransportError::InvalidParam(format!(
            "0x{:02x} is not a 7-bit I2C address",
            address
        )));
    }
    if length == 0 {
        return Err(TransportError::InvalidParam(
            "transfer length must be at least 1 byte".to_string(),
        ));
    }
    if usize::from(register) + length > REGISTER_SPACE {
        return Err(TransportError::InvalidParam(format!(
            "{} bytes at register 0x{:04x} run past the end of the register space",
            length, register
        )));
    }
    Ok(())
}

/// Create the bus opener selected by the configuration
pub fn create_bus_opener(config: &I2CBusConfig) -> Result<Box<dyn BusOpener>, TransportError> {
    match config.bus_type {
        #[cfg(target_os = "linux")]
        I2CBusType::Native => Ok(Box::new(crate::bus::LinuxDevice::new(&config.device))),
        #[cfg(not(target_os = "linux"))]
        I2CBusType::Native => Err(TransportError::Open {
            device: config.device.clone(),
            source: BusError::Unsupported("i2c-dev is only available on Linux".to_string()),
        }),
        I2CBusType::Simulated => Ok(Box::new(SimulatedBus::new())),
    }
}

/// Register transport that splits transfers into bus-sized chunks
pub struct ChunkedTransport<D: Delay = ThreadDelay> {
    handle: BusHandle,
    write_chunk_size: usize,
    read_chunk_size: usize,
    /// Register pointer plus one write chunk, reused for every chunk
    staging: Vec<u8>,
    delay: D,
}

impl ChunkedTransport<ThreadDelay> {
    /// Create a transport sleeping on the calling thread
    pub fn new(
        opener: impl BusOpener + 'static,
        settings: TransportSettings,
    ) -> Result<Self, TransportError> {
        Self::with_delay(Box::new(opener), settings, ThreadDelay)
    }

    /// Create a transport from the `i2c` and `transport` configuration sections
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let opener = create_bus_opener(&config.i2c)?;
        Self::with_delay(opener, config.transport.settings(), ThreadDelay)
    }
}

impl<D: Delay> ChunkedTransport<D> {
    pub fn with_delay(
        opener: Box<dyn BusOpener>,
        settings: TransportSettings,
        delay: D,
    ) -> Result<Self, TransportError> {
        settings.validate()?;
        Ok(Self {
            handle: BusHandle::new(opener),
            write_chunk_size: settings.write_chunk_size,
            read_chunk_size: settings.read_chunk_size,
            staging: Vec::with_capacity(REGISTER_POINTER_LEN + settings.write_chunk_size),
            delay,
        })
    }

    pub fn write_chunk_size(&self) -> usize {
        self.write_chunk_size
    }

    pub fn read_chunk_size(&self) -> usize {
        self.read_chunk_size
    }

    pub fn device(&self) -> &str {
        self.handle.device()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Read `buffer.len()` bytes starting at `register`
    ///
    /// On error the content of `buffer` is unspecified.
    pub fn read(
        &mut self,
        address: u8,
        register: u16,
        buffer: &mut [u8],
    ) -> Result<(), TransportError> {
        validate_request(address, register, buffer.len())?;
        let length = buffer.len();
        let plan = ChunkPlan::new(register, length, self.read_chunk_size);
        let chunks = plan.chunk_count();
        let bus = self.handle.ensure_open()?;

        for chunk in plan {
            let slice = &mut buffer[chunk.offset..chunk.offset + chunk.length];
            if let Err(source) = read_transaction(bus, address, chunk.register, slice) {
                error!(
                    "I2C Error: reading {} bytes at 0x{:04x}: chunk {} of {}: {}",
                    chunk.length, chunk.register, chunk.index, chunks, source
                );
                return Err(if chunks == 1 {
                    TransportError::Io {
                        address,
                        register,
                        length,
                        source,
                    }
                } else {
                    TransportError::ChunkRead {
                        chunk: chunk.index,
                        chunks,
                        register: chunk.register,
                        length: chunk.length,
                        source,
                    }
                });
            }
        }
        Ok(())
    }

    /// Read `length` bytes starting at `register` into a new buffer
    pub fn read_vec(
        &mut self,
        address: u8,
        register: u16,
        length: usize,
    ) -> Result<Vec<u8>, TransportError> {
        let mut buffer = vec![0; length];
        self.read(address, register, &mut buffer)?;
        Ok(buffer)
    }

    /// Write `payload` starting at `register`, one transaction per chunk
    ///
    /// A failed chunk aborts the write. Chunks before it have already reached
    /// the device, which is then in an indeterminate state (see
    /// [`TransportError::is_partial`]).
    pub fn write(
        &mut self,
        address: u8,
        register: u16,
        payload: &[u8],
    ) -> Result<(), TransportError> {
        validate_request(address, register, payload.len())?;
        let plan = ChunkPlan::new(register, payload.len(), self.write_chunk_size);
        let chunks = plan.chunk_count();
        debug!(
            "Writing {} bytes at 0x{:04x} to 0x{:02x}",
            payload.len(),
            register,
            address
        );
        let bus = self.handle.ensure_open()?;

        for chunk in plan {
            self.staging.clear();
            self.staging.extend_from_slice(&chunk.register.to_be_bytes());
            self.staging
                .extend_from_slice(&payload[chunk.offset..chunk.offset + chunk.length]);

            debug!(
                "Sending chunk {} of {} {} bytes",
                chunk.index, chunks, chunk.length
            );
            if let Err(source) = write_transaction(bus, address, &self.staging) {
                error!(
                    "I2C Error: writing {} bytes: chunk {} of {}: {}",
                    chunk.length, chunk.index, chunks, source
                );
                return Err(TransportError::ChunkWrite {
                    chunk: chunk.index,
                    chunks,
                    register: chunk.register,
                    length: chunk.length,
                    source,
                });
            }
        }
        Ok(())
    }

    /// Block the calling thread for at least `ms` milliseconds
    pub fn sleep(&mut self, ms: u32) -> Result<(), TransportError> {
        self.delay.delay_ms(ms);
        Ok(())
    }
}

impl<D: Delay> std::fmt::Debug for ChunkedTransport<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedTransport")
            .field("handle", &self.handle)
            .field("write_chunk_size", &self.write_chunk_size)
            .field("read_chunk_size", &self.read_chunk_size)
            .finish()
    }
}
