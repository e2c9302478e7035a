// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error types for the I2C transport
//!
//! [`BusError`] is what a bus implementation reports for a single failed
//! transaction. [`TransportError`] is what the transport hands back to the
//! driver: it wraps the bus error with the address, register and (for chunked
//! operations) the chunk that failed.

use thiserror::Error;

use crate::platform::{STATUS_ERROR, STATUS_INVALID_PARAM};

/// Errors reported by an [`I2cBus`](crate::bus::I2cBus) implementation
#[derive(Error, Debug)]
pub enum BusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(target_os = "linux")]
    #[error("i2c-dev error: {0}")]
    Linux(#[from] i2cdev::linux::LinuxI2CError),

    #[error("incomplete transfer: {completed} of {expected} segments transferred")]
    Incomplete { completed: usize, expected: usize },

    #[error("unsupported bus: {0}")]
    Unsupported(String),

    #[error("simulated failure: {0}")]
    Simulated(String),
}

/// Errors returned by the chunked transport
#[derive(Error, Debug)]
pub enum TransportError {
    /// The bus device could not be opened
    #[error("failed to open I2C device {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: BusError,
    },

    /// A single-transaction read or write failed
    #[error("I2C error at 0x{address:02x}: {length} bytes at register 0x{register:04x}: {source}")]
    Io {
        address: u8,
        register: u16,
        length: usize,
        #[source]
        source: BusError,
    },

    /// A chunk of a multi-transaction write failed; the remaining chunks were not sent
    #[error("I2C error: writing {length} bytes at register 0x{register:04x}: chunk {chunk} of {chunks}: {source}")]
    ChunkWrite {
        chunk: usize,
        chunks: usize,
        register: u16,
        length: usize,
        #[source]
        source: BusError,
    },

    /// A chunk of a multi-transaction read failed
    #[error("I2C error: reading {length} bytes at register 0x{register:04x}: chunk {chunk} of {chunks}: {source}")]
    ChunkRead {
        chunk: usize,
        chunks: usize,
        register: u16,
        length: usize,
        #[source]
        source: BusError,
    },

    /// The request was rejected before touching the bus
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

impl TransportError {
    /// Index of the failed chunk (1-based), for chunked operations
    pub fn failed_chunk(&self) -> Option<usize> {
        match self {
            Self::ChunkWrite { chunk, .. } | Self::ChunkRead { chunk, .. } => Some(*chunk),
            _ => None,
        }
    }

    /// True when earlier chunks of a write already reached the device.
    ///
    /// The device is then in a partially updated state and the in-progress
    /// operation must be restarted from a known device state.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::ChunkWrite { chunk, .. } if *chunk > 1)
    }

    /// Status code handed to the driver through the platform hooks
    pub fn status(&self) -> u8 {
        match self {
            Self::InvalidParam(_) => STATUS_INVALID_PARAM,
            _ => STATUS_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_write_only_after_first_chunk() {
        let first = TransportError::ChunkWrite {
            chunk: 1,
            chunks: 3,
            register: 0,
            length: 2048,
            source: BusError::Simulated("nack".to_string()),
        };
        assert_eq!(first.failed_chunk(), Some(1));
        assert!(!first.is_partial());

        let later = TransportError::ChunkWrite {
            chunk: 2,
            chunks: 3,
            register: 0x0800,
            length: 2048,
            source: BusError::Simulated("nack".to_string()),
        };
        assert_eq!(later.failed_chunk(), Some(2));
        assert!(later.is_partial());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            TransportError::InvalidParam("empty".to_string()).status(),
            STATUS_INVALID_PARAM
        );
        let io = TransportError::Io {
            address: 0x29,
            register: 0x0010,
            length: 4,
            source: BusError::Simulated("nack".to_string()),
        };
        assert_eq!(io.status(), STATUS_ERROR);
        assert_eq!(io.failed_chunk(), None);
    }

    #[test]
    fn test_error_message_names_chunk() {
        let err = TransportError::ChunkWrite {
            chunk: 3,
            chunks: 4,
            register: 0x1000,
            length: 2048,
            source: BusError::Simulated("nack".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("chunk 3 of 4"));
        assert!(message.contains("0x1000"));
    }
}
