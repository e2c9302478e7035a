// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! I2C bus abstraction
//!
//! This module provides the raw bus layer the transport is built on:
//! - [`Segment`] and [`Transaction`]: one bus exchange described as addressed
//!   write/read segments with an optional continuation (no repeated start) flag
//! - [`I2cBus`]: "submit one transaction" capability implemented per backend
//! - [`BusOpener`] and [`BusHandle`]: lazy, open-once access to a bus device
//! - Backends: Linux i2c-dev ([`linux::LinuxDevice`]) and an in-memory
//!   simulation ([`simulated::SimulatedBus`]) for testing

pub mod handle;
#[cfg(target_os = "linux")]
pub mod linux;
pub mod simulated;

use crate::error::BusError;

pub use handle::BusHandle;
#[cfg(target_os = "linux")]
pub use linux::{LinuxDevice, LinuxI2cBus};
pub use simulated::{RecordedSegment, RecordedTransaction, SimulatedBus};

/// Direction of a transaction segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Master transmits to the device
    Write,
    /// Master receives from the device
    Read,
}

/// One message segment of a bus transaction
#[derive(Debug)]
pub enum Segment<'a> {
    /// Bytes sent to the device
    Write { data: &'a [u8], continuation: bool },
    /// Buffer filled by the device
    Read {
        buffer: &'a mut [u8],
        continuation: bool,
    },
}

impl<'a> Segment<'a> {
    /// Write segment with a normal start condition
    pub fn write(data: &'a [u8]) -> Self {
        Segment::Write {
            data,
            continuation: false,
        }
    }

    /// Read segment with a normal start condition
    pub fn read(buffer: &'a mut [u8]) -> Self {
        Segment::Read {
            buffer,
            continuation: false,
        }
    }

    /// Suppress the start condition so this segment continues the previous one
    pub fn continued(self) -> Self {
        match self {
            Segment::Write { data, .. } => Segment::Write {
                data,
                continuation: true,
            },
            Segment::Read { buffer, .. } => Segment::Read {
                buffer,
                continuation: true,
            },
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Segment::Write { .. } => Direction::Write,
            Segment::Read { .. } => Direction::Read,
        }
    }

    pub fn continuation(&self) -> bool {
        match self {
            Segment::Write { continuation, .. } | Segment::Read { continuation, .. } => {
                *continuation
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Segment::Write { data, .. } => data.len(),
            Segment::Read { buffer, .. } => buffer.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single bus exchange with one device
#[derive(Debug)]
pub struct Transaction<'a, 'b> {
    /// 7-bit device address
    pub address: u8,
    pub segments: &'b mut [Segment<'a>],
}

impl<'a, 'b> Transaction<'a, 'b> {
    pub fn new(address: u8, segments: &'b mut [Segment<'a>]) -> Self {
        Self { address, segments }
    }
}

/// I2C bus driver trait for hardware abstraction
///
/// Implementations submit every segment of the transaction as one bus
/// exchange and only return `Ok` when all of them were transferred.
pub trait I2cBus {
    /// Submit one transaction, filling the buffers of its read segments
    fn submit(&mut self, transaction: Transaction<'_, '_>) -> Result<(), BusError>;
}

impl<B: I2cBus + ?Sized> I2cBus for Box<B> {
    fn submit(&mut self, transaction: Transaction<'_, '_>) -> Result<(), BusError> {
        (**self).submit(transaction)
    }
}

/// Source of a bus, opened on demand by a [`BusHandle`]
pub trait BusOpener: Send {
    /// Device path or identifier, used in diagnostics
    fn device(&self) -> &str;

    /// Open the device for read/write access
    fn open(&mut self) -> Result<Box<dyn I2cBus + Send>, BusError>;
}
