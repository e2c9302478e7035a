// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Native I2C driver for Linux hosts
//!
//! This module provides a native I2C driver that communicates directly
//! with the I2C hardware through /dev/i2c-* devices, submitting each
//! transaction with a single `I2C_RDWR` ioctl.

use i2cdev::core::{I2CMessage, I2CTransfer};
use i2cdev::linux::{I2CMessageFlags, LinuxI2CBus, LinuxI2CMessage};
use log::debug;

use super::{BusOpener, I2cBus, Segment, Transaction};
use crate::error::BusError;

/// Opener for a Linux i2c-dev character device such as `/dev/i2c-1`
#[derive(Debug, Clone)]
pub struct LinuxDevice {
    device_path: String,
}

impl LinuxDevice {
    pub fn new(device_path: &str) -> Self {
        Self {
            device_path: device_path.to_string(),
        }
    }
}

impl BusOpener for LinuxDevice {
    fn device(&self) -> &str {
        &self.device_path
    }

    fn open(&mut self) -> Result<Box<dyn I2cBus + Send>, BusError> {
        let bus = LinuxI2CBus::new(&self.device_path)?;
        Ok(Box::new(LinuxI2cBus { bus }))
    }
}

/// Open i2c-dev bus
pub struct LinuxI2cBus {
    bus: LinuxI2CBus,
}

impl I2cBus for LinuxI2cBus {
    fn submit(&mut self, transaction: Transaction<'_, '_>) -> Result<(), BusError> {
        let address = u16::from(transaction.address);
        let mut messages: Vec<LinuxI2CMessage<'_>> = transaction
            .segments
            .iter_mut()
            .map(|segment| match segment {
                Segment::Write { data, continuation } => {
                    let mut flags = I2CMessageFlags::empty();
                    if *continuation {
                        flags |= I2CMessageFlags::NO_START;
                    }
                    LinuxI2CMessage::write(*data)
                        .with_address(address)
                        .with_flags(flags)
                }
                Segment::Read {
                    buffer,
                    continuation,
                } => {
                    let mut flags = I2CMessageFlags::READ;
                    if *continuation {
                        flags |= I2CMessageFlags::NO_START;
                    }
                    LinuxI2CMessage::read(&mut **buffer)
                        .with_address(address)
                        .with_flags(flags)
                }
            })
            .collect();

        let expected = messages.len();
        let completed = self.bus.transfer(&mut messages)? as usize;
        if completed != expected {
            debug!(
                "I2C_RDWR at 0x{:02x} transferred {} of {} messages",
                transaction.address, completed, expected
            );
            return Err(BusError::Incomplete {
                completed,
                expected,
            });
        }
        Ok(())
    }
}
