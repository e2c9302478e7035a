// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Platform hooks consumed by the sensor driver
//!
//! The VL53L5CX driver talks to its host through three operations: read a
//! register range, write a register range, and wait. Each returns a status byte,
//! zero on success. [`Platform`] is that interface; [`ChunkedTransport`]
//! implements it, and so can any test double.

use log::debug;

use crate::delay::Delay;
use crate::transport::ChunkedTransport;

/// Default 7-bit I2C address of the sensor
pub const DEFAULT_I2C_ADDRESS: u8 = 0x29;

pub const STATUS_OK: u8 = 0;
pub const STATUS_TIMEOUT: u8 = 1;
pub const STATUS_MCU_ERROR: u8 = 66;
pub const STATUS_INVALID_PARAM: u8 = 127;
pub const STATUS_ERROR: u8 = 255;

/// Host operations required by the sensor driver
pub trait Platform {
    /// Read `data.len()` bytes starting at `register`
    fn rd_multi(&mut self, address: u8, register: u16, data: &mut [u8]) -> u8;

    /// Write `data` starting at `register`
    fn wr_multi(&mut self, address: u8, register: u16, data: &[u8]) -> u8;

    /// Wait for at least `ms` milliseconds
    fn wait_ms(&mut self, ms: u32) -> u8;

    fn rd_byte(&mut self, address: u8, register: u16, value: &mut u8) -> u8 {
        let mut data = [0u8; 1];
        let status = self.rd_multi(address, register, &mut data);
        if status == STATUS_OK {
            *value = data[0];
        }
        status
    }

    fn wr_byte(&mut self, address: u8, register: u16, value: u8) -> u8 {
        self.wr_multi(address, register, &[value])
    }
}

impl<D: Delay> Platform for ChunkedTransport<D> {
    fn rd_multi(&mut self, address: u8, register: u16, data: &mut [u8]) -> u8 {
        match self.read(address, register, data) {
            Ok(()) => STATUS_OK,
            Err(err) => {
                debug!("rd_multi failed: {}", err);
                err.status()
            }
        }
    }

    fn wr_multi(&mut self, address: u8, register: u16, data: &[u8]) -> u8 {
        match self.write(address, register, data) {
            Ok(()) => STATUS_OK,
            Err(err) => {
                debug!("wr_multi failed: {}", err);
                err.status()
            }
        }
    }

    fn wait_ms(&mut self, ms: u32) -> u8 {
        match self.sleep(ms) {
            Ok(()) => STATUS_OK,
            Err(err) => err.status(),
        }
    }
}

/// Swap the byte order of every 4-byte word in place
///
/// The sensor streams its result blocks as little-endian 32-bit words.
/// A trailing partial word is left untouched.
pub fn swap_buffer(buffer: &mut [u8]) {
    for word in buffer.chunks_exact_mut(4) {
        word.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::SimulatedBus;
    use crate::transport::TransportSettings;

    fn platform(sim: &SimulatedBus) -> ChunkedTransport {
        ChunkedTransport::new(sim.clone(), TransportSettings::default()).unwrap()
    }

    #[test]
    fn test_byte_access() {
        let sim = SimulatedBus::new();
        let mut platform = platform(&sim);

        assert_eq!(platform.wr_byte(DEFAULT_I2C_ADDRESS, 0x7fff, 0x02), STATUS_OK);
        let mut value = 0;
        assert_eq!(platform.rd_byte(DEFAULT_I2C_ADDRESS, 0x7fff, &mut value), STATUS_OK);
        assert_eq!(value, 0x02);
    }

    #[test]
    fn test_failed_read_leaves_value_untouched() {
        let sim = SimulatedBus::new();
        sim.load(0x0010, &[0x42]);
        let mut platform = platform(&sim);

        sim.fail_on_transaction(1);
        let mut value = 0x11;
        assert_eq!(platform.rd_byte(DEFAULT_I2C_ADDRESS, 0x0010, &mut value), STATUS_ERROR);
        assert_eq!(value, 0x11);
    }

    #[test]
    fn test_status_mapping() {
        let sim = SimulatedBus::new();
        let mut platform = platform(&sim);

        assert_eq!(platform.wr_multi(DEFAULT_I2C_ADDRESS, 0x0000, &[]), STATUS_INVALID_PARAM);
        sim.fail_on_transaction(1);
        assert_eq!(platform.wr_multi(DEFAULT_I2C_ADDRESS, 0x0000, &[0x01]), STATUS_ERROR);
        assert_eq!(platform.wait_ms(0), STATUS_OK);
    }

    #[test]
    fn test_swap_buffer() {
        let mut buffer = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];
        swap_buffer(&mut buffer);
        assert_eq!(
            buffer,
            [0x04, 0x03, 0x02, 0x01, 0x08, 0x07, 0x06, 0x05, 0x09, 0x0A]
        );
    }
}
