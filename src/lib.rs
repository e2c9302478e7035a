// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! VL53L5CX I2C transport
//!
//! Host-side plumbing the VL53L5CX time-of-flight sensor driver needs on a
//! Linux host: register-addressed reads and writes over `/dev/i2c-*`, split into
//! bus-sized chunks, and a blocking millisecond wait.
//!
//! - [`bus`]: the transaction model and its backends (i2c-dev, simulated)
//! - [`transport`]: chunking of register reads and writes
//! - [`platform`]: the status-code hooks the sensor driver calls
//! - [`config`]: YAML configuration validated against a JSON schema

pub mod bus;
pub mod config;
pub mod delay;
pub mod error;
pub mod platform;
pub mod transport;

pub use error::{BusError, TransportError};
pub use platform::{Platform, DEFAULT_I2C_ADDRESS};
pub use transport::{ChunkedTransport, TransportSettings};
