// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::debug;

use super::{Config, I2CBusType};
use crate::transport::MAX_CHUNK_SIZE;

/// Lowest and highest non-reserved 7-bit I2C addresses
const FIRST_DEVICE_ADDRESS: u8 = 0x08;
const LAST_DEVICE_ADDRESS: u8 = 0x77;

/// Output the embedded JSON schema to the console.
///
/// The schema is printed pretty-formatted to stdout.
pub fn output_config_schema() -> Result<()> {
    let schema_str = include_str!("../../resources/config.schema.json");

    let schema: serde_json::Value =
        serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Validates the configuration against additional rules that aren't covered by the JSON schema.
///
/// # Validation Rules
///
/// - **Sensor address**: must be a non-reserved 7-bit address (0x08-0x77)
/// - **Chunk sizes**: between 1 and the largest payload an i2c-dev message can
///   carry next to the register pointer
/// - **Device path**: must not be empty for the native bus; a path outside
///   `/dev` is only reported
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    let address = config.sensor.address;
    if !(FIRST_DEVICE_ADDRESS..=LAST_DEVICE_ADDRESS).contains(&address) {
        anyhow::bail!(
            "Invalid sensor address 0x{:02x}: must be between 0x{:02x} and 0x{:02x}",
            address,
            FIRST_DEVICE_ADDRESS,
            LAST_DEVICE_ADDRESS
        );
    }

    for (name, size) in [
        ("write_chunk_size", config.transport.write_chunk_size),
        ("read_chunk_size", config.transport.read_chunk_size),
    ] {
        if size == 0 || size > MAX_CHUNK_SIZE {
            anyhow::bail!(
                "Invalid {}: {} (must be between 1 and {})",
                name,
                size,
                MAX_CHUNK_SIZE
            );
        }
    }

    if config.i2c.bus_type == I2CBusType::Native {
        if config.i2c.device.trim().is_empty() {
            anyhow::bail!("Native I2C bus requires a device path");
        }
        if !config.i2c.device.starts_with("/dev/") {
            // Reported only, the open decides
            debug!("Unusual I2C device path: {}", config.i2c.device);
        }
    }

    Ok(())
}
