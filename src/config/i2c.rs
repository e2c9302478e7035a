// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! I2C bus configuration

use serde::{Deserialize, Serialize};

/// I2C bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I2CBusConfig {
    /// Bus type: "native" for a Linux i2c-dev device or "simulated" for the in-memory bus
    #[serde(rename = "type", default)]
    pub bus_type: I2CBusType,

    /// Device path for native I2C (e.g., "/dev/i2c-1")
    #[serde(default = "default_device")]
    pub device: String,
}

/// I2C bus type enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum I2CBusType {
    /// Linux i2c-dev character device
    #[default]
    Native,
    /// In-memory register device for testing
    Simulated,
}

fn default_device() -> String {
    "/dev/i2c-1".to_string()
}

impl Default for I2CBusConfig {
    fn default() -> Self {
        Self {
            bus_type: I2CBusType::Native,
            device: default_device(),
        }
    }
}
