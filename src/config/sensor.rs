// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Sensor addressing configuration

use serde::{Deserialize, Serialize};

use crate::platform::DEFAULT_I2C_ADDRESS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// 7-bit I2C address of the sensor (0x29 out of reset)
    #[serde(default = "default_address")]
    pub address: u8,
}

fn default_address() -> u8 {
    DEFAULT_I2C_ADDRESS
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}
