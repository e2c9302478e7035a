// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Lazily opened bus handle
//!
//! The device is opened on the first transaction and kept open for as long as
//! the handle lives. A failed open is reported to the caller and the handle stays
//! unopened, so the next transaction tries again.

use log::{error, info};

use super::{BusOpener, I2cBus};
use crate::error::TransportError;

/// Owned, open-once access to a bus device
pub struct BusHandle {
    opener: Box<dyn BusOpener>,
    bus: Option<Box<dyn I2cBus + Send>>,
}

impl BusHandle {
    /// Create an unopened handle; nothing touches the device until [`Self::ensure_open`]
    pub fn new(opener: Box<dyn BusOpener>) -> Self {
        Self { opener, bus: None }
    }

    pub fn device(&self) -> &str {
        self.opener.device()
    }

    pub fn is_open(&self) -> bool {
        self.bus.is_some()
    }

    /// Return the open bus, opening the device on first use
    pub fn ensure_open(&mut self) -> Result<&mut (dyn I2cBus + Send + 'static), TransportError> {
        match self.bus {
            Some(ref mut bus) => Ok(&mut **bus),
            None => {
                info!("Opening {}", self.opener.device());
                let bus = self.opener.open().map_err(|source| {
                    error!("Failed to open {}: {}", self.opener.device(), source);
                    TransportError::Open {
                        device: self.opener.device().to_string(),
                        source,
                    }
                })?;
                Ok(&mut **self.bus.insert(bus))
            }
        }
    }
}

impl std::fmt::Debug for BusHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusHandle")
            .field("device", &self.device())
            .field("open", &self.is_open())
            .finish()
    }
}
