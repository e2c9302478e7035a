// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Transaction chunking configuration

use serde::{Deserialize, Serialize};

use crate::transport::{TransportSettings, DEFAULT_CHUNK_SIZE};

/// Chunk capacities of the transport.
///
/// Both values must stay at or below the bus driver's maximum single-transaction
/// buffer size, minus the two bytes of register pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Maximum payload bytes per write transaction.
    ///
    /// Default value is 2048.
    #[serde(default = "default_chunk_size")]
    pub write_chunk_size: usize,

    /// Maximum payload bytes per read transaction.
    ///
    /// Default value is 2048.
    #[serde(default = "default_chunk_size")]
    pub read_chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            write_chunk_size: DEFAULT_CHUNK_SIZE,
            read_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl TransportConfig {
    pub fn settings(&self) -> TransportSettings {
        TransportSettings {
            write_chunk_size: self.write_chunk_size,
            read_chunk_size: self.read_chunk_size,
        }
    }
}
