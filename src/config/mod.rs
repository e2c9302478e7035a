// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the VL53L5CX transport
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings for the transport. The configuration is backed by a
//! YAML file and validated against a JSON schema for robustness.
//!
//! ## Configuration Structure
//!
//! The configuration is organized as a nested structure with sections:
//! - `i2c`: Bus backend and device path
//! - `sensor`: Sensor address on the bus
//! - `transport`: Chunk capacities for reads and writes
//!
//! ## Usage
//!
//! ```no_run
//! use rust_vl53l5cx::config::Config;
//! use rust_vl53l5cx::transport::ChunkedTransport;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("/dev/i2c-3".to_string()), // Device
//!     None,                           // Sensor address
//!     Some(1024),                     // Write chunk size
//!     None,                           // Read chunk size
//! );
//!
//! let transport = ChunkedTransport::from_config(&config).unwrap();
//! println!("Sensor at 0x{:02x} on {}", config.sensor.address, transport.device());
//! ```

pub mod i2c;
pub mod sensor;
pub mod transport;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

// Re-export all types for public API
pub use i2c::{I2CBusConfig, I2CBusType};
pub use sensor::SensorConfig;
pub use transport::TransportConfig;
pub use utils::{output_config_schema, validate_specific_rules};

/// Root configuration structure for the transport.
///
/// The configuration is deserialized from and serialized to YAML using serde,
/// and validated against a JSON schema so that missing or mistyped fields are
/// reported before deserialization.
///
/// Each section uses default values when not explicitly specified in the
/// configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bus the sensor is attached to.
    #[serde(default)]
    pub i2c: I2CBusConfig,

    /// Sensor addressing.
    #[serde(default)]
    pub sensor: SensorConfig,

    /// Chunking of bus transactions.
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Original path: {:?}, Sample path: {:?}", path, sample_path);

        // Create parent directories if they don't exist
        if let Some(parent) = sample_path.parent() {
            if !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with default values. A file that fails schema
    /// validation, deserialization or [`validate_specific_rules`] produces an
    /// error, and a `<name>.sample.yaml` with default values is written next to it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // First step: convert YAML to a generic Value
        let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        // Convert to JSON Value for validation
        let json_value = serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })?;

        let schema_str = include_str!("../../resources/config.schema.json");
        let schema: serde_json::Value =
            serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_yml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = config.validate() {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Check the rules the JSON schema cannot express
    pub fn validate(&self) -> Result<()> {
        validate_specific_rules(self)
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values that are explicitly provided override the existing configuration.
    ///
    /// # Parameters
    ///
    /// * `device` - I2C device path, e.g. `/dev/i2c-1`
    /// * `address` - 7-bit sensor address
    /// * `write_chunk_size` - Maximum payload bytes per write transaction
    /// * `read_chunk_size` - Maximum payload bytes per read transaction
    pub fn apply_args(
        &mut self,
        device: Option<String>,
        address: Option<u8>,
        write_chunk_size: Option<usize>,
        read_chunk_size: Option<usize>,
    ) {
        if let Some(device) = device {
            debug!("Overriding I2C device from command line: {}", device);
            self.i2c.device = device;
        }
        if let Some(address) = address {
            debug!("Overriding sensor address from command line: 0x{:02x}", address);
            self.sensor.address = address;
        }
        if let Some(size) = write_chunk_size {
            debug!("Overriding write chunk size from command line: {}", size);
            self.transport.write_chunk_size = size;
        }
        if let Some(size) = read_chunk_size {
            debug!("Overriding read chunk size from command line: {}", size);
            self.transport.read_chunk_size = size;
        }
    }
}
