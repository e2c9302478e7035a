// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rust_vl53l5cx::config::{Config, I2CBusConfig, I2CBusType, SensorConfig, TransportConfig};
use rust_vl53l5cx::transport::ChunkedTransport;
use tempfile::tempdir;

#[test]
fn test_config_load_and_save() -> Result<()> {
    // Create a temporary directory
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Create a custom config
    let config = Config {
        i2c: I2CBusConfig {
            bus_type: I2CBusType::Native,
            device: "/dev/i2c-7".to_string(),
        },
        sensor: SensorConfig { address: 0x30 },
        transport: TransportConfig {
            write_chunk_size: 1024,
            read_chunk_size: 256,
        },
    };

    // Save config to file
    config.save_to_file(&config_path)?;

    // Load config from file
    let loaded_config = Config::from_file(&config_path)?;

    // Verify loaded config matches original
    assert_eq!(loaded_config.i2c, config.i2c);
    assert_eq!(loaded_config.sensor.address, 0x30);
    assert_eq!(loaded_config.transport.write_chunk_size, 1024);
    assert_eq!(loaded_config.transport.read_chunk_size, 256);

    // Test loading default config for non-existent file
    let non_existent_path = temp_dir.path().join("non_existent.yaml");
    let default_config = Config::from_file(&non_existent_path)?;

    // Verify default config was created
    assert!(non_existent_path.exists());
    assert_eq!(default_config.i2c.device, "/dev/i2c-1");
    assert_eq!(default_config.sensor.address, 0x29);
    assert_eq!(default_config.transport.write_chunk_size, 2048);

    Ok(())
}

#[test]
fn test_apply_args_overrides_only_given_values() {
    let mut config = Config::default();

    config.apply_args(Some("/dev/i2c-3".to_string()), None, Some(512), None);

    assert_eq!(config.i2c.device, "/dev/i2c-3");
    assert_eq!(config.sensor.address, 0x29);
    assert_eq!(config.transport.write_chunk_size, 512);
    assert_eq!(config.transport.read_chunk_size, 2048);

    config.apply_args(None, Some(0x2A), None, Some(64));
    assert_eq!(config.i2c.device, "/dev/i2c-3");
    assert_eq!(config.sensor.address, 0x2A);
    assert_eq!(config.transport.read_chunk_size, 64);
}

#[test]
fn test_partial_file_uses_defaults() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("partial.yaml");
    std::fs::write(
        &config_path,
        "i2c:\n  type: simulated\ntransport:\n  write_chunk_size: 32\n",
    )?;

    let config = Config::from_file(&config_path)?;
    assert_eq!(config.i2c.bus_type, I2CBusType::Simulated);
    assert_eq!(config.i2c.device, "/dev/i2c-1");
    assert_eq!(config.sensor.address, 0x29);
    assert_eq!(config.transport.write_chunk_size, 32);
    assert_eq!(config.transport.read_chunk_size, 2048);

    Ok(())
}

#[test]
fn test_config_validation() {
    // Valid config
    assert!(Config::default().validate().is_ok());

    // Reserved address
    let mut invalid_address = Config::default();
    invalid_address.sensor.address = 0x00;
    assert!(invalid_address.validate().is_err());

    // Empty chunk
    let mut invalid_chunk = Config::default();
    invalid_chunk.transport.read_chunk_size = 0;
    assert!(invalid_chunk.validate().is_err());
}

#[test]
fn test_transport_from_simulated_config() -> Result<()> {
    let mut config = Config::default();
    config.i2c.bus_type = I2CBusType::Simulated;
    config.transport.write_chunk_size = 128;
    config.transport.read_chunk_size = 64;

    let mut transport = ChunkedTransport::from_config(&config)?;
    assert_eq!(transport.device(), "simulated");
    assert_eq!(transport.write_chunk_size(), 128);
    assert_eq!(transport.read_chunk_size(), 64);

    let data: Vec<u8> = (0..=255u8).collect();
    transport.write(config.sensor.address, 0x4000, &data)?;
    assert_eq!(transport.read_vec(config.sensor.address, 0x4000, 256)?, data);

    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn test_native_config_opens_lazily() -> Result<()> {
    let mut config = Config::default();
    config.i2c.device = "/dev/i2c-does-not-exist".to_string();

    // Nothing is opened until the first transaction
    let mut transport = ChunkedTransport::from_config(&config)?;
    assert_eq!(transport.device(), "/dev/i2c-does-not-exist");
    assert!(!transport.is_open());

    let err = transport
        .read_vec(0x29, 0x0000, 2)
        .expect_err("missing device should fail to open");
    assert!(matches!(
        err,
        rust_vl53l5cx::TransportError::Open { .. }
    ));

    Ok(())
}
