// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Simulated I2C bus for testing and development
//!
//! [`SimulatedBus`] stands in for the hardware:
//! - A 64 KiB register space per bus, addressed by the 2-byte big-endian
//!   pointer that opens each transaction, with auto-increment on every byte
//! - A record of every submitted transaction (address, segment flags, bytes)
//! - Failure injection on the n-th transaction and on open
//!
//! Clones share the same state, so a test can keep one clone for inspection
//! while the transport owns another.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use super::{BusOpener, Direction, I2cBus, Segment, Transaction};
use crate::error::BusError;

const REGISTER_SPACE: usize = 0x1_0000;

/// Copy of one segment as it was put on the simulated bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSegment {
    pub direction: Direction,
    pub continuation: bool,
    /// Bytes written, or bytes returned for a read segment
    pub data: Vec<u8>,
}

/// Copy of one submitted transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransaction {
    pub address: u8,
    pub segments: Vec<RecordedSegment>,
}

impl RecordedTransaction {
    /// Register pointer carried by the first write segment, if any
    pub fn register(&self) -> Option<u16> {
        let first = self.segments.first()?;
        if first.direction != Direction::Write || first.data.len() < 2 {
            return None;
        }
        Some(u16::from_be_bytes([first.data[0], first.data[1]]))
    }

    /// Data bytes carried after the register pointer of a single-segment write
    pub fn payload(&self) -> &[u8] {
        match self.segments.first() {
            Some(segment) if segment.direction == Direction::Write && segment.data.len() >= 2 => {
                &segment.data[2..]
            }
            _ => &[],
        }
    }
}

#[derive(Debug)]
struct SimState {
    memory: Vec<u8>,
    pointer: u16,
    transactions: Vec<RecordedTransaction>,
    /// 1-based index of the transaction that must fail
    fail_on: Option<usize>,
    fail_open: bool,
    open_count: usize,
    /// Addresses that acknowledge; empty means every address does
    present: HashSet<u8>,
}

impl SimState {
    fn write_byte(&mut self, value: u8) {
        self.memory[usize::from(self.pointer)] = value;
        self.pointer = self.pointer.wrapping_add(1);
    }

    fn read_byte(&mut self) -> u8 {
        let value = self.memory[usize::from(self.pointer)];
        self.pointer = self.pointer.wrapping_add(1);
        value
    }
}

/// In-memory register device behind a recording bus
#[derive(Debug, Clone)]
pub struct SimulatedBus {
    state: Arc<Mutex<SimState>>,
}

impl Default for SimulatedBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBus {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                memory: vec![0; REGISTER_SPACE],
                pointer: 0,
                transactions: Vec::new(),
                fail_on: None,
                fail_open: false,
                open_count: 0,
                present: HashSet::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the n-th submitted transaction (1-based, counted from now on) fail
    pub fn fail_on_transaction(&self, n: usize) {
        let mut state = self.state();
        state.fail_on = Some(state.transactions.len() + n);
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.state().fail_open = fail;
    }

    /// Restrict acknowledgement to the given address
    pub fn add_device(&self, address: u8) {
        self.state().present.insert(address);
    }

    /// Preload register contents
    pub fn load(&self, register: u16, bytes: &[u8]) {
        let mut state = self.state();
        state.pointer = register;
        for &byte in bytes {
            state.write_byte(byte);
        }
    }

    /// Current register contents
    pub fn peek(&self, register: u16, length: usize) -> Vec<u8> {
        let state = self.state();
        (0..length)
            .map(|i| state.memory[(usize::from(register) + i) % REGISTER_SPACE])
            .collect()
    }

    pub fn transactions(&self) -> Vec<RecordedTransaction> {
        self.state().transactions.clone()
    }

    pub fn clear_transactions(&self) {
        let mut state = self.state();
        state.transactions.clear();
        state.fail_on = None;
    }

    pub fn open_count(&self) -> usize {
        self.state().open_count
    }
}

impl BusOpener for SimulatedBus {
    fn device(&self) -> &str {
        "simulated"
    }

    fn open(&mut self) -> Result<Box<dyn I2cBus + Send>, BusError> {
        let mut state = self.state();
        state.open_count += 1;
        if state.fail_open {
            return Err(BusError::Simulated("device unavailable".to_string()));
        }
        drop(state);
        Ok(Box::new(self.clone()))
    }
}

impl I2cBus for SimulatedBus {
    fn submit(&mut self, transaction: Transaction<'_, '_>) -> Result<(), BusError> {
        let mut state = self.state();
        let index = state.transactions.len() + 1;

        let mut record = RecordedTransaction {
            address: transaction.address,
            segments: transaction
                .segments
                .iter()
                .map(|segment| RecordedSegment {
                    direction: segment.direction(),
                    continuation: segment.continuation(),
                    data: match segment {
                        Segment::Write { data, .. } => data.to_vec(),
                        Segment::Read { buffer, .. } => vec![0; buffer.len()],
                    },
                })
                .collect(),
        };

        if state.fail_on == Some(index) {
            debug!("Simulated failure on transaction {}", index);
            state.transactions.push(record);
            return Err(BusError::Simulated(format!(
                "injected failure on transaction {}",
                index
            )));
        }

        if !state.present.is_empty() && !state.present.contains(&transaction.address) {
            state.transactions.push(record);
            return Err(BusError::Simulated(format!(
                "no acknowledge from 0x{:02x}",
                transaction.address
            )));
        }

        let mut pointer_set = false;
        for (segment, recorded) in transaction.segments.iter_mut().zip(record.segments.iter_mut()) {
            match segment {
                Segment::Write { data, .. } => {
                    let mut bytes = data.iter().copied();
                    if !pointer_set {
                        let hi = bytes.next().unwrap_or(0);
                        let lo = bytes.next().unwrap_or(0);
                        state.pointer = u16::from_be_bytes([hi, lo]);
                        pointer_set = true;
                    }
                    for byte in bytes {
                        state.write_byte(byte);
                    }
                }
                Segment::Read { buffer, .. } => {
                    for slot in buffer.iter_mut() {
                        *slot = state.read_byte();
                    }
                    recorded.data.copy_from_slice(buffer);
                }
            }
        }

        state.transactions.push(record);
        Ok(())
    }
}
