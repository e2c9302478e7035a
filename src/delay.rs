// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vl53l5cx project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Blocking millisecond delays used between sensor polls

use std::time::Duration;

/// Blocking delay provider
#[cfg_attr(test, mockall::automock)]
pub trait Delay: Send {
    /// Block the calling thread for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Delay backed by [`std::thread::sleep`]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        if ms == 0 {
            return;
        }
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
