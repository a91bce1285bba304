//! Tick sources: where the scheduler's elapsed time comes from

use std::time::{Duration, Instant};

/// Reports milliseconds elapsed since it was last asked
pub trait TickSource {
    fn elapsed_ms(&mut self) -> u32;
}

/// Virtual time, advanced explicitly (tests, fast-forward replay)
#[derive(Debug, Default)]
pub struct ManualTicks {
    pending_ms: u32,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: u32) {
        self.pending_ms = self.pending_ms.saturating_add(ms);
    }
}

impl TickSource for ManualTicks {
    fn elapsed_ms(&mut self) -> u32 {
        std::mem::take(&mut self.pending_ms)
    }
}

/// Wall-clock time. Sub-millisecond remainders carry over to the next read.
#[derive(Debug)]
pub struct SystemTicks {
    last: Instant,
}

impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTicks {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }
}

impl TickSource for SystemTicks {
    fn elapsed_ms(&mut self) -> u32 {
        let ms = self.last.elapsed().as_millis().min(u32::MAX as u128) as u32;
        self.last += Duration::from_millis(ms as u64);
        ms
    }
}
