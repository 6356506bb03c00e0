// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ring buffers addressed by absolute step
//!
//! A slot is `(origin + offset) mod capacity`. Because reads clear the slot,
//! no rotation is needed between slices: the owner only announces the origin
//! of the slice being delivered to or updated.
//!
//! Capacity must cover the largest delivery offset the host can produce
//! (slice length + maximum delay). The neuron rejects larger offsets before
//! they reach a buffer; here they are only asserted in debug builds.

use crate::types::{GlifError, Result, Step};

/// Single delayed-value accumulator
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer {
    slots: Vec<f64>,
    origin: i64,
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0.0; capacity.max(1)],
            origin: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Announce the origin of the slice offsets refer to
    #[inline]
    pub fn set_origin(&mut self, origin: Step) {
        self.origin = origin.0;
    }

    pub fn origin(&self) -> Step {
        Step(self.origin)
    }

    #[inline]
    fn slot(&self, offset: usize) -> usize {
        (self.origin + offset as i64).rem_euclid(self.slots.len() as i64) as usize
    }

    /// Accumulate `amount` at `offset` steps from the slice origin
    #[inline]
    pub fn add_value(&mut self, offset: usize, amount: f64) {
        debug_assert!(
            offset < self.slots.len(),
            "delivery offset {} exceeds ring buffer capacity {}",
            offset,
            self.slots.len()
        );
        let idx = self.slot(offset);
        self.slots[idx] += amount;
    }

    /// Take (and clear) the value due at `lag`
    #[inline]
    pub fn get_value(&mut self, lag: usize) -> f64 {
        let idx = self.slot(lag);
        core::mem::take(&mut self.slots[idx])
    }

    /// Value due at `offset` without consuming it
    pub fn peek_value(&self, offset: usize) -> f64 {
        self.slots[self.slot(offset)]
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Discard content and change capacity
    pub fn reset(&mut self, capacity: usize) {
        self.slots = vec![0.0; capacity.max(1)];
    }

    /// True when no contribution is pending
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|&v| v == 0.0)
    }
}

/// One ring buffer per receptor (0-based index)
#[derive(Debug, Clone, PartialEq)]
pub struct RingBufferBank {
    buffers: Vec<RingBuffer>,
    capacity: usize,
    /// Last announced origin, applied to rebuilt buffers
    origin: Step,
}

impl RingBufferBank {
    pub fn new(receptors: usize, capacity: usize) -> Self {
        Self {
            buffers: vec![RingBuffer::new(capacity); receptors],
            capacity: capacity.max(1),
            origin: Step::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when no receptor has pending content
    pub fn is_empty(&self) -> bool {
        self.buffers.iter().all(RingBuffer::is_empty)
    }

    /// Rebind the bank to `receptors` buffers
    ///
    /// Pending content is never carried over, so this is refused while any
    /// buffer still holds a contribution.
    pub fn resize(&mut self, receptors: usize) -> Result<()> {
        if receptors == self.buffers.len() {
            return Ok(());
        }
        if !self.is_empty() {
            return Err(GlifError::BufferNotEmpty {
                current: self.buffers.len(),
                requested: receptors,
            });
        }
        let mut fresh = RingBuffer::new(self.capacity);
        fresh.set_origin(self.origin);
        self.buffers = vec![fresh; receptors];
        Ok(())
    }

    /// Drop all content and reallocate every buffer with `capacity` slots
    pub fn reset(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        for buffer in &mut self.buffers {
            buffer.reset(self.capacity);
        }
    }

    pub fn clear(&mut self) {
        self.buffers.iter_mut().for_each(RingBuffer::clear);
    }

    pub fn set_origin(&mut self, origin: Step) {
        self.origin = origin;
        for buffer in &mut self.buffers {
            buffer.set_origin(origin);
        }
    }

    #[inline]
    pub fn add_value(&mut self, receptor: usize, offset: usize, amount: f64) {
        self.buffers[receptor].add_value(offset, amount);
    }

    #[inline]
    pub fn get_value(&mut self, receptor: usize, lag: usize) -> f64 {
        self.buffers[receptor].get_value(lag)
    }

    pub fn get(&self, receptor: usize) -> Option<&RingBuffer> {
        self.buffers.get(receptor)
    }

    pub fn origin(&self) -> Step {
        self.origin
    }
}
