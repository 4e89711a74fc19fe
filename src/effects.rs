//! Effect sink boundary.
//!
//! The core never draws anything. Rockets ask an [`EffectSink`] for effect
//! handles and move, replay, finish and release them. [`MessageEffectSink`]
//! turns those calls into [`EffectMessage`]s for a rendering layer.

use std::collections::HashSet;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::events::{EffectCommand, EffectMessage};

/// Opaque handle to one live effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct EffectHandle(pub u64);

/// Consumer of rocket effect requests.
///
/// `acquire_effect` may fail when the backing pool is exhausted; the caller
/// then carries on without that effect.
pub trait EffectSink {
    fn acquire_effect(&mut self, effect_id: &str) -> Option<EffectHandle>;
    fn set_position(&mut self, handle: EffectHandle, position: Vec2);
    /// Replay the effect from its start.
    fn reset(&mut self, handle: EffectHandle);
    /// Force the effect to terminate.
    fn finish(&mut self, handle: EffectHandle);
    /// Give the handle back; it must not be used afterwards.
    fn release(&mut self, handle: EffectHandle);
}

/// Bounded pool of effect handles.
///
/// Acquisition fails once `capacity` handles are live, mirroring a particle
/// system that ran out of emitters.
///
/// # Example
/// ```
/// use bevy_salute::effects::EffectBudget;
///
/// let mut budget = EffectBudget::new(1);
/// let handle = budget.acquire().unwrap();
/// assert!(budget.acquire().is_none());
/// budget.release(handle);
/// assert_eq!(budget.live(), 0);
/// ```
#[derive(Resource, Debug, Default)]
pub struct EffectBudget {
    live: HashSet<EffectHandle>,
    next_id: u64,
    capacity: usize,
    refusals: usize,
}

impl EffectBudget {
    pub fn new(capacity: usize) -> Self {
        Self {
            live: HashSet::with_capacity(capacity.min(1024)),
            next_id: 0,
            capacity,
            refusals: 0,
        }
    }

    /// Get a fresh handle or None if the budget is spent.
    pub fn acquire(&mut self) -> Option<EffectHandle> {
        if self.live.len() >= self.capacity {
            self.refusals += 1;
            return None;
        }
        self.refusals = 0;
        let handle = EffectHandle(self.next_id);
        self.next_id += 1;
        self.live.insert(handle);
        Some(handle)
    }

    /// Return a handle to the budget. Unknown handles are ignored.
    pub fn release(&mut self, handle: EffectHandle) -> bool {
        let released = self.live.remove(&handle);
        if released {
            self.refusals = 0;
        }
        released
    }

    /// Refused acquisitions since a slot last became available.
    pub fn refusals(&self) -> usize {
        self.refusals
    }

    pub fn is_live(&self, handle: EffectHandle) -> bool {
        self.live.contains(&handle)
    }

    /// Number of handles currently out.
    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Effect sink that publishes every call as an [`EffectMessage`].
pub struct MessageEffectSink<'a, 'w> {
    budget: &'a mut EffectBudget,
    writer: &'a mut MessageWriter<'w, EffectMessage>,
}

impl<'a, 'w> MessageEffectSink<'a, 'w> {
    pub fn new(budget: &'a mut EffectBudget, writer: &'a mut MessageWriter<'w, EffectMessage>) -> Self {
        Self { budget, writer }
    }

    fn send(&mut self, handle: EffectHandle, command: EffectCommand) {
        self.writer.write(EffectMessage { handle, command });
    }
}

impl EffectSink for MessageEffectSink<'_, '_> {
    fn acquire_effect(&mut self, effect_id: &str) -> Option<EffectHandle> {
        let Some(handle) = self.budget.acquire() else {
            if self.budget.refusals() == 1 {
                warn!(
                    "effect budget of {} exhausted, skipping {effect_id}",
                    self.budget.capacity()
                );
            } else {
                debug!("effect budget still exhausted, skipping {effect_id}");
            }
            return None;
        };
        self.send(
            handle,
            EffectCommand::Start {
                effect_id: effect_id.to_string(),
            },
        );
        Some(handle)
    }

    fn set_position(&mut self, handle: EffectHandle, position: Vec2) {
        self.send(handle, EffectCommand::Move(position));
    }

    fn reset(&mut self, handle: EffectHandle) {
        self.send(handle, EffectCommand::Reset);
    }

    fn finish(&mut self, handle: EffectHandle) {
        self.send(handle, EffectCommand::Finish);
    }

    fn release(&mut self, handle: EffectHandle) {
        if self.budget.release(handle) {
            self.send(handle, EffectCommand::Release);
        }
    }
}
