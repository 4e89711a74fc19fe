//! Messages for the salute system.
//!
//! Note: In Bevy 0.18, buffered events use the `Message` trait instead of `Event`.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::components::ProjectileSpec;
use crate::effects::EffectHandle;
use crate::types::{Difficulty, ShotKind};

/// Request from the input/UI layer.
///
/// Replaces direct button and key callbacks: the UI writes commands, the
/// salute systems apply them in order at the start of the next tick.
///
/// # Example
/// ```
/// use bevy_salute::events::SaluteCommand;
/// use bevy_salute::types::Difficulty;
///
/// let commands = [
///     SaluteCommand::SetDifficulty(Difficulty::Hard),
///     SaluteCommand::MoveLeft,
///     SaluteCommand::HandShot,
/// ];
/// assert_eq!(commands.len(), 3);
/// ```
#[derive(Message, Clone, Debug, PartialEq)]
pub enum SaluteCommand {
    /// Freeze the gun and every rocket in flight
    Pause,
    /// Unfreeze after [`SaluteCommand::Pause`]
    Resume,
    /// Finish all effects, clear the sky and restart the clock
    Stop,
    MoveLeft,
    MoveRight,
    /// Player-triggered shot, paced by the hand period
    HandShot,
    SetDifficulty(Difficulty),
    /// Salute effect for subsequent shots (palette entry or `"Mix"`)
    SetSaluteType(String),
    SetAutoFire(bool),
}

/// What the renderer should do with an effect instance.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectCommand {
    /// A new instance of `effect_id` was created
    Start { effect_id: String },
    Move(Vec2),
    /// Replay from the start
    Reset,
    /// Stop emitting
    Finish,
    /// The core is done with the handle. A running one-shot effect may play
    /// out; anything else attached to the handle can be freed.
    Release,
}

/// Effect request published by [`MessageEffectSink`](crate::effects::MessageEffectSink).
#[derive(Message, Clone, Debug, PartialEq)]
pub struct EffectMessage {
    pub handle: EffectHandle,
    pub command: EffectCommand,
}

/// Message sent when the gun fires.
///
/// Useful for a shot sound or recoil animation.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct ShotFired {
    pub kind: ShotKind,
    pub spec: ProjectileSpec,
}

/// Message sent when a rocket bursts.
///
/// # Fields
/// * `position` - Burst position
/// * `level` - Fragmentation level of the rocket that burst
/// * `effect_id` - Concrete salute effect of the rocket
/// * `primary` - Whether the rocket came straight from the gun
/// * `fragments` - Number of child rockets spawned by this burst
#[derive(Message, Clone, Debug, PartialEq)]
pub struct RocketExploded {
    pub position: Vec2,
    pub level: u32,
    pub effect_id: String,
    pub primary: bool,
    pub fragments: usize,
}
