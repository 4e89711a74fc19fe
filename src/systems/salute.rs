//! Per-frame salute systems: clock, commands, automatic fire and the pool tick.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::effects::{EffectBudget, MessageEffectSink};
use crate::events::{EffectMessage, RocketExploded, SaluteCommand, ShotFired};
use crate::launcher::Launcher;
use crate::pool::ProjectilePool;
use crate::resources::{RandomSource, SaluteClock, SaluteConfig};
use crate::types::ShotKind;

/// Feed frame time into the salute clock.
///
/// # Arguments
/// * `time` - Bevy Time resource to get delta time
/// * `clock` - Salute clock, frozen while paused
pub fn tick_clock(time: Res<Time>, mut clock: ResMut<SaluteClock>) {
    clock.tick(time.delta_secs());
}

/// Apply UI/input commands in the order they were written.
///
/// `Stop` clears the sky and restarts the salute unpaused.
#[allow(clippy::too_many_arguments)]
pub fn apply_commands(
    mut commands: MessageReader<SaluteCommand>,
    mut config: ResMut<SaluteConfig>,
    mut clock: ResMut<SaluteClock>,
    mut launcher: ResMut<Launcher>,
    mut pool: ResMut<ProjectilePool>,
    mut rng: ResMut<RandomSource>,
    mut budget: ResMut<EffectBudget>,
    mut effects: MessageWriter<EffectMessage>,
    mut shots: MessageWriter<ShotFired>,
) {
    for command in commands.read() {
        match command {
            SaluteCommand::Pause => {
                launcher.set_paused(true, &mut pool);
                clock.set_paused(true);
                info!("salute paused with {} rockets in flight", pool.len());
            }
            SaluteCommand::Resume => {
                launcher.set_paused(false, &mut pool);
                clock.set_paused(false);
                info!("salute resumed");
            }
            SaluteCommand::Stop => {
                let mut sink = MessageEffectSink::new(&mut budget, &mut effects);
                let cleared = pool.len();
                pool.restart(&mut sink);
                clock.restart();
                clock.set_paused(false);
                launcher.set_paused(false, &mut pool);
                launcher.reset_timers();
                info!("salute stopped, cleared {cleared} rockets");
            }
            SaluteCommand::MoveLeft => launcher.move_left(),
            SaluteCommand::MoveRight => launcher.move_right(),
            SaluteCommand::HandShot => {
                let now = clock.elapsed();
                if let Some(spec) = launcher.shoot(ShotKind::Hand, now, &config, &mut pool, &mut rng) {
                    info!("hand shot from x={:.0}", spec.origin.x);
                    shots.write(ShotFired {
                        kind: ShotKind::Hand,
                        spec,
                    });
                }
            }
            SaluteCommand::SetDifficulty(difficulty) => {
                config.depth_limit = difficulty.depth_limit();
                info!("difficulty set to {}", difficulty.label());
            }
            SaluteCommand::SetSaluteType(salute_type) => match config.check_salute_type(salute_type) {
                Ok(()) => config.salute_type = salute_type.clone(),
                Err(err) => warn!("ignoring salute type change: {err}"),
            },
            SaluteCommand::SetAutoFire(enabled) => config.auto_fire = *enabled,
        }
    }
}

/// Fire the gun on its automatic cadence.
pub fn automatic_fire(
    config: Res<SaluteConfig>,
    clock: Res<SaluteClock>,
    mut launcher: ResMut<Launcher>,
    mut pool: ResMut<ProjectilePool>,
    mut rng: ResMut<RandomSource>,
    mut shots: MessageWriter<ShotFired>,
) {
    if !config.auto_fire {
        return;
    }
    let now = clock.elapsed();
    if let Some(spec) = launcher.shoot(ShotKind::Automatic, now, &config, &mut pool, &mut rng) {
        debug!("automatic shot at t={now:.2}");
        shots.write(ShotFired {
            kind: ShotKind::Automatic,
            spec,
        });
    }
}

/// Advance every rocket by one tick and publish bursts.
pub fn advance_projectiles(
    config: Res<SaluteConfig>,
    clock: Res<SaluteClock>,
    mut pool: ResMut<ProjectilePool>,
    mut rng: ResMut<RandomSource>,
    mut budget: ResMut<EffectBudget>,
    mut effects: MessageWriter<EffectMessage>,
    mut exploded: MessageWriter<RocketExploded>,
) {
    let mut sink = MessageEffectSink::new(&mut budget, &mut effects);
    let report = pool.advance(clock.elapsed(), &config, &mut rng, &mut sink);

    if !report.bursts.is_empty() || report.spawned > 0 {
        debug!(
            "salute tick dt={:.3}: {} bursts, {} spawned, {} evicted, {} live",
            report.dt,
            report.bursts.len(),
            report.spawned,
            report.evicted,
            pool.len()
        );
    }

    for burst in report.bursts {
        exploded.write(RocketExploded {
            position: burst.position,
            level: burst.level,
            effect_id: burst.effect_id,
            primary: burst.primary,
            fragments: burst.fragments,
        });
    }
}
