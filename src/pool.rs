//! Projectile pool - owns every rocket in the sky.

use bevy::prelude::*;

use crate::components::{Projectile, ProjectileSpec};
use crate::effects::EffectSink;
use crate::resources::{RandomSource, SaluteConfig};
use crate::systems::fragmentation::FragmentationSpawner;
use crate::systems::kinematics;

/// A burst that happened during one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    pub position: Vec2,
    pub level: u32,
    pub effect_id: String,
    pub primary: bool,
    pub fragments: usize,
}

/// Outcome of one [`ProjectilePool::advance`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Integration step used this tick
    pub dt: f32,
    pub bursts: Vec<Burst>,
    /// Children appended at the end of the tick
    pub spawned: usize,
    /// Spent rockets dropped at the end of the tick
    pub evicted: usize,
}

/// Live rockets, updated once per frame.
///
/// Each tick builds the next live set from scratch: survivors and freshly
/// spawned children are collected into a new list, so nothing is removed
/// while iterating. Children are appended after every current rocket has been
/// updated and are first integrated on the following tick.
#[derive(Resource, Debug)]
pub struct ProjectilePool {
    rockets: Vec<Projectile>,
    previous_elapsed: f32,
    sprite_size: Vec2,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl ProjectilePool {
    /// Empty pool drawing rockets with `sprite_size`.
    pub fn new(sprite_size: Vec2) -> Self {
        Self {
            rockets: Vec::new(),
            previous_elapsed: 0.0,
            sprite_size,
        }
    }

    /// Create a rocket from `spec` and add it to the sky.
    ///
    /// Gun shots play the launch effect on their first tick.
    pub fn launch(&mut self, spec: &ProjectileSpec, config: &SaluteConfig, rng: &mut RandomSource) {
        let mut rocket = Projectile::new(spec, config, self.sprite_size, rng);
        if spec.is_primary {
            rocket = rocket.with_launch_effect();
        }
        self.rockets.push(rocket);
    }

    /// Run one simulation tick.
    ///
    /// # Arguments
    /// * `elapsed` - Current reading of the simulation clock (seconds)
    /// * `config` - Salute configuration
    /// * `rng` - Random source for fragment angles, burst distances and mixed salutes
    /// * `sink` - Receiver of effect requests
    ///
    /// # Returns
    /// What happened during the tick
    pub fn advance(
        &mut self,
        elapsed: f32,
        config: &SaluteConfig,
        rng: &mut RandomSource,
        sink: &mut impl EffectSink,
    ) -> TickReport {
        let dt = kinematics::frame_dt(elapsed, self.previous_elapsed, config.time_scale);
        self.previous_elapsed = elapsed;

        let spawner = FragmentationSpawner::from_config(config);
        let mut report = TickReport {
            dt,
            ..Default::default()
        };
        let mut next_generation = Vec::new();

        for rocket in &mut self.rockets {
            rocket.update(dt, config.gravity, config.ground_threshold);
            rocket.flush_effects(sink, config);

            let children = spawner.spawn(rocket, config.depth_limit, rng);
            if rocket.is_used() {
                report.bursts.push(Burst {
                    position: rocket.position(),
                    level: rocket.level(),
                    effect_id: rocket.effect_id().to_string(),
                    primary: rocket.is_primary(),
                    fragments: children.len(),
                });
            }
            next_generation.extend(children);
        }

        let mut survivors = Vec::with_capacity(self.rockets.len() + next_generation.len());
        for mut rocket in self.rockets.drain(..) {
            if rocket.is_used() {
                rocket.release_effects(sink);
                report.evicted += 1;
            } else {
                survivors.push(rocket);
            }
        }

        report.spawned = next_generation.len();
        for spec in &next_generation {
            survivors.push(Projectile::new(spec, config, self.sprite_size, rng));
        }
        self.rockets = survivors;

        report
    }

    /// Finish every flight effect, release all handles and empty the sky.
    ///
    /// The next [`advance`](Self::advance) measures its step from a clock
    /// reading of zero.
    pub fn restart(&mut self, sink: &mut impl EffectSink) {
        for rocket in &mut self.rockets {
            rocket.finish_flight(sink);
            rocket.release_effects(sink);
        }
        self.rockets.clear();
        self.previous_elapsed = 0.0;
    }

    /// Freeze or unfreeze every live rocket.
    pub fn set_paused(&mut self, paused: bool) {
        for rocket in &mut self.rockets {
            rocket.set_paused(paused);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.rockets.iter()
    }

    pub fn len(&self) -> usize {
        self.rockets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rockets.is_empty()
    }

    pub fn sprite_size(&self) -> Vec2 {
        self.sprite_size
    }
}
