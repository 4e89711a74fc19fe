//! Fragmentation - burst rockets split into three child rockets.

use bevy::prelude::*;

use crate::components::{Projectile, ProjectileSpec};
use crate::resources::{RandomSource, SaluteConfig};
use crate::types::{FragmentAngleMode, SampleRange};

/// Fragments fly straight up when the burst velocity gives no direction.
pub const FALLBACK_ANGLE: f32 = 90.0;

/// Every burst that fragments spawns exactly this many children.
pub const FAN_OUT: usize = 3;

/// Splits burst rockets into child specs.
///
/// # Example
/// ```
/// use bevy_salute::resources::SaluteConfig;
/// use bevy_salute::systems::fragmentation::FragmentationSpawner;
///
/// let spawner = FragmentationSpawner::from_config(&SaluteConfig::default());
/// assert_eq!(spawner.spread.min, 90.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentationSpawner {
    /// Angular spread between the centre fragment and its neighbours (degrees)
    pub spread: SampleRange,
    pub angle_mode: FragmentAngleMode,
}

impl FragmentationSpawner {
    pub fn from_config(config: &SaluteConfig) -> Self {
        Self {
            spread: config.fragment_spread,
            angle_mode: config.fragment_angle_mode,
        }
    }

    /// Child specs for `projectile`, or none.
    ///
    /// Only a burst rocket fragments, and only while its children would stay
    /// within `depth_limit`. On success the rocket's own level is raised to
    /// the children's level and three specs are returned at the burst point:
    /// `angle`, `angle + delta` and `angle - delta`.
    pub fn spawn(
        &self,
        projectile: &mut Projectile,
        depth_limit: u32,
        rng: &mut RandomSource,
    ) -> Vec<ProjectileSpec> {
        if !projectile.is_used() {
            return Vec::new();
        }
        if projectile.level() + 1 > depth_limit {
            return Vec::new();
        }
        let level = projectile.advance_level();

        let angle = self.base_angle(projectile.velocity(), rng);
        let delta = rng.sample(self.spread);
        let origin = projectile.position();
        let effect_id = projectile.effect_id();

        [angle, angle + delta, angle - delta]
            .into_iter()
            .map(|a| ProjectileSpec::fragment(origin, a, level, effect_id))
            .collect()
    }

    /// Base fragment angle in degrees.
    pub fn base_angle(&self, velocity: Vec2, rng: &mut RandomSource) -> f32 {
        let speed = velocity.length();
        if speed <= f32::EPSILON || !speed.is_finite() {
            return FALLBACK_ANGLE;
        }

        match self.angle_mode {
            FragmentAngleMode::CoinFlip => {
                let angle = (velocity.y / speed).clamp(-1.0, 1.0).acos().to_degrees();
                rng.sign() * angle
            }
            FragmentAngleMode::Heading => velocity.y.atan2(velocity.x).to_degrees(),
        }
    }
}
