//! Global resources for the salute system.

use std::collections::HashMap;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::SaluteError;
use crate::types::{
    AeroCoefficients, Difficulty, FragmentAngleMode, SampleRange, FLY_ROCKET_EFFECT,
    MIXED_SALUTE, SHOT_EFFECT,
};

/// Deepest fragmentation chain a config may request.
///
/// Worst case live rockets per primary shot is `3^depth`.
pub const MAX_DEPTH_LIMIT: u32 = 4;

/// Sprite name of the gun texture.
pub const GUN_SPRITE: &str = "SaluteGun";
/// Sprite name of the rocket texture.
pub const ROCKET_SPRITE: &str = "RedRocket";

/// Physical description of a salute rocket.
///
/// # Fields
/// * `launch_speed` - Initial speed of every rocket, primary or fragment
/// * `rpm` - Spin rate in revolutions per minute, drives the lift term
/// * `cross_section` - Cross-sectional area (m²)
/// * `mass` - Rocket mass (kg)
/// * `air_density` - Air density (kg/m³)
#[derive(Clone, Copy, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub struct RocketProfile {
    pub launch_speed: f32,
    pub rpm: f32,
    pub cross_section: f32,
    pub mass: f32,
    pub air_density: f32,
}

impl Default for RocketProfile {
    fn default() -> Self {
        Self {
            launch_speed: 135.0,
            rpm: 150.0,
            cross_section: 0.0016,
            mass: 5.0,
            air_density: 1.23,
        }
    }
}

impl RocketProfile {
    /// Drag and lift coefficients for this profile.
    pub fn coefficients(&self) -> AeroCoefficients {
        AeroCoefficients::from_spin(self.rpm, self.cross_section, self.mass, self.air_density)
    }
}

/// Global configuration for the salute system.
///
/// Defaults reproduce the classic salute: rockets at 135 units/s, primary
/// bursts after 600-750 units of flight, fragments after 200-400, fan-out
/// spread of 90-150 degrees.
///
/// # Example
/// ```
/// use bevy_salute::resources::SaluteConfig;
/// use bevy_salute::types::Difficulty;
///
/// let config = SaluteConfig::default()
///     .with_difficulty(Difficulty::Hard)
///     .with_salute_type("Salute2");
/// assert!(config.validate().is_ok());
/// assert_eq!(config.depth_limit, 2);
/// ```
#[derive(Resource, Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Resource)]
pub struct SaluteConfig {
    /// Gravitational acceleration, acting along -Y
    pub gravity: f32,
    /// Multiplier from elapsed wall-clock seconds to integration step
    pub time_scale: f32,
    /// Rockets below this height are spent
    pub ground_threshold: f32,
    /// Physical rocket description
    pub rocket: RocketProfile,
    /// Launch angle of primary shots (degrees, 90 = straight up)
    pub launch_angle: f32,
    /// Burst distance range for gun-launched rockets
    pub primary_distance: SampleRange,
    /// Burst distance range for fragments
    pub fragment_distance: SampleRange,
    /// Angular spread between the three fragments (degrees)
    pub fragment_spread: SampleRange,
    /// How the fragment base angle is derived
    pub fragment_angle_mode: FragmentAngleMode,
    /// Maximum fragmentation generation
    pub depth_limit: u32,
    /// Concrete salute effects a mixed salute picks from
    pub salute_palette: Vec<String>,
    /// Salute effect for new shots; either a palette entry or [`MIXED_SALUTE`]
    pub salute_type: String,
    /// Effect following a rocket in flight
    pub fly_effect: String,
    /// Effect played at launch
    pub shot_effect: String,
    /// Seconds between automatic shots
    pub automatic_period: f32,
    /// Seconds between hand-triggered shots
    pub hand_period: f32,
    /// Whether the gun fires on its own cadence
    pub auto_fire: bool,
    /// Lateral gun movement per move command
    pub gun_step: f32,
    /// Maximum number of live effect handles
    pub effect_capacity: usize,
    /// Debug visualization
    pub debug_draw: bool,
}

impl Default for SaluteConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            time_scale: 10.0,
            ground_threshold: -0.001,
            rocket: RocketProfile::default(),
            launch_angle: 90.0,
            primary_distance: SampleRange::new(600.0, 750.0),
            fragment_distance: SampleRange::new(200.0, 400.0),
            fragment_spread: SampleRange::new(90.0, 150.0),
            fragment_angle_mode: FragmentAngleMode::CoinFlip,
            depth_limit: Difficulty::default().depth_limit(),
            salute_palette: vec![
                "Salute1".to_string(),
                "Salute2".to_string(),
                "Salute3".to_string(),
            ],
            salute_type: "Salute1".to_string(),
            fly_effect: FLY_ROCKET_EFFECT.to_string(),
            shot_effect: SHOT_EFFECT.to_string(),
            automatic_period: 5.0,
            hand_period: 0.5,
            auto_fire: true,
            gun_step: 30.0,
            effect_capacity: 512,
            debug_draw: false,
        }
    }
}

impl SaluteConfig {
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.depth_limit = difficulty.depth_limit();
        self
    }

    pub fn with_depth_limit(mut self, depth_limit: u32) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_salute_type(mut self, salute_type: impl Into<String>) -> Self {
        self.salute_type = salute_type.into();
        self
    }

    pub fn with_angle_mode(mut self, mode: FragmentAngleMode) -> Self {
        self.fragment_angle_mode = mode;
        self
    }

    pub fn with_auto_fire(mut self, auto_fire: bool) -> Self {
        self.auto_fire = auto_fire;
        self
    }

    /// Check the config for values that would break the simulation.
    ///
    /// # Returns
    /// `Ok(())` or the first problem found
    pub fn validate(&self) -> Result<(), SaluteError> {
        let ranges = [
            ("primary distance", self.primary_distance),
            ("fragment distance", self.fragment_distance),
            ("fragment spread", self.fragment_spread),
        ];
        for (name, range) in ranges {
            if !range.is_valid() {
                return Err(SaluteError::InvalidRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        let positives = [
            ("gravity", self.gravity),
            ("time scale", self.time_scale),
            ("launch speed", self.rocket.launch_speed),
            ("rocket mass", self.rocket.mass),
            ("cross section", self.rocket.cross_section),
            ("air density", self.rocket.air_density),
            ("automatic period", self.automatic_period),
            ("hand period", self.hand_period),
            ("gun step", self.gun_step),
        ];
        for (name, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(SaluteError::NonPositive { name, value });
            }
        }

        let finites = [
            ("rocket rpm", self.rocket.rpm),
            ("launch angle", self.launch_angle),
            ("ground threshold", self.ground_threshold),
        ];
        for (name, value) in finites {
            if !value.is_finite() {
                return Err(SaluteError::NotFinite { name, value });
            }
        }

        if self.depth_limit > MAX_DEPTH_LIMIT {
            return Err(SaluteError::DepthLimitTooLarge {
                depth: self.depth_limit,
                max: MAX_DEPTH_LIMIT,
            });
        }
        if self.salute_palette.is_empty() {
            return Err(SaluteError::EmptyPalette);
        }
        self.check_salute_type(&self.salute_type)
    }

    /// Accept `salute_type` if it names a palette entry or the mixed sentinel.
    pub fn check_salute_type(&self, salute_type: &str) -> Result<(), SaluteError> {
        if salute_type == MIXED_SALUTE || self.salute_palette.iter().any(|s| s == salute_type) {
            Ok(())
        } else {
            Err(SaluteError::UnknownSaluteType(salute_type.to_string()))
        }
    }

    /// Resolve the mixed sentinel into one concrete palette entry.
    ///
    /// Concrete ids pass through unchanged.
    pub fn resolve_salute(&self, requested: &str, rng: &mut RandomSource) -> String {
        if requested != MIXED_SALUTE {
            return requested.to_string();
        }
        rng.pick(&self.salute_palette)
            .cloned()
            .unwrap_or_else(|| requested.to_string())
    }
}

/// Playable area reported by the window layer.
#[derive(Resource, Reflect, Clone, Copy, Debug, PartialEq)]
#[reflect(Resource)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenBounds {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Resolves a sprite name to its bounding size.
pub trait SizeProvider {
    fn size_of(&self, name: &str) -> Option<Vec2>;
}

/// Sprite sizes registered by the asset layer.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_salute::resources::{SizeProvider, SpriteSizes, GUN_SPRITE};
///
/// let sizes = SpriteSizes::default().with_size(GUN_SPRITE, Vec2::new(120.0, 80.0));
/// assert_eq!(sizes.size_of(GUN_SPRITE), Some(Vec2::new(120.0, 80.0)));
/// ```
#[derive(Resource, Clone, Debug)]
pub struct SpriteSizes {
    pub sizes: HashMap<String, Vec2>,
}

impl Default for SpriteSizes {
    fn default() -> Self {
        Self::empty()
            .with_size(GUN_SPRITE, Vec2::new(96.0, 64.0))
            .with_size(ROCKET_SPRITE, Vec2::new(16.0, 48.0))
    }
}

impl SpriteSizes {
    pub fn empty() -> Self {
        Self {
            sizes: HashMap::new(),
        }
    }

    pub fn with_size(mut self, name: impl Into<String>, size: Vec2) -> Self {
        self.sizes.insert(name.into(), size);
        self
    }
}

impl SizeProvider for SpriteSizes {
    fn size_of(&self, name: &str) -> Option<Vec2> {
        self.sizes.get(name).copied()
    }
}

/// Random source shared by every stochastic part of the salute.
///
/// Constructed explicitly and passed by reference; seed it for reproducible
/// runs.
///
/// # Example
/// ```
/// use bevy_salute::resources::RandomSource;
///
/// let mut a = RandomSource::seeded(7);
/// let mut b = RandomSource::seeded(7);
/// assert_eq!(a.gen_int(0, 100), b.gen_int(0, 100));
/// ```
#[derive(Resource)]
pub struct RandomSource {
    rng: StdRng,
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Uniform integer in `[min, max]`. An inverted range yields `min`.
    pub fn gen_int(&mut self, min: i32, max: i32) -> i32 {
        match Uniform::new_inclusive(min, max) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => min,
        }
    }

    /// Uniform real in `[min, max]`. An inverted range yields `min`.
    pub fn gen_real(&mut self, min: f32, max: f32) -> f32 {
        match Uniform::new_inclusive(min, max) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => min,
        }
    }

    pub fn sample(&mut self, range: SampleRange) -> f32 {
        self.gen_real(range.min, range.max)
    }

    /// +1.0 or -1.0 with equal probability.
    pub fn sign(&mut self) -> f32 {
        if self.rng.random_bool(0.5) {
            1.0
        } else {
            -1.0
        }
    }

    /// Uniformly chosen element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let last = i32::try_from(items.len() - 1).unwrap_or(i32::MAX);
        let index = self.gen_int(0, last) as usize;
        items.get(index)
    }
}

/// Restartable simulation clock.
///
/// Accumulates frame time while running; paused time is not counted, so a
/// resumed salute continues without a jump.
#[derive(Resource, Reflect, Clone, Debug, Default)]
#[reflect(Resource)]
pub struct SaluteClock {
    elapsed: f32,
    paused: bool,
}

impl SaluteClock {
    pub fn tick(&mut self, delta: f32) {
        if !self.paused {
            self.elapsed += delta;
        }
    }

    /// Seconds counted since the last restart.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
