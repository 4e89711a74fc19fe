//! Common types and enums for the salute system.

use std::f32::consts::PI;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Effect played along a rocket's flight path.
pub const FLY_ROCKET_EFFECT: &str = "FlyRocket";
/// Effect played once at the muzzle when a rocket is launched.
pub const SHOT_EFFECT: &str = "Shot";
/// Salute type sentinel: each rocket picks one concrete salute at creation.
pub const MIXED_SALUTE: &str = "Mix";

/// Kinematic state of a rocket: `[x, vx, y, vy]`.
///
/// Kept as a fixed-size array so RK4 stages live on the stack.
///
/// # Example
/// ```
/// use bevy_salute::types::KinematicState;
///
/// let state = KinematicState::new(0.0, 10.0, 0.0, 10.0);
/// assert_eq!(state.vx(), 10.0);
/// assert_eq!(state.y(), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct KinematicState(pub [f32; 4]);

impl KinematicState {
    /// Dimension of the state vector.
    pub const DIM: usize = 4;

    pub fn new(x: f32, vx: f32, y: f32, vy: f32) -> Self {
        Self([x, vx, y, vy])
    }

    /// State at `origin` moving with `speed` along `angle_degrees`
    /// (0° points along +X, 90° straight up).
    pub fn launched(origin: Vec2, angle_degrees: f32, speed: f32) -> Self {
        let angle = angle_degrees.to_radians();
        Self::new(origin.x, speed * angle.cos(), origin.y, speed * angle.sin())
    }

    pub fn x(&self) -> f32 {
        self.0[0]
    }

    pub fn vx(&self) -> f32 {
        self.0[1]
    }

    pub fn y(&self) -> f32 {
        self.0[2]
    }

    pub fn vy(&self) -> f32 {
        self.0[3]
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x(), self.y())
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.vx(), self.vy())
    }

    /// Returns `self + scale * rate`, component-wise.
    pub fn offset(&self, rate: &KinematicState, scale: f32) -> KinematicState {
        let mut out = [0.0; Self::DIM];
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.0[i] + scale * rate.0[i];
        }
        KinematicState(out)
    }
}

/// Aerodynamic coefficients of a spinning rocket.
///
/// `drag` (Cm) and `lift` (Km) are already divided by mass, so they act
/// directly on the velocity components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect, Serialize, Deserialize)]
pub struct AeroCoefficients {
    /// Drag coefficient per unit mass (Cm)
    pub drag: f32,
    /// Lift (Magnus) coefficient per unit mass (Km)
    pub lift: f32,
}

impl AeroCoefficients {
    /// Derive coefficients from a rocket's spin and body.
    ///
    /// Cd = 0.30 + 2.58e-4 * w, Cl = 0.3187 * (1 - exp(-2.483e-3 * w)),
    /// with `w` the angular velocity in rad/s.
    ///
    /// # Arguments
    /// * `rpm` - Spin rate in revolutions per minute
    /// * `cross_section` - Cross-sectional area (m²)
    /// * `mass` - Rocket mass (kg)
    /// * `air_density` - Air density (kg/m³)
    pub fn from_spin(rpm: f32, cross_section: f32, mass: f32, air_density: f32) -> Self {
        let w = rpm * PI / 30.0;
        let cd = 0.30 + 2.58e-4 * w;
        let cl = 0.3187 * (1.0 - (-2.483e-3 * w).exp());
        Self {
            drag: 0.5 * cd * cross_section * air_density / mass,
            lift: 0.5 * cl * cross_section * air_density / mass,
        }
    }
}

/// Inclusive `[min, max]` sampling range.
#[derive(Clone, Copy, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: f32,
    pub max: f32,
}

impl SampleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range is valid when both ends are finite and `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// How the base fragmentation angle is derived from the final velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum FragmentAngleMode {
    /// `acos(vy / |v|)` with a random sign. Quadrant-blind, but matches the
    /// classic salute look.
    #[default]
    CoinFlip,
    /// `atan2(vy, vx)`: fragments fan out around the actual heading.
    Heading,
}

/// Salute difficulty presets.
///
/// Each preset maps to a fragmentation depth limit; live rockets grow as
/// `3^depth`, so the scale stops at 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum Difficulty {
    /// Single burst, no fragments
    Simple,
    /// One generation of fragments
    #[default]
    Middle,
    Hard,
    Apocalypse,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Simple,
        Difficulty::Middle,
        Difficulty::Hard,
        Difficulty::Apocalypse,
    ];

    pub fn depth_limit(self) -> u32 {
        match self {
            Difficulty::Simple => 0,
            Difficulty::Middle => 1,
            Difficulty::Hard => 2,
            Difficulty::Apocalypse => 3,
        }
    }

    /// Human-readable name for menus.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Simple => "Simple",
            Difficulty::Middle => "Middle",
            Difficulty::Hard => "Hard",
            Difficulty::Apocalypse => "Apocalypse",
        }
    }
}

/// Which trigger fired a shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum ShotKind {
    /// Timer-driven shot from the gun's automatic cadence
    Automatic,
    /// Player-triggered shot (mouse or keyboard)
    Hand,
}
