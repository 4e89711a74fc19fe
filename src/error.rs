//! Configuration errors for the salute system.

use thiserror::Error;

/// Rejected salute configuration.
///
/// Returned by [`SaluteConfig::validate`](crate::resources::SaluteConfig::validate)
/// and the constructors that depend on it. A config that fails here would
/// otherwise produce NaN trajectories or unbounded fragment growth.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaluteError {
    #[error("{name} range is inverted or not finite: [{min}, {max}]")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("depth limit {depth} exceeds the maximum of {max}")]
    DepthLimitTooLarge { depth: u32, max: u32 },

    #[error("salute palette is empty")]
    EmptyPalette,

    #[error("salute type {0:?} is neither in the palette nor the mixed sentinel")]
    UnknownSaluteType(String),

    #[error("gun width {gun_width} does not fit a screen {screen_width} wide")]
    GunWiderThanScreen { gun_width: f32, screen_width: f32 },

    #[error("no size registered for sprite {0:?}")]
    MissingSprite(String),
}
