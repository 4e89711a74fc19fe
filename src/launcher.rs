//! The salute gun.

use bevy::prelude::*;

use crate::components::ProjectileSpec;
use crate::error::SaluteError;
use crate::pool::ProjectilePool;
use crate::resources::{RandomSource, SaluteConfig, ScreenBounds, SizeProvider, GUN_SPRITE};
use crate::types::ShotKind;

/// Minimum spacing between shots of one kind.
///
/// Timestamps come from the salute clock, so a paused clock also holds the
/// cadence.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct ShotTimer {
    period: f32,
    last_shot: Option<f32>,
}

impl ShotTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            last_shot: None,
        }
    }

    pub fn is_ready(&self, now: f32) -> bool {
        self.last_shot.is_none_or(|last| now - last >= self.period)
    }

    /// Consume the timer if ready.
    pub fn try_fire(&mut self, now: f32) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last_shot = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_shot = None;
    }

    pub fn period(&self) -> f32 {
        self.period
    }
}

/// Salute gun resource.
///
/// Moves along the bottom of the screen and fires primary rockets straight
/// from its muzzle. Automatic and hand shots have independent timers, so
/// mashing the fire key never delays the automatic cadence or the reverse.
///
/// # Example
/// ```
/// use bevy_salute::launcher::Launcher;
/// use bevy_salute::resources::{SaluteConfig, ScreenBounds, SpriteSizes};
///
/// let config = SaluteConfig::default();
/// let gun = Launcher::new(&config, ScreenBounds::default(), &SpriteSizes::default()).unwrap();
/// assert!(gun.x() >= gun.min_x() && gun.x() <= gun.max_x());
/// ```
#[derive(Resource, Clone, Debug)]
pub struct Launcher {
    x: f32,
    size: Vec2,
    min_x: f32,
    max_x: f32,
    step: f32,
    paused: bool,
    automatic: ShotTimer,
    hand: ShotTimer,
}

impl Launcher {
    /// Centred gun for the given screen.
    ///
    /// # Errors
    /// Fails when the gun sprite is unknown or wider than the screen.
    pub fn new(
        config: &SaluteConfig,
        screen: ScreenBounds,
        sizes: &impl SizeProvider,
    ) -> Result<Self, SaluteError> {
        let size = sizes
            .size_of(GUN_SPRITE)
            .ok_or_else(|| SaluteError::MissingSprite(GUN_SPRITE.to_string()))?;
        if size.x > screen.width {
            return Err(SaluteError::GunWiderThanScreen {
                gun_width: size.x,
                screen_width: screen.width,
            });
        }

        let max_x = screen.width - size.x;
        Ok(Self {
            x: max_x * 0.5,
            size,
            min_x: 0.0,
            max_x,
            step: config.gun_step,
            paused: false,
            automatic: ShotTimer::new(config.automatic_period),
            hand: ShotTimer::new(config.hand_period),
        })
    }

    /// Where new rockets start: top centre of the gun.
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.x + self.size.x * 0.5, self.size.y)
    }

    /// Spec for a shot of `kind` if the gun may fire at `now`.
    ///
    /// Refused while paused or while the matching timer is cooling down.
    pub fn try_shot(&mut self, kind: ShotKind, now: f32, config: &SaluteConfig) -> Option<ProjectileSpec> {
        if self.paused {
            return None;
        }
        let timer = match kind {
            ShotKind::Automatic => &mut self.automatic,
            ShotKind::Hand => &mut self.hand,
        };
        if !timer.try_fire(now) {
            return None;
        }
        Some(ProjectileSpec::primary(
            self.muzzle(),
            config.launch_angle,
            config.salute_type.clone(),
        ))
    }

    /// Fire into `pool`. Returns the launched spec, if any.
    pub fn shoot(
        &mut self,
        kind: ShotKind,
        now: f32,
        config: &SaluteConfig,
        pool: &mut ProjectilePool,
        rng: &mut RandomSource,
    ) -> Option<ProjectileSpec> {
        let spec = self.try_shot(kind, now, config)?;
        pool.launch(&spec, config, rng);
        Some(spec)
    }

    pub fn move_left(&mut self) {
        self.move_by(-self.step);
    }

    pub fn move_right(&mut self) {
        self.move_by(self.step);
    }

    fn move_by(&mut self, delta: f32) {
        self.x = (self.x + delta).clamp(self.min_x, self.max_x);
    }

    /// Freeze the gun and every rocket in `pool`.
    pub fn set_paused(&mut self, paused: bool, pool: &mut ProjectilePool) {
        self.paused = paused;
        pool.set_paused(paused);
    }

    /// Forget previous shots; used when the clock restarts.
    pub fn reset_timers(&mut self) {
        self.automatic.reset();
        self.hand.reset();
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
