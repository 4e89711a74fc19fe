//! # Bevy Salute
//!
//! Fireworks salute simulation plugin for Bevy 0.18.
//!
//! ## Features
//! - RK4 integration of spinning rockets with drag and lift
//! - Stochastic burst distances and recursive three-way fragmentation
//! - Depth-limited fragment chains (difficulty presets)
//! - Rate-limited gun with independent automatic and hand cadences
//! - Renderer-agnostic effect sink with a bounded handle budget
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_salute::prelude::*;
//!
//! fn main() {
//!     let salute = SalutePlugin::new(
//!         SaluteConfig::default().with_difficulty(Difficulty::Hard),
//!         ScreenBounds { width: 1280.0, height: 720.0 },
//!         SpriteSizes::default(),
//!     )
//!     .expect("valid salute config");
//!
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(salute)
//!         .run();
//! }
//! ```

pub mod components;
pub mod effects;
pub mod error;
pub mod events;
pub mod launcher;
pub mod pool;
pub mod resources;
pub mod systems;
pub mod types;

pub mod prelude {
    pub use crate::components::*;
    pub use crate::effects::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::launcher::*;
    pub use crate::pool::*;
    pub use crate::resources::*;
    pub use crate::types::*;
    pub use crate::{SaluteDebugPlugin, SalutePlugin};
}

use bevy::prelude::*;

use crate::error::SaluteError;
use crate::resources::SizeProvider;

/// Core salute plugin: resources, messages and the per-frame tick.
///
/// Built through [`SalutePlugin::new`], which validates the configuration and
/// sizes the gun before any app exists.
///
/// # Systems
/// Chained in `Update`:
/// - `tick_clock` - Feeds frame time into the salute clock
/// - `apply_commands` - Applies queued [`SaluteCommand`](events::SaluteCommand)s
/// - `automatic_fire` - Fires the gun on its automatic cadence
/// - `advance_projectiles` - Integrates, bursts, fragments and evicts rockets
pub struct SalutePlugin {
    config: resources::SaluteConfig,
    screen: resources::ScreenBounds,
    sprites: resources::SpriteSizes,
    launcher: launcher::Launcher,
    rocket_size: Vec2,
    seed: Option<u64>,
}

impl SalutePlugin {
    /// Validate everything the salute needs up front.
    ///
    /// # Errors
    /// Any [`SaluteError`] from the config, a missing sprite size, or a gun
    /// wider than the screen.
    pub fn new(
        config: resources::SaluteConfig,
        screen: resources::ScreenBounds,
        sprites: resources::SpriteSizes,
    ) -> Result<Self, SaluteError> {
        config.validate()?;
        let launcher = launcher::Launcher::new(&config, screen, &sprites)?;
        let rocket_size = sprites
            .size_of(resources::ROCKET_SPRITE)
            .ok_or_else(|| SaluteError::MissingSprite(resources::ROCKET_SPRITE.to_string()))?;

        Ok(Self {
            config,
            screen,
            sprites,
            launcher,
            rocket_size,
            seed: None,
        })
    }

    /// Seed the random source for reproducible salutes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Plugin for SalutePlugin {
    fn build(&self, app: &mut App) {
        let rng = match self.seed {
            Some(seed) => resources::RandomSource::seeded(seed),
            None => resources::RandomSource::from_entropy(),
        };

        app.register_type::<resources::SaluteConfig>()
            .register_type::<resources::ScreenBounds>()
            .register_type::<resources::SaluteClock>()
            .insert_resource(self.config.clone())
            .insert_resource(self.screen)
            .insert_resource(self.sprites.clone())
            .insert_resource(self.launcher.clone())
            .insert_resource(pool::ProjectilePool::new(self.rocket_size))
            .insert_resource(effects::EffectBudget::new(self.config.effect_capacity))
            .insert_resource(rng)
            .init_resource::<resources::SaluteClock>()
            .add_message::<events::SaluteCommand>()
            .add_message::<events::EffectMessage>()
            .add_message::<events::ShotFired>()
            .add_message::<events::RocketExploded>()
            .add_systems(
                Update,
                (
                    systems::salute::tick_clock,
                    systems::salute::apply_commands,
                    systems::salute::automatic_fire,
                    systems::salute::advance_projectiles,
                )
                    .chain(),
            );

        info!(
            "salute ready: depth limit {}, salute {:?}",
            self.config.depth_limit, self.config.salute_type
        );
    }
}

/// Debug plugin drawing the gun, rockets and burst rings with gizmos.
///
/// Needs the gizmo plugin (part of `DefaultPlugins`) and
/// [`SaluteConfig::debug_draw`](resources::SaluteConfig::debug_draw).
pub struct SaluteDebugPlugin;

impl Plugin for SaluteDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            systems::debug::draw_salute_debug.after(systems::salute::advance_projectiles),
        );
    }
}
