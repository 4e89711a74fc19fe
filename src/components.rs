//! Rocket data: launch specs and live projectiles.

use bevy::prelude::*;

use crate::effects::{EffectHandle, EffectSink};
use crate::resources::{RandomSource, SaluteConfig};
use crate::systems::kinematics;
use crate::types::{AeroCoefficients, KinematicState};

/// Immutable description of a rocket about to be created.
///
/// Produced by the gun for primary shots and by fragmentation for children.
///
/// # Fields
/// * `origin` - Launch position
/// * `angle` - Launch angle in degrees (0 = +X, 90 = straight up)
/// * `level` - Fragmentation generation, 0 for gun shots
/// * `effect_id` - Salute effect to play on burst (may be the mixed sentinel)
/// * `is_primary` - Whether the gun fired this rocket directly
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_salute::components::ProjectileSpec;
///
/// let spec = ProjectileSpec::primary(Vec2::new(640.0, 64.0), 90.0, "Salute1");
/// assert_eq!(spec.level, 0);
/// assert!(spec.is_primary);
/// ```
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct ProjectileSpec {
    pub origin: Vec2,
    pub angle: f32,
    pub level: u32,
    pub effect_id: String,
    pub is_primary: bool,
}

impl ProjectileSpec {
    pub fn primary(origin: Vec2, angle: f32, effect_id: impl Into<String>) -> Self {
        Self {
            origin,
            angle,
            level: 0,
            effect_id: effect_id.into(),
            is_primary: true,
        }
    }

    pub fn fragment(origin: Vec2, angle: f32, level: u32, effect_id: impl Into<String>) -> Self {
        Self {
            origin,
            angle,
            level,
            effect_id: effect_id.into(),
            is_primary: false,
        }
    }
}

/// A salute rocket in flight.
///
/// The kinematic state only changes through [`Projectile::update`]; the burst
/// distance and aerodynamic coefficients are fixed at construction. Once
/// `used` is set it stays set.
#[derive(Clone, Debug)]
pub struct Projectile {
    state: KinematicState,
    origin: Vec2,
    coefficients: AeroCoefficients,
    explosion_distance: f32,
    level: u32,
    effect_id: String,
    launch_angle: f32,
    primary: bool,
    sprite_offset: Vec2,
    used: bool,
    paused: bool,
    first_tick: bool,
    fly_effect: Option<EffectHandle>,
    salute_effect: Option<EffectHandle>,
}

impl Projectile {
    /// Build a rocket from its spec.
    ///
    /// Samples the burst distance (primary or fragment range) and resolves a
    /// mixed salute into one concrete effect.
    ///
    /// # Arguments
    /// * `spec` - Launch description
    /// * `config` - Salute configuration (rocket profile, ranges, palette)
    /// * `sprite_size` - Rocket sprite size; the sprite is drawn centred on the rocket
    /// * `rng` - Random source
    pub fn new(
        spec: &ProjectileSpec,
        config: &SaluteConfig,
        sprite_size: Vec2,
        rng: &mut RandomSource,
    ) -> Self {
        let distance_range = if spec.is_primary {
            config.primary_distance
        } else {
            config.fragment_distance
        };

        Self {
            state: KinematicState::launched(spec.origin, spec.angle, config.rocket.launch_speed),
            origin: spec.origin,
            coefficients: config.rocket.coefficients(),
            explosion_distance: rng.sample(distance_range),
            level: spec.level,
            effect_id: config.resolve_salute(&spec.effect_id, rng),
            launch_angle: spec.angle,
            primary: spec.is_primary,
            sprite_offset: sprite_size * 0.5,
            used: false,
            paused: false,
            first_tick: false,
            fly_effect: None,
            salute_effect: None,
        }
    }

    /// Flag the rocket so its first effect flush plays the launch effect.
    pub fn with_launch_effect(mut self) -> Self {
        self.first_tick = true;
        self
    }

    /// Advance one tick: integrate, then run the burst test.
    ///
    /// A paused rocket is frozen. A rocket already below `ground` is not
    /// integrated and is spent; one that crosses `ground` during this step is
    /// spent on the same tick. A step that leaves the state non-finite also
    /// spends the rocket.
    pub fn update(&mut self, dt: f32, gravity: f32, ground: f32) {
        if self.paused {
            return;
        }
        if self.state.y() < ground {
            self.used = true;
            return;
        }

        self.state = kinematics::rk4_step(&self.state, self.coefficients, gravity, dt);
        self.check_explosion(ground);
    }

    fn check_explosion(&mut self, ground: f32) {
        // a non-finite state can never satisfy either test below
        if !self.state.0.iter().all(|v| v.is_finite()) {
            self.used = true;
            return;
        }
        if self.state.y() < ground || self.distance_travelled() >= self.explosion_distance {
            self.used = true;
        }
    }

    /// Push this tick's effect requests to the sink.
    ///
    /// Flight trail follows the rocket and is finished on burst; the launch
    /// effect fires once on the first flush; the salute effect is replayed at
    /// the burst position. Failed acquisitions are retried on the next flush.
    pub fn flush_effects(&mut self, sink: &mut impl EffectSink, config: &SaluteConfig) {
        let position = self.position();

        if self.fly_effect.is_none() && !self.used {
            self.fly_effect = sink.acquire_effect(&config.fly_effect);
        }
        if let Some(fly) = self.fly_effect {
            sink.set_position(fly, position);
            if self.used {
                sink.finish(fly);
            }
        }

        if self.first_tick {
            if let Some(shot) = sink.acquire_effect(&config.shot_effect) {
                sink.set_position(shot, position);
                sink.reset(shot);
                sink.release(shot);
            }
            self.first_tick = false;
        }

        if !self.used {
            return;
        }

        if self.salute_effect.is_none() {
            self.salute_effect = sink.acquire_effect(&self.effect_id);
        }
        if let Some(salute) = self.salute_effect {
            sink.set_position(salute, position);
            sink.reset(salute);
        }
    }

    /// Force-terminate the flight trail, if any.
    pub fn finish_flight(&mut self, sink: &mut impl EffectSink) {
        if let Some(fly) = self.fly_effect {
            sink.finish(fly);
        }
    }

    /// Hand every held effect handle back to the sink.
    pub fn release_effects(&mut self, sink: &mut impl EffectSink) {
        if let Some(fly) = self.fly_effect.take() {
            sink.release(fly);
        }
        if let Some(salute) = self.salute_effect.take() {
            sink.release(salute);
        }
    }

    /// Raise the level for a fragmentation and return the children's level.
    pub(crate) fn advance_level(&mut self) -> u32 {
        self.level += 1;
        self.level
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    pub fn position(&self) -> Vec2 {
        self.state.position()
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.velocity()
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Straight-line distance from the launch point.
    pub fn distance_travelled(&self) -> f32 {
        self.position().distance(self.origin)
    }

    pub fn explosion_distance(&self) -> f32 {
        self.explosion_distance
    }

    pub fn coefficients(&self) -> AeroCoefficients {
        self.coefficients
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn effect_id(&self) -> &str {
        &self.effect_id
    }

    pub fn launch_angle(&self) -> f32 {
        self.launch_angle
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_first_tick(&self) -> bool {
        self.first_tick
    }

    /// Sprite rotation in degrees: launch angle plus the angle between the
    /// velocity and +Y.
    pub fn heading_degrees(&self) -> f32 {
        let velocity = self.velocity();
        let speed = velocity.length();
        if speed <= f32::EPSILON {
            return self.launch_angle;
        }
        self.launch_angle + (velocity.y / speed).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Top-left corner of the rocket sprite.
    pub fn sprite_position(&self) -> Vec2 {
        self.position() - self.sprite_offset
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: KinematicState) {
        self.state = state;
    }

    #[cfg(test)]
    pub(crate) fn force_used(&mut self) {
        self.used = true;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::events::EffectCommand;

    /// Sink that records every call and can be told to refuse acquisitions.
    #[derive(Default)]
    pub struct RecordingSink {
        pub log: Vec<(EffectHandle, EffectCommand)>,
        pub live: Vec<EffectHandle>,
        pub refuse: bool,
        next: u64,
    }

    impl RecordingSink {
        pub fn started(&self, effect_id: &str) -> usize {
            self.log
                .iter()
                .filter(|(_, c)| matches!(c, EffectCommand::Start { effect_id: id } if id == effect_id))
                .count()
        }

        pub fn count(&self, command: &EffectCommand) -> usize {
            self.log.iter().filter(|(_, c)| c == command).count()
        }
    }

    impl EffectSink for RecordingSink {
        fn acquire_effect(&mut self, effect_id: &str) -> Option<EffectHandle> {
            if self.refuse {
                return None;
            }
            let handle = EffectHandle(self.next);
            self.next += 1;
            self.live.push(handle);
            self.log.push((
                handle,
                EffectCommand::Start {
                    effect_id: effect_id.to_string(),
                },
            ));
            Some(handle)
        }

        fn set_position(&mut self, handle: EffectHandle, position: Vec2) {
            self.log.push((handle, EffectCommand::Move(position)));
        }

        fn reset(&mut self, handle: EffectHandle) {
            self.log.push((handle, EffectCommand::Reset));
        }

        fn finish(&mut self, handle: EffectHandle) {
            self.log.push((handle, EffectCommand::Finish));
        }

        fn release(&mut self, handle: EffectHandle) {
            self.live.retain(|h| *h != handle);
            self.log.push((handle, EffectCommand::Release));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingSink;
    use super::*;
    use crate::events::EffectCommand;
    use crate::types::SampleRange;

    const GROUND: f32 = -0.001;

    fn rocket(config: &SaluteConfig, spec: &ProjectileSpec) -> Projectile {
        Projectile::new(spec, config, Vec2::new(16.0, 48.0), &mut RandomSource::seeded(1))
    }

    #[test]
    fn test_burst_distance_comes_from_matching_range() {
        let config = SaluteConfig::default();
        let mut rng = RandomSource::seeded(9);

        for _ in 0..20 {
            let primary = ProjectileSpec::primary(Vec2::ZERO, 90.0, "Salute1");
            let fragment = ProjectileSpec::fragment(Vec2::ZERO, 45.0, 1, "Salute1");
            let p = Projectile::new(&primary, &config, Vec2::ZERO, &mut rng);
            let f = Projectile::new(&fragment, &config, Vec2::ZERO, &mut rng);

            assert!(config.primary_distance.contains(p.explosion_distance()));
            assert!(config.fragment_distance.contains(f.explosion_distance()));
        }
    }

    #[test]
    fn test_burst_distance_never_changes() {
        let config = SaluteConfig::default();
        let mut p = rocket(&config, &ProjectileSpec::primary(Vec2::new(0.0, 10.0), 80.0, "Salute1"));
        let threshold = p.explosion_distance();

        for _ in 0..30 {
            p.update(0.16, config.gravity, GROUND);
        }
        assert_eq!(p.explosion_distance(), threshold);
    }

    #[test]
    fn test_rocket_bursts_at_threshold_and_stays_used() {
        let mut config = SaluteConfig::default();
        config.primary_distance = SampleRange::new(50.0, 50.0);
        let mut p = rocket(&config, &ProjectileSpec::primary(Vec2::new(0.0, 10.0), 90.0, "Salute1"));

        let mut ticks = 0;
        while !p.is_used() {
            p.update(0.1, config.gravity, GROUND);
            ticks += 1;
            assert!(ticks < 100, "rocket never burst");
        }
        assert!(p.distance_travelled() >= 50.0);

        for _ in 0..10 {
            p.update(0.1, config.gravity, GROUND);
            assert!(p.is_used());
        }
    }

    #[test]
    fn test_ground_crossing_is_spent_on_same_tick() {
        let config = SaluteConfig::default();
        let mut p = rocket(&config, &ProjectileSpec::fragment(Vec2::new(0.0, 1.0), 0.0, 1, "Salute1"));
        p.force_state(KinematicState::new(0.0, 0.0, 1.0, -50.0));

        p.update(0.1, config.gravity, GROUND);
        assert!(p.position().y < GROUND);
        assert!(p.distance_travelled() < p.explosion_distance());
        assert!(p.is_used());
    }

    #[test]
    fn test_below_ground_rocket_is_not_integrated() {
        let config = SaluteConfig::default();
        let mut p = rocket(&config, &ProjectileSpec::fragment(Vec2::ZERO, 0.0, 1, "Salute1"));
        let below = KinematicState::new(3.0, 10.0, -5.0, 10.0);
        p.force_state(below);

        p.update(0.1, config.gravity, GROUND);
        assert!(p.is_used());
        assert_eq!(*p.state(), below);
    }

    #[test]
    fn test_non_finite_state_is_spent() {
        let config = SaluteConfig::default();
        let mut p = rocket(&config, &ProjectileSpec::primary(Vec2::new(0.0, 10.0), 90.0, "Salute1"));
        p.force_state(KinematicState::new(0.0, f32::NAN, 10.0, 50.0));

        p.update(0.1, config.gravity, GROUND);
        assert!(p.is_used());
    }

    #[test]
    fn test_paused_rocket_is_frozen() {
        let config = SaluteConfig::default();
        let mut p = rocket(&config, &ProjectileSpec::primary(Vec2::new(0.0, 10.0), 90.0, "Salute1"));
        p.set_paused(true);
        let before = *p.state();

        p.update(0.5, config.gravity, GROUND);
        assert_eq!(*p.state(), before);
        assert!(p.is_paused());
    }

    #[test]
    fn test_mixed_salute_is_resolved_once() {
        let config = SaluteConfig::default();
        let p = rocket(&config, &ProjectileSpec::primary(Vec2::ZERO, 90.0, crate::types::MIXED_SALUTE));
        assert!(config.salute_palette.iter().any(|s| s == p.effect_id()));
    }

    #[test]
    fn test_launch_effect_fires_once() {
        let config = SaluteConfig::default();
        let mut sink = RecordingSink::default();
        let mut p = rocket(&config, &ProjectileSpec::primary(Vec2::new(5.0, 10.0), 90.0, "Salute1"))
            .with_launch_effect();

        p.flush_effects(&mut sink, &config);
        p.flush_effects(&mut sink, &config);

        assert_eq!(sink.started(&config.shot_effect), 1);
        assert_eq!(sink.started(&config.fly_effect), 1);
        assert!(!p.is_first_tick());
    }

    #[test]
    fn test_burst_finishes_trail_and_plays_salute() {
        let config = SaluteConfig::default();
        let mut sink = RecordingSink::default();
        let mut p = rocket(&config, &ProjectileSpec::fragment(Vec2::ZERO, 90.0, 1, "Salute2"));

        p.flush_effects(&mut sink, &config);
        p.force_used();
        p.flush_effects(&mut sink, &config);

        assert_eq!(sink.count(&EffectCommand::Finish), 1);
        assert_eq!(sink.started("Salute2"), 1);
        assert_eq!(sink.count(&EffectCommand::Reset), 1);

        p.release_effects(&mut sink);
        assert!(sink.live.is_empty());
    }

    #[test]
    fn test_refused_effects_are_skipped() {
        let config = SaluteConfig::default();
        let mut sink = RecordingSink::default();
        sink.refuse = true;
        let mut p = rocket(&config, &ProjectileSpec::primary(Vec2::ZERO, 90.0, "Salute1"))
            .with_launch_effect();
        p.force_used();

        p.flush_effects(&mut sink, &config);
        assert!(sink.log.is_empty());

        // retried once the sink recovers
        sink.refuse = false;
        p.flush_effects(&mut sink, &config);
        assert_eq!(sink.started("Salute1"), 1);
    }

    #[test]
    fn test_heading_of_rising_rocket_is_launch_angle() {
        let config = SaluteConfig::default();
        let p = rocket(&config, &ProjectileSpec::primary(Vec2::ZERO, 90.0, "Salute1"));
        assert!((p.heading_degrees() - 90.0).abs() < 1e-3);
        assert_eq!(p.sprite_position(), Vec2::new(-8.0, -24.0));
    }
}
