use std::time::Duration;

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use bevy_salute::prelude::*;

#[derive(Resource, Default)]
struct Log {
    shots: Vec<ShotFired>,
    bursts: Vec<RocketExploded>,
    effects: Vec<EffectMessage>,
}

fn collect(
    mut shots: MessageReader<ShotFired>,
    mut bursts: MessageReader<RocketExploded>,
    mut effects: MessageReader<EffectMessage>,
    mut log: ResMut<Log>,
) {
    log.shots.extend(shots.read().cloned());
    log.bursts.extend(bursts.read().cloned());
    log.effects.extend(effects.read().cloned());
}

fn app(config: SaluteConfig) -> App {
    let plugin = SalutePlugin::new(
        config,
        ScreenBounds {
            width: 1000.0,
            height: 700.0,
        },
        SpriteSizes::default(),
    )
    .unwrap()
    .with_seed(42);

    let mut app = App::new();
    app.init_resource::<Time>()
        .init_resource::<Log>()
        .add_plugins(plugin)
        .add_systems(PostUpdate, collect);
    app
}

fn step(app: &mut App, secs: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(secs));
    app.update();
}

fn command(app: &mut App, command: SaluteCommand) {
    app.world_mut().write_message(command);
}

fn quick_bursts(config: SaluteConfig) -> SaluteConfig {
    let mut config = config;
    config.primary_distance = SampleRange::new(1.0, 1.0);
    config.fragment_distance = SampleRange::new(1.0, 1.0);
    config
}

#[test]
fn test_automatic_cadence() {
    let mut app = app(SaluteConfig::default());

    step(&mut app, 0.016);
    assert_eq!(app.world().resource::<ProjectilePool>().len(), 1);

    for _ in 0..10 {
        step(&mut app, 0.1);
    }
    let log = app.world().resource::<Log>();
    assert_eq!(log.shots.len(), 1);
    assert_eq!(log.shots[0].kind, ShotKind::Automatic);
}

#[test]
fn test_hand_shots_respect_hand_period() {
    let mut app = app(SaluteConfig::default().with_auto_fire(false));

    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);
    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.1);
    assert_eq!(app.world().resource::<Log>().shots.len(), 1);

    step(&mut app, 0.5);
    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);

    let log = app.world().resource::<Log>();
    assert_eq!(log.shots.len(), 2);
    assert!(log.shots.iter().all(|s| s.kind == ShotKind::Hand));
}

#[test]
fn test_launch_plays_shot_effect() {
    let mut app = app(SaluteConfig::default().with_auto_fire(false));

    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);

    let log = app.world().resource::<Log>();
    let started: Vec<&str> = log
        .effects
        .iter()
        .filter_map(|m| match &m.command {
            EffectCommand::Start { effect_id } => Some(effect_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec![FLY_ROCKET_EFFECT, SHOT_EFFECT]);
}

#[test]
fn test_fragments_spawn_and_expire() {
    let config = quick_bursts(SaluteConfig::default().with_auto_fire(false))
        .with_difficulty(Difficulty::Middle);
    let mut app = app(config);

    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);
    {
        let log = app.world().resource::<Log>();
        assert_eq!(log.bursts.len(), 1);
        assert!(log.bursts[0].primary);
        assert_eq!(log.bursts[0].fragments, 3);
    }
    assert_eq!(app.world().resource::<ProjectilePool>().len(), 3);

    step(&mut app, 0.016);
    let log = app.world().resource::<Log>();
    assert_eq!(log.bursts.len(), 4);
    assert!(log.bursts[1..].iter().all(|b| b.level == 1 && b.fragments == 0));
    assert!(app.world().resource::<ProjectilePool>().is_empty());
    assert_eq!(app.world().resource::<EffectBudget>().live(), 0);
}

#[test]
fn test_pause_freezes_sky_and_clock() {
    let mut app = app(SaluteConfig::default().with_auto_fire(false));

    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);
    command(&mut app, SaluteCommand::Pause);
    step(&mut app, 0.016);

    let frozen_at = app.world().resource::<SaluteClock>().elapsed();
    let position = app.world().resource::<ProjectilePool>().iter().next().unwrap().position();

    step(&mut app, 0.5);
    assert_eq!(app.world().resource::<SaluteClock>().elapsed(), frozen_at);
    let pool = app.world().resource::<ProjectilePool>();
    assert_eq!(pool.iter().next().unwrap().position(), position);

    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);
    assert_eq!(app.world().resource::<Log>().shots.len(), 1);

    // the resume frame itself measures a zero step
    command(&mut app, SaluteCommand::Resume);
    step(&mut app, 0.016);
    step(&mut app, 0.016);
    let pool = app.world().resource::<ProjectilePool>();
    assert!(pool.iter().next().unwrap().position().y > position.y);
}

#[test]
fn test_stop_clears_sky_and_releases_effects() {
    let mut app = app(SaluteConfig::default().with_auto_fire(false));

    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);
    step(&mut app, 0.016);
    assert_eq!(app.world().resource::<ProjectilePool>().len(), 1);

    command(&mut app, SaluteCommand::Stop);
    step(&mut app, 0.016);

    assert!(app.world().resource::<ProjectilePool>().is_empty());
    assert_eq!(app.world().resource::<SaluteClock>().elapsed(), 0.0);
    assert_eq!(app.world().resource::<EffectBudget>().live(), 0);

    let log = app.world().resource::<Log>();
    assert!(log.effects.iter().any(|m| m.command == EffectCommand::Finish));
    assert!(log.effects.iter().any(|m| m.command == EffectCommand::Release));

    // timers were reset along with the clock
    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);
    assert_eq!(app.world().resource::<Log>().shots.len(), 2);
}

#[test]
fn test_stop_while_paused_restarts_unpaused() {
    let mut app = app(SaluteConfig::default().with_auto_fire(false));

    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);
    command(&mut app, SaluteCommand::Pause);
    step(&mut app, 0.016);
    command(&mut app, SaluteCommand::Stop);
    step(&mut app, 0.016);

    assert!(!app.world().resource::<SaluteClock>().is_paused());
    assert!(!app.world().resource::<Launcher>().is_paused());

    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);
    assert_eq!(app.world().resource::<Log>().shots.len(), 2);
    assert!(app.world().resource::<SaluteClock>().elapsed() > 0.0);
}

#[test]
fn test_gun_moves_within_bounds() {
    let mut app = app(SaluteConfig::default().with_auto_fire(false));
    let start = app.world().resource::<Launcher>().x();

    command(&mut app, SaluteCommand::MoveRight);
    step(&mut app, 0.016);
    assert_eq!(app.world().resource::<Launcher>().x(), start + 30.0);

    for _ in 0..40 {
        command(&mut app, SaluteCommand::MoveLeft);
    }
    step(&mut app, 0.016);
    assert_eq!(app.world().resource::<Launcher>().x(), 0.0);
}

#[test]
fn test_settings_commands() {
    let mut app = app(SaluteConfig::default().with_auto_fire(false));

    command(&mut app, SaluteCommand::SetDifficulty(Difficulty::Apocalypse));
    command(&mut app, SaluteCommand::SetSaluteType("Sparkler".to_string()));
    step(&mut app, 0.016);
    {
        let config = app.world().resource::<SaluteConfig>();
        assert_eq!(config.depth_limit, 3);
        assert_eq!(config.salute_type, "Salute1");
    }

    command(&mut app, SaluteCommand::SetSaluteType(MIXED_SALUTE.to_string()));
    command(&mut app, SaluteCommand::SetAutoFire(true));
    step(&mut app, 0.016);
    let config = app.world().resource::<SaluteConfig>();
    assert_eq!(config.salute_type, MIXED_SALUTE);
    assert!(config.auto_fire);
}

#[test]
fn test_exhausted_effect_budget_does_not_stop_the_salute() {
    let mut config = quick_bursts(SaluteConfig::default().with_auto_fire(false));
    config.effect_capacity = 0;
    let mut app = app(config);

    command(&mut app, SaluteCommand::HandShot);
    step(&mut app, 0.016);

    let log = app.world().resource::<Log>();
    assert!(log.effects.is_empty());
    assert_eq!(log.bursts.len(), 1);
}

#[test]
fn test_invalid_setup_is_rejected() {
    let config = SaluteConfig::default().with_depth_limit(9);
    let result = SalutePlugin::new(config, ScreenBounds::default(), SpriteSizes::default());
    assert!(matches!(result, Err(SaluteError::DepthLimitTooLarge { .. })));

    let sizes = SpriteSizes::empty().with_size(GUN_SPRITE, Vec2::new(10.0, 10.0));
    let result = SalutePlugin::new(SaluteConfig::default(), ScreenBounds::default(), sizes);
    assert!(matches!(result, Err(SaluteError::MissingSprite(name)) if name == ROCKET_SPRITE));
}
