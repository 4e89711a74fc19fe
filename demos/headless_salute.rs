use bevy::app::ScheduleRunnerPlugin;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy_salute::prelude::*;
use std::time::Duration;

fn main() {
    println!("Starting Headless Salute...");
    println!("The gun fires every few seconds; press nothing, just watch the log.");

    let salute = match SalutePlugin::new(
        SaluteConfig::default().with_difficulty(Difficulty::Hard),
        ScreenBounds::default(),
        SpriteSizes::default(),
    ) {
        Ok(plugin) => plugin.with_seed(2024),
        Err(err) => {
            eprintln!("[ERROR] bad salute setup: {err}");
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))))
        .add_plugins(salute)
        .add_systems(Update, (scripted_input, print_progress))
        .add_systems(PostUpdate, (report_shots, report_bursts))
        .run();
}

/// Walk the gun around and fire by hand now and then.
fn scripted_input(time: Res<Time>, mut commands: MessageWriter<SaluteCommand>, mut next: Local<f32>) {
    if time.elapsed_secs() < *next {
        return;
    }
    *next = time.elapsed_secs() + 1.5;

    commands.write(SaluteCommand::MoveRight);
    commands.write(SaluteCommand::HandShot);
}

fn report_shots(mut shots: MessageReader<ShotFired>) {
    for shot in shots.read() {
        println!(
            "[SHOT] {:?} rocket from ({:.0}, {:.0}) with {}",
            shot.kind, shot.spec.origin.x, shot.spec.origin.y, shot.spec.effect_id
        );
    }
}

fn report_bursts(mut bursts: MessageReader<RocketExploded>) {
    for burst in bursts.read() {
        println!(
            "[BURST] level {} {} at ({:.0}, {:.0}) -> {} fragments",
            burst.level, burst.effect_id, burst.position.x, burst.position.y, burst.fragments
        );
    }
}

fn print_progress(time: Res<Time>, pool: Res<ProjectilePool>, mut timer: Local<f32>) {
    *timer += time.delta_secs();
    if *timer > 1.0 {
        *timer = 0.0;
        println!("[INFO] t={:.1}s, {} rockets in the sky", time.elapsed_secs(), pool.len());
    }

    if time.elapsed_secs() > 12.0 {
        println!("[FINISHED] Salute complete.");
        std::process::exit(0);
    }
}
