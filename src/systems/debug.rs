use bevy::prelude::*;

use crate::launcher::Launcher;
use crate::pool::ProjectilePool;
use crate::resources::SaluteConfig;

/// Draw debug gizmos for the gun and every live rocket.
///
/// Rockets get a dot, a velocity line and a ring at their burst distance
/// around the launch point.
pub fn draw_salute_debug(
    mut gizmos: Gizmos,
    pool: Res<ProjectilePool>,
    launcher: Res<Launcher>,
    config: Res<SaluteConfig>,
) {
    if !config.debug_draw {
        return;
    }

    let gun_center = Vec2::new(launcher.x() + launcher.size().x * 0.5, launcher.size().y * 0.5);
    gizmos.rect_2d(gun_center, launcher.size(), Color::srgb(0.2, 0.6, 1.0));

    for rocket in pool.iter() {
        let position = rocket.position();
        gizmos.circle_2d(position, 3.0, Color::srgb(1.0, 0.0, 0.0));

        // Scale down for visibility
        let end = position + rocket.velocity() * 0.1;
        gizmos.line_2d(position, end, Color::srgb(0.0, 1.0, 0.0));

        gizmos.circle_2d(
            rocket.origin(),
            rocket.explosion_distance(),
            Color::srgba(1.0, 1.0, 0.0, 0.15),
        );
    }
}
