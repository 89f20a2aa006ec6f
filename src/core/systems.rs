//! Core domain: camera and pause handling.

use bevy::prelude::*;

use crate::core::resources::GameplayPaused;
use crate::hero::Player;

const PAUSE_SOURCE: &str = "menu";
const CAMERA_LERP: f32 = 6.0;

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub(crate) fn toggle_pause(keyboard: Res<ButtonInput<KeyCode>>, mut paused: ResMut<GameplayPaused>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        paused.toggle(PAUSE_SOURCE);
        info!("Gameplay paused: {}", paused.is_paused());
    }
}

pub(crate) fn follow_hero(
    time: Res<Time>,
    heroes: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(hero) = heroes.single() else {
        return;
    };
    let t = (CAMERA_LERP * time.delta_secs()).min(1.0);
    for mut camera in &mut cameras {
        let target = hero.translation.truncate();
        let current = camera.translation.truncate();
        let next = current.lerp(target, t);
        camera.translation.x = next.x;
        camera.translation.y = next.y;
    }
}
