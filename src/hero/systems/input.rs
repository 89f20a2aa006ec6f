//! Hero domain: keyboard sampling into the hero input signal.

use bevy::prelude::*;

use crate::hero::input::HeroInput;

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<HeroInput>) {
    // Horizontal axis
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }

    // Vertical axis (up/down slashes, dash variants, thrust aim)
    let mut y = 0.0;
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        y += 1.0;
    }
    input.axis = Vec2::new(x, y);

    // Ctrl chords belong to the debug hotkeys.
    if keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight) {
        return;
    }

    let jump = [KeyCode::Space, KeyCode::KeyK];
    let dash = [KeyCode::ShiftLeft, KeyCode::KeyJ];
    let attack = [KeyCode::KeyZ, KeyCode::KeyU];

    input.jump.accumulate(
        keyboard.any_just_pressed(jump),
        keyboard.any_pressed(jump),
        keyboard.any_just_released(jump),
    );
    input.dash.accumulate(
        keyboard.any_just_pressed(dash),
        keyboard.any_pressed(dash),
        keyboard.any_just_released(dash),
    );
    input.attack.accumulate(
        keyboard.any_just_pressed(attack),
        keyboard.any_pressed(attack),
        keyboard.any_just_released(attack),
    );
}
