//! Debug domain: the hero info overlay.

use bevy::prelude::*;

use crate::debug::state::DebugState;
use crate::hero::{HeroController, Player};

/// Marker for debug info overlay (position, health, state)
#[derive(Component, Debug)]
pub struct DebugInfoOverlay;

pub(crate) fn spawn_debug_info_overlay(commands: &mut Commands) {
    commands.spawn((
        DebugInfoOverlay,
        Text::new("Loading..."),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(0.8, 0.9, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(20.0),
            bottom: Val::Px(20.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ZIndex(500),
    ));
}

/// Update the debug info overlay with current hero state
pub(crate) fn update_debug_info_overlay(
    mut commands: Commands,
    debug_state: Res<DebugState>,
    hero_query: Query<(&Transform, &HeroController), With<Player>>,
    mut overlay_query: Query<&mut Text, With<DebugInfoOverlay>>,
    existing_overlay: Query<Entity, With<DebugInfoOverlay>>,
) {
    if !debug_state.show_info {
        for entity in &existing_overlay {
            commands.entity(entity).despawn();
        }
        return;
    }

    if existing_overlay.is_empty() {
        spawn_debug_info_overlay(&mut commands);
        return;
    }

    let (Some((transform, hero)), Ok(mut text)) =
        (hero_query.iter().next(), overlay_query.single_mut())
    else {
        return;
    };

    let pos = transform.translation;
    let flags = hero.flags();
    let mut info = format!(
        "Pos: ({:.0}, {:.0})\nHP: {}/{}\nState: {:?}\nLocomotion: {:?}\nFacing: {:?}\n\
         Ground: {}  Wall: {:?}\nDamage: {:?}  Invuln: {}\nInvincible: {}",
        pos.x,
        pos.y,
        hero.health(),
        hero.max_health(),
        hero.state(),
        flags.locomotion(),
        hero.facing(),
        flags.on_ground,
        flags.touching_wall,
        hero.damage_mode(),
        flags.invulnerable,
        debug_state.invincible,
    );
    if let Some((message, _)) = &debug_state.status_message {
        info.push('\n');
        info.push_str(message);
    }
    **text = info;
}
