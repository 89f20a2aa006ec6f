//! Hero domain: avian adapters for the controller's body and terrain sensing,
//! and the fixed-step tick system.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::hero::components::{GameLayer, Player, soft_terrain_filter};
use crate::hero::controller::HeroController;
use crate::hero::input::HeroInput;
use crate::hero::body::{HeroBody, TerrainSensor, WallSide};

const GROUND_RAY_DISTANCE: f32 = 4.0;
const WALL_RAY_DISTANCE: f32 = 4.0;
/// Foot rays sit this far inside the collider's edges.
const FOOT_INSET: f32 = 2.0;

pub(crate) struct AvianBody<'a> {
    velocity: &'a mut LinearVelocity,
    gravity: &'a mut GravityScale,
    transform: &'a mut Transform,
}

impl HeroBody for AvianBody<'_> {
    fn velocity(&self) -> Vec2 {
        self.velocity.0
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity.0 = velocity;
    }

    fn gravity_enabled(&self) -> bool {
        self.gravity.0 > 0.0
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity.0 = if enabled { 1.0 } else { 0.0 };
    }

    fn position(&self) -> Vec2 {
        self.transform.translation.truncate()
    }

    fn teleport(&mut self, position: Vec2) {
        self.transform.translation = position.extend(self.transform.translation.z);
    }
}

pub(crate) struct AvianTerrain<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    origin: Vec2,
    half_extents: Vec2,
}

impl AvianTerrain<'_, '_, '_> {
    fn cast(&self, origin: Vec2, direction: Dir2, distance: f32, filter: &SpatialQueryFilter) -> bool {
        self.spatial_query
            .cast_ray(origin, direction, distance, true, filter)
            .is_some()
    }
}

impl TerrainSensor for AvianTerrain<'_, '_, '_> {
    fn touching_ground(&self) -> bool {
        // Filter to only hit Ground layer entities (not enemies, sensors, etc.)
        let filter = SpatialQueryFilter::from_mask(GameLayer::Ground);
        let inset = (self.half_extents.x - FOOT_INSET).max(0.0);
        [-inset, inset].into_iter().any(|dx| {
            let origin = self.origin + Vec2::new(dx, -self.half_extents.y);
            self.cast(origin, Dir2::NEG_Y, GROUND_RAY_DISTANCE, &filter)
        })
    }

    fn touching_wall(&self, side: WallSide) -> bool {
        let filter = SpatialQueryFilter::from_mask(GameLayer::Wall);
        let direction = match side {
            WallSide::Left => Dir2::NEG_X,
            WallSide::Right => Dir2::X,
        };
        self.cast(
            self.origin,
            direction,
            self.half_extents.x + WALL_RAY_DISTANCE,
            &filter,
        )
    }

    fn strike_hits_soft_terrain(&self, reach: Vec2) -> bool {
        let Ok(direction) = Dir2::new(reach) else {
            return false;
        };
        self.cast(self.origin, direction, reach.length(), &soft_terrain_filter())
    }
}

/// One controller step per fixed tick. Input edges gathered since the last
/// step are consumed here.
pub(crate) fn tick_hero(
    time: Res<Time>,
    spatial_query: SpatialQuery,
    mut input: ResMut<HeroInput>,
    mut query: Query<
        (
            &mut HeroController,
            &mut LinearVelocity,
            &mut GravityScale,
            &mut Transform,
            &Collider,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (mut controller, mut velocity, mut gravity, mut transform, collider) in &mut query {
        let half_extents = match collider.shape_scaled().as_cuboid() {
            Some(c) => Vec2::new(c.half_extents.x, c.half_extents.y),
            None => Vec2::new(12.0, 24.0),
        };
        let terrain = AvianTerrain {
            spatial_query: &spatial_query,
            origin: transform.translation.truncate(),
            half_extents,
        };
        let mut body = AvianBody {
            velocity: &mut *velocity,
            gravity: &mut *gravity,
            transform: &mut *transform,
        };
        controller.tick(dt, &input, &mut body, &terrain);
    }

    input.consume_edges();
}
