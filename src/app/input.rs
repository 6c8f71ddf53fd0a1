//! Cursor picking: click the ground to send the character somewhere.
//!
//! A left click casts a ray from the camera through the cursor onto the
//! sea-level plane, rounds the hit to a column, clamps it onto the map and
//! resolves the real surface height there — the same recompute-at-click
//! logic the world generation uses, so clicking a hillside targets the top
//! of the hill, not the base of it.

use bevy::math::primitives::InfinitePlane3d;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use brickfield::agent::{Agent, FollowCamera};
use brickfield::settings::Settings;
use brickfield::terrain::{world_to_column, HeightField, SURFACE_OFFSET};
use brickfield::ui::TargetMarker;

/// Set the agent's movement target from a ground click.
#[allow(clippy::needless_pass_by_value, clippy::cast_precision_loss)]
pub fn click_to_move(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<FollowCamera>>,
    field: Res<HeightField>,
    settings: Res<Settings>,
    mut agents: Query<&mut Agent>,
    mut marker: ResMut<TargetMarker>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    if settings.world.map_size <= 0 {
        return;
    }

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    let Some(distance) = ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y)) else {
        return;
    };
    let point = ray.get_point(distance);

    let Some((x, z)) = world_to_column(Vec2::new(point.x, point.z)) else {
        return;
    };

    // Keep the destination on the map, like the original click plane that
    // only covered the generated area.
    let half = settings.world.map_size / 2;
    let max = settings.world.map_size - half - 1;
    let x = x.clamp(-half, max);
    let z = z.clamp(-half, max);

    let Ok(mut agent) = agents.get_single_mut() else {
        return;
    };

    let surface = field.walk_height(x, z) as f32 + SURFACE_OFFSET;
    agent.target = Some(Vec2::new(x as f32, z as f32));
    marker.0 = Some(Vec3::new(x as f32, surface, z as f32));
}
