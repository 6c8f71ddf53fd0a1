//! Terrain following: the vertical half of the movement model.
//!
//! Whatever moved the agent in the plane, this step resamples the height
//! field at the column under its feet and eases the vertical position
//! toward the surface. The easing is exponential, so steps and slopes read
//! as a short sink/climb instead of a teleport, and underwater columns
//! clamp to the sea surface.

use bevy::prelude::*;

use crate::agent::Agent;
use crate::settings::{AgentSettings, Settings};
use crate::terrain::{world_to_column, HeightField, SURFACE_OFFSET};

/// Reconcile the agent's vertical position with the terrain.
///
/// Skips the tick entirely when the planar position is not a usable
/// column (non-finite or out of range), so a bad upstream value can never
/// leak NaN into the render transform.
#[allow(clippy::cast_precision_loss)]
pub fn follow_step(agent: &mut Agent, field: &HeightField, settings: &AgentSettings, dt: f32) {
    let Some((x, z)) = world_to_column(agent.planar) else {
        return;
    };

    let surface = field.walk_height(x, z) as f32 + SURFACE_OFFSET;
    let blend = 1.0 - (-settings.fall_rate * dt).exp();
    agent.vertical += (surface - agent.vertical) * blend;
}

/// Per-frame system wrapper around `follow_step`.
#[allow(clippy::needless_pass_by_value)]
pub fn agent_follow_terrain(
    field: Res<HeightField>,
    settings: Res<Settings>,
    time: Res<Time>,
    mut query: Query<&mut Agent>,
) {
    let Ok(mut agent) = query.get_single_mut() else {
        return;
    };
    follow_step(&mut agent, &field, &settings.agent, time.delta_seconds());
}

/// Copy the agent's simulated position and facing into its transform.
/// Non-finite positions are dropped rather than rendered.
pub fn sync_agent_transform(mut query: Query<(&Agent, &mut Transform)>) {
    for (agent, mut transform) in &mut query {
        let position = agent.position();
        if !position.is_finite() {
            continue;
        }
        transform.translation = position;
        transform.rotation = Quat::from_rotation_y(agent.yaw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TerrainSettings;
    use crate::terrain::NoiseOctave;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    /// Field whose height at (1, 0) is exactly `floor(amplitude)`.
    fn peak_field(amplitude: f64) -> HeightField {
        let mut field = HeightField::new(&TerrainSettings::default());
        field.octaves = vec![NoiseOctave {
            amplitude,
            frequency: FRAC_PI_2,
            phase: 0.0,
        }];
        field
    }

    #[test]
    fn settles_on_top_of_dry_land() {
        let field = peak_field(3.0);
        let settings = AgentSettings::default();
        let mut agent = Agent::at(Vec2::new(1.0, 0.0), 20.0);

        for _ in 0..400 {
            follow_step(&mut agent, &field, &settings, DT);
        }
        assert_relative_eq!(agent.vertical, 3.5, epsilon = 1.0e-3);
    }

    #[test]
    fn underwater_columns_clamp_to_the_sea_surface() {
        // Height -5 under a water level of -2: the agent rests half a
        // block above the sea surface, not on the sea floor.
        let field = peak_field(-5.0);
        assert_eq!(field.height(1, 0), -5);

        let settings = AgentSettings::default();
        let mut agent = Agent::at(Vec2::new(1.0, 0.0), 4.0);
        for _ in 0..400 {
            follow_step(&mut agent, &field, &settings, DT);
        }
        assert_relative_eq!(agent.vertical, -1.5, epsilon = 1.0e-3);
    }

    #[test]
    fn easing_moves_toward_the_surface_without_overshooting() {
        let field = peak_field(3.0);
        let settings = AgentSettings::default();
        let mut agent = Agent::at(Vec2::new(1.0, 0.0), 10.0);

        let before = agent.vertical;
        follow_step(&mut agent, &field, &settings, DT);
        assert!(agent.vertical < before, "did not sink toward the surface");
        assert!(agent.vertical > 3.5, "jumped past the surface in one tick");
    }

    #[test]
    fn non_finite_planar_position_skips_the_tick() {
        let field = peak_field(3.0);
        let settings = AgentSettings::default();
        let mut agent = Agent::at(Vec2::new(f32::NAN, 0.0), 7.0);

        follow_step(&mut agent, &field, &settings, DT);
        assert_eq!(agent.vertical, 7.0);
        assert!(agent.vertical.is_finite());
    }

    #[test]
    fn column_is_resolved_from_the_rounded_position() {
        // Just under halfway to the next column still samples column 1.
        let field = peak_field(3.0);
        let settings = AgentSettings::default();
        let mut agent = Agent::at(Vec2::new(1.4, -0.4), 3.5);
        follow_step(&mut agent, &field, &settings, DT);
        assert_relative_eq!(agent.vertical, 3.5, epsilon = 1.0e-4);
    }
}
