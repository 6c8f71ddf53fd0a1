//! Third-person follow camera.
//!
//! Keeps a fixed offset behind and above the agent, easing toward the
//! desired position so quick direction changes do not jerk the view, and
//! always looks at the agent.

use bevy::prelude::*;

use crate::agent::Agent;

/// Component marking the scene camera and holding its follow tuning.
#[derive(Component)]
pub struct FollowCamera {
    /// Camera position relative to the agent.
    pub offset: Vec3,
    /// Exponential position blend rate, per second.
    pub smoothing: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        FollowCamera {
            offset: Vec3::new(0.0, 12.0, 14.0),
            smoothing: 5.0,
        }
    }
}

/// Ease the camera toward its follow offset and aim it at the agent.
#[allow(clippy::needless_pass_by_value)]
pub fn camera_follow(
    time: Res<Time>,
    agents: Query<&Agent>,
    mut cameras: Query<(&mut Transform, &FollowCamera), Without<Agent>>,
) {
    let Ok(agent) = agents.get_single() else {
        return;
    };
    let focus = agent.position();
    if !focus.is_finite() {
        return;
    }

    for (mut transform, follow) in &mut cameras {
        let desired = focus + follow.offset;
        let blend = 1.0 - (-follow.smoothing * time.delta_seconds()).exp();
        transform.translation = transform.translation.lerp(desired, blend);
        transform.look_at(focus, Vec3::Y);
    }
}
