//! Planar steering: walk toward a target point or under direct key input.
//!
//! Both input modes only move the agent in the plane; the vertical part is
//! reconciled against the terrain by `follow::follow_step` afterwards.

use bevy::prelude::*;
use std::f32::consts::PI;

use crate::agent::{Agent, AgentState, TargetReached};
use crate::settings::{AgentSettings, Settings};

/// What a steering step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteerOutcome {
    /// No target set, nothing moved.
    Idle,
    /// Advanced toward the target.
    Moving,
    /// Entered the epsilon ball; the target was cleared.
    Reached,
}

/// Wrap an angle into `(-PI, PI]` so yaw blending takes the short way round.
fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Turn the facing angle toward a planar direction with an exponential
/// blend; never snaps, frame-rate independent.
fn turn_toward(agent: &mut Agent, direction: Vec2, turn_rate: f32, dt: f32) {
    let desired = (-direction.x).atan2(-direction.y);
    let blend = 1.0 - (-turn_rate * dt).exp();
    let delta = wrap_angle(desired - agent.yaw);
    agent.yaw = wrap_angle(agent.yaw + delta * blend);
}

/// Advance one step toward the current target, if any.
///
/// The step length is capped at the remaining distance, so the distance to
/// a stationary target decreases strictly until the epsilon ball is
/// entered, at which point the target is cleared and the agent goes Idle.
pub fn steer_toward(agent: &mut Agent, settings: &AgentSettings, dt: f32) -> SteerOutcome {
    let Some(target) = agent.target else {
        agent.state = AgentState::Idle;
        return SteerOutcome::Idle;
    };

    let offset = target - agent.planar;
    let distance = offset.length();
    if !distance.is_finite() || distance <= settings.arrive_epsilon {
        agent.target = None;
        agent.state = AgentState::Idle;
        return SteerOutcome::Reached;
    }

    let direction = offset / distance;
    let step = (settings.speed * dt).min(distance);
    agent.planar += direction * step;
    turn_toward(agent, direction, settings.turn_rate, dt);
    agent.state = AgentState::Walking;
    SteerOutcome::Moving
}

/// Advance under direct key steering. A non-zero direction cancels any
/// click target; a zero direction with no target leaves the agent Idle.
pub fn steer_velocity(agent: &mut Agent, direction: Vec2, settings: &AgentSettings, dt: f32) {
    if direction.length_squared() < 1.0e-6 {
        if agent.target.is_none() {
            agent.state = AgentState::Idle;
        }
        return;
    }

    agent.target = None;
    let direction = direction.normalize();
    agent.planar += direction * settings.speed * dt;
    turn_toward(agent, direction, settings.turn_rate, dt);
    agent.state = AgentState::Walking;
}

/// Walk the agent toward its click target each frame and report arrival.
#[allow(clippy::needless_pass_by_value)]
pub fn agent_steering(
    time: Res<Time>,
    settings: Res<Settings>,
    mut query: Query<&mut Agent>,
    mut reached: EventWriter<TargetReached>,
) {
    let Ok(mut agent) = query.get_single_mut() else {
        return;
    };

    let target = agent.target;
    if steer_toward(&mut agent, &settings.agent, time.delta_seconds()) == SteerOutcome::Reached
        && let Some(target) = target
    {
        reached.send(TargetReached { target });
    }
}

/// Translate held movement keys into planar steering.
///
/// # Arguments
/// * `keyboard` - current key state
/// * `settings` - keybinds plus agent tuning
/// * `time` - delta time for frame-rate independent movement
/// * `query` - the agent to steer
#[allow(clippy::needless_pass_by_value)]
pub fn agent_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    time: Res<Time>,
    mut query: Query<&mut Agent>,
) {
    let Ok(mut agent) = query.get_single_mut() else {
        return;
    };

    let map_key = |name: &str, default: KeyCode| {
        settings
            .controls
            .keybinds
            .get(name)
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(default)
    };

    let mut direction = Vec2::ZERO;
    if keyboard.pressed(map_key("forward", KeyCode::KeyW)) {
        direction.y -= 1.0;
    }
    if keyboard.pressed(map_key("back", KeyCode::KeyS)) {
        direction.y += 1.0;
    }
    if keyboard.pressed(map_key("left", KeyCode::KeyA)) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(map_key("right", KeyCode::KeyD)) {
        direction.x += 1.0;
    }

    steer_velocity(&mut agent, direction, &settings.agent, time.delta_seconds());
}
