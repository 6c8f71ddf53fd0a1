//! Agent components and systems (steering, terrain follow, camera).
//!
//! The agent is plain data advanced by pure step functions; the Bevy
//! systems are thin wrappers that feed them input, settings and the frame
//! delta. That split keeps the movement logic testable without an `App`
//! and lets the benchmarks drive the exact code the systems run.
//!
//! # Example:
//!
//! ```
//! use bevy::math::Vec2;
//! use brickfield::agent::{Agent, AgentState};
//!
//! let mut agent = Agent::at(Vec2::ZERO, 2.0);
//! assert_eq!(agent.state, AgentState::Idle);
//! agent.target = Some(Vec2::new(10.0, 10.0));
//! ```
//!
//! Systems are registered in frame order: keyboard steering, target
//! steering, terrain follow, transform sync.

pub mod camera;
pub mod follow;
pub mod movement;

use bevy::prelude::*;

pub use camera::*;
pub use follow::*;
pub use movement::*;

/// Coarse movement state, used for the overlay and the target marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentState {
    #[default]
    Idle,
    Walking,
}

/// Component tracking the walking character.
///
/// `planar` is the continuous (x, z) position; `vertical` converges toward
/// the terrain surface every frame and is never written by anything but the
/// agent systems.
#[derive(Component, Debug, Clone)]
pub struct Agent {
    pub planar: Vec2,
    pub vertical: f32,
    /// Facing angle around Y, radians.
    pub yaw: f32,
    /// Planar point the agent is walking toward, if any.
    pub target: Option<Vec2>,
    pub state: AgentState,
}

impl Agent {
    /// Agent standing still at the given planar position and height.
    #[must_use]
    pub fn at(planar: Vec2, vertical: f32) -> Self {
        Agent {
            planar,
            vertical,
            yaw: 0.0,
            target: None,
            state: AgentState::Idle,
        }
    }

    /// World-space position combining the planar and vertical parts.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.planar.x, self.vertical, self.planar.y)
    }
}

/// Fired once when the agent arrives inside the epsilon ball of its target.
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetReached {
    pub target: Vec2,
}
