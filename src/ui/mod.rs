//! User interface helpers: debug overlay and the movement-target marker.
//!
//! The overlay is toggled by keybind and refreshed on a timer; it shows
//! smoothed FPS, the agent's position and state, and the per-material block
//! counts of the built world. The target marker is a gizmo ring drawn at
//! the active click destination until the agent arrives.

use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use std::fmt::Write;

use crate::agent::{Agent, AgentState, TargetReached};
use crate::settings::Settings;
use crate::terrain::MaterialKind;
use crate::world::WorldBlocks;

/// Marker component for the overlay text node.
#[derive(Component)]
pub struct OverlayText;

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct OverlayState {
    pub visible: bool,
}

#[derive(Resource, Default)]
pub struct OverlayTimer(pub Timer);

/// World position of the active movement target, if any.
#[derive(Resource, Default)]
pub struct TargetMarker(pub Option<Vec3>);

/// Insert the overlay resources.
pub fn setup_overlay(mut commands: Commands) {
    commands.insert_resource(OverlayTimer(Timer::from_seconds(0.5, TimerMode::Repeating)));
    commands.insert_resource(OverlayState::default());
    commands.insert_resource(TargetMarker::default());
}

/// Spawn the overlay text node (empty until toggled on).
#[allow(clippy::needless_pass_by_value)]
pub fn spawn_overlay(mut commands: Commands, asset_server: Res<AssetServer>) {
    let font: Handle<Font> = asset_server.load("fonts/OpenSans.ttf");

    commands.spawn((
        TextBundle {
            text: Text::from_section(
                "",
                TextStyle {
                    font,
                    font_size: 16.0,
                    color: Color::srgb(1.0, 1.0, 0.0),
                },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        OverlayText,
    ));
}

/// Toggle overlay visibility on the configured key (F1 by default).
#[allow(clippy::needless_pass_by_value)]
pub fn toggle_overlay(
    mut state: ResMut<OverlayState>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    let key = settings
        .controls
        .keybinds
        .get("toggle_overlay")
        .and_then(|s| Settings::keycode_from_str(s))
        .unwrap_or(KeyCode::F1);

    if input.just_pressed(key) {
        state.visible = !state.visible;
    }
}

/// Refresh the overlay text once per timer interval.
///
/// # Arguments
/// * `diagnostics` - diagnostics store (FPS / frame time)
/// * `state` - overlay visibility
/// * `world` - built world, for the per-material counts
/// * `time` / `timer` - refresh throttling
/// * `texts` - the overlay text node
/// * `agents` - the agent, for position/state/target
#[allow(clippy::needless_pass_by_value)]
pub fn update_overlay(
    diagnostics: Res<DiagnosticsStore>,
    state: Res<OverlayState>,
    world: Option<Res<WorldBlocks>>,
    time: Res<Time>,
    mut timer: ResMut<OverlayTimer>,
    mut texts: Query<&mut Text, With<OverlayText>>,
    agents: Query<&Agent>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    let Ok(mut text) = texts.get_single_mut() else {
        return;
    };

    if !state.visible {
        text.sections[0].value = String::new();
        return;
    }

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let mut out = String::new();
    writeln!(out, "FPS: {fps:.1} ({frame_time:.2} ms)").ok();

    if let Ok(agent) = agents.get_single() {
        let pos = agent.position();
        let state_name = match agent.state {
            AgentState::Idle => "idle",
            AgentState::Walking => "walking",
        };
        writeln!(
            out,
            "Agent: ({:.1}, {:.1}, {:.1}) {state_name}",
            pos.x, pos.y, pos.z
        )
        .ok();
        if let Some(target) = agent.target {
            writeln!(out, "Target: ({:.1}, {:.1})", target.x, target.y).ok();
        }
    }

    if let Some(world) = world {
        let s = world.stats;
        writeln!(
            out,
            "Blocks: {} ({} columns, {} fill, {} water, {} tree)",
            world.total_blocks(),
            s.columns,
            s.fill_blocks,
            s.water_blocks,
            s.tree_blocks
        )
        .ok();
        for kind in MaterialKind::ALL {
            let count = world.count(kind);
            if count > 0 {
                writeln!(out, "  {}: {count}", kind.name()).ok();
            }
        }
    }

    text.sections[0].value = out;
}

/// Drop the marker once the agent reports arrival.
pub fn clear_reached_marker(
    mut marker: ResMut<TargetMarker>,
    mut events: EventReader<TargetReached>,
) {
    if events.read().next().is_some() {
        marker.0 = None;
    }
}

/// Draw a ring at the active movement target. Nothing is drawn when the
/// target was cancelled (e.g. by key steering).
#[allow(clippy::needless_pass_by_value)]
pub fn draw_target_marker(marker: Res<TargetMarker>, agents: Query<&Agent>, mut gizmos: Gizmos) {
    if !agents.get_single().is_ok_and(|a| a.target.is_some()) {
        return;
    }
    if let Some(position) = marker.0 {
        gizmos.circle(
            position + Vec3::Y * 0.05,
            Dir3::Y,
            0.45,
            Color::srgb(1.0, 0.93, 0.36),
        );
    }
}
