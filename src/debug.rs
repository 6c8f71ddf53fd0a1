//! Debug utilities: a system (F3 default) to dump diagnostics, entity and
//! asset counts, world stats, agent state and memory usage to a
//! timestamped text file in `./debug-dumps/`.
//!
//! Useful for capturing a snapshot of the scene's internal state without
//! attaching a profiler or debugger.

use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::pbr::StandardMaterial;
use bevy::prelude::*;
use bevy::render::mesh::Mesh;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

use crate::agent::{Agent, AgentState};
use crate::settings::Settings;
use crate::terrain::MaterialKind;
use crate::world::WorldBlocks;

const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_dump_system);
    }
}

fn kb_to_mb(kb: u64) -> String {
    format!("{:.2} MB", (kb as f64) / 1024.0)
}

/// Dump a snapshot of the running scene when the configured key is pressed.
///
/// # Arguments
/// * `keys` - keyboard input, to detect the dump keybind
/// * `settings` - keybind lookup
/// * `diagnostics` - FPS / frame-time diagnostics
/// * `entities` - entity count query
/// * `meshes` / `materials` - asset counts
/// * `world` - built world stats, when present
/// * `agents` - agent snapshot, when present
#[allow(clippy::needless_pass_by_value)]
fn debug_dump_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    diagnostics: Res<DiagnosticsStore>,
    entities: Query<Entity>,
    meshes: Res<Assets<Mesh>>,
    materials: Res<Assets<StandardMaterial>>,
    world: Option<Res<WorldBlocks>>,
    agents: Query<&Agent>,
) {
    let dump_key = settings
        .controls
        .keybinds
        .get("dump_debug")
        .and_then(|s| Settings::keycode_from_str(s))
        .unwrap_or(KeyCode::F3);

    if !keys.just_pressed(dump_key) {
        return;
    }

    let now = SystemTime::now();
    let ts_secs = now.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs());
    let dt: DateTime<Utc> = DateTime::from(now);
    let fname = format!("{DUMP_DIR}/debug-{ts_secs}.txt");

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let mut out = String::new();
    writeln!(out, "Debug dump: {}", dt.format("%Y-%m-%d %H:%M:%S")).ok();
    writeln!(out, "FPS: {fps:.1}, frame_time: {frame_time:.4} ms").ok();
    writeln!(out, "Entities: {}", entities.iter().count()).ok();
    writeln!(out, "Assets: meshes={} materials={}", meshes.len(), materials.len()).ok();

    if let Some(world) = world {
        let s = world.stats;
        writeln!(
            out,
            "World: {} blocks over {} columns (surface={} fill={} water={} tree={})",
            world.total_blocks(),
            s.columns,
            s.surface_blocks,
            s.fill_blocks,
            s.water_blocks,
            s.tree_blocks
        )
        .ok();
        for kind in MaterialKind::ALL {
            writeln!(out, "  {} -> {}", kind.name(), world.count(kind)).ok();
        }
    }

    if let Ok(agent) = agents.get_single() {
        let pos = agent.position();
        let state = match agent.state {
            AgentState::Idle => "idle",
            AgentState::Walking => "walking",
        };
        writeln!(out, "Agent: ({:.2}, {:.2}, {:.2}) {state} yaw={:.2}", pos.x, pos.y, pos.z, agent.yaw).ok();
        if let Some(target) = agent.target {
            writeln!(out, "  target: ({:.2}, {:.2})", target.x, target.y).ok();
        }
    }

    // Process / system memory (sysinfo)
    let mut sys = System::new_all();
    sys.refresh_all();
    let proc = sys.process(Pid::from_u32(std::process::id()));
    writeln!(
        out,
        "Process memory: {} (virtual {})",
        kb_to_mb(proc.map_or(0, |p| p.memory())),
        kb_to_mb(proc.map_or(0, |p| p.virtual_memory()))
    )
    .ok();
    writeln!(
        out,
        "System memory: total={} used={}",
        kb_to_mb(sys.total_memory()),
        kb_to_mb(sys.used_memory())
    )
    .ok();

    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{DUMP_DIR}': {e}");
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {fname}: {e}");
    } else {
        info!("wrote debug dump: {fname}");
    }
}
