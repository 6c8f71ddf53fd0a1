//! Display-related systems: syncing the configured present mode onto the
//! primary window.

use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};

use brickfield::settings::Settings;

fn present_mode_from_str(name: &str) -> PresentMode {
    match name {
        "AutoVsync" => PresentMode::AutoVsync,
        "Fifo" => PresentMode::Fifo,
        "Mailbox" => PresentMode::Mailbox,
        "Immediate" => PresentMode::Immediate,
        _ => PresentMode::AutoNoVsync,
    }
}

/// Apply `Settings.graphics.present_mode` to the primary window.
///
/// # Arguments
/// - `settings`: current settings resource
/// - `windows`: the primary window to update
/// - `last`: local cache of the last applied mode to avoid redundant writes
#[allow(clippy::needless_pass_by_value)]
pub fn sync_window_settings(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut last: Local<Option<PresentMode>>,
) {
    let desired = present_mode_from_str(&settings.graphics.present_mode);
    if *last == Some(desired) {
        return;
    }

    for mut window in &mut windows {
        window.present_mode = desired;
    }
    *last = Some(desired);
}
