//! Atmosphere-related systems.
//!
//! Syncs the atmosphere section of the settings into the running
//! `bevy_atmosphere` configuration. Enabling/disabling the sky itself
//! requires a restart (the plugin is added conditionally in `main`).

use bevy::prelude::*;
use bevy_atmosphere::prelude::AtmosphereSettings as BevyAtmosphereSettings;

use brickfield::settings::Settings;

/// Sync `Settings.atmosphere` fields into the running sky renderer.
///
/// # Arguments
/// - `settings`: current settings resource
/// - `last`: local cache of the last applied values to avoid redundant writes
/// - `atm_settings`: the atmosphere resource being updated
#[allow(clippy::needless_pass_by_value)]
pub fn sync_atmosphere_settings(
    settings: Res<Settings>,
    mut last: Local<Option<(u32, bool)>>,
    mut atm_settings: ResMut<BevyAtmosphereSettings>,
) {
    let resolution = settings.atmosphere.resolution;
    let dithering = settings.atmosphere.dithering;
    if *last == Some((resolution, dithering)) {
        return;
    }

    atm_settings.resolution = resolution;
    atm_settings.dithering = dithering;
    *last = Some((resolution, dithering));
}
