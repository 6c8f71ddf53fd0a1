//! Scene lighting sync.
//!
//! The sun is spawned at startup; this system keeps its shadow toggle in
//! step with the settings resource so a hot-reload takes effect without a
//! restart.

use bevy::prelude::*;

use brickfield::settings::Settings;

use crate::app::setup::Sun;

/// Apply `Settings.graphics.shadows` to the sun light when settings change.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_light_settings(
    settings: Res<Settings>,
    mut lights: Query<&mut DirectionalLight, With<Sun>>,
) {
    if !settings.is_changed() {
        return;
    }
    for mut light in &mut lights {
        light.shadows_enabled = settings.graphics.shadows;
    }
}
