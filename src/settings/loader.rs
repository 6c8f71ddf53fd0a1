//! Settings loading and hot-reloading.
//!
//! Settings live as RON files in `data/settings`. When multiple files are
//! present the first that parses wins; when none parse the defaults are
//! used. A filesystem watcher flags edits so the running app can swap the
//! settings resource without restarting.

use bevy::prelude::{Res, ResMut, Resource};

use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;

/// Directory scanned for settings RON files.
pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub crate::ron::RonWatcher);

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(crate::ron::RonWatcher::stub())
    }
}

/// Load settings from a directory of RON files.
///
/// # Arguments
/// * `path` - directory to scan (normally `SETTINGS_DIR`)
///
/// # Returns
/// The first successfully parsed `Settings`, or the defaults when the
/// directory is missing or nothing parses.
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    items.into_iter().next().unwrap_or_else(Settings::defaults)
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns the `notify` error when the OS watcher cannot be created; use
/// `SettingsWatcher::stub` as the fallback.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Reload the settings resource when the watcher flags a change.
///
/// A poisoned watcher mutex is recovered by taking the inner value; the
/// flag is plain data, so the poisoning panic cannot have left it
/// inconsistent.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    let mut flag = match watcher.0.changed.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            eprintln!("warning: settings watcher mutex poisoned, recovering");
            poisoned.into_inner()
        }
    };

    if *flag {
        println!("Settings changed, reloading...");
        *settings = load_settings_from_dir(SETTINGS_DIR);
        *flag = false;
    }
}
