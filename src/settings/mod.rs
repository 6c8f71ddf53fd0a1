//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are
//! hot-reloadable through the RON watcher utilities (see
//! `ron::setup_ron_watcher`). Every field carries a serde default so a
//! partial settings file parses; a missing or broken file falls back to
//! the defaults entirely.

use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::terrain::NoiseOctave;

/// World build parameters: map extent and tree decoration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSettings {
    #[serde(default = "WorldSettings::default_map_size")]
    pub map_size: i32, // Side length of the square map in columns. Cost grows quadratically.
    #[serde(default = "WorldSettings::default_tree_probability")]
    pub tree_probability: f64, // Chance for an eligible grass column to carry a tree.
    #[serde(default)]
    pub tree_seed: u64, // Mixed into the per-column tree draws; change for a different forest.
    #[serde(default = "WorldSettings::default_spawn_clear_radius")]
    pub spawn_clear_radius: i32, // Half-size of the tree-free square around the spawn point.
}

impl WorldSettings {
    fn default_map_size() -> i32 { 96 }
    fn default_tree_probability() -> f64 { 0.02 }
    fn default_spawn_clear_radius() -> i32 { 3 }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            map_size: Self::default_map_size(),
            tree_probability: Self::default_tree_probability(),
            tree_seed: 0,
            spawn_clear_radius: Self::default_spawn_clear_radius(),
        }
    }
}

/// Height function shape and classification thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainSettings {
    #[serde(default = "TerrainSettings::default_octaves")]
    pub octaves: Vec<NoiseOctave>, // Sinusoidal octaves summed into the height function.
    #[serde(default = "TerrainSettings::default_water_level")]
    pub water_level: i32, // Sea level; columns below it are flooded.
    #[serde(default = "TerrainSettings::default_bedrock_level")]
    pub bedrock_level: i32, // Bottom of the solid fill, so the map has no holes seen from the side.
    #[serde(default = "TerrainSettings::default_snow_threshold")]
    pub snow_threshold: i32, // Heights above this are snow caps.
    #[serde(default = "TerrainSettings::default_stone_threshold")]
    pub stone_threshold: i32, // Heights above this (up to snow) are bare stone.
}

impl TerrainSettings {
    fn default_octaves() -> Vec<NoiseOctave> {
        vec![
            // Broad ridges, rolling hills, fine surface detail.
            NoiseOctave { amplitude: 6.0, frequency: 0.05, phase: 0.0 },
            NoiseOctave { amplitude: 3.0, frequency: 0.12, phase: 10.0 },
            NoiseOctave { amplitude: 0.5, frequency: 0.3, phase: 0.0 },
        ]
    }
    fn default_water_level() -> i32 { -2 }
    fn default_bedrock_level() -> i32 { -5 }
    fn default_snow_threshold() -> i32 { 8 }
    fn default_stone_threshold() -> i32 { 5 }
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            octaves: Self::default_octaves(),
            water_level: Self::default_water_level(),
            bedrock_level: Self::default_bedrock_level(),
            snow_threshold: Self::default_snow_threshold(),
            stone_threshold: Self::default_stone_threshold(),
        }
    }
}

/// Movement tuning for the walking character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "AgentSettings::default_speed")]
    pub speed: f32, // Planar walk speed in blocks per second.
    #[serde(default = "AgentSettings::default_arrive_epsilon")]
    pub arrive_epsilon: f32, // Distance below which a movement target counts as reached.
    #[serde(default = "AgentSettings::default_turn_rate")]
    pub turn_rate: f32, // Exponential facing blend rate, per second.
    #[serde(default = "AgentSettings::default_fall_rate")]
    pub fall_rate: f32, // Exponential height blend rate, per second (soft gravity).
}

impl AgentSettings {
    fn default_speed() -> f32 { 8.0 }
    fn default_arrive_epsilon() -> f32 { 0.1 }
    fn default_turn_rate() -> f32 { 15.0 }
    fn default_fall_rate() -> f32 { 15.0 }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            speed: Self::default_speed(),
            arrive_epsilon: Self::default_arrive_epsilon(),
            turn_rate: Self::default_turn_rate(),
            fall_rate: Self::default_fall_rate(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub keybinds: HashMap<String, String>, // Map of action names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("forward".to_string(), "W".to_string());
        m.insert("back".to_string(), "S".to_string());
        m.insert("left".to_string(), "A".to_string());
        m.insert("right".to_string(), "D".to_string());
        m.insert("toggle_overlay".to_string(), "F1".to_string());
        m.insert("dump_debug".to_string(), "F3".to_string());
        m
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Window and render quality settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "GraphicsSettings::default_present_mode")]
    pub present_mode: String, // Window present mode (e.g., AutoNoVsync). Controls buffering/latency.
    #[serde(default = "GraphicsSettings::default_shadows")]
    pub shadows: bool, // Enable/disable directional light shadows (expensive with many blocks)
}

impl GraphicsSettings {
    fn default_present_mode() -> String { "AutoNoVsync".to_string() }
    fn default_shadows() -> bool { true }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            present_mode: Self::default_present_mode(),
            shadows: Self::default_shadows(),
        }
    }
}

/// Atmosphere settings to configure the bevy_atmosphere crate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtmosphereSettings {
    #[serde(default = "AtmosphereSettings::default_enabled")]
    pub enabled: bool, // Enable the atmosphere (sky) renderer (requires a restart of runtime)
    #[serde(default = "AtmosphereSettings::default_resolution")]
    pub resolution: u32, // Resolution of each skybox face (auto update at runtime)
    #[serde(default = "AtmosphereSettings::default_dithering")]
    pub dithering: bool, // Enable dithering to reduce color banding in the sky (auto update at runtime)
}

impl AtmosphereSettings {
    fn default_enabled() -> bool { true }
    fn default_resolution() -> u32 { 512 }
    fn default_dithering() -> bool { true }
}

impl Default for AtmosphereSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            resolution: Self::default_resolution(),
            dithering: Self::default_dithering(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub world: WorldSettings,
    #[serde(default)]
    pub terrain: TerrainSettings,
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub atmosphere: AtmosphereSettings,
}

const LETTER_KEYS: [KeyCode; 26] = [
    KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
    KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
    KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
    KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
    KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGIT_KEYS: [KeyCode; 10] = [
    KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
    KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
    KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
];

impl Settings {
    #[must_use]
    pub fn defaults() -> Self {
        Settings::default()
    }

    /// Convert a string key identifier (e.g., from `controls.keybinds`)
    /// into a `KeyCode` usable with the input system.
    ///
    /// # Arguments
    /// * `name` - key identifier such as "W", "Space" or "F1"
    ///
    /// # Returns
    /// The matching `KeyCode`, or `None` for unknown identifiers.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        let s = name.to_ascii_uppercase();

        if s.len() == 1 {
            let c = s.as_bytes()[0];
            if c.is_ascii_uppercase() {
                return Some(LETTER_KEYS[usize::from(c - b'A')]);
            }
            if c.is_ascii_digit() {
                return Some(DIGIT_KEYS[usize::from(c - b'0')]);
            }
        }

        if let Some(rest) = s.strip_prefix('F')
            && let Ok(n) = rest.parse::<usize>()
            && (1..=12).contains(&n)
        {
            return Some(FUNCTION_KEYS[n - 1]);
        }

        Some(match s.as_str() {
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" | "BACK" => KeyCode::Backspace,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            _ => return None,
        })
    }
}

pub mod loader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keycodes_resolve_case_insensitively() {
        assert_eq!(Settings::keycode_from_str("w"), Some(KeyCode::KeyW));
        assert_eq!(Settings::keycode_from_str("W"), Some(KeyCode::KeyW));
        assert_eq!(Settings::keycode_from_str("7"), Some(KeyCode::Digit7));
        assert_eq!(Settings::keycode_from_str("f3"), Some(KeyCode::F3));
        assert_eq!(Settings::keycode_from_str("Space"), Some(KeyCode::Space));
        assert_eq!(Settings::keycode_from_str("no such key"), None);
        assert_eq!(Settings::keycode_from_str("F13"), None);
    }

    #[test]
    fn partial_ron_files_fall_back_to_field_defaults() {
        let parsed: Settings = ron::from_str("(world: (map_size: 32))").expect("parses");
        assert_eq!(parsed.world.map_size, 32);
        assert_eq!(parsed.world.spawn_clear_radius, 3);
        assert_eq!(parsed.terrain.water_level, -2);
        assert_eq!(parsed.agent.speed, 8.0);
        assert_eq!(parsed.controls.keybinds.get("forward").map(String::as_str), Some("W"));
    }

    #[test]
    fn default_octaves_keep_the_slope_below_one_block_per_column() {
        let total: f64 = TerrainSettings::default_octaves()
            .iter()
            .map(|o| (o.amplitude * o.frequency).abs())
            .sum();
        assert!(total < 1.0, "octaves too steep for walkable terrain: {total}");
    }
}
