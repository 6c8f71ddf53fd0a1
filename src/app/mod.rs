pub mod atmosphere;
pub mod display;
pub mod input;
pub mod lighting;
pub mod rebuild;
pub mod setup;

pub use atmosphere::sync_atmosphere_settings;
pub use display::sync_window_settings;
pub use input::click_to_move;
pub use lighting::sync_light_settings;
pub use rebuild::rebuild_on_settings_change;
pub use setup::{setup_block_assets, setup_scene, spawn_world};
