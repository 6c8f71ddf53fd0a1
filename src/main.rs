use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use bevy_atmosphere::prelude::*;

use brickfield::agent::{
    agent_follow_terrain, agent_keyboard, agent_steering, camera_follow, sync_agent_transform,
    TargetReached,
};
use brickfield::debug::DebugDumpPlugin;
use brickfield::settings::loader as settings_loader;
use brickfield::terrain::HeightField;
use brickfield::ui::{
    clear_reached_marker, draw_target_marker, setup_overlay, spawn_overlay, toggle_overlay,
    update_overlay,
};

mod app;
use app::{
    click_to_move, rebuild_on_settings_change, setup_block_assets, setup_scene, spawn_world,
    sync_atmosphere_settings, sync_light_settings, sync_window_settings,
};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Brickfield".to_string(),
                position: WindowPosition::Centered(MonitorSelection::Primary),
                present_mode: PresentMode::AutoNoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_plugins(DebugDumpPlugin);

    if settings.atmosphere.enabled {
        app.add_plugins(AtmospherePlugin)
            .insert_resource(AtmosphereModel::default())
            .insert_resource(AtmosphereSettings {
                resolution: settings.atmosphere.resolution,
                dithering: settings.atmosphere.dithering,
                ..Default::default()
            });
    }

    app.insert_resource(HeightField::new(&settings.terrain));
    app.insert_resource(settings.clone());
    app.insert_resource(settings_watcher);
    app.add_event::<TargetReached>();

    app.add_systems(Startup, setup_overlay);
    app.add_systems(Startup, spawn_overlay);
    app.add_systems(Startup, setup_block_assets);
    app.add_systems(Startup, setup_scene.after(setup_block_assets));
    app.add_systems(Startup, spawn_world.after(setup_block_assets));

    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, rebuild_on_settings_change);
    app.add_systems(Update, sync_light_settings);
    app.add_systems(Update, sync_window_settings);
    if settings.atmosphere.enabled {
        app.add_systems(Update, sync_atmosphere_settings);
    }

    // The movement chain runs in frame order: key steering, target
    // steering, terrain follow, transform sync, then the camera.
    app.add_systems(Update, click_to_move);
    app.add_systems(
        Update,
        (
            agent_keyboard,
            agent_steering,
            agent_follow_terrain,
            sync_agent_transform,
            camera_follow,
        )
            .chain(),
    );

    app.add_systems(Update, toggle_overlay);
    app.add_systems(Update, update_overlay);
    app.add_systems(Update, clear_reached_marker);
    app.add_systems(Update, draw_target_marker);

    app.run();
}
