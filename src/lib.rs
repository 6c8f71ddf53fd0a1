pub mod agent;
pub mod material;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
pub mod terrain;
pub mod ui;
pub mod world;

pub mod debug;
