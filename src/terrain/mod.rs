//! Height-field sampling and surface classification.
//!
//! The terrain is a pure function of column coordinates: every integer
//! `(x, z)` maps to a height (the floor of a sum of sinusoidal octaves) and
//! a surface material picked by threshold rules. Nothing is stored; the
//! world builder and the agent both re-derive heights from the same
//! `HeightField` resource, which keeps the two in agreement.
//!
//! # Example
//! ```
//! use brickfield::settings::TerrainSettings;
//! use brickfield::terrain::HeightField;
//!
//! let field = HeightField::new(&TerrainSettings::default());
//! let sample = field.sample(0, 0);
//! assert_eq!(sample, field.sample(0, 0)); // deterministic
//! ```

use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::settings::TerrainSettings;

/// Vertical offset between a block's integer centre and the surface an
/// agent stands on.
pub const SURFACE_OFFSET: f32 = 0.5;

/// Closed set of block materials. Each built batch holds placements of
/// exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    Grass,
    Dirt,
    Stone,
    Sand,
    Snow,
    Water,
    Wood,
    Leaves,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 8] = [
        MaterialKind::Grass,
        MaterialKind::Dirt,
        MaterialKind::Stone,
        MaterialKind::Sand,
        MaterialKind::Snow,
        MaterialKind::Water,
        MaterialKind::Wood,
        MaterialKind::Leaves,
    ];

    /// Lower-case display name used by the overlay and debug dump.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MaterialKind::Grass => "grass",
            MaterialKind::Dirt => "dirt",
            MaterialKind::Stone => "stone",
            MaterialKind::Sand => "sand",
            MaterialKind::Snow => "snow",
            MaterialKind::Water => "water",
            MaterialKind::Wood => "wood",
            MaterialKind::Leaves => "leaves",
        }
    }
}

/// One sinusoidal term of the height function:
/// `amplitude * sin(x * frequency + phase) * cos(z * frequency + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseOctave {
    pub amplitude: f64,
    pub frequency: f64,
    #[serde(default)]
    pub phase: f64,
}

/// Result of evaluating the height field at one column.
///
/// `height` is the raw terrain height (the sea floor for underwater
/// columns). `surface` is the material of the topmost solid block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightSample {
    pub height: i32,
    pub underwater: bool,
    pub surface: MaterialKind,
}

/// Pure, total height function plus the classification thresholds.
///
/// Safe to call from anywhere, any number of times; rebuilt from
/// `TerrainSettings` whenever the settings resource reloads.
#[derive(Resource, Clone)]
pub struct HeightField {
    pub octaves: Vec<NoiseOctave>,
    pub water_level: i32,
    pub bedrock_level: i32,
    pub snow_threshold: i32,
    pub stone_threshold: i32,
}

impl HeightField {
    #[must_use]
    pub fn new(settings: &TerrainSettings) -> Self {
        HeightField {
            octaves: settings.octaves.clone(),
            water_level: settings.water_level,
            bedrock_level: settings.bedrock_level,
            snow_threshold: settings.snow_threshold,
            stone_threshold: settings.stone_threshold,
        }
    }

    /// Raw terrain height at a column: `floor(sum of octaves)`.
    ///
    /// Total for all `i32` inputs. Octave sums that leave the `i32` range
    /// (only possible with absurd configured amplitudes) are clamped rather
    /// than wrapped.
    #[must_use]
    pub fn height(&self, x: i32, z: i32) -> i32 {
        let fx = f64::from(x);
        let fz = f64::from(z);

        let mut sum = 0.0f64;
        for octave in &self.octaves {
            sum += octave.amplitude
                * (fx * octave.frequency + octave.phase).sin()
                * (fz * octave.frequency + octave.phase).cos();
        }

        let floored = sum.floor();
        if !floored.is_finite() {
            return self.bedrock_level;
        }

        #[allow(clippy::cast_possible_truncation)]
        let clamped = floored.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i64;
        i32::try_from(clamped).unwrap_or(i32::MAX)
    }

    /// Height an agent can stand at: the raw height clamped up to the
    /// water level, so nothing walks along the sea floor.
    #[must_use]
    pub fn walk_height(&self, x: i32, z: i32) -> i32 {
        self.height(x, z).max(self.water_level)
    }

    /// Evaluate height and surface material for a column.
    ///
    /// Classification is top-down, first match wins: sea floor, beach,
    /// snow cap, stone face, grass.
    #[must_use]
    pub fn sample(&self, x: i32, z: i32) -> HeightSample {
        let height = self.height(x, z);

        let (surface, underwater) = if height < self.water_level {
            (MaterialKind::Sand, true)
        } else if height == self.water_level {
            (MaterialKind::Sand, false)
        } else if height > self.snow_threshold {
            (MaterialKind::Snow, false)
        } else if height > self.stone_threshold {
            (MaterialKind::Stone, false)
        } else {
            (MaterialKind::Grass, false)
        };

        HeightSample {
            height,
            underwater,
            surface,
        }
    }

    /// Material for a fill block at depth `surface - y` below the surface.
    #[must_use]
    pub fn fill_material(&self, y: i32, surface: i32) -> MaterialKind {
        if surface - y > 3 {
            MaterialKind::Stone
        } else {
            MaterialKind::Dirt
        }
    }
}

/// Convert a continuous planar position to the column underneath it.
///
/// Returns `None` for non-finite or out-of-range input so per-frame
/// callers can skip the tick instead of feeding NaN into a transform.
#[must_use]
pub fn world_to_column(planar: Vec2) -> Option<(i32, i32)> {
    let x = planar.x.round();
    let z = planar.y.round();
    if !x.is_finite() || !z.is_finite() {
        return None;
    }
    if x < i32::MIN as f32 || x > i32::MAX as f32 || z < i32::MIN as f32 || z > i32::MAX as f32 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let column = (x as i32, z as i32);
    Some(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TerrainSettings;
    use std::f64::consts::FRAC_PI_2;
    use test_case::test_case;

    fn default_field() -> HeightField {
        HeightField::new(&TerrainSettings::default())
    }

    /// Field whose height at (1, 0) is exactly `floor(amplitude)`.
    fn peak_field(amplitude: f64) -> HeightField {
        HeightField {
            octaves: vec![NoiseOctave {
                amplitude,
                frequency: FRAC_PI_2,
                phase: 0.0,
            }],
            water_level: -2,
            bedrock_level: -5,
            snow_threshold: 8,
            stone_threshold: 5,
        }
    }

    #[test]
    fn sampling_is_deterministic() {
        let field = default_field();
        for (x, z) in [(0, 0), (17, -23), (-500, 941), (i32::MAX, i32::MIN)] {
            assert_eq!(field.sample(x, z), field.sample(x, z));
            assert_eq!(field.height(x, z), field.height(x, z));
        }
    }

    #[test]
    fn origin_sample_matches_default_coefficients() {
        // With the default octaves only the phase-shifted middle octave
        // contributes at the origin: floor(3 sin(10) cos(10)) = 1.
        let sample = default_field().sample(0, 0);
        assert_eq!(sample.height, 1);
        assert_eq!(sample.surface, MaterialKind::Grass);
        assert!(!sample.underwater);
    }

    #[test]
    fn adjacent_columns_are_continuous() {
        // Default octaves have total slope below one block per column, so
        // neighbouring heights never differ by more than one.
        let field = default_field();
        for z in -48..48 {
            for x in -48..48 {
                let delta = (field.height(x, z) - field.height(x + 1, z)).abs();
                assert!(delta <= 1, "spike of {delta} at ({x}, {z})");
            }
        }
    }

    #[test_case(-5.0, MaterialKind::Sand, true ; "sea floor")]
    #[test_case(-2.0, MaterialKind::Sand, false ; "beach")]
    #[test_case(0.0, MaterialKind::Grass, false ; "lowland")]
    #[test_case(5.0, MaterialKind::Grass, false ; "at stone threshold")]
    #[test_case(6.0, MaterialKind::Stone, false ; "mountain face")]
    #[test_case(8.0, MaterialKind::Stone, false ; "at snow threshold")]
    #[test_case(9.0, MaterialKind::Snow, false ; "snow cap")]
    fn classification_thresholds(amplitude: f64, expected: MaterialKind, underwater: bool) {
        let sample = peak_field(amplitude).sample(1, 0);
        assert_eq!(sample.height, amplitude as i32);
        assert_eq!(sample.surface, expected);
        assert_eq!(sample.underwater, underwater);
    }

    #[test]
    fn walk_height_clamps_to_water_level() {
        let field = peak_field(-5.0);
        assert_eq!(field.height(1, 0), -5);
        assert_eq!(field.walk_height(1, 0), -2);
        // Dry land is untouched by the clamp.
        assert_eq!(peak_field(3.0).walk_height(1, 0), 3);
    }

    #[test]
    fn fill_rule_switches_from_dirt_to_stone() {
        let field = default_field();
        assert_eq!(field.fill_material(4, 5), MaterialKind::Dirt);
        assert_eq!(field.fill_material(2, 5), MaterialKind::Dirt);
        assert_eq!(field.fill_material(1, 5), MaterialKind::Stone);
        assert_eq!(field.fill_material(-5, 5), MaterialKind::Stone);
    }

    #[test]
    fn empty_octave_list_is_flat() {
        let mut field = peak_field(0.0);
        field.octaves.clear();
        for (x, z) in [(0, 0), (40, -7), (-1000, 1000)] {
            assert_eq!(field.height(x, z), 0);
        }
    }

    #[test]
    fn world_to_column_rounds_and_rejects_garbage() {
        assert_eq!(world_to_column(Vec2::new(1.4, -2.6)), Some((1, -3)));
        assert_eq!(world_to_column(Vec2::new(-0.5, 0.5)), Some((-1, 1)));
        assert_eq!(world_to_column(Vec2::new(f32::NAN, 0.0)), None);
        assert_eq!(world_to_column(Vec2::new(0.0, f32::INFINITY)), None);
        assert_eq!(world_to_column(Vec2::new(1.0e20, 0.0)), None);
    }
}
