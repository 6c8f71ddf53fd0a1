//! World construction: block batches grouped by material.
//!
//! `build_world` sweeps every column of the square map once, asks the
//! height field for the surface, fills the column solid down to bedrock and
//! decorates grass with trees. The output is one `BlockBatch` per
//! `MaterialKind`; the renderer draws each batch with a single shared mesh
//! and material, so blocks of one kind never cause state switches.
//!
//! The build is one-shot and synchronous. There is no incremental update:
//! when the world parameters change the whole batch set is discarded and
//! rebuilt.

use std::collections::HashMap;

use bevy::math::IVec3;
use bevy::prelude::Resource;

use crate::settings::WorldSettings;
use crate::terrain::{HeightField, MaterialKind};

pub mod trees;
pub use trees::ColumnRng;

/// Placements of one material, drawn together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBatch {
    pub material: MaterialKind,
    pub positions: Vec<IVec3>,
}

impl BlockBatch {
    #[must_use]
    pub fn new(material: MaterialKind) -> Self {
        BlockBatch {
            material,
            positions: Vec::new(),
        }
    }
}

/// Counters captured during a build, for the overlay, the debug dump and
/// the tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldStats {
    pub columns: usize,
    pub surface_blocks: usize,
    pub fill_blocks: usize,
    pub water_blocks: usize,
    pub tree_blocks: usize,
}

/// The built world: per-material batches plus build counters.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct WorldBlocks {
    pub batches: HashMap<MaterialKind, BlockBatch>,
    pub stats: WorldStats,
}

impl WorldBlocks {
    pub fn push(&mut self, material: MaterialKind, position: IVec3) {
        self.batches
            .entry(material)
            .or_insert_with(|| BlockBatch::new(material))
            .positions
            .push(position);
    }

    #[must_use]
    pub fn batch(&self, material: MaterialKind) -> Option<&BlockBatch> {
        self.batches.get(&material)
    }

    /// Placement count for one material (zero when the batch is absent).
    #[must_use]
    pub fn count(&self, material: MaterialKind) -> usize {
        self.batches.get(&material).map_or(0, |b| b.positions.len())
    }

    #[must_use]
    pub fn total_blocks(&self) -> usize {
        self.batches.values().map(|b| b.positions.len()).sum()
    }

    #[must_use]
    pub fn contains(&self, material: MaterialKind, position: IVec3) -> bool {
        self.batches
            .get(&material)
            .is_some_and(|b| b.positions.contains(&position))
    }
}

/// Whether a grass column may carry a tree: everything outside the clear
/// square around the spawn point is eligible.
fn outside_clear_zone(x: i32, z: i32, radius: i32) -> bool {
    x.abs() > radius || z.abs() > radius
}

/// Build the full batch set for a square map.
///
/// Iterates `[-map_size/2, map_size/2)` on both axes (odd sizes land
/// asymmetric about the origin). Per column: the surface block, a water
/// block at sea level for underwater columns, solid fill from bedrock to
/// the surface, and a deterministic tree roll on eligible grass.
///
/// A `map_size` of zero or below yields an empty batch set.
#[must_use]
pub fn build_world(settings: &WorldSettings, field: &HeightField) -> WorldBlocks {
    let mut blocks = WorldBlocks::default();
    if settings.map_size <= 0 {
        return blocks;
    }

    let half = settings.map_size / 2;
    for x in -half..(settings.map_size - half) {
        for z in -half..(settings.map_size - half) {
            let sample = field.sample(x, z);
            blocks.stats.columns += 1;

            if sample.underwater {
                blocks.push(MaterialKind::Water, IVec3::new(x, field.water_level, z));
                blocks.stats.water_blocks += 1;
            }

            blocks.push(sample.surface, IVec3::new(x, sample.height, z));
            blocks.stats.surface_blocks += 1;

            for y in field.bedrock_level..sample.height {
                blocks.push(field.fill_material(y, sample.height), IVec3::new(x, y, z));
                blocks.stats.fill_blocks += 1;
            }

            if sample.surface == MaterialKind::Grass
                && !sample.underwater
                && outside_clear_zone(x, z, settings.spawn_clear_radius)
            {
                let mut rng = ColumnRng::new(x, z, settings.tree_seed);
                if f64::from(rng.next_unit()) < settings.tree_probability {
                    blocks.stats.tree_blocks += trees::place_tree(&mut blocks, x, z, sample.height, &mut rng);
                }
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{TerrainSettings, WorldSettings};

    fn default_field() -> HeightField {
        HeightField::new(&TerrainSettings::default())
    }

    fn world_settings(map_size: i32) -> WorldSettings {
        WorldSettings {
            map_size,
            ..WorldSettings::default()
        }
    }

    /// Flat grass plain at height zero: every column is tree-eligible.
    fn flat_field() -> HeightField {
        let mut field = default_field();
        field.octaves.clear();
        field
    }

    #[test]
    fn degenerate_map_sizes_yield_empty_batches() {
        let field = default_field();
        for size in [0, -4] {
            let blocks = build_world(&world_settings(size), &field);
            assert_eq!(blocks.total_blocks(), 0);
            assert_eq!(blocks.stats, WorldStats::default());
        }
    }

    #[test]
    fn every_column_gets_exactly_one_surface_block() {
        let field = default_field();
        let blocks = build_world(&world_settings(8), &field);

        assert_eq!(blocks.stats.columns, 64);
        assert_eq!(blocks.stats.surface_blocks, 64);

        // The surface block of each column sits where the field says, in
        // the batch of the classified material, exactly once.
        for x in -4..4 {
            for z in -4..4 {
                let sample = field.sample(x, z);
                let pos = IVec3::new(x, sample.height, z);
                let batch = blocks.batch(sample.surface).expect("batch exists");
                let hits = batch.positions.iter().filter(|p| **p == pos).count();
                assert_eq!(hits, 1, "surface of ({x}, {z})");
            }
        }
    }

    #[test]
    fn odd_map_sizes_are_asymmetric_about_the_origin() {
        let blocks = build_world(&world_settings(5), &default_field());
        assert_eq!(blocks.stats.columns, 25);

        let xs: Vec<i32> = blocks
            .batches
            .values()
            .flat_map(|b| b.positions.iter().map(|p| p.x))
            .collect();
        assert_eq!(xs.iter().min(), Some(&-2));
        assert_eq!(xs.iter().max(), Some(&2));
    }

    #[test]
    fn fill_covers_bedrock_to_surface_without_gaps() {
        let field = default_field();
        let blocks = build_world(&world_settings(16), &field);

        for x in -8..8 {
            for z in -8..8 {
                let sample = field.sample(x, z);
                for y in field.bedrock_level..sample.height {
                    let pos = IVec3::new(x, y, z);
                    let expected = field.fill_material(y, sample.height);
                    assert!(
                        blocks.contains(expected, pos),
                        "missing {expected:?} fill at {pos}"
                    );
                }
                // Nothing solid above the surface except tree decoration.
                let above = IVec3::new(x, sample.height + 1, z);
                for material in [MaterialKind::Dirt, MaterialKind::Stone, MaterialKind::Sand] {
                    assert!(!blocks.contains(material, above));
                }
            }
        }
    }

    #[test]
    fn underwater_columns_get_water_at_sea_level_and_a_sand_floor() {
        let field = default_field();
        let blocks = build_world(&world_settings(96), &field);

        let water = blocks.batch(MaterialKind::Water).expect("default map has sea");
        assert!(!water.positions.is_empty());
        for pos in &water.positions {
            assert_eq!(pos.y, field.water_level);
            let sample = field.sample(pos.x, pos.z);
            assert!(sample.underwater);
            assert!(blocks.contains(MaterialKind::Sand, IVec3::new(pos.x, sample.height, pos.z)));
        }
        assert_eq!(water.positions.len(), blocks.stats.water_blocks);
    }

    #[test]
    fn rebuild_with_identical_settings_is_identical() {
        let field = default_field();
        let settings = world_settings(64);
        let first = build_world(&settings, &field);
        let second = build_world(&settings, &field);
        assert_eq!(first, second);
    }

    #[test]
    fn tree_seed_changes_the_layout() {
        let field = default_field();
        let mut settings = world_settings(96);
        let first = build_world(&settings, &field);
        settings.tree_seed += 1;
        let second = build_world(&settings, &field);
        assert_ne!(
            first.count(MaterialKind::Wood) + first.count(MaterialKind::Leaves),
            0
        );
        assert_ne!(first, second);
    }

    #[test]
    fn spawn_clear_zone_carries_no_trees() {
        let mut settings = world_settings(40);
        settings.tree_probability = 1.0;
        let blocks = build_world(&settings, &flat_field());

        let wood = blocks.batch(MaterialKind::Wood).expect("forced trees");
        assert!(!wood.positions.is_empty());
        for pos in &wood.positions {
            assert!(
                pos.x.abs() > settings.spawn_clear_radius || pos.z.abs() > settings.spawn_clear_radius,
                "trunk inside the clear zone at {pos}"
            );
        }
    }

    #[test]
    fn trees_are_a_trunk_with_a_canopy() {
        let mut settings = world_settings(40);
        settings.tree_probability = 1.0;
        let blocks = build_world(&settings, &flat_field());

        // Flat field: surface height is zero, trunks start at one.
        let wood = blocks.batch(MaterialKind::Wood).expect("forced trees");
        let column = (wood.positions[0].x, wood.positions[0].z);
        let mut trunk: Vec<i32> = wood
            .positions
            .iter()
            .filter(|p| (p.x, p.z) == column)
            .map(|p| p.y)
            .collect();
        trunk.sort_unstable();

        assert!((3..=5).contains(&(trunk.len() as i32)));
        assert_eq!(trunk[0], 1);
        for pair in trunk.windows(2) {
            assert_eq!(pair[1], pair[0] + 1, "trunk has a gap");
        }

        let crown = *trunk.last().unwrap();
        let (x, z) = column;
        for pos in [
            IVec3::new(x, crown + 1, z),
            IVec3::new(x + 1, crown, z),
            IVec3::new(x - 1, crown, z),
            IVec3::new(x, crown, z + 1),
            IVec3::new(x, crown, z - 1),
        ] {
            assert!(blocks.contains(MaterialKind::Leaves, pos), "missing leaf at {pos}");
        }
    }
}
