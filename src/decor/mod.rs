use crate::grid::{ArenaGrid, Coordinate, TileType};
use crate::layout::ArenaLayout;
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

/// One placeable decoration family, selected by a band of the selection
/// noise field.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DecorationKind {
    pub name: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub weight: f32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_noise: f32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_noise: f32,
    pub scale_range: (f32, f32),
    #[validate(range(min = 0.0, max = 0.5))]
    pub position_variance: f32,
    pub randomize_rotation: bool,
    pub avoid_lanes: bool,
    #[validate(range(min = 0.0, max = 10.0))]
    pub lane_avoidance_radius: f32,
}

impl Default for DecorationKind {
    fn default() -> Self {
        Self {
            name: "decoration".to_string(),
            weight: 1.0,
            min_noise: 0.0,
            max_noise: 1.0,
            scale_range: (0.8, 1.2),
            position_variance: 0.3,
            randomize_rotation: true,
            avoid_lanes: true,
            lane_avoidance_radius: 1.0,
        }
    }
}

impl DecorationKind {
    fn named(name: &str, min_noise: f32, max_noise: f32) -> Self {
        Self {
            name: name.to_string(),
            min_noise,
            max_noise,
            ..Default::default()
        }
    }
}

/// Parameters for one decoration pass over a finished layout.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DecorationConfig {
    /// Probability of considering each ground tile at all.
    #[validate(range(min = 0.0, max = 1.0))]
    pub density: f32,
    #[validate(range(min = 0.1, max = 20.0))]
    pub noise_scale: f32,
    #[validate(range(min = 0.1, max = 20.0))]
    pub scale_noise_scale: f32,
    /// 0 = purely noise-driven scale, 1 = purely random scale.
    #[validate(range(min = 0.0, max = 1.0))]
    pub scale_randomness: f32,
    #[validate(nested)]
    pub kinds: Vec<DecorationKind>,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            density: 0.1,
            noise_scale: 5.0,
            scale_noise_scale: 3.0,
            scale_randomness: 0.2,
            kinds: vec![
                DecorationKind::named("tree", 0.0, 0.6),
                DecorationKind::named("rock", 0.4, 1.0),
            ],
        }
    }
}

/// One decoration to place: a kind name plus world-space transform data.
/// What mesh or prefab that maps to is a rendering decision downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationPlacement {
    pub kind: String,
    pub x: f32,
    pub z: f32,
    pub rotation: f32,
    pub scale: f32,
}

/// Scatters decorations over the ground tiles of a finished layout using
/// two Perlin fields: one to pick the kind, one to drive its scale.
pub struct DecorationPlacer {
    config: DecorationConfig,
    rng: Pcg64,
    selection_noise: Perlin,
    scale_noise: Perlin,
    noise_offset: (f64, f64),
    scale_noise_offset: (f64, f64),
}

impl DecorationPlacer {
    pub fn new(config: DecorationConfig, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let noise_offset = (
            rng.gen_range(-1000.0..1000.0),
            rng.gen_range(-1000.0..1000.0),
        );
        let scale_noise_offset = (
            rng.gen_range(-1000.0..1000.0),
            rng.gen_range(-1000.0..1000.0),
        );
        Self {
            config,
            rng,
            selection_noise: Perlin::new(seed as u32),
            scale_noise: Perlin::new((seed as u32).wrapping_add(1337)),
            noise_offset,
            scale_noise_offset,
        }
    }

    /// Produce placements for every ground tile that passes the density
    /// gate. Zero matches is a recoverable, logged condition.
    pub fn place(&mut self, layout: &ArenaLayout) -> Vec<DecorationPlacement> {
        if self.config.kinds.is_empty() {
            warn!("no decoration kinds configured, skipping decoration pass");
            return Vec::new();
        }

        let grid = &layout.grid;
        let n = grid.size() as i32;
        let mut placements = Vec::new();
        let mut ground_tiles = 0u32;

        for z in 0..n {
            for x in 0..n {
                let coord = Coordinate::new(x, z);
                if grid.tile(coord) != TileType::Ground {
                    continue;
                }
                ground_tiles += 1;
                if self.rng.gen_range(0.0f32..1.0) >= self.config.density {
                    continue;
                }
                if let Some(placement) = self.try_place(grid, coord) {
                    placements.push(placement);
                }
            }
        }

        if ground_tiles == 0 {
            warn!("layout has no ground tiles to decorate");
        }
        info!(
            "placed {} decorations across {ground_tiles} ground tiles",
            placements.len()
        );
        placements
    }

    fn try_place(&mut self, grid: &ArenaGrid, coord: Coordinate) -> Option<DecorationPlacement> {
        let selection = self.sample_selection_noise(coord);
        let kind_index = self.select_kind(selection)?;
        let kind = self.config.kinds[kind_index].clone();

        // Scale follows the noise field, blended with plain randomness
        let scale_noise = self.sample_scale_noise(coord);
        let (scale_min, scale_max) = kind.scale_range;
        let noise_based = scale_min + (scale_max - scale_min) * scale_noise;
        let random_based = self.rng.gen_range(scale_min..=scale_max);
        let scale =
            noise_based + (random_based - noise_based) * self.config.scale_randomness;

        let (world_x, world_z) = grid.grid_to_world(coord);
        let jitter = kind.position_variance * grid.tile_size();
        let x = world_x + self.rng.gen_range(-jitter..=jitter);
        let z = world_z + self.rng.gen_range(-jitter..=jitter);

        if kind.avoid_lanes && self.too_close_to_lane(grid, x, z, kind.lane_avoidance_radius * scale)
        {
            return None;
        }

        let rotation = if kind.randomize_rotation {
            self.rng.gen_range(0.0..std::f32::consts::TAU)
        } else {
            0.0
        };

        Some(DecorationPlacement {
            kind: kind.name,
            x,
            z,
            rotation,
            scale,
        })
    }

    /// Weighted random choice among the kinds whose noise band contains the
    /// sampled value.
    fn select_kind(&mut self, noise_value: f32) -> Option<usize> {
        let eligible: Vec<usize> = self
            .config
            .kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| noise_value >= k.min_noise && noise_value <= k.max_noise)
            .map(|(i, _)| i)
            .collect();
        if eligible.is_empty() {
            return None;
        }

        let total: f32 = eligible.iter().map(|&i| self.config.kinds[i].weight).sum();
        if total <= 0.0 {
            return eligible.first().copied();
        }
        let mut remaining = self.rng.gen_range(0.0..total);
        for &i in &eligible {
            remaining -= self.config.kinds[i].weight;
            if remaining <= 0.0 {
                return Some(i);
            }
        }
        eligible.last().copied()
    }

    fn sample_selection_noise(&self, coord: Coordinate) -> f32 {
        let x = (coord.x as f64 + self.noise_offset.0) / self.config.noise_scale as f64;
        let z = (coord.z as f64 + self.noise_offset.1) / self.config.noise_scale as f64;
        normalize_noise(self.selection_noise.get([x, z]))
    }

    fn sample_scale_noise(&self, coord: Coordinate) -> f32 {
        let x = (coord.x as f64 + self.scale_noise_offset.0) / self.config.scale_noise_scale as f64;
        let z = (coord.z as f64 + self.scale_noise_offset.1) / self.config.scale_noise_scale as f64;
        normalize_noise(self.scale_noise.get([x, z]))
    }

    /// Whether any lane, center or anchor tile lies within the avoidance
    /// radius (world units) of the candidate position.
    fn too_close_to_lane(&self, grid: &ArenaGrid, x: f32, z: f32, radius: f32) -> bool {
        let Some(center_tile) = grid.world_to_grid(x, z) else {
            return false;
        };
        let check_radius = (radius / grid.tile_size()).ceil() as i32;

        for dz in -check_radius..=check_radius {
            for dx in -check_radius..=check_radius {
                let coord = Coordinate::new(center_tile.x + dx, center_tile.z + dz);
                if !grid.in_bounds(coord) {
                    continue;
                }
                let tile = grid.tile(coord);
                if tile.is_carved() || tile == TileType::Center || tile == TileType::Anchor {
                    let (tile_x, tile_z) = grid.grid_to_world(coord);
                    let distance = ((x - tile_x).powi(2) + (z - tile_z).powi(2)).sqrt();
                    if distance < radius {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Map Perlin output from [-1, 1] to [0, 1].
fn normalize_noise(value: f64) -> f32 {
    ((value + 1.0) / 2.0).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{GenerationConfig, LayoutGenerator};

    fn layout(seed: u64) -> ArenaLayout {
        LayoutGenerator::new(GenerationConfig::default(), seed).generate()
    }

    #[test]
    fn test_placements_land_near_ground_tiles() {
        let layout = layout(5);
        let config = DecorationConfig {
            density: 1.0,
            ..Default::default()
        };
        let mut placer = DecorationPlacer::new(config, 5);
        let placements = placer.place(&layout);

        assert!(!placements.is_empty());
        for p in &placements {
            let coord = layout
                .grid
                .world_to_grid(p.x, p.z)
                .expect("placement left the grid");
            // Jitter keeps the placement within half a tile of its cell, so
            // the nearest tile is the originating ground tile
            assert_eq!(layout.grid.tile(coord), TileType::Ground);
            assert!(p.scale > 0.0);
        }
    }

    #[test]
    fn test_reproducible_per_seed() {
        let layout = layout(11);
        let config = DecorationConfig {
            density: 0.5,
            ..Default::default()
        };
        let a = DecorationPlacer::new(config.clone(), 77).place(&layout);
        let b = DecorationPlacer::new(config, 77).place(&layout);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_kinds_is_recoverable() {
        let layout = layout(3);
        let config = DecorationConfig {
            kinds: Vec::new(),
            ..Default::default()
        };
        let placements = DecorationPlacer::new(config, 1).place(&layout);
        assert!(placements.is_empty());
    }

    #[test]
    fn test_noise_band_filters_kinds() {
        let layout = layout(9);
        // A band only an exact 1.0 sample could land in, which Perlin
        // essentially never produces
        let config = DecorationConfig {
            density: 1.0,
            kinds: vec![DecorationKind {
                min_noise: 1.0,
                max_noise: 1.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let placements = DecorationPlacer::new(config, 2).place(&layout);
        assert!(placements.is_empty());
    }

    #[test]
    fn test_avoidance_keeps_clear_of_lanes() {
        let layout = layout(13);
        let config = DecorationConfig {
            density: 1.0,
            kinds: vec![DecorationKind {
                position_variance: 0.0,
                lane_avoidance_radius: 1.5,
                scale_range: (1.0, 1.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let placements = DecorationPlacer::new(config, 3).place(&layout);

        let n = layout.grid_size() as i32;
        for p in &placements {
            for z in 0..n {
                for x in 0..n {
                    let tile = layout.grid.tile(Coordinate::new(x, z));
                    if tile.is_carved() || tile == TileType::Center || tile == TileType::Anchor {
                        let (tx, tz) = layout.grid.grid_to_world(Coordinate::new(x, z));
                        let distance = ((p.x - tx).powi(2) + (p.z - tz).powi(2)).sqrt();
                        assert!(
                            distance >= 1.5,
                            "decoration at ({}, {}) too close to lane tile ({x}, {z})",
                            p.x,
                            p.z
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_weighted_selection_respects_bands() {
        let config = DecorationConfig {
            kinds: vec![
                DecorationKind::named("low", 0.0, 0.4),
                DecorationKind::named("high", 0.6, 1.0),
            ],
            ..Default::default()
        };
        let mut placer = DecorationPlacer::new(config, 8);
        assert_eq!(placer.select_kind(0.2), Some(0));
        assert_eq!(placer.select_kind(0.8), Some(1));
        assert_eq!(placer.select_kind(0.5), None);
    }
}
