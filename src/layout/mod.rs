use crate::grid::{ArenaGrid, Coordinate, Direction, TileType};
use derive_more::Display;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use validator::Validate;

pub mod constants;

mod anchors;
mod carver;
mod junctions;
mod pathing;

use constants::*;

/// Tunable parameters for one generation run. Every pathfinding penalty is
/// configuration, not contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GenerationConfig {
    #[validate(range(min = 5, max = 512))]
    pub grid_size: u32,
    #[validate(range(min = 0.1, max = 100.0))]
    pub tile_size: f32,
    #[validate(range(min = 1, max = 64))]
    pub anchor_count: u32,
    /// Minimum pairwise anchor distance; anchors also keep half this
    /// distance from the center.
    #[validate(range(min = 1, max = 64))]
    pub min_anchor_distance: u32,
    pub allow_corner_anchors: bool,
    pub prefer_edge_centers: bool,
    /// Number of anchors whose lanes must reach the center without touching
    /// any other lane.
    #[validate(range(min = 0, max = 16))]
    pub min_direct_lanes: u32,
    #[validate(range(min = 1, max = 3))]
    pub lane_width: u32,
    #[validate(range(min = 1, max = 100))]
    pub max_path_attempts: u32,
    pub lane_avoidance_penalty: f32,
    pub direct_merge_penalty: f32,
    pub direct_avoidance_penalty: f32,
    pub edge_penalty: f32,
    pub straight_run_penalty: f32,
    /// How far from the center the fallback connector may join the existing
    /// lane network.
    #[validate(range(min = 0.0, max = 512.0))]
    pub fallback_radius: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            tile_size: DEFAULT_TILE_SIZE,
            anchor_count: DEFAULT_ANCHOR_COUNT,
            min_anchor_distance: DEFAULT_MIN_ANCHOR_DISTANCE,
            allow_corner_anchors: true,
            prefer_edge_centers: false,
            min_direct_lanes: DEFAULT_MIN_DIRECT_LANES,
            lane_width: DEFAULT_LANE_WIDTH,
            max_path_attempts: DEFAULT_MAX_PATH_ATTEMPTS,
            lane_avoidance_penalty: DEFAULT_LANE_AVOIDANCE_PENALTY,
            direct_merge_penalty: DEFAULT_DIRECT_MERGE_PENALTY,
            direct_avoidance_penalty: DEFAULT_DIRECT_AVOIDANCE_PENALTY,
            edge_penalty: DEFAULT_EDGE_PENALTY,
            straight_run_penalty: DEFAULT_STRAIGHT_RUN_PENALTY,
            fallback_radius: DEFAULT_FALLBACK_RADIUS,
        }
    }
}

impl GenerationConfig {
    /// Degrade out-of-range values instead of aborting the run.
    fn clamped(&self) -> GenerationConfig {
        let mut config = self.clone();
        config.grid_size = config.grid_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        config.tile_size = config.tile_size.max(MIN_TILE_SIZE);
        config.lane_width = config.lane_width.clamp(1, MAX_LANE_WIDTH);
        config.max_path_attempts = config.max_path_attempts.max(1);
        config.min_anchor_distance = config.min_anchor_distance.max(1);
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LaneKind {
    /// Reached the center without touching any other lane.
    Direct,
    /// Allowed to merge with the network near the center.
    Merging,
    /// Joined the existing network instead of reaching the center.
    Fallback,
}

/// One carved corridor from an anchor toward the center.
#[derive(Debug, Clone)]
pub struct Lane {
    pub anchor: Coordinate,
    pub tiles: Vec<Coordinate>,
    pub kind: LaneKind,
}

impl Lane {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Expected, recoverable conditions surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LayoutWarning {
    #[display("placed {placed} of {requested} requested anchors")]
    AnchorShortfall { requested: u32, placed: u32 },
    #[display("no lane found from anchor {anchor} to the center")]
    UnconnectedAnchor { anchor: Coordinate },
    #[display("carved tile {coord} has no connections")]
    IsolatedTile { coord: Coordinate },
}

/// Outcome summary of one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub requested_anchors: u32,
    pub placed_anchors: u32,
    pub direct_lanes: u32,
    pub merging_lanes: u32,
    pub fallback_lanes: u32,
    pub unconnected_anchors: Vec<Coordinate>,
    pub warnings: Vec<LayoutWarning>,
}

impl GenerationReport {
    pub fn is_fully_connected(&self) -> bool {
        self.unconnected_anchors.is_empty()
    }
}

/// Finished layout handed to collaborators. Returning this value is the
/// "generation complete" signal; partial state is never observable.
#[derive(Debug, Clone)]
pub struct ArenaLayout {
    pub grid: ArenaGrid,
    pub anchors: Vec<Coordinate>,
    pub lanes: Vec<Lane>,
    pub report: GenerationReport,
}

impl ArenaLayout {
    pub fn grid_size(&self) -> u32 {
        self.grid.size()
    }

    pub fn tile_size(&self) -> f32 {
        self.grid.tile_size()
    }

    pub fn tile_at(&self, x: i32, z: i32) -> Option<TileType> {
        self.grid.tile_at(x, z)
    }
}

/// Working state for a single run, rebuilt from scratch each time and
/// threaded through the per-component functions.
pub(crate) struct GenerationContext {
    pub(crate) grid: ArenaGrid,
    pub(crate) center: Coordinate,
    pub(crate) anchors: Vec<Coordinate>,
    pub(crate) occupied: HashSet<Coordinate>,
    pub(crate) connections: HashMap<Coordinate, Vec<Direction>>,
    pub(crate) direct_endpoints: HashSet<Coordinate>,
    pub(crate) warnings: Vec<LayoutWarning>,
}

impl GenerationContext {
    pub(crate) fn new(config: &GenerationConfig) -> Self {
        let mut grid = ArenaGrid::new(config.grid_size, config.tile_size);
        let center = grid.set_center();
        let mut occupied = HashSet::new();
        occupied.insert(center);
        Self {
            grid,
            center,
            anchors: Vec::new(),
            occupied,
            connections: HashMap::new(),
            direct_endpoints: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Whether any 4-neighbor of the coordinate is already committed to a
    /// lane or hub.
    pub(crate) fn near_occupied(&self, coord: Coordinate) -> bool {
        self.grid
            .cardinal_neighbors(coord)
            .iter()
            .any(|n| self.occupied.contains(n))
    }

    /// Tiles this close to the center may always merge.
    pub(crate) fn within_center_merge_radius(&self, coord: Coordinate) -> bool {
        coord.distance(self.center) <= CENTER_MERGE_RADIUS
    }

    pub(crate) fn push_warning(&mut self, warning: LayoutWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Procedural layout generator: one central objective, boundary anchors,
/// carved lanes connecting each anchor to the center.
pub struct LayoutGenerator {
    config: GenerationConfig,
    rng: Pcg64,
}

impl LayoutGenerator {
    pub fn new(config: GenerationConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Run one full generation. Always terminates with a grid; every
    /// negative outcome is a warning in the report, never a panic.
    pub fn generate(&mut self) -> ArenaLayout {
        let config = self.config.clamped();
        if config != self.config {
            warn!("generation config adjusted to stay within supported ranges");
        }

        let mut ctx = GenerationContext::new(&config);
        anchors::place_anchors(&mut ctx, &config, &mut self.rng);
        let lanes = create_lanes(&mut ctx, &config);
        if config.lane_width >= 2 && !lanes.is_empty() {
            let center = ctx.center;
            carver::add_hub(&mut ctx, center, config.lane_width);
        }
        junctions::classify(&mut ctx);

        let report = build_report(&ctx, &config, &lanes);
        info!(
            "generated {size}x{size} arena: {placed} anchors, {lanes} lanes ({direct} direct, {fallback} fallback)",
            size = config.grid_size,
            placed = report.placed_anchors,
            lanes = lanes.len(),
            direct = report.direct_lanes,
            fallback = report.fallback_lanes,
        );

        ArenaLayout {
            grid: ctx.grid,
            anchors: ctx.anchors,
            lanes,
            report,
        }
    }
}

/// Plan and carve one lane per anchor, forced-direct anchors first.
fn create_lanes(ctx: &mut GenerationContext, config: &GenerationConfig) -> Vec<Lane> {
    let direct_count = config.min_direct_lanes.min(ctx.anchors.len() as u32) as usize;
    let anchors = ctx.anchors.clone();
    let mut lanes = Vec::new();

    for (i, &anchor) in anchors.iter().enumerate() {
        let force_direct = i < direct_count;
        let (tiles, kind) = match pathing::find_lane_with_retries(ctx, config, anchor, force_direct)
        {
            Some(tiles) => {
                let kind = if force_direct {
                    LaneKind::Direct
                } else {
                    LaneKind::Merging
                };
                (tiles, kind)
            }
            None if !force_direct => match pathing::find_fallback_lane(ctx, config, anchor) {
                Some(tiles) => (tiles, LaneKind::Fallback),
                None => {
                    ctx.push_warning(LayoutWarning::UnconnectedAnchor { anchor });
                    continue;
                }
            },
            None => {
                ctx.push_warning(LayoutWarning::UnconnectedAnchor { anchor });
                continue;
            }
        };

        if kind == LaneKind::Direct && tiles.len() >= 2 {
            ctx.direct_endpoints.insert(tiles[tiles.len() - 2]);
        }

        carver::carve_lane(ctx, &tiles, config.lane_width);
        if config.lane_width >= 2 {
            carver::add_hub(ctx, anchor, config.lane_width);
        }
        lanes.push(Lane {
            anchor,
            tiles,
            kind,
        });
    }

    lanes
}

fn build_report(
    ctx: &GenerationContext,
    config: &GenerationConfig,
    lanes: &[Lane],
) -> GenerationReport {
    let count = |kind: LaneKind| lanes.iter().filter(|l| l.kind == kind).count() as u32;
    GenerationReport {
        requested_anchors: config.anchor_count,
        placed_anchors: ctx.anchors.len() as u32,
        direct_lanes: count(LaneKind::Direct),
        merging_lanes: count(LaneKind::Merging),
        fallback_lanes: count(LaneKind::Fallback),
        unconnected_anchors: ctx
            .warnings
            .iter()
            .filter_map(|w| match w {
                LayoutWarning::UnconnectedAnchor { anchor } => Some(*anchor),
                _ => None,
            })
            .collect(),
        warnings: ctx.warnings.clone(),
    }
}
