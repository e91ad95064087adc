/// Default values for arena layout generation
pub const DEFAULT_GRID_SIZE: u32 = 27;
pub const DEFAULT_TILE_SIZE: f32 = 1.0;
pub const DEFAULT_ANCHOR_COUNT: u32 = 3;
pub const DEFAULT_MIN_ANCHOR_DISTANCE: u32 = 5;
pub const DEFAULT_MIN_DIRECT_LANES: u32 = 2;
pub const DEFAULT_LANE_WIDTH: u32 = 1;
pub const DEFAULT_MAX_PATH_ATTEMPTS: u32 = 10;

/// Default pathfinding penalty weights
pub const DEFAULT_LANE_AVOIDANCE_PENALTY: f32 = 5.0;
pub const DEFAULT_DIRECT_MERGE_PENALTY: f32 = 100.0;
pub const DEFAULT_DIRECT_AVOIDANCE_PENALTY: f32 = 10.0;
pub const DEFAULT_EDGE_PENALTY: f32 = 2.0;
pub const DEFAULT_STRAIGHT_RUN_PENALTY: f32 = 1.5;
pub const DEFAULT_FALLBACK_RADIUS: f32 = 8.0;

/// Pathfinding constants
pub const ASTAR_CARDINAL_COST: u32 = 10;
pub const STRAIGHT_RUN_LIMIT: u32 = 6;
pub const CENTER_MERGE_RADIUS: f32 = 1.5;

/// Clamping limits applied before a generation run
pub const MIN_GRID_SIZE: u32 = 5;
pub const MAX_GRID_SIZE: u32 = 512;
pub const MAX_LANE_WIDTH: u32 = 3;
pub const MIN_TILE_SIZE: f32 = 0.1;
