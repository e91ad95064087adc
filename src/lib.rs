pub mod config;
pub mod decor;
pub mod errors;
pub mod grid;
pub mod layout;

// Selective re-exports for external consumers

pub use errors::{ArenaError, ArenaResult};

pub use grid::{ArenaGrid, Coordinate, Direction, TileType};

pub use layout::{
    ArenaLayout, GenerationConfig, GenerationReport, Lane, LaneKind, LayoutGenerator,
    LayoutWarning,
};

pub use config::{ArenaConfig, load_config, save_config};

pub use decor::{DecorationConfig, DecorationKind, DecorationPlacement, DecorationPlacer};
