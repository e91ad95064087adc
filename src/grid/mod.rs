use derive_more::{Display, From};

/// Cardinal step on the tile grid. Lanes only ever move in these four
/// directions; diagonals exist solely for hub rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset in (x, z) grid space. North is +z.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Perpendicular to the right of travel.
    pub fn clockwise(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Perpendicular to the left of travel.
    pub fn counter_clockwise(self) -> Direction {
        self.clockwise().opposite()
    }

    /// Direction of the single cardinal step from `from` to `to`, if the two
    /// coordinates are exactly one such step apart.
    pub fn between(from: Coordinate, to: Coordinate) -> Option<Direction> {
        let delta = (to.x - from.x, to.z - from.z);
        Direction::ALL.into_iter().find(|dir| dir.offset() == delta)
    }
}

/// Integer tile coordinate, equality and hashing by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From)]
#[display("({x}, {z})")]
pub struct Coordinate {
    pub x: i32,
    pub z: i32,
}

impl Coordinate {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn step(self, dir: Direction) -> Coordinate {
        let (dx, dz) = dir.offset();
        Coordinate::new(self.x + dx, self.z + dz)
    }

    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }

    /// Euclidean distance, used for anchor spacing and merge radii.
    pub fn distance(self, other: Coordinate) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dz = (self.z - other.z) as f32;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Final classification of a grid cell. Every cell holds exactly one of
/// these at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TileType {
    Ground,
    Path,
    Turn,
    TJunction,
    CrossJunction,
    Center,
    Anchor,
}

impl TileType {
    /// Whether this cell belongs to a carved lane corridor.
    pub fn is_carved(self) -> bool {
        matches!(
            self,
            TileType::Path | TileType::Turn | TileType::TJunction | TileType::CrossJunction
        )
    }
}

/// Square tile grid holding the generated layout. Writes happen only
/// through the anchor placer and lane carver; everything else reads.
#[derive(Debug, Clone)]
pub struct ArenaGrid {
    size: u32,
    tile_size: f32,
    tiles: Vec<TileType>,
}

impl ArenaGrid {
    /// Create a grid with every cell reset to `Ground`.
    pub fn new(size: u32, tile_size: f32) -> Self {
        Self {
            size,
            tile_size,
            tiles: vec![TileType::Ground; (size * size) as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Grid midpoint (integer division on both axes).
    pub fn center(&self) -> Coordinate {
        let mid = (self.size / 2) as i32;
        Coordinate::new(mid, mid)
    }

    pub fn in_bounds(&self, coord: Coordinate) -> bool {
        let n = self.size as i32;
        coord.x >= 0 && coord.x < n && coord.z >= 0 && coord.z < n
    }

    /// Bounds-checked lookup for external consumers. Internal callers check
    /// `in_bounds` first and use `tile`.
    pub fn tile_at(&self, x: i32, z: i32) -> Option<TileType> {
        let coord = Coordinate::new(x, z);
        self.in_bounds(coord).then(|| self.tile(coord))
    }

    pub(crate) fn tile(&self, coord: Coordinate) -> TileType {
        debug_assert!(self.in_bounds(coord));
        self.tiles[(coord.z * self.size as i32 + coord.x) as usize]
    }

    pub(crate) fn set_tile(&mut self, coord: Coordinate, tile: TileType) {
        debug_assert!(self.in_bounds(coord));
        self.tiles[(coord.z * self.size as i32 + coord.x) as usize] = tile;
    }

    /// Place the single `Center` cell at the grid midpoint.
    pub(crate) fn set_center(&mut self) -> Coordinate {
        let center = self.center();
        self.set_tile(center, TileType::Center);
        center
    }

    /// In-bounds 4-neighbors of a coordinate.
    pub fn cardinal_neighbors(&self, coord: Coordinate) -> Vec<Coordinate> {
        Direction::ALL
            .into_iter()
            .map(|dir| coord.step(dir))
            .filter(|&c| self.in_bounds(c))
            .collect()
    }

    /// Whether the coordinate lies on the outer boundary row/column.
    pub fn is_boundary(&self, coord: Coordinate) -> bool {
        let n = self.size as i32;
        coord.x == 0 || coord.z == 0 || coord.x == n - 1 || coord.z == n - 1
    }

    /// Convert a tile coordinate to its world position.
    pub fn grid_to_world(&self, coord: Coordinate) -> (f32, f32) {
        (coord.x as f32 * self.tile_size, coord.z as f32 * self.tile_size)
    }

    /// Convert a world position to the nearest tile coordinate, if it lands
    /// on the grid.
    pub fn world_to_grid(&self, world_x: f32, world_z: f32) -> Option<Coordinate> {
        let coord = Coordinate::new(
            (world_x / self.tile_size).round() as i32,
            (world_z / self.tile_size).round() as i32,
        );
        self.in_bounds(coord).then_some(coord)
    }
}
