use super::GenerationContext;
use crate::grid::{Coordinate, Direction, TileType};

const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Commit a lane's footprint into the grid. Interior tiles (endpoints
/// excluded, those stay `Anchor`/`Center`) are carved at the requested
/// width; the final straight/turn/junction classification happens later
/// from the accumulated connections.
pub(crate) fn carve_lane(ctx: &mut GenerationContext, tiles: &[Coordinate], width: u32) {
    if tiles.len() < 2 {
        return;
    }

    for i in 1..tiles.len() - 1 {
        let current = tiles[i];
        carve_tile(ctx, current);

        let incoming = Direction::between(tiles[i - 1], current);
        let outgoing = Direction::between(current, tiles[i + 1]);
        for offset in width_offsets(incoming, outgoing, width) {
            let side = current.step(offset);
            if ctx.grid.in_bounds(side) {
                carve_tile(ctx, side);
            }
        }
    }
}

/// Carve the 8 neighbors of an anchor or the center so lanes meeting there
/// integrate without gaps. Cardinal neighbors get the width treatment,
/// diagonals close the ring.
pub(crate) fn add_hub(ctx: &mut GenerationContext, focus: Coordinate, width: u32) {
    for dir in Direction::ALL {
        let side = focus.step(dir);
        if !ctx.grid.in_bounds(side) {
            continue;
        }
        carve_tile(ctx, side);
        for offset in width_offsets(Some(dir), Some(dir), width) {
            let widened = side.step(offset);
            if ctx.grid.in_bounds(widened) {
                carve_tile(ctx, widened);
            }
        }
    }
    for (dx, dz) in DIAGONAL_OFFSETS {
        let diagonal = Coordinate::new(focus.x + dx, focus.z + dz);
        if ctx.grid.in_bounds(diagonal) {
            carve_tile(ctx, diagonal);
        }
    }
}

/// Perpendicular offsets for the local travel directions. Width 2 widens to
/// the right of travel, width 3 to both sides; taking the union over the
/// incoming and outgoing directions fills the inner corner at turns.
fn width_offsets(
    incoming: Option<Direction>,
    outgoing: Option<Direction>,
    width: u32,
) -> Vec<Direction> {
    let mut offsets = Vec::new();
    for travel in [incoming, outgoing].into_iter().flatten() {
        match width {
            0 | 1 => {}
            2 => push_unique(&mut offsets, travel.clockwise()),
            _ => {
                push_unique(&mut offsets, travel.clockwise());
                push_unique(&mut offsets, travel.counter_clockwise());
            }
        }
    }
    offsets
}

fn push_unique(offsets: &mut Vec<Direction>, dir: Direction) {
    if !offsets.contains(&dir) {
        offsets.push(dir);
    }
}

/// Mark one coordinate as carved. Idempotent: re-carving only ever adds
/// missing connection directions. Anchor and center tiles keep their type.
pub(crate) fn carve_tile(ctx: &mut GenerationContext, coord: Coordinate) {
    match ctx.grid.tile(coord) {
        TileType::Anchor | TileType::Center => return,
        TileType::Ground => ctx.grid.set_tile(coord, TileType::Path),
        _ => {}
    }
    ctx.occupied.insert(coord);
    link_connections(ctx, coord);
}

/// Record the cardinal connections between a carved tile and its already
/// carved (or center/anchor) neighbors, in both directions.
fn link_connections(ctx: &mut GenerationContext, coord: Coordinate) {
    for dir in Direction::ALL {
        let neighbor = coord.step(dir);
        if !ctx.grid.in_bounds(neighbor) {
            continue;
        }
        let tile = ctx.grid.tile(neighbor);
        if tile.is_carved() || tile == TileType::Center || tile == TileType::Anchor {
            add_connection(ctx, coord, dir);
            add_connection(ctx, neighbor, dir.opposite());
        }
    }
}

fn add_connection(ctx: &mut GenerationContext, coord: Coordinate, dir: Direction) {
    let dirs = ctx.connections.entry(coord).or_default();
    if !dirs.contains(&dir) {
        dirs.push(dir);
    }
}
