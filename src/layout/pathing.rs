use super::constants::{ASTAR_CARDINAL_COST, STRAIGHT_RUN_LIMIT};
use super::{GenerationConfig, GenerationContext};
use crate::grid::{Coordinate, Direction, TileType};
use pathfinding::prelude::astar;
use tracing::debug;

/// A* state. Carrying the incoming direction and a capped run length lets
/// the straight-run penalty be an ordinary step cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SearchNode {
    pos: Coordinate,
    dir: Option<Direction>,
    run: u32,
}

/// Penalty weights are configured in whole grid-step units; the search runs
/// on integer costs scaled by the cardinal step cost.
fn scaled(penalty: f32) -> u32 {
    (penalty * ASTAR_CARDINAL_COST as f32).round() as u32
}

/// Retry the search with a slightly inflated step cost each attempt, which
/// perturbs tie-breaking enough to escape repeated failure patterns.
pub(crate) fn find_lane_with_retries(
    ctx: &GenerationContext,
    config: &GenerationConfig,
    anchor: Coordinate,
    force_direct: bool,
) -> Option<Vec<Coordinate>> {
    (0..config.max_path_attempts).find_map(|attempt| {
        find_lane(ctx, config, anchor, force_direct, attempt)
    })
}

/// One weighted A* search from the anchor to the center. Returns the full
/// coordinate sequence, anchor and center inclusive, or `None`.
fn find_lane(
    ctx: &GenerationContext,
    config: &GenerationConfig,
    anchor: Coordinate,
    force_direct: bool,
    attempt: u32,
) -> Option<Vec<Coordinate>> {
    let center = ctx.center;
    let start = SearchNode {
        pos: anchor,
        dir: None,
        run: 0,
    };

    let result = astar(
        &start,
        |node| successors(ctx, config, *node, force_direct, attempt),
        |node| node.pos.manhattan_distance(center) * ASTAR_CARDINAL_COST,
        |node| node.pos == center,
    );

    result.map(|(nodes, _cost)| nodes.into_iter().map(|n| n.pos).collect())
}

fn successors(
    ctx: &GenerationContext,
    config: &GenerationConfig,
    node: SearchNode,
    force_direct: bool,
    attempt: u32,
) -> Vec<(SearchNode, u32)> {
    let mut out = Vec::with_capacity(4);

    for dir in Direction::ALL {
        let next = node.pos.step(dir);
        if !is_traversable(ctx, next, force_direct) {
            continue;
        }

        let run = if node.dir == Some(dir) {
            (node.run + 1).min(STRAIGHT_RUN_LIMIT)
        } else {
            1
        };

        let mut cost = ASTAR_CARDINAL_COST + attempt;
        if ctx.grid.is_boundary(next) {
            cost += scaled(config.edge_penalty);
        }
        if run >= STRAIGHT_RUN_LIMIT {
            cost += scaled(config.straight_run_penalty);
        }

        if force_direct {
            if ctx.near_occupied(next) && !ctx.within_center_merge_radius(next) {
                cost += scaled(config.direct_avoidance_penalty);
            }
        } else if ctx.direct_endpoints.contains(&next) {
            cost += scaled(config.direct_merge_penalty);
        } else if ctx.near_occupied(next) && !ctx.within_center_merge_radius(next) {
            cost += scaled(config.lane_avoidance_penalty);
        }

        out.push((
            SearchNode {
                pos: next,
                dir: Some(dir),
                run,
            },
            cost,
        ));
    }

    out
}

/// Anchor tiles are never re-traversed; carved tiles are passable only for
/// non-direct lanes inside the center merge radius. The center itself is
/// always a valid destination.
fn is_traversable(ctx: &GenerationContext, pos: Coordinate, force_direct: bool) -> bool {
    if !ctx.grid.in_bounds(pos) {
        return false;
    }
    match ctx.grid.tile(pos) {
        TileType::Center => true,
        TileType::Ground => true,
        TileType::Anchor => false,
        tile if tile.is_carved() => !force_direct && ctx.within_center_merge_radius(pos),
        _ => false,
    }
}

/// Secondary search for anchors that cannot reach the center: connect to
/// the nearest tile of the existing lane network within the configured
/// radius of the center, with the straight-line distance remaining folded
/// in as a virtual cost.
pub(crate) fn find_fallback_lane(
    ctx: &GenerationContext,
    config: &GenerationConfig,
    anchor: Coordinate,
) -> Option<Vec<Coordinate>> {
    // Nothing to join while the network is only the center tile
    if ctx.occupied.len() <= 1 {
        return None;
    }

    let center = ctx.center;
    let radius = config.fallback_radius;

    let result = astar(
        &anchor,
        |&pos| fallback_successors(ctx, pos),
        |&pos| (pos.distance(center) * ASTAR_CARDINAL_COST as f32).round() as u32,
        |&pos| pos != anchor && ctx.occupied.contains(&pos) && pos.distance(center) <= radius,
    );

    match result {
        Some((tiles, cost)) => {
            debug!(
                "fallback connector from {anchor} joined the network after {} tiles (cost {cost})",
                tiles.len()
            );
            Some(tiles)
        }
        None => None,
    }
}

fn fallback_successors(ctx: &GenerationContext, pos: Coordinate) -> Vec<(Coordinate, u32)> {
    Direction::ALL
        .into_iter()
        .map(|dir| pos.step(dir))
        .filter(|&next| {
            ctx.grid.in_bounds(next)
                && match ctx.grid.tile(next) {
                    TileType::Anchor => false,
                    TileType::Ground | TileType::Center => true,
                    tile => tile.is_carved(),
                }
        })
        .map(|next| (next, ASTAR_CARDINAL_COST))
        .collect()
}
