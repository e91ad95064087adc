use super::{GenerationConfig, GenerationContext, LayoutWarning};
use crate::grid::{ArenaGrid, Coordinate, TileType};
use rand::seq::SliceRandom;
use rand_pcg::Pcg64;
use tracing::{debug, warn};

/// Select up to `anchor_count` boundary coordinates under the spacing
/// constraints: pairwise distance >= min and distance to the center >=
/// min / 2. Unmet slots are skipped, except that the very first anchor is
/// force-accepted so a boundary grid always yields at least one.
pub(crate) fn place_anchors(
    ctx: &mut GenerationContext,
    config: &GenerationConfig,
    rng: &mut Pcg64,
) {
    let mut candidates = boundary_candidates(&ctx.grid, config, rng);
    let min_distance = config.min_anchor_distance as f32;

    for slot in 0..config.anchor_count {
        let accepted = candidates
            .iter()
            .position(|&c| is_valid_anchor(ctx, c, min_distance));

        match accepted {
            Some(index) => {
                let anchor = candidates.remove(index);
                commit_anchor(ctx, anchor);
            }
            None if ctx.anchors.is_empty() && !candidates.is_empty() => {
                // No candidate satisfies the spacing, but an arena without
                // a single anchor is useless.
                let anchor = candidates.remove(0);
                commit_anchor(ctx, anchor);
            }
            None => {
                warn!(
                    "could not place anchor {} of {} with minimum distance {}",
                    slot + 1,
                    config.anchor_count,
                    config.min_anchor_distance
                );
            }
        }
    }

    let placed = ctx.anchors.len() as u32;
    debug!("placed {placed} of {} anchor positions", config.anchor_count);
    if placed < config.anchor_count {
        ctx.push_warning(LayoutWarning::AnchorShortfall {
            requested: config.anchor_count,
            placed,
        });
    }
}

fn commit_anchor(ctx: &mut GenerationContext, anchor: Coordinate) {
    ctx.grid.set_tile(anchor, TileType::Anchor);
    ctx.anchors.push(anchor);
}

fn is_valid_anchor(ctx: &GenerationContext, candidate: Coordinate, min_distance: f32) -> bool {
    ctx.anchors
        .iter()
        .all(|&a| candidate.distance(a) >= min_distance)
        && candidate.distance(ctx.center) >= min_distance / 2.0
}

/// All boundary coordinates in shuffled order. With `prefer_edge_centers`
/// the four edge midpoints stay at the head of the list.
fn boundary_candidates(
    grid: &ArenaGrid,
    config: &GenerationConfig,
    rng: &mut Pcg64,
) -> Vec<Coordinate> {
    let n = grid.size() as i32;
    let mut positions = Vec::new();

    for x in 0..n {
        if !config.allow_corner_anchors && (x == 0 || x == n - 1) {
            continue;
        }
        positions.push(Coordinate::new(x, 0));
        positions.push(Coordinate::new(x, n - 1));
    }
    for z in 1..n - 1 {
        positions.push(Coordinate::new(0, z));
        positions.push(Coordinate::new(n - 1, z));
    }
    positions.shuffle(rng);

    if config.prefer_edge_centers {
        let mid = n / 2;
        let midpoints = [
            Coordinate::new(mid, 0),
            Coordinate::new(mid, n - 1),
            Coordinate::new(0, mid),
            Coordinate::new(n - 1, mid),
        ];
        positions.retain(|c| !midpoints.contains(c));
        let mut head = midpoints.to_vec();
        head.shuffle(rng);
        head.extend(positions);
        positions = head;
    }

    positions
}
