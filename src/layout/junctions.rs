use super::{GenerationContext, LayoutWarning};
use crate::grid::TileType;

/// Assign the final tile type of every carved coordinate from its
/// accumulated connection directions. Runs once after all lanes are carved,
/// so lane order cannot bias the result.
pub(crate) fn classify(ctx: &mut GenerationContext) {
    let mut carved: Vec<_> = ctx
        .occupied
        .iter()
        .copied()
        .filter(|&coord| ctx.grid.tile(coord).is_carved())
        .collect();
    carved.sort_by_key(|c| (c.z, c.x));

    for coord in carved {
        let (count, colinear) = match ctx.connections.get(&coord) {
            Some(dirs) => (
                dirs.len(),
                dirs.len() == 2 && dirs[0] == dirs[1].opposite(),
            ),
            None => (0, false),
        };
        let tile = match count {
            4 => TileType::CrossJunction,
            3 => TileType::TJunction,
            2 if colinear => TileType::Path,
            2 => TileType::Turn,
            1 => TileType::Path,
            _ => {
                // A carved tile with no connections points at a carver bug;
                // degrade it back to ground rather than render a stray lane
                ctx.push_warning(LayoutWarning::IsolatedTile { coord });
                TileType::Ground
            }
        };
        ctx.grid.set_tile(coord, tile);
    }
}

#[cfg(test)]
mod tests {
    use super::super::{GenerationConfig, carver};
    use super::*;
    use crate::grid::Coordinate;

    fn context(grid_size: u32) -> GenerationContext {
        let config = GenerationConfig {
            grid_size,
            ..Default::default()
        };
        GenerationContext::new(&config)
    }

    #[test]
    fn test_straight_lane_classifies_as_path() {
        let mut ctx = context(9);
        let lane: Vec<_> = (0..=4).map(|x| Coordinate::new(x, 4)).collect();
        ctx.grid.set_tile(lane[0], TileType::Anchor);
        carver::carve_lane(&mut ctx, &lane, 1);

        classify(&mut ctx);

        for x in 1..=3 {
            assert_eq!(ctx.grid.tile(Coordinate::new(x, 4)), TileType::Path);
        }
    }

    #[test]
    fn test_corner_classifies_as_turn() {
        let mut ctx = context(9);
        let lane = vec![
            Coordinate::new(0, 2),
            Coordinate::new(1, 2),
            Coordinate::new(2, 2),
            Coordinate::new(2, 3),
            Coordinate::new(2, 4),
            Coordinate::new(3, 4),
            Coordinate::new(4, 4),
        ];
        ctx.grid.set_tile(lane[0], TileType::Anchor);
        carver::carve_lane(&mut ctx, &lane, 1);

        classify(&mut ctx);

        assert_eq!(ctx.grid.tile(Coordinate::new(2, 2)), TileType::Turn);
        assert_eq!(ctx.grid.tile(Coordinate::new(1, 2)), TileType::Path);
        assert_eq!(ctx.grid.tile(Coordinate::new(2, 3)), TileType::Path);
    }

    #[test]
    fn test_three_way_meeting_classifies_as_t_junction() {
        let mut ctx = context(9);
        let east_west: Vec<_> = (0..=8).map(|x| Coordinate::new(x, 4)).collect();
        ctx.grid.set_tile(east_west[0], TileType::Anchor);
        ctx.grid.set_tile(east_west[8], TileType::Anchor);
        // Fake a second endpoint: carve a branch that dead-ends into the row
        let branch = vec![
            Coordinate::new(2, 0),
            Coordinate::new(2, 1),
            Coordinate::new(2, 2),
            Coordinate::new(2, 3),
            Coordinate::new(2, 4),
        ];
        ctx.grid.set_tile(branch[0], TileType::Anchor);
        carver::carve_lane(&mut ctx, &east_west, 1);
        carver::carve_lane(&mut ctx, &branch, 1);
        // The branch ends on the row, so the meeting tile must be carved too
        carver::carve_tile(&mut ctx, Coordinate::new(2, 4));

        classify(&mut ctx);

        assert_eq!(ctx.grid.tile(Coordinate::new(2, 4)), TileType::TJunction);
    }

    #[test]
    fn test_four_way_meeting_classifies_as_cross() {
        let mut ctx = context(9);
        for dir_lane in [
            (0..=4).map(|x| Coordinate::new(x, 2)).collect::<Vec<_>>(),
            (4..=8).rev().map(|x| Coordinate::new(x, 2)).collect(),
            (0..=2).map(|z| Coordinate::new(2, z)).collect(),
            (2..=4).rev().map(|z| Coordinate::new(2, z)).collect(),
        ] {
            carver::carve_lane(&mut ctx, &dir_lane, 1);
        }
        carver::carve_tile(&mut ctx, Coordinate::new(2, 2));

        classify(&mut ctx);

        assert_eq!(ctx.grid.tile(Coordinate::new(2, 2)), TileType::CrossJunction);
    }

    #[test]
    fn test_isolated_tile_degrades_to_ground() {
        let mut ctx = context(9);
        // Force an inconsistent state: occupied without any connection
        let lonely = Coordinate::new(1, 1);
        ctx.grid.set_tile(lonely, TileType::Path);
        ctx.occupied.insert(lonely);

        classify(&mut ctx);

        assert_eq!(ctx.grid.tile(lonely), TileType::Ground);
        assert_eq!(
            ctx.warnings,
            vec![LayoutWarning::IsolatedTile { coord: lonely }]
        );
    }
}
