use arenagen::errors::ArenaResult;
use arenagen::{
    ArenaConfig, ArenaLayout, DecorationPlacer, LaneKind, LayoutGenerator, TileType, load_config,
    save_config,
};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(name = "arenagen")]
#[command(about = "Generate and preview lane-based defense arena layouts")]
struct Args {
    /// Config file to start from (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid size in tiles (width and height)
    #[arg(long)]
    size: Option<u32>,

    /// Number of boundary anchors to place
    #[arg(long)]
    anchors: Option<u32>,

    /// Minimum distance between anchors
    #[arg(long)]
    min_distance: Option<u32>,

    /// Number of lanes forced to reach the center directly
    #[arg(long)]
    direct: Option<u32>,

    /// Lane width in tiles (1-3)
    #[arg(long)]
    width: Option<u32>,

    /// Random seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// Run the decoration pass and summarize the placements
    #[arg(long)]
    decorations: bool,

    /// Write the effective config to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> ArenaResult<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ArenaConfig::default(),
    };
    apply_overrides(&mut config, &args);

    if let Some(path) = &args.write_config {
        save_config(path, &config)?;
        println!("Config written to: {}", path.display());
        return Ok(());
    }

    let seed = args.seed.unwrap_or(config.seed);
    let mut generator = LayoutGenerator::new(config.generation.clone(), seed);
    let layout = generator.generate();

    println!("{}", render_grid(&layout));
    print_summary(&layout, seed);

    if args.decorations {
        let mut placer = DecorationPlacer::new(config.decoration.clone(), seed);
        let placements = placer.place(&layout);
        print_decoration_summary(&placements);
    }

    Ok(())
}

fn apply_overrides(config: &mut ArenaConfig, args: &Args) {
    if let Some(size) = args.size {
        config.generation.grid_size = size;
    }
    if let Some(anchors) = args.anchors {
        config.generation.anchor_count = anchors;
    }
    if let Some(min_distance) = args.min_distance {
        config.generation.min_anchor_distance = min_distance;
    }
    if let Some(direct) = args.direct {
        config.generation.min_direct_lanes = direct;
    }
    if let Some(width) = args.width {
        config.generation.lane_width = width;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
}

fn glyph(tile: TileType) -> char {
    match tile {
        TileType::Ground => '.',
        TileType::Path => '#',
        TileType::Turn => '+',
        TileType::TJunction => 'T',
        TileType::CrossJunction => 'X',
        TileType::Center => 'C',
        TileType::Anchor => 'A',
    }
}

/// ASCII rendering with north (+z) at the top.
fn render_grid(layout: &ArenaLayout) -> String {
    let n = layout.grid_size() as i32;
    let mut out = String::with_capacity(((n + 1) * n) as usize);
    for z in (0..n).rev() {
        for x in 0..n {
            // Every coordinate in range is present by construction
            let tile = layout.tile_at(x, z).unwrap_or(TileType::Ground);
            out.push(glyph(tile));
        }
        out.push('\n');
    }
    out
}

fn print_summary(layout: &ArenaLayout, seed: u64) {
    let report = &layout.report;
    println!("Arena summary (seed {seed}):");
    println!(
        "  Grid: {size}x{size} tiles at tile size {tile_size}",
        size = layout.grid_size(),
        tile_size = layout.tile_size()
    );
    println!(
        "  Anchors: {} placed of {} requested",
        report.placed_anchors, report.requested_anchors
    );
    for (i, lane) in layout.lanes.iter().enumerate() {
        let kind = match lane.kind {
            LaneKind::Direct => "direct",
            LaneKind::Merging => "merging",
            LaneKind::Fallback => "fallback",
        };
        println!(
            "    Lane {}: {} -> {} ({kind}, {} tiles)",
            i + 1,
            lane.anchor,
            lane.tiles.last().map(|c| c.to_string()).unwrap_or_default(),
            lane.len()
        );
    }
    if !report.warnings.is_empty() {
        println!("  Warnings:");
        for warning in &report.warnings {
            println!("    {warning}");
        }
    }
}

fn print_decoration_summary(placements: &[arenagen::DecorationPlacement]) {
    println!("  Decorations: {} placed", placements.len());
    let mut kind_counts = HashMap::new();
    for placement in placements {
        *kind_counts.entry(placement.kind.as_str()).or_insert(0u32) += 1;
    }
    for (kind, count) in kind_counts {
        println!("    {kind}: {count}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arenagen::GenerationConfig;

    #[test]
    fn test_overrides_apply() {
        let mut config = ArenaConfig::default();
        let args = Args::parse_from([
            "arenagen",
            "--size",
            "15",
            "--anchors",
            "4",
            "--width",
            "2",
            "--seed",
            "9",
        ]);
        apply_overrides(&mut config, &args);
        assert_eq!(config.generation.grid_size, 15);
        assert_eq!(config.generation.anchor_count, 4);
        assert_eq!(config.generation.lane_width, 2);
        assert_eq!(config.seed, 9);
        // Untouched fields keep their defaults
        assert_eq!(
            config.generation.min_anchor_distance,
            GenerationConfig::default().min_anchor_distance
        );
    }

    #[test]
    fn test_render_marks_center_and_anchors() {
        let config = GenerationConfig {
            grid_size: 15,
            ..Default::default()
        };
        let layout = LayoutGenerator::new(config, 4).generate();
        let rendered = render_grid(&layout);

        assert_eq!(rendered.lines().count(), 15);
        assert_eq!(rendered.matches('C').count(), 1);
        assert_eq!(
            rendered.matches('A').count(),
            layout.anchors.len()
        );
    }
}
