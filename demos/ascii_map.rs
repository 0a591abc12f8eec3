//! Example: Generate a tile map and print it as ASCII
//!
//! Run with `RUST_LOG=debug` to see rejected attempts.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_tile_terrain::*;
use tracing_subscriber::EnvFilter;

fn glyph(grid: &TileGrid, cell: usize, start: usize, goal: Option<usize>) -> char {
    if cell == start {
        return '@';
    }
    if Some(cell) == goal {
        return 'X';
    }
    if grid.blocked[cell] {
        return '#';
    }
    match grid.terrain_id[cell] {
        BASE_TERRAIN_ID => '.',
        3 => '~',
        4 => ',',
        _ => '?',
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("Tile Terrain Generation Example");
    println!("===============================\n");

    let rules = vec![
        TerrainRule::obstacle("Boulders")
            .with_mode(GrowthMode::Blob(BlobParams {
                avg_size: 40,
                max_blobs: 8,
                ..BlobParams::default()
            }))
            .with_coverage(0.18)
            .with_order(1),
        TerrainRule::obstacle("Fissure")
            .with_mode(GrowthMode::Lichtenberg(LichtenbergParams {
                max_steps: 250,
                max_walkers: 4,
                ..LichtenbergParams::default()
            }))
            .with_order(2),
        TerrainRule::terrain("Water", 5)
            .with_color([60, 110, 200, 255])
            .with_mode(GrowthMode::Blob(BlobParams {
                avg_size: 30,
                max_blobs: 3,
                ..BlobParams::default()
            }))
            .with_coverage(0.05)
            .with_order(3),
        TerrainRule::terrain("Brush", 2)
            .with_color([90, 140, 70, 255])
            .with_mode(GrowthMode::Static(StaticParams { chance: 0.07 }))
            .with_order(4),
    ];

    let config = GenerationConfigBuilder::new()
        .seed(2024)
        .max_attempts(50)
        .unwrap()
        .min_reachable_percent(0.75)
        .unwrap()
        .build()
        .unwrap();

    let mut grid = TileGrid::new(72, 28).expect("Failed to create grid");
    let mut generator = TerrainGenerator::new();
    let report = generator
        .generate(&mut grid, &rules, &config)
        .expect("Failed to generate map");

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let goal = generator.pick_random_reachable_goal(&grid, report.start_index, 20, &mut rng);

    let width = grid.width() as usize;
    for row in 0..grid.height() as usize {
        let line: String = (0..width)
            .map(|x| glyph(&grid, x + row * width, report.start_index, goal))
            .collect();
        println!("{}", line);
    }
    println!();

    println!("Statistics:");
    println!("  Attempts: {} (accepted: {})", report.attempts, report.accepted);
    println!(
        "  Reachable: {} / {} open cells ({:.1}%)",
        report.reachable_count,
        report.walkable_count,
        report.reachable_fraction() * 100.0
    );
    for entry in prepare_rules(&rules).iter().filter(|entry| !entry.rule.is_obstacle) {
        println!(
            "  {} (id {}): {} cells",
            entry.rule.display_name,
            entry.terrain_id,
            grid.count_terrain(entry.terrain_id)
        );
    }
    match goal {
        Some(goal) => {
            let (x, y) = grid.index().index_to_xy(goal);
            println!("  Goal: ({}, {})", x, y);
        }
        None => println!("  Goal: none far enough away"),
    }
}
