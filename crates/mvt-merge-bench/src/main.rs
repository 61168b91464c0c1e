//! Benchmark for the layer pipeline on a road network.
//!
//! Reads a tile from the path given as the first argument, or synthesizes a
//! street grid split into one feature per block, then runs
//! filter -> project -> merge on every layer and re-encodes the result.

use std::fs;
use std::time::Instant;

use mvt_merge::{
    decode_tile, encode_tile, encode_tile_compressed, filter_by_keys, merge_layer, project_keys,
    GeomType, Layer, LayerBuilder, Tile,
};
use tracing_subscriber::EnvFilter;

const GRID: i32 = 64;
const EXTENT: i32 = 4096;
const KEEP: [&str; 3] = ["class", "name", "oneway"];
const ZSTD_LEVEL: i32 = 3;

fn street_class(i: i32) -> &'static str {
    match i % 8 {
        0 => "primary",
        4 => "secondary",
        _ => "residential",
    }
}

/// One LineString per block edge, emitted column by column so that
/// neighbouring segments are never adjacent in the input.
fn synthesize_roads() -> Layer {
    let step = EXTENT / GRID;
    let mut builder = LayerBuilder::new("roads").extent(EXTENT as u32);
    let mut osm_id = 0u64;

    for block in 0..GRID {
        for street in 0..=GRID {
            let (a, b) = (block * step, (block + 1) * step);
            let s = street * step;
            let class = street_class(street);

            osm_id += 1;
            builder = builder.feature(GeomType::LineString, |f| {
                f.id(osm_id)
                    .tag("class", class)
                    .tag("name", format!("{} Street", street))
                    .tag("osm_id", osm_id)
                    .tag("surface", if block % 3 == 0 { "asphalt" } else { "concrete" })
                    .ring([(a, s), (b, s)])
            });

            osm_id += 1;
            builder = builder.feature(GeomType::LineString, |f| {
                f.id(osm_id)
                    .tag("class", class)
                    .tag("name", format!("{} Avenue", street))
                    .tag("oneway", street % 2 == 0)
                    .tag("osm_id", osm_id)
                    .ring([(s, a), (s, b)])
            });
        }
    }

    // footpaths carry no class and are filtered out
    for i in 0..GRID {
        let s = i * (EXTENT / GRID) + 7;
        builder = builder.feature(GeomType::LineString, |f| {
            f.tag("highway", "footway").ring([(s, 0), (s + 3, EXTENT)])
        });
    }

    builder.build()
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let load_start = Instant::now();
    let mut tile = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading tile from: {}", path);
            let data = fs::read(&path).expect("Failed to read tile");
            println!("Input size: {} bytes", data.len());
            decode_tile(&data).expect("Failed to decode tile")
        }
        None => {
            println!("Synthesizing {}x{} street grid", GRID, GRID);
            Tile { layers: vec![synthesize_roads()] }
        }
    };
    let load_time = load_start.elapsed();

    let features_in: usize = tile.layers.iter().map(|l| l.features.len()).sum();
    let points_in: usize = tile.layers.iter().map(Layer::point_count).sum();
    println!(
        "Loaded {} layers, {} features, {} points in {:?}",
        tile.layers.len(),
        features_in,
        points_in,
        load_time
    );

    let before = encode_tile(&tile).expect("Failed to encode input");

    let pipeline_start = Instant::now();
    for layer in &mut tile.layers {
        merge_layer(project_keys(filter_by_keys(layer, &["class"]), &KEEP));
    }
    let pipeline_time = pipeline_start.elapsed();

    let features_out: usize = tile.layers.iter().map(|l| l.features.len()).sum();
    let points_out: usize = tile.layers.iter().map(Layer::point_count).sum();
    println!(
        "Pipeline: {} -> {} features, {} -> {} points in {:?}",
        features_in, features_out, points_in, points_out, pipeline_time
    );
    for layer in &tile.layers {
        println!(
            "  - {}: {} features, {} keys, {} values",
            layer.name,
            layer.features.len(),
            layer.keys.len(),
            layer.values.len()
        );
    }

    let encode_start = Instant::now();
    let raw = encode_tile(&tile).expect("Failed to encode");
    let encode_time = encode_start.elapsed();

    let compress_start = Instant::now();
    let compressed = encode_tile_compressed(&tile, ZSTD_LEVEL).expect("Failed to compress");
    let compress_time = compress_start.elapsed();

    let decode_start = Instant::now();
    let roundtrip = decode_tile(&compressed).expect("Failed to decode output");
    let decode_time = decode_start.elapsed();
    assert_eq!(roundtrip, tile, "roundtrip mismatch");

    println!("\n=== Sizes ===");
    println!("  input (raw):   {:>10} bytes", before.len());
    println!(
        "  output (raw):  {:>10} bytes ({:.1}%) in {:?}",
        raw.len(),
        raw.len() as f64 * 100.0 / before.len().max(1) as f64,
        encode_time
    );
    println!(
        "  output (zstd): {:>10} bytes ({:.1}%) in {:?}",
        compressed.len(),
        compressed.len() as f64 * 100.0 / before.len().max(1) as f64,
        compress_time
    );
    println!("  decode (zstd): {:?}", decode_time);
}
