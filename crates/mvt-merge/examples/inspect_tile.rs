//! Simple decoder to inspect vector tile files.

use std::fs;

use mvt_merge::{decode_tile, validate_tile, GeomType};

fn main() {
    let path = std::env::args()
        .nth(1)
        .expect("usage: inspect_tile <file.mvt>");
    let limit: usize = std::env::args()
        .nth(2)
        .and_then(|n| n.parse().ok())
        .unwrap_or(5);

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let tile = decode_tile(&data).expect("Failed to decode");
    if let Err(e) = validate_tile(&tile) {
        println!("Warning: {}", e);
    }

    println!("\n=== Layers ({}) ===", tile.layers.len());
    for layer in &tile.layers {
        let mut by_type = [0usize; 4];
        for feature in &layer.features {
            by_type[feature.geom_type as usize] += 1;
        }

        println!("\n[{}] v{} extent={}", layer.name, layer.version, layer.extent);
        println!(
            "  {} features ({} points, {} lines, {} polygons, {} unknown)",
            layer.features.len(),
            by_type[GeomType::Point as usize],
            by_type[GeomType::LineString as usize],
            by_type[GeomType::Polygon as usize],
            by_type[GeomType::Unknown as usize],
        );
        println!(
            "  {} keys, {} values, {} vertices",
            layer.keys.len(),
            layer.values.len(),
            layer.point_count()
        );

        for feature in layer.features.iter().take(limit) {
            let id = feature.id.map_or_else(|| "-".to_string(), |id| id.to_string());
            println!(
                "  #{} {} rings={} points={}",
                id,
                feature.geom_type.name(),
                feature.geometry.len(),
                feature.point_count()
            );
            for (key, value) in layer.properties(feature) {
                println!("    {} = {} ({})", key, value, value.kind());
            }
        }
        if layer.features.len() > limit {
            println!("  ... {} more", layer.features.len() - limit);
        }
    }
}
