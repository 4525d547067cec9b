// Example: slice the three reference shapes to G-code files

use ded_slicer::*;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("5-Axis DED Slicer - Continuous Path Generation");
    log::info!("==============================================\n");

    // Optional JSON config as the first argument, defaults otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            SlicerConfig::load(path)?
        }
        None => SlicerConfig {
            feed_rate: 800.0,
            ..SlicerConfig::default()
        },
    };
    log::info!("  Layer height: {} mm", config.layer_height);
    log::info!("  Bead width: {} mm", config.bead_width);
    log::info!("  Feed rate: {}\n", config.feed_rate);

    let slicer = DedSlicer::new(config);

    let jobs = [
        (Shape::Cylinder { radius: 20.0, height: 50.0 }, "cylinder_5axis.gcode"),
        (Shape::Sphere { radius: 25.0 }, "sphere_5axis.gcode"),
        (Shape::Cone { base_radius: 30.0, top_radius: 10.0, height: 40.0 }, "cone_5axis.gcode"),
    ];

    for (i, (shape, file)) in jobs.iter().enumerate() {
        log::info!("{}. Slicing {}...", i + 1, shape.pattern().name());
        let output_path = PathBuf::from(file);
        let gcode = slicer.slice_shape_to_file(shape, &output_path)?;
        log::info!("  {} lines\n", gcode.lines().count());
    }

    log::info!("✓ Slicing complete! Generated {} G-code files:", jobs.len());
    for (_, file) in &jobs {
        log::info!("  - {}", file);
    }

    Ok(())
}
