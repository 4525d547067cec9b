use crate::gcode::{GCodeGenerator, Units};
use crate::toolpath::Toolpath;
use crate::toolpath_patterns::{ContinuousPathGenerator, ToolpathPattern, SAMPLES_PER_TURN};
use crate::{Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

/// A continuous path should not contain a move longer than this multiple
/// of its nominal sample spacing
pub const STEP_TOLERANCE: f64 = 2.0;

/// Configuration for slicing
///
/// Missing keys fall back to the defaults and unknown keys are ignored when
/// loading from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerConfig {
    /// Layer height (mm); spirals advance two layers per turn
    pub layer_height: f64,

    /// Width of a deposited bead (mm), sets sample spacing on spherical rings
    pub bead_width: f64,

    /// Feed rate in length units per minute
    #[serde(alias = "feedrate")]
    pub feed_rate: f64,

    /// Unit system written to the G-code header
    pub units: Units,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            layer_height: 0.5,
            bead_width: 1.0,
            feed_rate: 1000.0,
            units: Units::Millimeters,
        }
    }
}

impl SlicerConfig {
    /// Parse a configuration from JSON, merging it onto the defaults.
    ///
    /// The merged result is validated, so a file that sets a dimension to
    /// zero is rejected here rather than producing an unusable slicer.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Layer height, bead width and feed rate must be finite and positive
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("layer_height", self.layer_height),
            ("bead_width", self.bead_width),
            ("feed_rate", self.feed_rate),
        ];

        for (name, value) in values {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Parametric solids the slicer knows how to walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Cylinder { radius: f64, height: f64 },
    Sphere { radius: f64 },
    Cone { base_radius: f64, top_radius: f64, height: f64 },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Cylinder { .. } => "cylinder",
            Shape::Sphere { .. } => "sphere",
            Shape::Cone { .. } => "cone",
        }
    }

    pub fn pattern(&self) -> ToolpathPattern {
        match self {
            Shape::Cylinder { .. } => ToolpathPattern::CylindricalSpiral,
            Shape::Sphere { .. } => ToolpathPattern::SphericalBands,
            Shape::Cone { .. } => ToolpathPattern::ConicalSpiral,
        }
    }

    /// Reject non-positive or non-finite dimensions.
    ///
    /// Slicing itself never validates; degenerate shapes just produce
    /// degenerate (possibly empty) paths.
    pub fn validate(&self) -> Result<()> {
        let dims = match *self {
            Shape::Cylinder { radius, height } => vec![("radius", radius), ("height", height)],
            Shape::Sphere { radius } => vec![("radius", radius)],
            Shape::Cone { base_radius, top_radius, height } => {
                if !(top_radius.is_finite() && top_radius >= 0.0) {
                    return Err(Error::InvalidShape(format!(
                        "cone top_radius must be >= 0, got {}",
                        top_radius
                    )));
                }
                vec![("base_radius", base_radius), ("height", height)]
            }
        };

        for (name, value) in dims {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidShape(format!(
                    "{} {} must be positive, got {}",
                    self.name(),
                    name,
                    value
                )));
            }
        }

        Ok(())
    }
}

/// Main slicer: one immutable configuration driving the path generators and
/// the G-code writer. Every call is independent of the previous ones.
pub struct DedSlicer {
    config: SlicerConfig,
    path_generator: ContinuousPathGenerator,
    gcode_generator: GCodeGenerator,
}

impl Default for DedSlicer {
    fn default() -> Self {
        Self::new(SlicerConfig::default())
    }
}

impl DedSlicer {
    pub fn new(config: SlicerConfig) -> Self {
        let path_generator = ContinuousPathGenerator::new(config.bead_width);
        let gcode_generator = GCodeGenerator::new(config.feed_rate, config.units);

        Self {
            config,
            path_generator,
            gcode_generator,
        }
    }

    pub fn config(&self) -> &SlicerConfig {
        &self.config
    }

    /// Axial advance per spiral turn (two layers)
    pub fn pitch(&self) -> f64 {
        self.config.layer_height * 2.0
    }

    /// Latitude ring count for a sphere: half the circumference divided by
    /// the layer height, truncated. A non-finite quotient gives no rings.
    pub fn sphere_layers(&self, radius: f64) -> usize {
        let layers = (PI * radius / self.config.layer_height).trunc();
        if layers.is_finite() && layers > 0.0 {
            layers as usize
        } else {
            0
        }
    }

    /// Longest move expected in the toolpath of `shape`.
    ///
    /// Spirals advance one sample per 1/50 turn, so the nominal move is that
    /// chord at the widest radius combined with the axial and radial advance.
    /// Sphere rings are spaced by the bead width along a ring and by the
    /// band spacing between rings. The result is scaled by [`STEP_TOLERANCE`].
    pub fn step_limit(&self, shape: &Shape) -> f64 {
        let pitch = self.pitch();
        let nominal = match *shape {
            Shape::Cylinder { radius, .. } => {
                (2.0 * PI * radius.abs()).hypot(pitch) / SAMPLES_PER_TURN
            }
            Shape::Cone { base_radius, top_radius, height } => {
                let widest = base_radius.abs().max(top_radius.abs());
                let radial_per_turn = (top_radius - base_radius) * pitch / height;
                (2.0 * PI * widest).hypot(pitch).hypot(radial_per_turn) / SAMPLES_PER_TURN
            }
            Shape::Sphere { radius } => {
                let layers = self.sphere_layers(radius);
                let band_spacing = if layers > 1 {
                    PI * radius / (layers - 1) as f64
                } else {
                    0.0
                };
                self.config.bead_width.max(band_spacing)
            }
        };

        nominal * STEP_TOLERANCE
    }

    pub fn cylinder_toolpath(&self, radius: f64, height: f64) -> Toolpath {
        log::info!("Generating toolpath for cylinder (R={}, H={})...", radius, height);
        let toolpath = self
            .path_generator
            .generate_cylindrical_spiral(radius, height, self.pitch());
        let limit = self.step_limit(&Shape::Cylinder { radius, height });
        report(&toolpath, limit, log::Level::Warn);
        toolpath
    }

    pub fn sphere_toolpath(&self, radius: f64) -> Toolpath {
        log::info!("Generating toolpath for sphere (R={})...", radius);
        let num_layers = self.sphere_layers(radius);
        log::info!("  Latitude rings: {}", num_layers);
        let toolpath = self.path_generator.generate_spherical_path(radius, num_layers);
        // Ring-to-ring moves are expected jumps, so overshoots only go to debug
        report(&toolpath, self.step_limit(&Shape::Sphere { radius }), log::Level::Debug);
        toolpath
    }

    pub fn cone_toolpath(&self, base_radius: f64, top_radius: f64, height: f64) -> Toolpath {
        log::info!(
            "Generating toolpath for cone (Base R={}, Top R={}, H={})...",
            base_radius, top_radius, height
        );
        let toolpath = self.path_generator.generate_conical_path(
            base_radius,
            top_radius,
            height,
            self.pitch(),
        );
        let limit = self.step_limit(&Shape::Cone { base_radius, top_radius, height });
        report(&toolpath, limit, log::Level::Warn);
        toolpath
    }

    pub fn toolpath(&self, shape: &Shape) -> Toolpath {
        match *shape {
            Shape::Cylinder { radius, height } => self.cylinder_toolpath(radius, height),
            Shape::Sphere { radius } => self.sphere_toolpath(radius),
            Shape::Cone { base_radius, top_radius, height } => {
                self.cone_toolpath(base_radius, top_radius, height)
            }
        }
    }

    /// Slice a cylinder with a continuous spiral, returning the G-code
    pub fn slice_cylinder(&self, radius: f64, height: f64) -> String {
        self.gcode_generator
            .generate(&self.cylinder_toolpath(radius, height))
    }

    /// Slice a sphere with latitude rings, returning the G-code
    pub fn slice_sphere(&self, radius: f64) -> String {
        self.gcode_generator.generate(&self.sphere_toolpath(radius))
    }

    /// Slice a cone frustum with a tapered spiral, returning the G-code
    pub fn slice_cone(&self, base_radius: f64, top_radius: f64, height: f64) -> String {
        self.gcode_generator
            .generate(&self.cone_toolpath(base_radius, top_radius, height))
    }

    pub fn slice_shape(&self, shape: &Shape) -> String {
        self.gcode_generator.generate(&self.toolpath(shape))
    }

    /// Slice several shapes in parallel. Output order matches input order.
    pub fn slice_shapes(&self, shapes: &[Shape]) -> Vec<String> {
        shapes.par_iter().map(|shape| self.slice_shape(shape)).collect()
    }

    /// Validate, slice and write the G-code for `shape` to `path`
    pub fn slice_shape_to_file<P: AsRef<Path>>(&self, shape: &Shape, path: P) -> Result<String> {
        shape.validate()?;
        let gcode = self.slice_shape(shape);
        write_gcode(&path, &gcode)?;
        log::info!("G-code written to {:?}", path.as_ref());
        Ok(gcode)
    }
}

/// Persist a G-code document
pub fn write_gcode<P: AsRef<Path>>(path: P, gcode: &str) -> Result<()> {
    std::fs::write(path, gcode)?;
    Ok(())
}

/// Log a freshly generated path and return how many moves exceed `step_limit`.
/// Those moves are reported at `level`.
fn report(toolpath: &Toolpath, step_limit: f64, level: log::Level) -> usize {
    log::info!("Generated {} toolpath points", toolpath.len());
    if toolpath.len() < 2 {
        return 0;
    }

    log::debug!(
        "  Path length: {:.1} mm, longest move: {:.3} mm",
        toolpath.total_length(),
        toolpath.max_step_length()
    );

    let long_steps = toolpath.count_steps_longer_than(step_limit);
    if long_steps > 0 {
        log::log!(
            level,
            "  {} of {} moves exceed {:.3} mm (longest {:.3} mm)",
            long_steps,
            toolpath.len() - 1,
            step_limit,
            toolpath.max_step_length()
        );
    }
    long_steps
}
