// Core modules for continuous-path 5-axis DED slicing
pub mod geometry;
pub mod orientation;
pub mod toolpath;
pub mod toolpath_patterns;
pub mod gcode;
pub mod slicing;

// Re-export commonly used types
pub use geometry::{Point3D, Vector3D, Triangle};
pub use orientation::{normal_to_angles, triangle_normal, ToolOrientation};
pub use toolpath::{OrientedSample, Toolpath};
pub use toolpath_patterns::{ContinuousPathGenerator, ToolpathPattern};
pub use gcode::{GCodeGenerator, Units};
pub use slicing::{DedSlicer, Shape, SlicerConfig};

/// Main result type for the slicer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the slicer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),
}
