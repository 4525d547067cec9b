use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// 3D point type (machine world frame, millimeters)
pub type Point3D = Point3<f64>;

/// 3D vector type
pub type Vector3D = Vector3<f64>;

/// Norms below this are treated as degenerate by [`normalize`].
pub const NORMALIZE_EPSILON: f64 = 1e-10;

/// Direction returned by [`normalize`] for degenerate input (+Z, nozzle pointing up).
pub fn fallback_normal() -> Vector3D {
    Vector3D::z()
}

/// Normalize a vector, falling back to +Z for zero-length or non-finite input.
///
/// The fallback keeps NaN out of the angle computation downstream; it is a
/// stable but arbitrary direction, not a geometric answer.
pub fn normalize(v: &Vector3D) -> Vector3D {
    let norm = v.norm();

    if norm < NORMALIZE_EPSILON || !norm.is_finite() {
        log::debug!(
            "normalize: degenerate vector ({:.3e}, {:.3e}, {:.3e}), using +Z fallback",
            v.x, v.y, v.z
        );
        return fallback_normal();
    }

    v / norm
}

pub fn dot(a: &Vector3D, b: &Vector3D) -> f64 {
    a.dot(b)
}

/// Right-handed cross product. `cross(a, b) == -cross(b, a)`.
pub fn cross(a: &Vector3D, b: &Vector3D) -> Vector3D {
    a.cross(b)
}

/// Euclidean distance between two points
pub fn distance(a: &Point3D, b: &Point3D) -> f64 {
    nalgebra::distance(a, b)
}

/// Displacement of a point from the origin
pub fn to_vector(p: &Point3D) -> Vector3D {
    p.coords
}

/// Triangle defined by three vertices
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Triangle {
    pub v0: Point3D,
    pub v1: Point3D,
    pub v2: Point3D,
}

impl Triangle {
    pub fn new(v0: Point3D, v1: Point3D, v2: Point3D) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit normal following the v0 → v1 → v2 winding, or +Z for degenerate triangles
    pub fn normal(&self) -> Vector3D {
        crate::orientation::triangle_normal(&self.v0, &self.v1, &self.v2)
    }
}
