// Surface normal -> rotary axis angles for a two-axis (A/B) head
use crate::geometry::{cross, normalize, Point3D, Vector3D};
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Tool orientation for a 5-axis head, in degrees.
///
/// The nozzle starts along world +Z, is tilted by `b` about Y, then by `a`
/// about the tilted X axis. Roll about the nozzle axis is left free since
/// the deposition nozzle is axisymmetric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolOrientation {
    /// A-axis (rotation about X)
    pub a: f64,
    /// B-axis (rotation about Y)
    pub b: f64,
}

impl ToolOrientation {
    /// Nozzle direction reached by applying the two rotations to +Z
    pub fn tool_axis(&self) -> Vector3D {
        let about_y = Rotation3::from_axis_angle(&Vector3::y_axis(), self.b.to_radians());
        let about_x = Rotation3::from_axis_angle(&Vector3::x_axis(), self.a.to_radians());
        about_y * about_x * Vector3D::z()
    }
}

/// Unit normal of the triangle (p1, p2, p3), counter-clockwise winding.
///
/// Collinear or coincident vertices give the +Z fallback of [`normalize`].
pub fn triangle_normal(p1: &Point3D, p2: &Point3D, p3: &Point3D) -> Vector3D {
    let edge1 = p2 - p1;
    let edge2 = p3 - p1;
    normalize(&cross(&edge1, &edge2))
}

/// Convert a unit surface normal into A/B angles (degrees).
///
/// Single fixed-order decomposition: `b = atan2(n.x, n.z)`,
/// `a = atan2(-n.y, sqrt(n.x² + n.z²))`. A normal along ±Y lands on
/// a = ∓90°, b = 0 with no gimbal-lock warning.
pub fn normal_to_angles(normal: &Vector3D) -> ToolOrientation {
    let b = normal.x.atan2(normal.z).to_degrees();
    let a = (-normal.y)
        .atan2((normal.x * normal.x + normal.z * normal.z).sqrt())
        .to_degrees();

    // Adding +0.0 turns -0.0 into 0.0 so output never reads "A-0.000"
    ToolOrientation { a: a + 0.0, b: b + 0.0 }
}
