// Continuous toolpath patterns for analytic surfaces
//
// Each generator walks the surface of one shape family and emits samples
// whose normal points away from the material, so the nozzle stays
// perpendicular to the surface it is depositing on.

use crate::geometry::{normalize, Point3D, Vector3D};
use crate::toolpath::{OrientedSample, Toolpath};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Angular resolution of the spiral patterns
pub const SAMPLES_PER_TURN: f64 = 50.0;

/// Minimum number of samples on a spherical latitude ring
pub const MIN_RING_SAMPLES: usize = 8;

/// Available toolpath patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolpathPattern {
    /// Helix on a right circular cylinder
    CylindricalSpiral,
    /// Latitude rings from the north to the south pole
    SphericalBands,
    /// Helix with linearly varying radius
    ConicalSpiral,
}

impl ToolpathPattern {
    pub fn name(&self) -> &'static str {
        match self {
            ToolpathPattern::CylindricalSpiral => "Cylindrical spiral",
            ToolpathPattern::SphericalBands => "Spherical bands",
            ToolpathPattern::ConicalSpiral => "Conical spiral",
        }
    }
}

/// Generates continuous toolpaths around a part without overlays.
///
/// Layer spacing enters through the `pitch` and `num_layers` arguments;
/// the bead width sets the sample spacing along sphere rings.
#[derive(Debug, Clone)]
pub struct ContinuousPathGenerator {
    pub bead_width: f64,
}

impl Default for ContinuousPathGenerator {
    fn default() -> Self {
        Self { bead_width: 1.0 }
    }
}

impl ContinuousPathGenerator {
    pub fn new(bead_width: f64) -> Self {
        Self { bead_width }
    }

    /// Spiral around a cylinder of `radius`, climbing `pitch` per turn up to `height`.
    ///
    /// The radial normal does not depend on z, so every sample has a
    /// horizontal normal and the path is monotonic in z.
    pub fn generate_cylindrical_spiral(&self, radius: f64, height: f64, pitch: f64) -> Toolpath {
        let num_turns = height / pitch;
        let num_points = spiral_sample_count(num_turns);

        let samples = (0..num_points)
            .into_par_iter()
            .map(|i| {
                let t = i as f64 / num_points as f64;
                let z = t * height;
                let theta = t * num_turns * 2.0 * PI;

                let position = Point3D::new(radius * theta.cos(), radius * theta.sin(), z);
                let normal = Vector3D::new(theta.cos(), theta.sin(), 0.0);

                OrientedSample::new(position, normal)
            })
            .collect();

        Toolpath::new(samples)
    }

    /// Cover a sphere with closed latitude rings, north pole first.
    ///
    /// Ring sample counts follow the bead width so that spacing along each
    /// ring stays roughly constant; near the poles the count floors at
    /// [`MIN_RING_SAMPLES`]. Consecutive rings are not connected: the move
    /// from the last sample of one ring to the first of the next is a jump.
    pub fn generate_spherical_path(&self, radius: f64, num_layers: usize) -> Toolpath {
        let rings: Vec<Vec<OrientedSample>> = (0..num_layers)
            .into_par_iter()
            .map(|layer| {
                let phi = if num_layers > 1 {
                    PI * layer as f64 / (num_layers - 1) as f64
                } else {
                    0.0
                };
                self.spherical_ring(radius, phi)
            })
            .collect();

        Toolpath::new(rings.concat())
    }

    fn spherical_ring(&self, radius: f64, phi: f64) -> Vec<OrientedSample> {
        let ring_radius = radius * phi.sin();
        let z = radius * phi.cos();

        let num_points = ring_sample_count(ring_radius, self.bead_width);

        (0..num_points)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / num_points as f64;
                let position = Point3D::new(ring_radius * theta.cos(), ring_radius * theta.sin(), z);
                let normal = normalize(&(position.coords / radius));

                OrientedSample::new(position, normal)
            })
            .collect()
    }

    /// Spiral on a cone frustum from `base_radius` at z = 0 to `top_radius` at `height`.
    ///
    /// With the half-angle `atan2(base_radius - top_radius, height)`, the normal
    /// has radial component `sin(angle)` and axial component `cos(angle)`, turned
    /// to the sample's heading. The sign of the half-angle flips the radial
    /// component between tapering and flaring cones.
    pub fn generate_conical_path(
        &self,
        base_radius: f64,
        top_radius: f64,
        height: f64,
        pitch: f64,
    ) -> Toolpath {
        let num_turns = height / pitch;
        let num_points = spiral_sample_count(num_turns);

        let cone_angle = (base_radius - top_radius).atan2(height);
        let normal_r = cone_angle.sin();
        let normal_z = cone_angle.cos();

        let samples = (0..num_points)
            .into_par_iter()
            .map(|i| {
                let t = i as f64 / num_points as f64;
                let current_radius = base_radius + t * (top_radius - base_radius);
                let z = t * height;
                let theta = t * num_turns * 2.0 * PI;

                let position = Point3D::new(
                    current_radius * theta.cos(),
                    current_radius * theta.sin(),
                    z,
                );
                let normal = normalize(&Vector3D::new(
                    normal_r * theta.cos(),
                    normal_r * theta.sin(),
                    normal_z,
                ));

                OrientedSample::new(position, normal)
            })
            .collect();

        Toolpath::new(samples)
    }
}

/// Number of spiral samples for `num_turns` revolutions. Non-finite or
/// negative turn counts give an empty path.
fn spiral_sample_count(num_turns: f64) -> usize {
    let count = (num_turns * SAMPLES_PER_TURN).round();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}

/// Samples on a ring of `ring_radius` at `bead_width` spacing, never fewer
/// than [`MIN_RING_SAMPLES`]. A zero or non-finite spacing also gives the floor.
fn ring_sample_count(ring_radius: f64, bead_width: f64) -> usize {
    let count = (2.0 * PI * ring_radius / bead_width).round();
    if count.is_finite() && count > MIN_RING_SAMPLES as f64 {
        count as usize
    } else {
        MIN_RING_SAMPLES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::distance;

    #[test]
    fn test_cylindrical_spiral_shape() {
        let generator = ContinuousPathGenerator::new(1.0);
        let path = generator.generate_cylindrical_spiral(10.0, 20.0, 1.0);

        assert_eq!(path.len(), 1000);

        for sample in &path {
            let n = sample.normal();
            assert!(n.z.abs() < 1e-12);
            assert!(((n.x * n.x + n.y * n.y).sqrt() - 1.0).abs() < 1e-9);

            let p = sample.position();
            assert!(((p.x * p.x + p.y * p.y).sqrt() - 10.0).abs() < 1e-9);
        }

        let first = path.first().unwrap();
        assert!((first.normal().x - 1.0).abs() < 1e-3);
        assert!(first.normal().y.abs() < 1e-3);
        assert!(first.normal().z.abs() < 1e-3);
    }

    #[test]
    fn test_cylindrical_spiral_uniform_spacing() {
        let generator = ContinuousPathGenerator::default();
        let path = generator.generate_cylindrical_spiral(10.0, 20.0, 1.0);

        let steps: Vec<f64> = path.step_lengths().collect();
        let first = steps[0];
        for step in &steps {
            assert!((step - first).abs() / first < 0.01);
        }
    }

    #[test]
    fn test_spiral_heights_monotonic() {
        let generator = ContinuousPathGenerator::default();
        let cylinder = generator.generate_cylindrical_spiral(10.0, 10.0, 1.0);
        let cone = generator.generate_conical_path(20.0, 10.0, 30.0, 1.0);

        for path in [&cylinder, &cone] {
            assert!(!path.is_empty());
            for pair in path.samples.windows(2) {
                assert!(pair[1].position().z >= pair[0].position().z);
            }
        }
    }

    #[test]
    fn test_spiral_sample_count_rounds() {
        let generator = ContinuousPathGenerator::default();
        // 2.5 / 1.0 turns * 50 = 125 samples
        assert_eq!(generator.generate_cylindrical_spiral(5.0, 2.5, 1.0).len(), 125);
        // 0.012 turns * 50 = 0.6 -> 1 sample
        assert_eq!(generator.generate_cylindrical_spiral(5.0, 0.012, 1.0).len(), 1);
        assert!(generator.generate_cylindrical_spiral(5.0, 0.001, 1.0).is_empty());
        // Zero pitch means infinitely many turns; no samples rather than a runaway allocation
        assert!(generator.generate_cylindrical_spiral(5.0, 10.0, 0.0).is_empty());
    }

    #[test]
    fn test_spherical_normals_are_unit_and_radial() {
        let generator = ContinuousPathGenerator::new(1.0);
        let path = generator.generate_spherical_path(10.0, 10);

        assert!(!path.is_empty());
        for sample in &path {
            let n = sample.normal();
            assert!((n.norm() - 1.0).abs() < 1e-2);

            let radial = sample.position().coords;
            if radial.norm() > 1e-6 {
                assert!((radial.normalize() - n).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn test_spherical_rings_span_pole_to_pole() {
        let generator = ContinuousPathGenerator::new(1.0);
        let path = generator.generate_spherical_path(10.0, 3);

        // Pole rings collapse to a point and floor at 8 samples;
        // the equator ring has round(2π·10 / 1.0) = 63 samples.
        assert_eq!(path.len(), 8 + 63 + 8);

        let north = &path.samples[0];
        assert!((north.position().z - 10.0).abs() < 1e-9);
        assert!((north.normal() - Vector3D::new(0.0, 0.0, 1.0)).norm() < 1e-9);

        let equator = &path.samples[8];
        assert!(equator.position().z.abs() < 1e-9);
        assert!((equator.position().x - 10.0).abs() < 1e-9);

        let south = path.samples.last().unwrap();
        assert!((south.position().z + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_spherical_bands_are_disconnected() {
        let generator = ContinuousPathGenerator::new(1.0);
        let path = generator.generate_spherical_path(10.0, 5);

        // The move from the north pole ring to the next ring is a jump of
        // roughly one band, much longer than the in-ring spacing.
        let ring_0_end = path.samples[MIN_RING_SAMPLES - 1].position();
        let ring_1_start = path.samples[MIN_RING_SAMPLES].position();
        assert!(distance(&ring_0_end, &ring_1_start) > 5.0);
    }

    #[test]
    fn test_spherical_degenerate_layer_counts() {
        let generator = ContinuousPathGenerator::default();
        assert!(generator.generate_spherical_path(10.0, 0).is_empty());

        let single = generator.generate_spherical_path(10.0, 1);
        assert_eq!(single.len(), MIN_RING_SAMPLES);
        assert!(single.iter().all(|s| (s.position().z - 10.0).abs() < 1e-9));
    }

    #[test]
    fn test_zero_bead_width_floors_ring_count() {
        assert_eq!(ring_sample_count(10.0, 0.0), MIN_RING_SAMPLES);
        assert_eq!(ring_sample_count(10.0, f64::NAN), MIN_RING_SAMPLES);
        assert_eq!(ring_sample_count(10.0, 1.0), 63);

        let generator = ContinuousPathGenerator::new(0.0);
        let path = generator.generate_spherical_path(10.0, 3);
        assert_eq!(path.len(), 3 * MIN_RING_SAMPLES);
    }

    #[test]
    fn test_conical_normals_follow_cone_angle() {
        let generator = ContinuousPathGenerator::default();
        let path = generator.generate_conical_path(20.0, 10.0, 30.0, 1.0);

        let cone_angle = (20.0_f64 - 10.0).atan2(30.0);
        for sample in &path {
            let n = sample.normal();
            assert!((n.norm() - 1.0).abs() < 1e-9);
            assert!((n.z - cone_angle.cos()).abs() < 1e-9);
            assert!(((n.x * n.x + n.y * n.y).sqrt() - cone_angle.sin()).abs() < 1e-9);
        }

        let first = path.first().unwrap();
        assert!((first.position().x - 20.0).abs() < 1e-9);
        assert!(first.normal().x > 0.0);
        assert!(first.normal().y.abs() < 1e-12);

        let last = path.samples.last().unwrap().position();
        let last_radius = (last.x * last.x + last.y * last.y).sqrt();
        assert!(last_radius < 20.0 && last_radius > 10.0);
    }

    #[test]
    fn test_flaring_cone_flips_radial_component() {
        let generator = ContinuousPathGenerator::default();
        let tapering = generator.generate_conical_path(20.0, 10.0, 30.0, 1.0);
        let flaring = generator.generate_conical_path(10.0, 20.0, 30.0, 1.0);

        let t = tapering.first().unwrap().normal();
        let f = flaring.first().unwrap().normal();
        assert!(t.x > 0.0);
        assert!(f.x < 0.0);
        assert!((t.x + f.x).abs() < 1e-9);
        assert!((t.z - f.z).abs() < 1e-9);
    }

    #[test]
    fn test_cone_with_equal_radii_follows_cylinder_positions() {
        let generator = ContinuousPathGenerator::default();
        let cone = generator.generate_conical_path(10.0, 10.0, 20.0, 1.0);
        let cylinder = generator.generate_cylindrical_spiral(10.0, 20.0, 1.0);

        assert_eq!(cone.len(), cylinder.len());
        for (a, b) in cone.iter().zip(cylinder.iter()) {
            assert!(distance(&a.position(), &b.position()) < 1e-9);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = ContinuousPathGenerator::default();
        let a = generator.generate_spherical_path(12.0, 30);
        let b = generator.generate_spherical_path(12.0, 30);
        assert_eq!(a, b);
    }
}
