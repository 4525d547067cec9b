use crate::geometry::{distance, Point3D, Vector3D};
use crate::orientation::{normal_to_angles, ToolOrientation};
use serde::{Deserialize, Serialize};

/// A single point of a 5-axis toolpath: position, outward surface normal,
/// and the A/B angles that put the nozzle along that normal.
///
/// The angles are derived from the normal on construction and whenever the
/// normal is replaced, so they always agree with it. Deserialization reads
/// only position and normal and recomputes the angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SampleRecord")]
pub struct OrientedSample {
    position: Point3D,
    normal: Vector3D,
    orientation: ToolOrientation,
}

/// Serialized form accepted when reading a sample back
#[derive(Deserialize)]
struct SampleRecord {
    position: Point3D,
    normal: Vector3D,
}

impl From<SampleRecord> for OrientedSample {
    fn from(record: SampleRecord) -> Self {
        OrientedSample::new(record.position, record.normal)
    }
}

impl OrientedSample {
    pub fn new(position: Point3D, normal: Vector3D) -> Self {
        Self {
            position,
            normal,
            orientation: normal_to_angles(&normal),
        }
    }

    pub fn position(&self) -> Point3D {
        self.position
    }

    pub fn normal(&self) -> Vector3D {
        self.normal
    }

    pub fn orientation(&self) -> ToolOrientation {
        self.orientation
    }

    /// A-axis angle in degrees
    pub fn a_angle(&self) -> f64 {
        self.orientation.a
    }

    /// B-axis angle in degrees
    pub fn b_angle(&self) -> f64 {
        self.orientation.b
    }

    pub fn set_normal(&mut self, normal: Vector3D) {
        self.normal = normal;
        self.orientation = normal_to_angles(&normal);
    }
}

/// Ordered sequence of oriented samples, in machine traversal order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Toolpath {
    pub samples: Vec<OrientedSample>,
}

impl Toolpath {
    pub fn new(samples: Vec<OrientedSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrientedSample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&OrientedSample> {
        self.samples.first()
    }

    /// Distances between consecutive samples
    pub fn step_lengths(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples
            .windows(2)
            .map(|w| distance(&w[0].position, &w[1].position))
    }

    /// Longest move between two consecutive samples (0 for fewer than two samples)
    pub fn max_step_length(&self) -> f64 {
        self.step_lengths().fold(0.0, f64::max)
    }

    /// Total travelled length along the path
    pub fn total_length(&self) -> f64 {
        self.step_lengths().sum()
    }

    /// Number of moves longer than `limit`. A healthy continuous path has none.
    pub fn count_steps_longer_than(&self, limit: f64) -> usize {
        self.step_lengths().filter(|&d| d > limit).count()
    }

    /// Axis-aligned bounds (min, max) of all sample positions
    pub fn bounds(&self) -> Option<(Point3D, Point3D)> {
        let first = self.samples.first()?.position;

        Some(self.samples.iter().fold((first, first), |(mut min, mut max), s| {
            let p = s.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
            (min, max)
        }))
    }
}

impl From<Vec<OrientedSample>> for Toolpath {
    fn from(samples: Vec<OrientedSample>) -> Self {
        Self::new(samples)
    }
}

impl<'a> IntoIterator for &'a Toolpath {
    type Item = &'a OrientedSample;
    type IntoIter = std::slice::Iter<'a, OrientedSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
