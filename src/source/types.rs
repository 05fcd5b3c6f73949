//! Point sample types shared across the capture and conversion phases.
//!
//! Coordinates stay double-precision through capture and the intermediate
//! record file; narrowing to single precision happens only at the binary
//! encode boundary.

use serde::{Deserialize, Serialize};

/// A single (x, y, z) point sample from the sensor feed.
///
/// Coordinates may be non-finite (NaN/inf) at ingestion time; the capture
/// session filters such samples before they reach persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Whether all three coordinates are finite (not NaN, not infinite).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The coordinates in flattening order: x, then y, then z.
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// An ordered group of point samples delivered together by the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointBatch {
    pub points: Vec<Point3D>,
}

impl PointBatch {
    pub fn new(points: Vec<Point3D>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// An ordered sequence of valid point samples.
///
/// Insertion order is arrival order and is semantically significant: the
/// record file and the binary blob both preserve it. Serializes as a bare
/// array of `{x, y, z}` records, which is exactly the intermediate file
/// format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSet {
    points: Vec<Point3D>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point3D) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3D> {
        self.points.iter()
    }

    pub fn points(&self) -> &[Point3D] {
        &self.points
    }
}

impl From<Vec<Point3D>> for PointSet {
    fn from(points: Vec<Point3D>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point3D> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point3D>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finiteness_check() {
        assert!(Point3D::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Point3D::new(1.0, f64::NAN, 3.0).is_finite());
        assert!(!Point3D::new(f64::INFINITY, 0.0, 0.0).is_finite());
        assert!(!Point3D::new(0.0, 0.0, f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn test_point_set_preserves_insertion_order() {
        let mut set = PointSet::new();
        set.push(Point3D::new(3.0, 0.0, 0.0));
        set.push(Point3D::new(1.0, 0.0, 0.0));
        set.push(Point3D::new(2.0, 0.0, 0.0));

        let xs: Vec<f64> = set.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_point_set_serializes_as_record_array() {
        let set: PointSet = vec![Point3D::new(1.0, 2.0, 3.0)].into();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"[{"x":1.0,"y":2.0,"z":3.0}]"#);

        let back: PointSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
