//! Recentering and rescaling of parsed vertices

use nalgebra::{Point3, Vector3};

/// Extents smaller than this are treated as a point-like mesh
pub const DEGENERATE_EXTENT: f32 = 1e-4;

/// Span of the dominant axis after normalization
pub const TARGET_SPAN: f32 = 2.0;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// Bounding box of a point set, or `None` if it is empty
    pub fn from_points(points: &[Point3<f32>]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |bb, p| Self {
                min: bb.min.inf(p),
                max: bb.max.sup(p),
            },
        ))
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f32 {
        self.extents().max()
    }
}

/// Move the bounding-box center to the origin and scale uniformly so the
/// largest extent spans [`TARGET_SPAN`].
///
/// Degenerate inputs (all points coincide) are only recentered.
pub fn normalize(vertices: &mut [Point3<f32>]) {
    let Some(bb) = Aabb::from_points(vertices) else {
        return;
    };

    let center = bb.center();
    let mut max_extent = bb.max_extent();
    if max_extent < DEGENERATE_EXTENT {
        max_extent = 1.0;
    }
    let scale = TARGET_SPAN / max_extent;

    for v in vertices.iter_mut() {
        *v = Point3::from((*v - center) * scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_box() {
        let mut points = vec![
            Point3::new(10.0, 20.0, 30.0),
            Point3::new(14.0, 21.0, 30.5),
        ];
        normalize(&mut points);

        let bb = Aabb::from_points(&points).unwrap();
        assert!((bb.max_extent() - 2.0).abs() < 1e-5);
        assert!(bb.center().coords.norm() < 1e-5);
        assert!((points[0].x + 1.0).abs() < 1e-5);
        assert!((points[1].x - 1.0).abs() < 1e-5);
        // y spans 1 unit out of 4, so it maps to half a unit
        assert!((bb.extents().y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_degenerate() {
        let mut points = vec![Point3::new(3.0, 3.0, 3.0); 4];
        normalize(&mut points);
        for p in &points {
            assert!(p.coords.norm() < 1e-6);
            assert!(p.x.is_finite());
        }
    }

    #[test]
    fn test_normalize_empty() {
        let mut points: Vec<Point3<f32>> = Vec::new();
        normalize(&mut points);
        assert!(points.is_empty());
        assert!(Aabb::from_points(&points).is_none());
    }

    proptest! {
        #[test]
        fn proptest_normalized_bounds(
            coords in prop::collection::vec((-1000.0f32..1000.0, -1000.0f32..1000.0, -1000.0f32..1000.0), 2..40)
        ) {
            let mut points: Vec<_> = coords.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect();
            let extent = Aabb::from_points(&points).unwrap().max_extent();
            prop_assume!(extent > 1.0);

            normalize(&mut points);
            let bb = Aabb::from_points(&points).unwrap();
            prop_assert!((bb.max_extent() - 2.0).abs() < 1e-3);
            prop_assert!(bb.center().coords.norm() < 1e-3);
        }
    }
}
