//! Bézier curve primitive with per-control-point width.

use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, Vector};
use arrayvec::ArrayVec;

/// The maximum number of control points of a [`Curve`] (cubic Bézier).
pub const MAX_CONTROL_POINTS: usize = 4;

/// Error indicating an inconsistency in the definition of a [`Curve`].
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CurveCreationError {
    /// A curve must have between 2 (linear) and 4 (cubic) control points.
    #[error("a curve must have between 2 and 4 control points, got {0}.")]
    ControlPointCountOutOfRange(usize),
    /// Each control point needs exactly one width.
    #[error("the curve has {points} control points but {widths} widths.")]
    WidthCountMismatch {
        /// Number of control points of the curve.
        points: usize,
        /// Number of widths supplied.
        widths: usize,
    },
}

/// A hair/fur strand segment: a Bézier curve of degree 1, 2, or 3 with one
/// width per control point.
///
/// The curve is a ribbon-like primitive: the width is interpolated along the
/// curve with the same Bernstein basis as the control points.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    points: ArrayVec<Point<Real>, MAX_CONTROL_POINTS>,
    widths: ArrayVec<Real, MAX_CONTROL_POINTS>,
}

impl Curve {
    /// Creates a curve from its control points and per-control-point widths.
    pub fn new(points: &[Point<Real>], widths: &[Real]) -> Result<Self, CurveCreationError> {
        if points.len() < 2 || points.len() > MAX_CONTROL_POINTS {
            return Err(CurveCreationError::ControlPointCountOutOfRange(
                points.len(),
            ));
        }
        if widths.len() != points.len() {
            return Err(CurveCreationError::WidthCountMismatch {
                points: points.len(),
                widths: widths.len(),
            });
        }

        Ok(Self {
            points: points.iter().copied().collect(),
            widths: widths.iter().copied().collect(),
        })
    }

    /// The degree of this curve (1 = linear, 2 = quadratic, 3 = cubic).
    #[inline]
    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    /// The control points of this curve.
    #[inline]
    pub fn control_points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The per-control-point widths of this curve.
    #[inline]
    pub fn widths(&self) -> &[Real] {
        &self.widths
    }

    /// Evaluates the curve at parameter `t ∈ [0, 1]` by de Casteljau subdivision.
    pub fn point_at(&self, t: Real) -> Point<Real> {
        let mut tmp: ArrayVec<Vector<Real>, MAX_CONTROL_POINTS> =
            self.points.iter().map(|p| p.coords).collect();

        for level in (1..tmp.len()).rev() {
            for i in 0..level {
                let (a, b) = (tmp[i], tmp[i + 1]);
                tmp[i] = a.lerp(&b, t);
            }
        }

        tmp[0].into()
    }

    /// Evaluates the interpolated width at parameter `t ∈ [0, 1]`.
    pub fn width_at(&self, t: Real) -> Real {
        let mut tmp = self.widths.clone();

        for level in (1..tmp.len()).rev() {
            for i in 0..level {
                let (a, b) = (tmp[i], tmp[i + 1]);
                tmp[i] = a + (b - a) * t;
            }
        }

        tmp[0]
    }

    /// This curve with all control points mapped by `m`.
    ///
    /// Widths are not affected: `m` is a rigid motion.
    pub fn transformed(&self, m: &Isometry<Real>) -> Self {
        Self {
            points: self.points.iter().map(|pt| m * pt).collect(),
            widths: self.widths.clone(),
        }
    }

    /// The AABB of this curve.
    ///
    /// The convex hull property of Bézier curves lets us bound the curve by
    /// its control points; the box is then dilated by half the maximum width
    /// to account for the ribbon thickness. Degenerate curves (all control
    /// points equal, or zero widths) still produce a valid, possibly
    /// zero-volume, box.
    pub fn local_aabb(&self) -> Aabb {
        let mut aabb = Aabb::from_points(self.points.iter().copied());

        let max_width = self.widths.iter().fold(0.0 as Real, |a, b| a.max(*b));
        let radius = Vector::repeat(max_width * 0.5);
        aabb.mins -= radius;
        aabb.maxs += radius;
        aabb
    }
}

#[cfg(test)]
mod test {
    use super::{Curve, CurveCreationError};
    use crate::math::{Isometry, Point, Real, Vector};
    use approx::assert_relative_eq;

    fn cubic() -> Curve {
        Curve::new(
            &[
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 2.0, 0.0),
                Point::new(2.0, 2.0, 0.0),
                Point::new(3.0, 0.0, 0.0),
            ],
            &[0.2, 0.1, 0.1, 0.05],
        )
        .unwrap()
    }

    #[test]
    fn rejects_inconsistent_definitions() {
        assert_eq!(
            Curve::new(&[Point::origin()], &[1.0]),
            Err(CurveCreationError::ControlPointCountOutOfRange(1))
        );
        assert_eq!(
            Curve::new(&[Point::origin(), Point::new(1.0, 0.0, 0.0)], &[1.0]),
            Err(CurveCreationError::WidthCountMismatch {
                points: 2,
                widths: 1
            })
        );
    }

    #[test]
    fn evaluation_hits_endpoints() {
        let curve = cubic();
        assert_relative_eq!(curve.point_at(0.0), Point::new(0.0, 0.0, 0.0));
        assert_relative_eq!(curve.point_at(1.0), Point::new(3.0, 0.0, 0.0));
        assert_relative_eq!(curve.width_at(0.0), 0.2);
        assert_relative_eq!(curve.width_at(1.0), 0.05);
    }

    #[test]
    fn evaluation_stays_in_hull() {
        let curve = cubic();
        let aabb = curve.local_aabb();
        for i in 0..=16 {
            let t = i as Real / 16.0;
            assert!(aabb.contains_local_point(&curve.point_at(t)));
        }
    }

    #[test]
    fn aabb_is_dilated_by_half_max_width() {
        let curve = cubic();
        let aabb = curve.local_aabb();
        assert_relative_eq!(aabb.mins, Point::new(-0.1, -0.1, -0.1));
        assert_relative_eq!(aabb.maxs, Point::new(3.1, 2.1, 0.1));
    }

    #[test]
    fn transform_moves_points_not_widths() {
        let curve = cubic();
        let m = Isometry::translation(0.0, 0.0, 10.0);
        let moved = curve.transformed(&m);
        assert_eq!(moved.widths(), curve.widths());
        assert_relative_eq!(
            moved.point_at(0.5),
            curve.point_at(0.5) + Vector::new(0.0, 0.0, 10.0)
        );
    }

    #[test]
    fn degenerate_curve_has_valid_zero_volume_aabb() {
        let pt = Point::new(1.0, 1.0, 1.0);
        let curve = Curve::new(&[pt, pt], &[0.0, 0.0]).unwrap();
        let aabb = curve.local_aabb();
        assert!(aabb.is_valid());
        assert_eq!(aabb.volume(), 0.0);
    }
}
