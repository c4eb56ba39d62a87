//! Page-space geometry: points, rectangles, and affine matrices.
//!
//! Coordinates follow the PDF default user space: origin at the bottom-left
//! corner of the page, y growing upwards.

/// A point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with a bottom-left origin.
///
/// `width` and `height` are never negative. Use [`Rect::from_corners`] to
/// build one from the diagonal two-corner form PDF uses for `/Rect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its origin and extents.
    ///
    /// Negative extents are folded back so the origin stays bottom-left.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(x, y, x + width, y + height)
    }

    /// Normalize two diagonally opposite corners, given in any order.
    pub fn from_corners(x1: f64, y1: f64, x3: f64, y3: f64) -> Self {
        Self {
            x: x1.min(x3),
            y: y1.min(y3),
            width: (x3 - x1).abs(),
            height: (y3 - y1).abs(),
        }
    }

    /// Build from a `[x1, y1, x3, y3]` array as stored in `/Rect`.
    pub fn from_array(coords: [f64; 4]) -> Self {
        Self::from_corners(coords[0], coords[1], coords[2], coords[3])
    }

    /// Smallest rectangle enclosing all `points`, or `None` when empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_corners(min_x, min_y, max_x, max_y))
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge (`y + height`).
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Vertical midpoint.
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// True when the rectangle has no area (or is not finite).
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite())
    }

    /// True iff `inner` lies entirely within `self`, edges inclusive.
    ///
    /// A box that pokes out on any side, even by a fraction of a unit, is
    /// not contained.
    pub fn contains(&self, inner: &Rect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.top() <= self.top()
    }
}

/// Affine transformation matrix in PDF form `[a b c d e f]`.
///
/// Represents the 3x3 matrix
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
/// applied to row vectors: `[x' y' 1] = [x y 1] × M`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Matrix product `self × other`.
    pub fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Length a unit vertical vector has after transformation.
    pub fn vertical_scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn from_corners_normalizes_any_order() {
        let expected = Rect {
            x: 10.0,
            y: 20.0,
            width: 40.0,
            height: 30.0,
        };
        assert_eq!(Rect::from_corners(10.0, 20.0, 50.0, 50.0), expected);
        assert_eq!(Rect::from_corners(50.0, 50.0, 10.0, 20.0), expected);
        assert_eq!(Rect::from_corners(10.0, 50.0, 50.0, 20.0), expected);
        assert_eq!(Rect::from_corners(50.0, 20.0, 10.0, 50.0), expected);
    }

    #[test]
    fn new_folds_negative_extents() {
        let r = Rect::new(50.0, 50.0, -40.0, -30.0);
        assert_eq!(r, Rect::from_corners(10.0, 20.0, 50.0, 50.0));
        assert!(r.width >= 0.0 && r.height >= 0.0);
    }

    #[test]
    fn from_array_matches_pdf_rect() {
        let r = Rect::from_array([70.0, 712.0, 125.0, 695.0]);
        assert_eq!(r.x, 70.0);
        assert_eq!(r.y, 695.0);
        assert_eq!(r.width, 55.0);
        assert_eq!(r.height, 17.0);
        assert_eq!(r.right(), 125.0);
        assert_eq!(r.top(), 712.0);
    }

    #[test]
    fn from_points_encloses_all() {
        let r = Rect::from_points(&[
            Point::new(3.0, 7.0),
            Point::new(-1.0, 2.0),
            Point::new(5.0, 4.0),
        ])
        .unwrap();
        assert_eq!(r, Rect::from_corners(-1.0, 2.0, 5.0, 7.0));
        assert!(Rect::from_points(&[]).is_none());
    }

    #[test]
    fn contains_fully_enclosed() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&Rect::new(10.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&outer));
        assert!(outer.contains(&Rect::new(0.0, 0.0, 100.0, 1.0)));
    }

    #[test]
    fn contains_rejects_half_unit_overhang_on_each_side() {
        let outer = Rect::new(10.0, 10.0, 50.0, 50.0);
        let inside = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert!(outer.contains(&inside));

        let left = Rect::new(9.5, 20.0, 10.0, 10.0);
        let bottom = Rect::new(20.0, 9.5, 10.0, 10.0);
        let right = Rect::new(50.5, 20.0, 10.0, 10.0);
        let top = Rect::new(20.0, 50.5, 10.0, 10.0);
        for partial in [left, bottom, right, top] {
            assert!(!outer.contains(&partial), "{partial:?} should not be contained");
        }
    }

    #[test]
    fn contains_rejects_disjoint_and_larger() {
        let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!outer.contains(&Rect::new(20.0, 20.0, 5.0, 5.0)));
        assert!(!outer.contains(&Rect::new(-1.0, -1.0, 12.0, 12.0)));
    }

    #[test]
    fn contains_rejects_nan() {
        let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
        let nan = Rect {
            x: f64::NAN,
            y: 1.0,
            width: 1.0,
            height: 1.0,
        };
        assert!(!outer.contains(&nan));
    }

    #[test]
    fn degenerate_rects() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, 0.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).is_degenerate());
        let inf = Rect {
            x: 0.0,
            y: 0.0,
            width: f64::INFINITY,
            height: 1.0,
        };
        assert!(inf.is_degenerate());
    }

    #[test]
    fn ctm_concat_translation_then_scale() {
        let translate = Ctm::translation(10.0, 20.0);
        let scale = Ctm::new(2.0, 0.0, 0.0, 3.0, 0.0, 0.0);
        let m = translate.concat(&scale);
        let p = m.transform_point(Point::new(1.0, 1.0));
        assert_approx(p.x, 22.0);
        assert_approx(p.y, 63.0);
    }

    #[test]
    fn ctm_identity_is_neutral() {
        let m = Ctm::new(1.5, 0.2, -0.3, 2.0, 7.0, -4.0);
        assert_eq!(m.concat(&Ctm::identity()), m);
        assert_eq!(Ctm::identity().concat(&m), m);
        assert_eq!(Ctm::default(), Ctm::identity());
    }

    #[test]
    fn ctm_vertical_scale() {
        assert_approx(Ctm::new(12.0, 0.0, 0.0, 12.0, 0.0, 0.0).vertical_scale(), 12.0);
        assert_approx(Ctm::new(0.0, 3.0, -4.0, 0.0, 0.0, 0.0).vertical_scale(), 4.0);
    }
}
