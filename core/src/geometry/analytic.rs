//! Analytic geometry
//!
//! Concrete points, lines and circles with tolerance-based equality

use crate::ir::ObjectKind;
use serde::{Deserialize, Serialize};

/// Absolute tolerance for comparing coordinates
pub const EPSILON: f64 = 1e-6;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 2D point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Dot product with another point (as vectors from origin)
    pub fn dot(&self, other: &Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product z-component (for 2D)
    pub fn cross_z(&self, other: &Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn add(&self, other: &Point2D) -> Point2D {
        Point2D::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: &Point2D) -> Point2D {
        Point2D::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(&self, factor: f64) -> Point2D {
        Point2D::new(self.x * factor, self.y * factor)
    }

    pub fn approx_eq(&self, other: &Point2D) -> bool {
        approx(self.x, other.x) && approx(self.y, other.y)
    }
}

/// Line `a·x + b·y + c = 0` with a unit normal `(a, b)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line2D {
    /// Line from coefficients, normalized; `None` if `(a, b)` vanishes
    pub fn new(a: f64, b: f64, c: f64) -> Option<Self> {
        let norm = (a * a + b * b).sqrt();
        if norm < EPSILON {
            return None;
        }
        Some(Self {
            a: a / norm,
            b: b / norm,
            c: c / norm,
        })
    }

    /// Line through two distinct points
    pub fn through(p: &Point2D, q: &Point2D) -> Option<Self> {
        if p.approx_eq(q) {
            return None;
        }
        let a = q.y - p.y;
        let b = p.x - q.x;
        Line2D::new(a, b, -(a * p.x + b * p.y))
    }

    /// Line through a point with the given normal vector
    pub fn with_normal(point: &Point2D, normal: &Point2D) -> Option<Self> {
        Line2D::new(normal.x, normal.y, -normal.dot(point))
    }

    pub fn normal(&self) -> Point2D {
        Point2D::new(self.a, self.b)
    }

    pub fn direction(&self) -> Point2D {
        Point2D::new(-self.b, self.a)
    }

    /// Signed distance of a point from the line
    pub fn signed_distance(&self, p: &Point2D) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    pub fn contains(&self, p: &Point2D) -> bool {
        self.signed_distance(p).abs() < EPSILON
    }

    /// Foot of the perpendicular from a point
    pub fn project(&self, p: &Point2D) -> Point2D {
        p.sub(&self.normal().scale(self.signed_distance(p)))
    }

    /// Intersection point; `None` for parallel lines
    pub fn intersect(&self, other: &Line2D) -> Option<Point2D> {
        if ops::are_parallel(self, other, EPSILON) {
            return None;
        }
        let det = self.a * other.b - self.b * other.a;
        Some(Point2D::new(
            (self.b * other.c - other.b * self.c) / det,
            (other.a * self.c - self.a * other.c) / det,
        ))
    }

    /// Equality up to the sign of the normalized coefficients
    pub fn approx_eq(&self, other: &Line2D) -> bool {
        let same = approx(self.a, other.a) && approx(self.b, other.b) && approx(self.c, other.c);
        let opposite = approx(self.a, -other.a) && approx(self.b, -other.b) && approx(self.c, -other.c);
        same || opposite
    }
}

/// Circle with center and positive radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle2D {
    pub center: Point2D,
    pub radius: f64,
}

impl Circle2D {
    pub fn new(center: Point2D, radius: f64) -> Option<Self> {
        if radius < EPSILON {
            return None;
        }
        Some(Self { center, radius })
    }

    /// Circle through three non-collinear points
    pub fn through(p: &Point2D, q: &Point2D, r: &Point2D) -> Option<Self> {
        if ops::are_collinear(*p, *q, *r, EPSILON) {
            return None;
        }
        let d = 2.0 * (p.x * (q.y - r.y) + q.x * (r.y - p.y) + r.x * (p.y - q.y));
        let (p2, q2, r2) = (p.dot(p), q.dot(q), r.dot(r));
        let center = Point2D::new(
            (p2 * (q.y - r.y) + q2 * (r.y - p.y) + r2 * (p.y - q.y)) / d,
            (p2 * (r.x - q.x) + q2 * (p.x - r.x) + r2 * (q.x - p.x)) / d,
        );
        Circle2D::new(center, center.distance(p))
    }

    pub fn approx_eq(&self, other: &Circle2D) -> bool {
        self.center.approx_eq(&other.center) && approx(self.radius, other.radius)
    }
}

/// A realized object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnalyticObject {
    Point(Point2D),
    Line(Line2D),
    Circle(Circle2D),
}

impl AnalyticObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            AnalyticObject::Point(_) => ObjectKind::Point,
            AnalyticObject::Line(_) => ObjectKind::Line,
            AnalyticObject::Circle(_) => ObjectKind::Circle,
        }
    }

    /// Tolerance-based equality; objects of different kinds never match
    pub fn approx_eq(&self, other: &AnalyticObject) -> bool {
        match (self, other) {
            (AnalyticObject::Point(p), AnalyticObject::Point(q)) => p.approx_eq(q),
            (AnalyticObject::Line(l), AnalyticObject::Line(m)) => l.approx_eq(m),
            (AnalyticObject::Circle(c), AnalyticObject::Circle(d)) => c.approx_eq(d),
            _ => false,
        }
    }

    pub fn as_point(&self) -> Option<Point2D> {
        match self {
            AnalyticObject::Point(p) => Some(*p),
            _ => None,
        }
    }
}

/// Geometric predicates on coordinates
pub mod ops {
    use super::*;

    /// Check if three points are collinear (using cross product)
    pub fn are_collinear(p1: Point2D, p2: Point2D, p3: Point2D, epsilon: f64) -> bool {
        let v1 = p2.sub(&p1);
        let v2 = p3.sub(&p1);
        v1.cross_z(&v2).abs() < epsilon
    }

    /// Check if two lines are parallel
    pub fn are_parallel(l1: &Line2D, l2: &Line2D, epsilon: f64) -> bool {
        l1.normal().cross_z(&l2.normal()).abs() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);

        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_collinearity() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(1.0, 1.0);
        let p3 = Point2D::new(2.0, 2.0);

        assert!(ops::are_collinear(p1, p2, p3, 1e-10));
        assert!(!ops::are_collinear(p1, p2, Point2D::new(2.0, 2.5), 1e-10));
    }

    #[test]
    fn test_line_equality_ignores_orientation() {
        let p = Point2D::new(1.0, 2.0);
        let q = Point2D::new(-3.0, 5.0);
        let l1 = Line2D::through(&p, &q).unwrap();
        let l2 = Line2D::through(&q, &p).unwrap();

        assert!(l1.approx_eq(&l2));
        assert!(l1.contains(&p) && l1.contains(&q));
    }

    #[test]
    fn test_line_intersection() {
        let x_axis = Line2D::new(0.0, 1.0, 0.0).unwrap();
        let y_axis = Line2D::new(1.0, 0.0, 0.0).unwrap();

        let origin = x_axis.intersect(&y_axis).unwrap();
        assert!(origin.approx_eq(&Point2D::new(0.0, 0.0)));
        assert!(!ops::are_parallel(&x_axis, &y_axis, 1e-10));

        let shifted = Line2D::new(0.0, 1.0, -3.0).unwrap();
        assert!(x_axis.intersect(&shifted).is_none());
        assert!(ops::are_parallel(&x_axis, &shifted, 1e-10));
    }

    #[test]
    fn test_projection() {
        let x_axis = Line2D::new(0.0, 1.0, 0.0).unwrap();
        let foot = x_axis.project(&Point2D::new(2.0, 7.0));
        assert!(foot.approx_eq(&Point2D::new(2.0, 0.0)));
    }

    #[test]
    fn test_circle_through_points() {
        let c = Circle2D::through(
            &Point2D::new(1.0, 0.0),
            &Point2D::new(-1.0, 0.0),
            &Point2D::new(0.0, 1.0),
        )
        .unwrap();

        assert!(c.center.approx_eq(&Point2D::new(0.0, 0.0)));
        assert!((c.radius - 1.0).abs() < 1e-10);

        let collinear = Circle2D::through(
            &Point2D::new(0.0, 0.0),
            &Point2D::new(1.0, 1.0),
            &Point2D::new(2.0, 2.0),
        );
        assert!(collinear.is_none());
    }

    #[test]
    fn test_kinds_never_equal() {
        let p = AnalyticObject::Point(Point2D::new(0.0, 0.0));
        let c = AnalyticObject::Circle(Circle2D::new(Point2D::new(0.0, 0.0), 1.0).unwrap());
        assert!(!p.approx_eq(&c));
        assert_eq!(c.kind(), ObjectKind::Circle);
    }
}
