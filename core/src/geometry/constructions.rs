//! Geometric constructions
//!
//! Realizers for the predefined catalogue. Pure functions of their inputs:
//! `None` means the construction is not possible for these values.

use super::analytic::{ops, AnalyticObject, Circle2D, Line2D, Point2D, EPSILON};
use crate::ir::PredefinedConstruction;

/// Realize a predefined construction from flattened inputs
///
/// Inputs follow the flattened signature order. Returns `None` on wrong
/// arity or kinds as well as on degenerate inputs.
pub fn realize_predefined(
    construction: PredefinedConstruction,
    inputs: &[AnalyticObject],
) -> Option<AnalyticObject> {
    use AnalyticObject as A;
    use PredefinedConstruction::*;

    match (construction, inputs) {
        (LineFromPoints, [A::Point(p), A::Point(q)]) => Line2D::through(p, q).map(A::Line),
        (Midpoint, [A::Point(p), A::Point(q)]) => midpoint(p, q).map(A::Point),
        (PerpendicularBisector, [A::Point(p), A::Point(q)]) => {
            perpendicular_bisector(p, q).map(A::Line)
        }
        (Circumcircle, [A::Point(p), A::Point(q), A::Point(r)]) => {
            Circle2D::through(p, q, r).map(A::Circle)
        }
        (Circumcenter, [A::Point(p), A::Point(q), A::Point(r)]) => {
            Circle2D::through(p, q, r).map(|c| A::Point(c.center))
        }
        (Incenter, [A::Point(p), A::Point(q), A::Point(r)]) => incenter(p, q, r).map(A::Point),
        (Centroid, [A::Point(p), A::Point(q), A::Point(r)]) => centroid(p, q, r).map(A::Point),
        (IntersectionOfLines, [A::Line(l), A::Line(m)]) => {
            if ops::are_parallel(l, m, EPSILON) {
                return None;
            }
            l.intersect(m).map(A::Point)
        }
        (PerpendicularProjection, [A::Point(p), A::Line(l)]) => {
            if l.contains(p) {
                return None;
            }
            Some(A::Point(l.project(p)))
        }
        (PerpendicularLine, [A::Point(p), A::Line(l)]) => {
            Line2D::with_normal(p, &l.direction()).map(A::Line)
        }
        (ParallelLine, [A::Point(p), A::Line(l)]) => {
            if l.contains(p) {
                return None;
            }
            Line2D::with_normal(p, &l.normal()).map(A::Line)
        }
        (ReflectionInLine, [A::Point(p), A::Line(l)]) => {
            if l.contains(p) {
                return None;
            }
            let foot = l.project(p);
            Some(A::Point(foot.scale(2.0).sub(p)))
        }
        (PointReflection, [A::Point(p), A::Point(center)]) => {
            if p.approx_eq(center) {
                return None;
            }
            Some(A::Point(center.scale(2.0).sub(p)))
        }
        (CenterOfCircle, [A::Circle(c)]) => Some(A::Point(c.center)),
        _ => None,
    }
}

fn midpoint(p: &Point2D, q: &Point2D) -> Option<Point2D> {
    if p.approx_eq(q) {
        return None;
    }
    Some(p.add(q).scale(0.5))
}

fn perpendicular_bisector(p: &Point2D, q: &Point2D) -> Option<Line2D> {
    let mid = midpoint(p, q)?;
    Line2D::with_normal(&mid, &q.sub(p))
}

fn centroid(p: &Point2D, q: &Point2D, r: &Point2D) -> Option<Point2D> {
    if ops::are_collinear(*p, *q, *r, EPSILON) {
        return None;
    }
    Some(p.add(q).add(r).scale(1.0 / 3.0))
}

fn incenter(p: &Point2D, q: &Point2D, r: &Point2D) -> Option<Point2D> {
    if ops::are_collinear(*p, *q, *r, EPSILON) {
        return None;
    }
    // Vertices weighted by the length of the opposite side
    let (wp, wq, wr) = (q.distance(r), r.distance(p), p.distance(q));
    let total = wp + wq + wr;
    Some(p.scale(wp).add(&q.scale(wq)).add(&r.scale(wr)).scale(1.0 / total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64) -> AnalyticObject {
        AnalyticObject::Point(Point2D::new(x, y))
    }

    fn line(a: f64, b: f64, c: f64) -> AnalyticObject {
        AnalyticObject::Line(Line2D::new(a, b, c).unwrap())
    }

    fn realize(construction: PredefinedConstruction, inputs: &[AnalyticObject]) -> AnalyticObject {
        realize_predefined(construction, inputs).unwrap()
    }

    #[test]
    fn test_point_constructions() {
        let (a, b, c) = (point(0.0, 0.0), point(4.0, 0.0), point(0.0, 4.0));

        assert!(realize(PredefinedConstruction::Midpoint, &[a, b]).approx_eq(&point(2.0, 0.0)));
        assert!(realize(PredefinedConstruction::Circumcenter, &[a, b, c]).approx_eq(&point(2.0, 2.0)));
        assert!(realize(PredefinedConstruction::Centroid, &[a, b, c])
            .approx_eq(&point(4.0 / 3.0, 4.0 / 3.0)));

        // Inradius of the 4-4-4√2 right triangle is 4 - 2√2
        let r = 4.0 - 2.0 * 2f64.sqrt();
        assert!(realize(PredefinedConstruction::Incenter, &[a, b, c]).approx_eq(&point(r, r)));
    }

    #[test]
    fn test_line_constructions() {
        let (a, b) = (point(0.0, 0.0), point(4.0, 0.0));
        let x_axis = line(0.0, 1.0, 0.0);

        assert!(realize(PredefinedConstruction::LineFromPoints, &[a, b]).approx_eq(&x_axis));
        assert!(realize(PredefinedConstruction::PerpendicularBisector, &[a, b])
            .approx_eq(&line(1.0, 0.0, -2.0)));

        let p = point(1.0, 3.0);
        assert!(realize(PredefinedConstruction::PerpendicularLine, &[p, x_axis])
            .approx_eq(&line(1.0, 0.0, -1.0)));
        assert!(realize(PredefinedConstruction::ParallelLine, &[p, x_axis])
            .approx_eq(&line(0.0, 1.0, -3.0)));
    }

    #[test]
    fn test_reflections_and_projection() {
        let x_axis = line(0.0, 1.0, 0.0);
        let p = point(1.0, 3.0);

        assert!(realize(PredefinedConstruction::PerpendicularProjection, &[p, x_axis])
            .approx_eq(&point(1.0, 0.0)));
        assert!(realize(PredefinedConstruction::ReflectionInLine, &[p, x_axis])
            .approx_eq(&point(1.0, -3.0)));
        assert!(realize(PredefinedConstruction::PointReflection, &[p, point(2.0, 2.0)])
            .approx_eq(&point(3.0, 1.0)));
    }

    #[test]
    fn test_circle_constructions() {
        let circle = realize(
            PredefinedConstruction::Circumcircle,
            &[point(1.0, 0.0), point(-1.0, 0.0), point(0.0, 1.0)],
        );
        assert_eq!(circle.kind(), crate::ir::ObjectKind::Circle);
        assert!(realize(PredefinedConstruction::CenterOfCircle, &[circle]).approx_eq(&point(0.0, 0.0)));
    }

    #[test]
    fn test_degenerate_inputs() {
        let (a, b) = (point(0.0, 0.0), point(4.0, 0.0));
        let on_segment = point(2.0, 0.0);
        let x_axis = line(0.0, 1.0, 0.0);

        assert!(realize_predefined(PredefinedConstruction::Midpoint, &[a, a]).is_none());
        assert!(realize_predefined(PredefinedConstruction::Circumcenter, &[a, b, on_segment]).is_none());
        assert!(realize_predefined(PredefinedConstruction::Incenter, &[a, b, on_segment]).is_none());
        assert!(realize_predefined(
            PredefinedConstruction::IntersectionOfLines,
            &[x_axis, line(0.0, 1.0, -5.0)]
        )
        .is_none());
        assert!(realize_predefined(PredefinedConstruction::ParallelLine, &[a, x_axis]).is_none());
        assert!(realize_predefined(PredefinedConstruction::PerpendicularProjection, &[a, x_axis]).is_none());
    }

    #[test]
    fn test_intersection_of_parallel_lines() {
        let x_axis = line(0.0, 1.0, 0.0);

        assert!(realize_predefined(PredefinedConstruction::IntersectionOfLines, &[x_axis, x_axis]).is_none());
        assert!(realize_predefined(
            PredefinedConstruction::IntersectionOfLines,
            &[x_axis, line(1e-9, 1.0, -2.0)]
        )
        .is_none());
        assert!(realize_predefined(
            PredefinedConstruction::IntersectionOfLines,
            &[x_axis, line(1.0, 1.0, -2.0)]
        )
        .is_some());
    }

    #[test]
    fn test_wrong_inputs_are_rejected() {
        let a = point(0.0, 0.0);
        assert!(realize_predefined(PredefinedConstruction::Midpoint, &[a]).is_none());
        assert!(realize_predefined(PredefinedConstruction::CenterOfCircle, &[a]).is_none());
    }
}
