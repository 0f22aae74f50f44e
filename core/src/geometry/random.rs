//! Random realization of loose objects

use super::analytic::{AnalyticObject, Circle2D, Line2D, Point2D};
use crate::ir::{LooseObjectLayout, ObjectKind};
use rand::Rng;

/// Half-width of the square points are drawn from
pub const COORDINATE_RANGE: f64 = 10.0;

/// Bounds of drawn circle radii
pub const RADIUS_RANGE: (f64, f64) = (1.0, 5.0);

/// Draw a uniformly random point in the coordinate square
pub fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Point2D {
    Point2D::new(
        rng.random_range(-COORDINATE_RANGE..COORDINATE_RANGE),
        rng.random_range(-COORDINATE_RANGE..COORDINATE_RANGE),
    )
}

/// Draw a line through two random points
pub fn random_line<R: Rng + ?Sized>(rng: &mut R) -> Line2D {
    loop {
        if let Some(line) = Line2D::through(&random_point(rng), &random_point(rng)) {
            return line;
        }
    }
}

/// Draw a circle with random center and radius
pub fn random_circle<R: Rng + ?Sized>(rng: &mut R) -> Circle2D {
    let center = random_point(rng);
    let radius = rng.random_range(RADIUS_RANGE.0..RADIUS_RANGE.1);
    Circle2D { center, radius }
}

/// Realize every loose object of a layout, by slot
pub fn random_loose_realization<R: Rng + ?Sized>(
    layout: &LooseObjectLayout,
    rng: &mut R,
) -> Vec<AnalyticObject> {
    match layout {
        LooseObjectLayout::RightTriangle => {
            let a = random_point(rng);
            let b = random_point(rng);
            // C lies on the perpendicular to AB through A
            let normal = b.sub(&a);
            let direction = Point2D::new(-normal.y, normal.x);
            let t: f64 = rng.random_range(0.25..2.0);
            let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
            let c = a.add(&direction.scale(sign * t));
            vec![a, b, c].into_iter().map(AnalyticObject::Point).collect()
        }
        other => other
            .kinds()
            .into_iter()
            .map(|kind| match kind {
                ObjectKind::Point => AnalyticObject::Point(random_point(rng)),
                ObjectKind::Line => AnalyticObject::Line(random_line(rng)),
                ObjectKind::Circle => AnalyticObject::Circle(random_circle(rng)),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_realization_matches_layout_kinds() {
        let mut rng = SmallRng::seed_from_u64(7);
        for layout in [
            LooseObjectLayout::FreePoints(4),
            LooseObjectLayout::Quadrilateral,
            LooseObjectLayout::LineAndTwoPoints,
            LooseObjectLayout::CircleAndPoint,
        ] {
            let objects = random_loose_realization(&layout, &mut rng);
            let kinds: Vec<_> = objects.iter().map(AnalyticObject::kind).collect();
            assert_eq!(kinds, layout.kinds());
        }
    }

    #[test]
    fn test_points_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let p = random_point(&mut rng);
            assert!(p.x.abs() <= COORDINATE_RANGE && p.y.abs() <= COORDINATE_RANGE);
        }
        let c = random_circle(&mut rng);
        assert!(c.radius >= RADIUS_RANGE.0 && c.radius <= RADIUS_RANGE.1);
    }

    #[test]
    fn test_right_triangle_has_right_angle_at_first_vertex() {
        let mut rng = SmallRng::seed_from_u64(3);
        let points: Vec<Point2D> = random_loose_realization(&LooseObjectLayout::RightTriangle, &mut rng)
            .iter()
            .filter_map(AnalyticObject::as_point)
            .collect();

        let ab = points[1].sub(&points[0]);
        let ac = points[2].sub(&points[0]);
        assert!(ab.dot(&ac).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let first = random_loose_realization(&LooseObjectLayout::Triangle, &mut SmallRng::seed_from_u64(11));
        let second = random_loose_realization(&LooseObjectLayout::Triangle, &mut SmallRng::seed_from_u64(11));
        assert_eq!(first, second);
    }
}
