//! Convex hull by gift wrapping.

use kurbo::Point;

/// Cross product of `p -> q` and `p -> r`.
///
/// Zero when collinear, positive when `r` lies counter-clockwise of the
/// edge `p -> q` (Y up), negative when clockwise.
pub fn orientation(p: Point, q: Point, r: Point) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

/// Indices into `points` of the convex hull boundary, in clockwise order
/// starting from the leftmost point (first one wins on ties).
///
/// Collinear points along a hull edge are skipped, as are duplicates. Fewer
/// than three input points are returned as-is.
pub fn convex_hull(points: &[Point]) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return (0..n).collect();
    }

    let mut start = 0;
    for (i, p) in points.iter().enumerate().skip(1) {
        if p.x < points[start].x {
            start = i;
        }
    }

    let mut hull = Vec::new();
    let mut p = start;
    loop {
        hull.push(p);

        let mut q = (p + 1) % n;
        for r in 0..n {
            if r == p || r == q {
                continue;
            }
            let turn = orientation(points[p], points[q], points[r]);
            let farther = points[p].distance_squared(points[r]) > points[p].distance_squared(points[q]);
            if points[q] == points[p] || turn > 0.0 || (turn == 0.0 && farther) {
                q = r;
            }
        }

        p = q;
        if p == start || points[p] == points[start] || hull.len() >= n {
            break;
        }
    }
    hull
}

/// Whether `point` lies strictly inside the convex polygon `ring`
/// (clockwise, as produced by [`convex_hull`]).
pub fn strictly_inside(point: Point, ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .all(|(a, b)| orientation(*a, *b, point) < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_square_with_interior_point() {
        let points = pts(&[(0.0, 0.0), (2.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.0, 2.0)]);
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&2));
        assert_eq!(hull[0], 0);
    }

    #[test]
    fn test_clockwise_winding() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let hull = convex_hull(&points);
        // From the leftmost-first point (0,0), clockwise with Y up heads to (0,1).
        assert_eq!(hull, vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_collinear_edge_points_skipped() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (1.0, 2.0)]);
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 3);
        assert!(!hull.contains(&1));
    }

    #[test]
    fn test_duplicates_terminate() {
        let points = pts(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 0.0)]);
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 3);
    }

    #[test]
    fn test_all_collinear() {
        let points = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let hull = convex_hull(&points);
        assert_eq!(hull, vec![0, 2]);
    }

    #[test]
    fn test_strictly_inside() {
        let points = pts(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        assert!(strictly_inside(Point::new(1.0, 1.0), &points));
        assert!(!strictly_inside(Point::new(0.0, 1.0), &points));
        assert!(!strictly_inside(Point::new(3.0, 1.0), &points));
    }
}
