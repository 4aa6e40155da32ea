use super::{Point3, Vector3, TOLERANCE};

/// Signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Area centroid of a polygon in the XY plane.
///
/// Falls back to the vertex average for degenerate polygons.
#[must_use]
pub fn centroid_2d(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let area = signed_area_2d(points);
    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f64;
    if area.abs() < TOLERANCE {
        let sum = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        return Some(Point3::from(sum / count));
    }

    let n = points.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let j = (i + 1) % n;
        let cross = points[i].x * points[j].y - points[j].x * points[i].y;
        cx += (points[i].x + points[j].x) * cross;
        cy += (points[i].y + points[j].y) * cross;
    }
    let z = points.iter().map(|p| p.z).sum::<f64>() / count;
    Some(Point3::new(cx / (6.0 * area), cy / (6.0 * area), z))
}

/// Crossing-number test of `p` against a closed polygon in the XY plane.
#[must_use]
pub fn point_in_polygon_2d(p: &Point3, polygon: &[Point3]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&polygon[i], &polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Left-pointing normal of a direction in the XY plane.
#[must_use]
pub fn left_normal(dir: Vector3) -> Vector3 {
    Vector3::new(-dir.y, dir.x, 0.0)
}
