use crate::geom::EPS;

/// Closed planform polygon bounding the building footprint.
///
/// Vertices are stored in wall order without the closing duplicate. The chain
/// of wall corners guarantees that consecutive walls share a vertex, so the
/// boundary is contiguous by construction.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<(f64, f64)>,
}

impl Polygon {
    pub fn new(mut vertices: Vec<(f64, f64)>) -> Self {
        // Drop consecutive duplicates and the closing vertex if present
        vertices.dedup_by(|a, b| (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS);
        if vertices.len() > 1 {
            let first = vertices[0];
            let last = vertices[vertices.len() - 1];
            if (first.0 - last.0).abs() < EPS && (first.1 - last.1).abs() < EPS {
                vertices.pop();
            }
        }
        Self { vertices }
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Axis-aligned bounding box as `(x_min, x_max, y_min, y_max)`.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for &(x, y) in &self.vertices {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        (x_min, x_max, y_min, y_max)
    }

    /// Checks if a planform point lies inside the footprint.
    ///
    /// `tolerance` widens (positive) or shrinks (negative) the accepted band
    /// around the boundary. Interpolation masks with a small positive value
    /// so that grid nodes sitting exactly on an edge stay inside.
    pub fn contains(&self, x: f64, y: f64, tolerance: f64) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let d = self.signed_boundary_distance(x, y);
        if tolerance >= 0.0 {
            self.winding(x, y) || d <= tolerance
        } else {
            self.winding(x, y) && d > -tolerance
        }
    }

    /// Even-odd ray casting test, boundary treatment unspecified.
    fn winding(&self, x: f64, y: f64) -> bool {
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.vertices[i];
            let (xj, yj) = self.vertices[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Distance from the point to the nearest boundary segment.
    fn signed_boundary_distance(&self, x: f64, y: f64) -> f64 {
        let n = self.vertices.len();
        let mut best = f64::INFINITY;
        for i in 0..n {
            let (x1, y1) = self.vertices[i];
            let (x2, y2) = self.vertices[(i + 1) % n];
            let dx = x2 - x1;
            let dy = y2 - y1;
            let len2 = dx * dx + dy * dy;
            let t = if len2 < EPS {
                0.0
            } else {
                (((x - x1) * dx + (y - y1) * dy) / len2).clamp(0.0, 1.0)
            };
            let px = x1 + t * dx;
            let py = y1 + t * dy;
            best = best.min(((x - px).powi(2) + (y - py).powi(2)).sqrt());
        }
        best
    }
}
