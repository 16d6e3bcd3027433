//! Scattered-point Delaunay triangulation (Bowyer-Watson) with barycentric
//! interpolation, used for the linear displacement surface.

/// Triangle as indices into the input point slice.
#[derive(Debug, Clone, Copy)]
struct Tri(usize, usize, usize);

/// Triangulated irregular network over scattered planform points.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<(f64, f64)>,
    triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Builds the Delaunay triangulation by incremental insertion.
    ///
    /// Returns `None` when fewer than 3 points are given or all points are
    /// (nearly) colinear, in which case no triangle survives.
    pub fn build(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }

        // Super-triangle generously covering the bounding box
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        let d = (x_max - x_min).max(y_max - y_min).max(1.0) * 20.0;
        let cx = (x_min + x_max) / 2.0;
        let cy = (y_min + y_max) / 2.0;

        let mut all: Vec<(f64, f64)> = points.to_vec();
        let s0 = all.len();
        all.push((cx - d, cy - d));
        let s1 = all.len();
        all.push((cx + d, cy - d));
        let s2 = all.len();
        all.push((cx, cy + d));

        let mut triangles: Vec<Tri> = vec![Tri(s0, s1, s2)];

        for p in 0..points.len() {
            let (px, py) = all[p];

            // Triangles whose circumcircle contains the new point
            let mut bad: Vec<usize> = Vec::new();
            for (t, tri) in triangles.iter().enumerate() {
                if in_circumcircle(all[tri.0], all[tri.1], all[tri.2], (px, py)) {
                    bad.push(t);
                }
            }

            // Boundary of the cavity: edges not shared by two bad triangles
            let mut boundary: Vec<(usize, usize)> = Vec::new();
            for &t in &bad {
                let tri = triangles[t];
                for edge in [(tri.0, tri.1), (tri.1, tri.2), (tri.2, tri.0)] {
                    let shared = bad.iter().any(|&u| {
                        u != t && {
                            let o = triangles[u];
                            let edges = [(o.0, o.1), (o.1, o.2), (o.2, o.0)];
                            edges
                                .iter()
                                .any(|&e| e == (edge.1, edge.0) || e == edge)
                        }
                    });
                    if !shared {
                        boundary.push(edge);
                    }
                }
            }

            // Remove bad triangles, retriangulate the cavity around p
            bad.sort_unstable();
            for &t in bad.iter().rev() {
                triangles.swap_remove(t);
            }
            for (a, b) in boundary {
                triangles.push(Tri(a, b, p));
            }
        }

        let survivors: Vec<[usize; 3]> = triangles
            .iter()
            .filter(|t| t.0 < s0 && t.1 < s0 && t.2 < s0)
            .filter(|t| {
                // Degenerate (colinear) triangles carry no area to interpolate over
                let (a, b, c) = (all[t.0], all[t.1], all[t.2]);
                let area2 = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
                area2.abs() > 1e-12
            })
            .map(|t| [t.0, t.1, t.2])
            .collect();
        if survivors.is_empty() {
            return None;
        }
        Some(Self {
            points: points.to_vec(),
            triangles: survivors,
        })
    }

    /// Piecewise-linear (barycentric) interpolation of `zs` at `(x, y)`.
    ///
    /// Returns `None` outside the convex hull of the input points.
    pub fn interpolate(&self, zs: &[f64], x: f64, y: f64) -> Option<f64> {
        for tri in &self.triangles {
            let a = self.points[tri[0]];
            let b = self.points[tri[1]];
            let c = self.points[tri[2]];
            if let Some((wa, wb, wc)) = barycentric(a, b, c, (x, y)) {
                return Some(wa * zs[tri[0]] + wb * zs[tri[1]] + wc * zs[tri[2]]);
            }
        }
        None
    }
}

/// Barycentric coordinates of `p` in triangle `abc`, or `None` when `p` lies
/// outside (with a small tolerance so hull-edge points are kept).
fn barycentric(
    a: (f64, f64),
    b: (f64, f64),
    c: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let det = (b.1 - c.1) * (a.0 - c.0) + (c.0 - b.0) * (a.1 - c.1);
    if det.abs() < 1e-30 {
        return None;
    }
    let wa = ((b.1 - c.1) * (p.0 - c.0) + (c.0 - b.0) * (p.1 - c.1)) / det;
    let wb = ((c.1 - a.1) * (p.0 - c.0) + (a.0 - c.0) * (p.1 - c.1)) / det;
    let wc = 1.0 - wa - wb;
    let eps = -1e-9;
    if wa >= eps && wb >= eps && wc >= eps {
        Some((wa, wb, wc))
    } else {
        None
    }
}

/// Robust-enough circumcircle test via the lifted determinant.
fn in_circumcircle(a: (f64, f64), b: (f64, f64), c: (f64, f64), p: (f64, f64)) -> bool {
    // Ensure counter-clockwise orientation so the determinant sign is stable
    let orient = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
    let (b, c) = if orient < 0.0 { (c, b) } else { (b, c) };

    let ax = a.0 - p.0;
    let ay = a.1 - p.1;
    let bx = b.0 - p.0;
    let by = b.1 - p.1;
    let cx = c.0 - p.0;
    let cy = c.1 - p.1;

    let det = (ax * ax + ay * ay) * (bx * cy - cx * by)
        - (bx * bx + by * by) * (ax * cy - cx * ay)
        + (cx * cx + cy * cy) * (ax * by - bx * ay);
    det > 0.0
}
