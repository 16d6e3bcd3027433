use crate::error::{AssessError, Result};
use crate::geom::EPS;
use crate::geom::point::Point;
use serde::Serialize;

/// Horizontal run direction of a wall in the planform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WallAxis {
    /// Wall runs along the planform x axis (constant y).
    X,
    /// Wall runs along the planform y axis (constant x).
    Y,
}

/// One exterior wall: an ordered point cloud of displacement samples plus
/// facade metadata.
///
/// Units: planform coordinates in meters, displacements in millimeters,
/// `height` in millimeters, `area` and `opening_area` in square meters.
#[derive(Debug, Clone, Serialize)]
pub struct Wall {
    pub name: String,
    points: Vec<Point>,
    pub height: f64,
    pub area: f64,
    pub opening_area: Option<f64>,
    axis: WallAxis,
}

impl Wall {
    /// Creates a wall from raw measurement samples.
    ///
    /// The run axis is inferred from the planform spread: a wall whose x
    /// coordinates are all (nearly) equal runs along y, and vice versa.
    /// Samples are sorted by position along the run axis. Fails when fewer
    /// than 2 samples are supplied.
    pub fn new(
        name: &str,
        mut points: Vec<Point>,
        height: f64,
        area: f64,
        opening_area: Option<f64>,
    ) -> Result<Self> {
        if points.len() < 2 {
            return Err(AssessError::DegenerateWall {
                name: name.to_string(),
                found: points.len(),
                needed: 2,
            });
        }
        let x_spread = spread(points.iter().map(|p| p.x));
        let y_spread = spread(points.iter().map(|p| p.y));
        let axis = if x_spread < EPS.max(y_spread * 1e-6) {
            WallAxis::Y
        } else if y_spread < EPS.max(x_spread * 1e-6) {
            WallAxis::X
        } else if x_spread >= y_spread {
            WallAxis::X
        } else {
            WallAxis::Y
        };
        match axis {
            WallAxis::X => points.sort_by(|a, b| a.x.total_cmp(&b.x)),
            WallAxis::Y => points.sort_by(|a, b| a.y.total_cmp(&b.y)),
        }
        Ok(Self {
            name: name.to_string(),
            points,
            height,
            area,
            opening_area,
            axis,
        })
    }

    pub fn axis(&self) -> WallAxis {
        self.axis
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Sample positions along the run axis [m], ordered.
    pub fn axis_positions(&self) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| match self.axis {
                WallAxis::X => p.x,
                WallAxis::Y => p.y,
            })
            .collect()
    }

    /// Vertical displacements [mm] in sample order.
    pub fn displacements(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.z).collect()
    }

    /// Planform coordinate perpendicular to the run axis [m].
    pub fn lateral_position(&self) -> f64 {
        match self.axis {
            WallAxis::X => self.points[0].y,
            WallAxis::Y => self.points[0].x,
        }
    }

    /// Wall length along the run axis [m].
    pub fn length(&self) -> f64 {
        let pos = self.axis_positions();
        pos[pos.len() - 1] - pos[0]
    }

    /// Planform corner coordinates `(start, end)` along the run axis [m].
    pub fn corners(&self) -> ((f64, f64), (f64, f64)) {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        (first.planform(), last.planform())
    }

    /// Facade opening percentage, if the facade area is known and non-zero.
    pub fn opening_percentage(&self) -> Option<f64> {
        let opening = self.opening_area?;
        if self.area.abs() < EPS {
            return None;
        }
        Some(opening / self.area * 100.0)
    }
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    hi - lo
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_along_x() -> Wall {
        let pts = vec![
            Point::new(4.0, 0.0, -2.0),
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, -5.0),
        ];
        Wall::new("front", pts, 5000.0, 40.0, Some(8.0)).unwrap()
    }

    #[test]
    fn test_axis_inference_and_sorting() {
        let w = wall_along_x();
        assert_eq!(w.axis(), WallAxis::X);
        assert_eq!(w.axis_positions(), vec![0.0, 2.0, 4.0]);
        assert_eq!(w.displacements(), vec![0.0, -5.0, -2.0]);
    }

    #[test]
    fn test_axis_along_y() {
        let pts = vec![Point::new(3.0, 0.0, 0.0), Point::new(3.0, 6.0, -1.0)];
        let w = Wall::new("side", pts, 5000.0, 30.0, None).unwrap();
        assert_eq!(w.axis(), WallAxis::Y);
        assert_eq!(w.lateral_position(), 3.0);
        assert_eq!(w.length(), 6.0);
    }

    #[test]
    fn test_degenerate_wall_rejected() {
        let err = Wall::new("stub", vec![Point::new(0.0, 0.0, 0.0)], 1.0, 1.0, None).unwrap_err();
        assert!(matches!(err, AssessError::DegenerateWall { found: 1, .. }));
    }

    #[test]
    fn test_opening_percentage() {
        let w = wall_along_x();
        assert_eq!(w.opening_percentage(), Some(20.0));
        let pts = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)];
        let w = Wall::new("blind", pts, 1.0, 10.0, None).unwrap();
        assert_eq!(w.opening_percentage(), None);
    }
}
