use crate::error::{AssessError, Result};
use crate::geom::polygon::Polygon;
use crate::geom::wall::Wall;

/// A building as an ordered collection of named exterior walls.
///
/// Wall order is the construction order (walls are expected to chain around
/// the planform, consecutive walls sharing a corner). The derived footprint
/// polygon bounds all surface interpolation.
#[derive(Debug, Clone)]
pub struct House {
    pub name: String,
    walls: Vec<Wall>,
    footprint: Polygon,
}

impl House {
    pub fn new(name: &str, walls: Vec<Wall>) -> Result<Self> {
        if walls.is_empty() {
            return Err(AssessError::EmptyHouse);
        }
        // Corner pairs come out of Wall in axis-sorted order; re-orient each
        // pair against the vertex chain so the boundary stays contiguous.
        let mut vertices: Vec<(f64, f64)> = Vec::new();
        for wall in &walls {
            let (a, b) = wall.corners();
            let (first, second) = match vertices.last() {
                Some(&last) if planform_close(last, b) && !planform_close(last, a) => (b, a),
                _ => (a, b),
            };
            vertices.push(first);
            vertices.push(second);
        }
        let footprint = Polygon::new(vertices);
        Ok(Self {
            name: name.to_string(),
            walls,
            footprint,
        })
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn wall(&self, name: &str) -> Option<&Wall> {
        self.walls.iter().find(|w| w.name == name)
    }

    pub fn footprint(&self) -> &Polygon {
        &self.footprint
    }

    /// Planform bounding box over all wall samples: `(x_min, x_max, y_min, y_max)`.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let mut bbox = (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        );
        for wall in &self.walls {
            for p in wall.points() {
                bbox.0 = bbox.0.min(p.x);
                bbox.1 = bbox.1.max(p.x);
                bbox.2 = bbox.2.min(p.y);
                bbox.3 = bbox.3.max(p.y);
            }
        }
        bbox
    }

    /// All measurement samples of all walls as `(x, y, z)` triples, with
    /// planform duplicates (shared corners) removed.
    pub fn scatter_samples(&self) -> Vec<(f64, f64, f64)> {
        let mut samples: Vec<(f64, f64, f64)> = Vec::new();
        for wall in &self.walls {
            for p in wall.points() {
                let duplicate = samples
                    .iter()
                    .any(|s| (s.0 - p.x).abs() < 1e-9 && (s.1 - p.y).abs() < 1e-9);
                if !duplicate {
                    samples.push((p.x, p.y, p.z));
                }
            }
        }
        samples
    }
}

fn planform_close(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point::Point;

    fn rectangular_house() -> House {
        // 4 x 6 m planform, trough on the front wall
        let front = Wall::new(
            "front",
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, -2.0),
                Point::new(2.0, 0.0, -5.0),
                Point::new(3.0, 0.0, -2.0),
                Point::new(4.0, 0.0, 0.0),
            ],
            5000.0,
            24.0,
            Some(4.0),
        )
        .unwrap();
        let right = Wall::new(
            "right",
            vec![
                Point::new(4.0, 0.0, 0.0),
                Point::new(4.0, 3.0, -1.0),
                Point::new(4.0, 6.0, 0.0),
            ],
            5000.0,
            36.0,
            Some(6.0),
        )
        .unwrap();
        let back = Wall::new(
            "back",
            vec![
                Point::new(4.0, 6.0, 0.0),
                Point::new(2.0, 6.0, -1.0),
                Point::new(0.0, 6.0, 0.0),
            ],
            5000.0,
            24.0,
            None,
        )
        .unwrap();
        let left = Wall::new(
            "left",
            vec![
                Point::new(0.0, 6.0, 0.0),
                Point::new(0.0, 3.0, -2.0),
                Point::new(0.0, 0.0, 0.0),
            ],
            5000.0,
            36.0,
            Some(3.0),
        )
        .unwrap();
        House::new("test-house", vec![front, right, back, left]).unwrap()
    }

    #[test]
    fn test_house_requires_walls() {
        assert_eq!(
            House::new("empty", vec![]).unwrap_err(),
            AssessError::EmptyHouse
        );
    }

    #[test]
    fn test_footprint_is_simple_rectangle() {
        let house = rectangular_house();
        assert_eq!(house.footprint().vertices().len(), 4);
        // Interior points on both sides of the main diagonal
        assert!(house.footprint().contains(1.0, 4.0, 0.0));
        assert!(house.footprint().contains(3.0, 1.0, 0.0));
    }

    #[test]
    fn test_footprint_bounds() {
        let house = rectangular_house();
        assert_eq!(house.bounding_box(), (0.0, 4.0, 0.0, 6.0));
        assert!(house.footprint().contains(2.0, 3.0, 0.0));
        assert!(!house.footprint().contains(5.0, 3.0, 0.0));
    }

    #[test]
    fn test_wall_lookup_preserves_order() {
        let house = rectangular_house();
        let names: Vec<&str> = house.walls().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["front", "right", "back", "left"]);
        assert!(house.wall("back").is_some());
        assert!(house.wall("roof").is_none());
    }

    #[test]
    fn test_scatter_samples_dedup_corners() {
        let house = rectangular_house();
        // 5 + 3 + 3 + 3 samples, 4 shared corners
        assert_eq!(house.scatter_samples().len(), 10);
    }
}
