//! Crack survey processing and the psi damage parameter.
//!
//! Individual crack-width observations are clustered per wall into crack
//! components; each component's width and length feed the empirical damage
//! parameter psi = 2 * n^0.15 * cw^0.3 with cw the width-weighted mean
//! crack width.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Configuration for crack clustering.
#[derive(Debug, Clone)]
pub struct CrackConfig {
    /// Two observations closer than this belong to the same crack [m].
    pub distance_threshold: f64,
}

impl Default for CrackConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 0.5,
        }
    }
}

/// One surveyed crack-width measurement on a wall face.
///
/// Coordinates are in-plane wall coordinates [m], width in [mm].
#[derive(Debug, Clone)]
pub struct CrackObservation {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub wall: String,
}

/// One clustered crack: a connected component of observations.
#[derive(Debug, Clone, Serialize)]
pub struct Crack {
    /// Mean observed width [mm].
    pub width: f64,
    /// Largest pairwise distance between member observations [mm].
    pub length: f64,
    /// Number of member observations.
    pub samples: usize,
}

/// Damage parameter record for one wall.
#[derive(Debug, Clone, Serialize)]
pub struct WallDamage {
    pub wall: String,
    /// Facade area [m2] used for the building-level aggregate.
    pub area: f64,
    pub n_cracks: usize,
    /// Width-weighted mean crack width [mm].
    pub mean_width: f64,
    pub psi: f64,
    pub damage_level: u8,
    pub cracks: Vec<Crack>,
}

/// Building-level damage parameter: area-weighted mean over walls.
#[derive(Debug, Clone, Serialize)]
pub struct DamageParameter {
    pub psi_building: f64,
    pub damage_level: u8,
    pub walls: Vec<WallDamage>,
}

/// Groups observations into connected components: two observations link when
/// their in-plane distance is below the threshold.
fn cluster(observations: &[&CrackObservation], threshold: f64) -> Vec<Crack> {
    let n = observations.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut Vec<usize>, i: usize) -> usize {
        let mut root = i;
        while parent[root] != root {
            root = parent[root];
        }
        let mut cur = i;
        while parent[cur] != root {
            let next = parent[cur];
            parent[cur] = root;
            cur = next;
        }
        root
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = observations[i].x - observations[j].x;
            let dy = observations[i].y - observations[j].y;
            if (dx * dx + dy * dy).sqrt() < threshold {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[ri] = rj;
                }
            }
        }
    }

    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        components.entry(root).or_default().push(i);
    }

    components
        .into_values()
        .map(|members| {
            let width =
                members.iter().map(|&i| observations[i].width).sum::<f64>() / members.len() as f64;
            let mut length = 0.0f64;
            for a in 0..members.len() {
                for b in (a + 1)..members.len() {
                    let oa = observations[members[a]];
                    let ob = observations[members[b]];
                    let d = ((oa.x - ob.x).powi(2) + (oa.y - ob.y).powi(2)).sqrt();
                    length = length.max(d);
                }
            }
            Crack {
                width,
                length: length * 1e3,
                samples: members.len(),
            }
        })
        .collect()
}

/// Width-weighted mean crack width: sum(w^2 l) / sum(w l).
fn weighted_mean_width(cracks: &[Crack]) -> f64 {
    let num: f64 = cracks.iter().map(|c| c.width * c.width * c.length).sum();
    let den: f64 = cracks.iter().map(|c| c.width * c.length).sum();
    if den == 0.0 { 0.0 } else { num / den }
}

/// psi for a set of cracks on one wall.
pub fn psi(n_cracks: usize, mean_width: f64) -> f64 {
    if n_cracks == 0 || mean_width <= 0.0 {
        return 0.0;
    }
    2.0 * (n_cracks as f64).powf(0.15) * mean_width.powf(0.3)
}

/// Damage level from psi: DL0 below 1, DL1 below 1.5, DL2 below 2.5, DL3
/// below 3.5, DL4 beyond.
pub fn damage_level_from_psi(psi: f64) -> u8 {
    const THRESHOLDS: [f64; 4] = [1.0, 1.5, 2.5, 3.5];
    for (dl, &t) in THRESHOLDS.iter().enumerate() {
        if psi < t {
            return dl as u8;
        }
    }
    4
}

/// Evaluates the damage parameter for a building from a crack survey.
///
/// `wall_areas` maps wall names to facade areas [m2]; walls listed there but
/// absent from the survey count as undamaged, with psi 0, and still enter the
/// area-weighted building aggregate.
pub fn assess_cracks(
    observations: &[CrackObservation],
    wall_areas: &[(String, f64)],
    cfg: &CrackConfig,
) -> DamageParameter {
    let mut walls = Vec::with_capacity(wall_areas.len());
    for (name, area) in wall_areas {
        let members: Vec<&CrackObservation> =
            observations.iter().filter(|o| &o.wall == name).collect();
        let cracks = cluster(&members, cfg.distance_threshold);
        let mean_width = weighted_mean_width(&cracks);
        let psi_wall = psi(cracks.len(), mean_width);
        debug!(
            wall = name.as_str(),
            n_cracks = cracks.len(),
            psi = psi_wall,
            "crack survey evaluated"
        );
        walls.push(WallDamage {
            wall: name.clone(),
            area: *area,
            n_cracks: cracks.len(),
            mean_width,
            psi: psi_wall,
            damage_level: damage_level_from_psi(psi_wall),
            cracks,
        });
    }

    let total_area: f64 = walls.iter().map(|w| w.area).sum();
    let psi_building = if total_area == 0.0 {
        0.0
    } else {
        walls.iter().map(|w| w.psi * w.area).sum::<f64>() / total_area
    };

    DamageParameter {
        psi_building,
        damage_level: damage_level_from_psi(psi_building),
        walls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(x: f64, y: f64, width: f64, wall: &str) -> CrackObservation {
        CrackObservation {
            x,
            y,
            width,
            wall: wall.to_string(),
        }
    }

    #[test]
    fn test_weighted_mean_width_two_cracks() {
        // 1 m crack of 1 mm and 2 m crack of 2 mm:
        // (1*1000 + 4*2000) / (1000 + 4000) = 1.8 mm
        let cracks = [
            Crack {
                width: 1.0,
                length: 1000.0,
                samples: 2,
            },
            Crack {
                width: 2.0,
                length: 2000.0,
                samples: 2,
            },
        ];
        assert!((weighted_mean_width(&cracks) - 1.8).abs() < 1e-12);
        let p = psi(2, 1.8);
        assert!((p - 2.0 * 2.0f64.powf(0.15) * 1.8f64.powf(0.3)).abs() < 1e-12);
        assert!((p - 2.65).abs() < 0.01);
    }

    #[test]
    fn test_clustering_by_distance() {
        let survey = vec![
            obs(0.0, 0.0, 1.0, "front"),
            obs(0.3, 0.0, 1.0, "front"),
            obs(0.6, 0.0, 1.0, "front"),
            // Far away: its own crack
            obs(5.0, 0.0, 2.0, "front"),
            // Different wall never merges
            obs(0.0, 0.0, 3.0, "back"),
        ];
        let areas = vec![("front".to_string(), 20.0), ("back".to_string(), 20.0)];
        let result = assess_cracks(&survey, &areas, &CrackConfig::default());

        let front = &result.walls[0];
        assert_eq!(front.n_cracks, 2);
        let long = front.cracks.iter().find(|c| c.samples == 3).unwrap();
        assert!((long.length - 600.0).abs() < 1e-9);
        let single = front.cracks.iter().find(|c| c.samples == 1).unwrap();
        assert_eq!(single.length, 0.0);

        let back = &result.walls[1];
        assert_eq!(back.n_cracks, 1);
        // A singleton crack has zero length, so the length-weighted mean
        // carries no contribution from it
        assert_eq!(back.mean_width, 0.0);
        assert_eq!(back.cracks[0].width, 3.0);
    }

    #[test]
    fn test_singleton_crack_has_zero_psi_contribution() {
        // A zero-length crack carries no weight in the mean width
        let survey = vec![obs(0.0, 0.0, 2.0, "front")];
        let areas = vec![("front".to_string(), 10.0)];
        let result = assess_cracks(&survey, &areas, &CrackConfig::default());
        assert_eq!(result.walls[0].n_cracks, 1);
        assert_eq!(result.walls[0].mean_width, 0.0);
        assert_eq!(result.walls[0].psi, 0.0);
        assert_eq!(result.damage_level, 0);
    }

    #[test]
    fn test_psi_monotonic_in_width_and_count() {
        assert!(psi(1, 1.0) < psi(1, 2.0));
        assert!(psi(1, 2.0) < psi(4, 2.0));
        assert_eq!(psi(0, 0.0), 0.0);
    }

    #[test]
    fn test_building_aggregate_is_area_weighted() {
        let survey = vec![
            obs(0.0, 0.0, 1.0, "front"),
            obs(0.3, 0.0, 1.0, "front"),
            obs(0.0, 0.0, 1.0, "side"),
            obs(0.3, 0.0, 1.0, "side"),
        ];
        let areas = vec![("front".to_string(), 30.0), ("side".to_string(), 10.0)];
        let result = assess_cracks(&survey, &areas, &CrackConfig::default());
        let expected = (result.walls[0].psi * 30.0 + result.walls[1].psi * 10.0) / 40.0;
        assert!((result.psi_building - expected).abs() < 1e-12);
    }

    #[test]
    fn test_damage_level_thresholds() {
        assert_eq!(damage_level_from_psi(0.0), 0);
        assert_eq!(damage_level_from_psi(1.0), 1);
        assert_eq!(damage_level_from_psi(2.4), 2);
        assert_eq!(damage_level_from_psi(3.5), 4);
        assert_eq!(damage_level_from_psi(9.0), 4);
    }
}
