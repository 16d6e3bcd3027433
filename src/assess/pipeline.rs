//! Building-level assessment orchestration.
//!
//! Runs the full chain for every wall of a house: surface interpolation,
//! profile slicing, greenfield trough fit, settlement-related intensity
//! extraction, LTSM strains and damage classification. Walls are processed
//! in parallel; a failing stage marks that wall's outcome without aborting
//! the building run.

use crate::assess::classify::{AssessmentEntry, classify};
use crate::assess::greenfield::{self, GreenfieldConfig, GreenfieldFit};
use crate::assess::limits::{LimitTableStore, ParameterFamily};
use crate::assess::ltsm::{self, LtsmConfig, LtsmResult};
use crate::assess::sri::{self, SriParameters};
use crate::assess::surface::{self, InterpolationOrder, SurfaceConfig};
use crate::error::Result;
use crate::geom::house::House;
use crate::geom::wall::Wall;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Configuration for a building run.
#[derive(Debug, Clone, Default)]
pub struct AssessmentConfig {
    pub surface: SurfaceConfig,
    pub greenfield: GreenfieldConfig,
    pub ltsm: LtsmConfig,
}

/// Greenfield branch of a wall record. The fit can fail on flat or noisy
/// profiles; that failure stays local to this branch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GreenfieldOutcome {
    Fitted {
        s_vmax: f64,
        x_inflection: f64,
        domain_limit: f64,
        strains: LtsmResult,
        epsilon_report: Vec<AssessmentEntry>,
    },
    Failed {
        reason: String,
    },
}

/// Classification reports for the measured branch of one wall.
#[derive(Debug, Clone, Serialize)]
pub struct SriReports {
    pub delta_s_max: Vec<AssessmentEntry>,
    pub phi: Vec<AssessmentEntry>,
    pub omega: Vec<AssessmentEntry>,
    pub beta: Vec<AssessmentEntry>,
    pub epsilon: Vec<AssessmentEntry>,
}

/// Complete assessment record for one wall.
#[derive(Debug, Clone, Serialize)]
pub struct WallRecord {
    pub name: String,
    pub sri: SriParameters,
    pub measured_strains: LtsmResult,
    pub reports: SriReports,
    pub greenfield: GreenfieldOutcome,
}

/// Per-wall result slot; the building report lists every wall either way.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WallOutcome {
    Assessed(Box<WallRecord>),
    Failed { name: String, reason: String },
}

impl WallOutcome {
    pub fn name(&self) -> &str {
        match self {
            WallOutcome::Assessed(record) => &record.name,
            WallOutcome::Failed { name, .. } => name,
        }
    }

    pub fn record(&self) -> Option<&WallRecord> {
        match self {
            WallOutcome::Assessed(record) => Some(record),
            WallOutcome::Failed { .. } => None,
        }
    }
}

/// Building-level report: one outcome per wall, in house order.
#[derive(Debug, Clone, Serialize)]
pub struct BuildingAssessment {
    pub building: String,
    pub walls: Vec<WallOutcome>,
}

impl BuildingAssessment {
    /// Runs the full assessment for every wall of `house`.
    pub fn run(house: &House, cfg: &AssessmentConfig) -> Result<Self> {
        let store = LimitTableStore::standard()?;
        let surf = surface::interpolate_house(house, &cfg.surface)?;
        debug!(
            building = house.name.as_str(),
            nx = surf.grid_x().len(),
            ny = surf.grid_y().len(),
            "displacement surface interpolated"
        );

        let walls: Vec<WallOutcome> = house
            .walls()
            .par_iter()
            .map(|wall| assess_wall(wall, &surf, cfg, &store))
            .collect();

        Ok(Self {
            building: house.name.clone(),
            walls,
        })
    }
}

fn assess_wall(
    wall: &Wall,
    surf: &surface::InterpolatedSurface,
    cfg: &AssessmentConfig,
    store: &LimitTableStore,
) -> WallOutcome {
    let (sri, regions) = match sri::compute_sri(wall) {
        Ok(pair) => pair,
        Err(err) => {
            warn!(wall = wall.name.as_str(), %err, "SRI extraction failed");
            return WallOutcome::Failed {
                name: wall.name.clone(),
                reason: err.to_string(),
            };
        }
    };

    let measured = ltsm::measured_strains(&regions, wall, &cfg.ltsm);
    let reports = SriReports {
        // Limit tables quote differential settlement in meters
        delta_s_max: classify(sri.delta_s_max / 1e3, ParameterFamily::DeltaSMax, store),
        phi: classify(sri.phi.abs(), ParameterFamily::Phi, store),
        omega: classify(sri.omega.abs(), ParameterFamily::Omega, store),
        beta: classify(sri.beta, ParameterFamily::Beta, store),
        epsilon: classify(measured.strains.e_total, ParameterFamily::Epsilon, store),
    };

    let greenfield = greenfield_branch(wall, surf, cfg, store);

    WallOutcome::Assessed(Box::new(WallRecord {
        name: wall.name.clone(),
        sri,
        measured_strains: measured,
        reports,
        greenfield,
    }))
}

/// Slices the interpolated surface along the wall, fits the Gaussian trough
/// and evaluates LTSM on the fit. Any stage error becomes a tagged failure.
fn greenfield_branch(
    wall: &Wall,
    surf: &surface::InterpolatedSurface,
    cfg: &AssessmentConfig,
    store: &LimitTableStore,
) -> GreenfieldOutcome {
    let fit: Result<GreenfieldFit> = surface::slice_wall(surf, wall, InterpolationOrder::Linear)
        .and_then(|profile| greenfield::fit_wall(&profile, &cfg.greenfield));
    match fit {
        Ok(fit) => {
            let strains = ltsm::greenfield_strains(&fit, wall, &cfg.ltsm);
            let epsilon_report =
                classify(strains.strains.e_total, ParameterFamily::Epsilon, store);
            GreenfieldOutcome::Fitted {
                s_vmax: fit.s_vmax,
                x_inflection: fit.x_inflection,
                domain_limit: fit.domain_limit,
                strains,
                epsilon_report,
            }
        }
        Err(err) => {
            warn!(wall = wall.name.as_str(), %err, "greenfield branch failed");
            GreenfieldOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point::Point;

    /// 10 m x 8 m house sitting over a settlement trough centered under the
    /// front wall, sampled at the corners and wall midpoints.
    fn settling_house() -> House {
        let trough = |x: f64, y: f64| -> f64 {
            let r2 = (x - 5.0).powi(2) + (y + 2.0).powi(2);
            -8.0 * (-r2 / 18.0).exp()
        };
        let pt = |x: f64, y: f64| Point::new(x, y, trough(x, y));
        let wall = |name: &str, pts: Vec<Point>| Wall::new(name, pts, 5400.0, 54.0, Some(5.0));
        let walls = vec![
            wall(
                "front",
                vec![
                    pt(0.0, 0.0),
                    pt(2.5, 0.0),
                    pt(5.0, 0.0),
                    pt(7.5, 0.0),
                    pt(10.0, 0.0),
                ],
            )
            .unwrap(),
            wall(
                "right",
                vec![pt(10.0, 0.0), pt(10.0, 4.0), pt(10.0, 8.0)],
            )
            .unwrap(),
            wall(
                "back",
                vec![pt(10.0, 8.0), pt(5.0, 8.0), pt(0.0, 8.0)],
            )
            .unwrap(),
            wall("left", vec![pt(0.0, 8.0), pt(0.0, 4.0), pt(0.0, 0.0)]).unwrap(),
        ];
        House::new("corner-house", walls).unwrap()
    }

    #[test]
    fn test_report_lists_every_wall_in_house_order() {
        let house = settling_house();
        let report = BuildingAssessment::run(&house, &AssessmentConfig::default()).unwrap();
        let names: Vec<&str> = report.walls.iter().map(|w| w.name()).collect();
        assert_eq!(names, vec!["front", "right", "back", "left"]);
    }

    #[test]
    fn test_front_wall_is_assessed_with_settlement() {
        let house = settling_house();
        let report = BuildingAssessment::run(&house, &AssessmentConfig::default()).unwrap();
        let front = report.walls[0].record().expect("front wall assessed");
        // The trough is centered under the front wall
        assert!(front.sri.s_max > 5.0);
        assert!(front.sri.delta_s_max > 0.0);
        assert!(front.measured_strains.strains.e_total >= 0.0);
        assert!(!front.reports.epsilon.is_empty());
        assert!(!front.reports.beta.is_empty());
    }

    #[test]
    fn test_greenfield_failure_does_not_fail_the_wall() {
        // A perfectly flat house has nothing to fit
        let pt = |x: f64, y: f64| Point::new(x, y, 0.0);
        let walls = vec![
            Wall::new(
                "front",
                vec![pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0)],
                5400.0,
                54.0,
                None,
            )
            .unwrap(),
            Wall::new(
                "back",
                vec![pt(10.0, 8.0), pt(5.0, 8.0), pt(0.0, 8.0)],
                5400.0,
                54.0,
                None,
            )
            .unwrap(),
        ];
        let house = House::new("flat-house", walls).unwrap();
        let report = BuildingAssessment::run(&house, &AssessmentConfig::default()).unwrap();
        for outcome in &report.walls {
            let record = outcome.record().expect("wall assessed despite flat field");
            assert_eq!(record.sri.s_max, 0.0);
        }
    }

    #[test]
    fn test_report_serializes_to_json() {
        let house = settling_house();
        let report = BuildingAssessment::run(&house, &AssessmentConfig::default()).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"building\":\"corner-house\""));
        assert!(json.contains("\"status\""));
    }
}
