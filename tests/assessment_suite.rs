use masonry_assess::assess::classify::classify;
use masonry_assess::assess::cracks::{self, CrackObservation};
use masonry_assess::assess::limits::{LimitTableStore, ParameterFamily};
use masonry_assess::assess::pipeline::GreenfieldOutcome;
use masonry_assess::{AssessmentConfig, BuildingAssessment, CrackConfig, House, Point, Wall};

/// Gaussian settlement trough centered below the given planform point.
fn trough(center: (f64, f64), s_vmax: f64, spread: f64) -> impl Fn(f64, f64) -> f64 {
    move |x: f64, y: f64| {
        let r2 = (x - center.0).powi(2) + (y - center.1).powi(2);
        s_vmax * (-r2 / (2.0 * spread * spread)).exp()
    }
}

/// 12 m x 8 m rectangular house, walls sampled every 2 m, displacements from
/// a trough centered 3 m south of the front wall's midpoint.
fn settling_house() -> House {
    let w = trough((6.0, -3.0), -12.0, 4.0);
    let pt = |x: f64, y: f64| Point::new(x, y, w(x, y));
    let samples_x =
        |y: f64, rev: bool| -> Vec<Point> {
            let mut xs: Vec<f64> = (0..=6).map(|i| i as f64 * 2.0).collect();
            if rev {
                xs.reverse();
            }
            xs.into_iter().map(|x| pt(x, y)).collect()
        };
    let samples_y = |x: f64, rev: bool| -> Vec<Point> {
        let mut ys: Vec<f64> = (0..=4).map(|i| i as f64 * 2.0).collect();
        if rev {
            ys.reverse();
        }
        ys.into_iter().map(|y| pt(x, y)).collect()
    };
    let walls = vec![
        Wall::new("front", samples_x(0.0, false), 5400.0, 64.8, Some(7.0)).unwrap(),
        Wall::new("right", samples_y(12.0, false), 5400.0, 43.2, Some(2.0)).unwrap(),
        Wall::new("back", samples_x(8.0, true), 5400.0, 64.8, Some(7.0)).unwrap(),
        Wall::new("left", samples_y(0.0, true), 5400.0, 43.2, None).unwrap(),
    ];
    House::new("settling-house", walls).unwrap()
}

#[test]
fn full_pipeline_produces_complete_report() {
    let house = settling_house();
    let report = BuildingAssessment::run(&house, &AssessmentConfig::default()).unwrap();

    assert_eq!(report.building, "settling-house");
    assert_eq!(report.walls.len(), 4);
    let names: Vec<&str> = report.walls.iter().map(|w| w.name()).collect();
    assert_eq!(names, vec!["front", "right", "back", "left"]);
    for outcome in &report.walls {
        assert!(outcome.record().is_some(), "wall {} failed", outcome.name());
    }
}

#[test]
fn front_wall_settles_most() {
    let house = settling_house();
    let report = BuildingAssessment::run(&house, &AssessmentConfig::default()).unwrap();

    let sri = |name: &str| {
        report
            .walls
            .iter()
            .find(|w| w.name() == name)
            .and_then(|w| w.record())
            .map(|r| r.sri.clone())
            .unwrap()
    };
    let front = sri("front");
    let back = sri("back");
    // The trough sits south of the front wall
    assert!(front.s_max > back.s_max);
    assert!(front.delta_s_max > 0.0);
    assert!(front.d_deflection >= 0.0);
    assert!(front.beta >= 0.0);
}

#[test]
fn front_wall_greenfield_fit_recovers_the_trough() {
    let house = settling_house();
    let report = BuildingAssessment::run(&house, &AssessmentConfig::default()).unwrap();

    let front = report.walls[0].record().unwrap();
    match &front.greenfield {
        GreenfieldOutcome::Fitted {
            s_vmax,
            x_inflection,
            domain_limit,
            strains,
            epsilon_report,
        } => {
            // The slice of the 2-D trough along y = 0 is itself Gaussian
            // with s_vmax = -12 * exp(-9/32) and the same 4 m spread.
            let expected = -12.0 * (-9.0 / 32.0f64).exp();
            assert!((s_vmax - expected).abs() < 0.5, "s_vmax = {s_vmax}");
            assert!((x_inflection.abs() - 4.0).abs() < 0.5);
            assert!(*domain_limit > x_inflection.abs());
            assert!(strains.strains.e_total >= 0.0);
            assert!(!epsilon_report.is_empty());
        }
        GreenfieldOutcome::Failed { reason } => panic!("fit failed: {reason}"),
    }
}

#[test]
fn classification_reports_cover_every_registered_table() {
    let store = LimitTableStore::standard().unwrap();
    let report = classify(1e-3, ParameterFamily::Epsilon, &store);
    assert_eq!(report.len(), store.tables_for(ParameterFamily::Epsilon).len());
    for entry in &report {
        assert!(entry.psi.is_some());
        assert!(entry.limit >= 1e-3);
    }
    // SRI families carry no strain-based damage parameter
    for entry in classify(0.01, ParameterFamily::Beta, &store) {
        assert!(entry.psi.is_none());
    }
}

#[test]
fn crack_survey_and_pipeline_agree_on_wall_names() {
    let house = settling_house();
    let survey = vec![
        CrackObservation {
            x: 2.0,
            y: 1.0,
            width: 1.0,
            wall: "front".to_string(),
        },
        CrackObservation {
            x: 2.3,
            y: 1.2,
            width: 2.0,
            wall: "front".to_string(),
        },
    ];
    let areas: Vec<(String, f64)> = house
        .walls()
        .iter()
        .map(|w| (w.name.clone(), w.area))
        .collect();
    let damage = cracks::assess_cracks(&survey, &areas, &CrackConfig::default());

    assert_eq!(damage.walls.len(), 4);
    let front = &damage.walls[0];
    assert_eq!(front.wall, "front");
    assert_eq!(front.n_cracks, 1);
    assert!(front.psi > 0.0);
    // Undamaged walls keep the aggregate below the front wall's psi
    assert!(damage.psi_building < front.psi);
}

#[test]
fn report_round_trips_through_json() {
    let house = settling_house();
    let report = BuildingAssessment::run(&house, &AssessmentConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["building"], "settling-house");
    assert_eq!(json["walls"].as_array().unwrap().len(), 4);
    assert_eq!(json["walls"][0]["status"], "assessed");
}
