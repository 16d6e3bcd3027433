use anyhow::Result;
use masonry_assess::assess::cracks::{self, CrackObservation};
use masonry_assess::{AssessmentConfig, BuildingAssessment, CrackConfig, House, Point, Wall};
use tracing_subscriber::EnvFilter;

/// Synthetic four-wall house above a settlement trough next to its
/// south-west corner. Displacements in mm, planform in m.
fn example_house() -> Result<House> {
    let trough = |x: f64, y: f64| -> f64 {
        let r2 = (x + 1.0).powi(2) + (y + 2.0).powi(2);
        -10.0 * (-r2 / 30.0).exp()
    };
    let pt = |x: f64, y: f64| Point::new(x, y, trough(x, y));

    let walls = vec![
        Wall::new(
            "front",
            vec![
                pt(0.0, 0.0),
                pt(2.0, 0.0),
                pt(4.0, 0.0),
                pt(6.0, 0.0),
                pt(8.0, 0.0),
            ],
            5400.0,
            43.2,
            Some(6.0),
        )?,
        Wall::new(
            "right",
            vec![pt(8.0, 0.0), pt(8.0, 2.0), pt(8.0, 4.0), pt(8.0, 6.0)],
            5400.0,
            32.4,
            Some(2.0),
        )?,
        Wall::new(
            "back",
            vec![pt(8.0, 6.0), pt(4.0, 6.0), pt(0.0, 6.0)],
            5400.0,
            43.2,
            Some(3.0),
        )?,
        Wall::new(
            "left",
            vec![pt(0.0, 6.0), pt(0.0, 3.0), pt(0.0, 0.0)],
            5400.0,
            32.4,
            None,
        )?,
    ];
    Ok(House::new("example-house", walls)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let house = example_house()?;
    let report = BuildingAssessment::run(&house, &AssessmentConfig::default())?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    // Crack survey on the most exposed facade
    let survey = vec![
        CrackObservation {
            x: 1.0,
            y: 1.0,
            width: 1.0,
            wall: "front".to_string(),
        },
        CrackObservation {
            x: 1.4,
            y: 1.3,
            width: 2.0,
            wall: "front".to_string(),
        },
        CrackObservation {
            x: 5.0,
            y: 2.0,
            width: 0.5,
            wall: "front".to_string(),
        },
    ];
    let areas: Vec<(String, f64)> = house
        .walls()
        .iter()
        .map(|w| (w.name.clone(), w.area))
        .collect();
    let damage = cracks::assess_cracks(&survey, &areas, &CrackConfig::default());
    println!("{}", serde_json::to_string_pretty(&damage)?);

    Ok(())
}
