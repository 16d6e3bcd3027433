pub mod assess;
pub mod error;
pub mod geom;
pub mod vecutils;

// Prelude
pub use assess::cracks::{CrackConfig, CrackObservation, DamageParameter};
pub use assess::pipeline::{AssessmentConfig, BuildingAssessment, WallOutcome};
pub use error::{AssessError, Result};
pub use geom::house::House;
pub use geom::point::Point;
pub use geom::wall::Wall;
