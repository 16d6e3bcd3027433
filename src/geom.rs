pub mod house;
pub mod point;
pub mod polygon;
pub mod wall;

/// Geometric precision
pub(crate) const EPS: f64 = 1e-9;
