//! Subsidence damage assessment: interpolation, greenfield fitting, SRI and
//! LTSM extraction, crack surveys and classification against literature
//! limit tables.

pub mod classify;
pub mod cracks;
pub mod greenfield;
pub mod limits;
pub mod ltsm;
pub mod pipeline;
pub mod sri;
pub mod surface;
