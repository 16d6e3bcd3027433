//! Classification of computed scalars against the empirical limit tables.

use crate::assess::limits::{LimitTableStore, ParameterFamily};
use serde::Serialize;

/// One literature source's verdict for one parameter value.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentEntry {
    pub source: String,
    pub assessment: String,
    pub value: f64,
    /// Breakpoint bounding the matched interval from above.
    pub limit: f64,
    pub damage_level: u8,
    pub comment: String,
    /// Continuous damage-parameter estimate, attached to strain entries only.
    pub psi: Option<f64>,
}

/// Classifies `value` against every table registered for `family`.
///
/// Returns one entry per table. The matched interval is the one whose upper
/// breakpoint is the first breakpoint >= value; its description and damage
/// level sit at the previous index (clamped at 0, so a value of exactly 0
/// lands in the first interval). Values beyond the last finite breakpoint
/// fall into the inf-bounded final interval. A NaN value yields an empty
/// report rather than placeholder entries.
pub fn classify(
    value: f64,
    family: ParameterFamily,
    store: &LimitTableStore,
) -> Vec<AssessmentEntry> {
    if value.is_nan() {
        return vec![];
    }
    let mut report = Vec::new();
    for table in store.tables_for(family) {
        let idx = table
            .breakpoints
            .iter()
            .position(|&b| value <= b)
            .unwrap_or(table.breakpoints.len() - 1);
        let interval = idx.saturating_sub(1);
        let psi = match family {
            ParameterFamily::Epsilon => Some(psi_from_strain(value)),
            _ => None,
        };
        report.push(AssessmentEntry {
            source: table.source.clone(),
            assessment: table.descriptions[interval].clone(),
            value,
            limit: table.breakpoints[idx],
            damage_level: table.damage_levels[interval],
            comment: format!("Assessment based on {family}"),
            psi,
        });
    }
    report
}

/// Continuous damage-parameter estimate from a tensile strain value.
///
/// Interpolates the strain position within its Boscardin & Cording damage
/// interval onto the corresponding psi range from the crack-based damage
/// scale. Strains beyond the tabulated range saturate at the top of the
/// last range.
pub fn psi_from_strain(epsilon: f64) -> f64 {
    const LIMITS: [f64; 6] = [0.0, 0.5e-3, 0.75e-3, 1.5e-3, 3e-3, 1.0];
    const PSI_RANGES: [(f64, f64); 5] = [
        (0.0, 1.0),
        (1.0, 1.5),
        (1.5, 2.5),
        (2.5, 3.5),
        (3.5, 10.0),
    ];

    for i in 1..LIMITS.len() {
        let lower = LIMITS[i - 1];
        let upper = LIMITS[i];
        if epsilon >= lower && epsilon < upper {
            let (lo_psi, hi_psi) = PSI_RANGES[i - 1];
            let ratio = (epsilon - lower) / (upper - lower);
            return lo_psi + ratio * (hi_psi - lo_psi);
        }
    }
    PSI_RANGES[PSI_RANGES.len() - 1].1
}
