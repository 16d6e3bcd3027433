//! Soil-Related-Intensity (SRI) parameter extraction.
//!
//! Decomposes a wall displacement profile into curvature regions and reduces
//! it to the scalar indices used by the empirical damage tables: maximum
//! settlement, differential settlement, deflection ratio, maximum relative
//! displacement, tilt, rotation and angular distortion.

pub mod regions;

use crate::error::Result;
use crate::geom::wall::Wall;
use crate::vecutils;
use regions::RegionMap;
use serde::Serialize;

/// Scalar SRI record for one wall. All values are absolute magnitudes.
///
/// Units: `s_max` and `delta_s_max` in millimeters, `deflection_ratio`
/// dimensionless (mm/mm), `d_deflection` in millimeters, angles in radians.
#[derive(Debug, Clone, Serialize)]
pub struct SriParameters {
    /// Maximum settlement |min z| [mm].
    pub s_max: f64,
    /// Differential settlement across the wall [mm].
    pub delta_s_max: f64,
    /// Differential settlement over wall length [-].
    pub deflection_ratio: f64,
    /// Maximum relative displacement from the exhaustive chord scan [mm].
    pub d_deflection: f64,
    /// Tilt [rad].
    pub omega: f64,
    /// Rotation at the settlement trough [rad].
    pub phi: f64,
    /// Angular distortion, `phi + omega` when a relative displacement
    /// exists, else 0 [rad].
    pub beta: f64,
}

/// Maximum relative displacement of a profile section, signed.
///
/// For every pair of sample indices the chord through them is constructed and
/// the vertical deviation of every sample between them is measured. The
/// maximum absolute deviation over all triples is returned with its sign.
/// This is deliberately the O(n^3) brute-force definition: the true maximum
/// must be guaranteed for deflection-ratio reporting.
pub fn relative_displacement_scan(positions: &[f64], displacements: &[f64]) -> f64 {
    let n = positions.len();
    let mut max_rel_disp: f64 = 0.0;
    for i in 0..n {
        for j in i + 1..n {
            let (x1, w1) = (positions[i], displacements[i]);
            let (x2, w2) = (positions[j], displacements[j]);
            if x2 == x1 {
                continue;
            }
            let m = (w2 - w1) / (x2 - x1);
            let b = w1 - m * x1;
            for k in i..=j {
                let chord_w = m * positions[k] + b;
                let disp = chord_w - displacements[k];
                if disp.abs() > max_rel_disp.abs() {
                    max_rel_disp = disp;
                }
            }
        }
    }
    max_rel_disp
}

/// Rotation at the settlement trough [rad].
///
/// Uses the slope from the profile minimum towards the nearer of its two
/// neighbors (nearer along the axis; on a tie the steeper side governs).
/// Displacements in mm, positions in m.
fn calculate_phi(positions: &[f64], displacements: &[f64]) -> f64 {
    let i_min = vecutils::argmin(displacements);
    let w_min = displacements[i_min];

    let mut candidates: Vec<usize> = Vec::new();
    if i_min > 0 {
        candidates.push(i_min - 1);
    }
    if i_min + 1 < displacements.len() {
        candidates.push(i_min + 1);
    }
    let Some(&adj) = candidates.iter().min_by(|&&a, &&b| {
        let da = (positions[a] - positions[i_min]).abs();
        let db = (positions[b] - positions[i_min]).abs();
        da.total_cmp(&db).then_with(|| {
            let sa = (displacements[a] - w_min).abs();
            let sb = (displacements[b] - w_min).abs();
            sb.total_cmp(&sa)
        })
    }) else {
        return 0.0;
    };

    let run_mm = (positions[adj] - positions[i_min]).abs() * 1e3;
    if run_mm == 0.0 {
        return 0.0;
    }
    ((displacements[adj] - w_min) / run_mm).atan()
}

/// Tilt [rad]: end-displacement differential over the longest uninterrupted
/// half-period between sign changes of the first difference. With fewer than
/// two sign changes the whole wall is the half-period.
fn calculate_omega(positions: &[f64], displacements: &[f64]) -> f64 {
    let n = displacements.len();
    let diffs: Vec<f64> = displacements.windows(2).map(|w| w[1] - w[0]).collect();

    let mut sign_changes: Vec<usize> = Vec::new();
    for i in 1..diffs.len() {
        if diffs[i].signum() != diffs[i - 1].signum() {
            sign_changes.push(i);
        }
    }

    let (start, end) = if sign_changes.len() < 2 {
        (0, n - 1)
    } else {
        let mut best = (sign_changes[0], sign_changes[1]);
        for w in sign_changes.windows(2) {
            let span = positions[w[1]] - positions[w[0]];
            if span > positions[best.1] - positions[best.0] {
                best = (w[0], w[1]);
            }
        }
        best
    };

    let span_mm = (positions[end] - positions[start]) * 1e3;
    if span_mm == 0.0 {
        return 0.0;
    }
    ((displacements[end] - displacements[start]) / span_mm).atan()
}

/// Computes the SRI record and the curvature region map for one wall,
/// working directly on the measured samples.
///
/// Displacements are first normalized against the wall maximum so that the
/// least-settled sample sits at zero.
pub fn compute_sri(wall: &Wall) -> Result<(SriParameters, RegionMap)> {
    let positions = wall.axis_positions();
    let raw = wall.displacements();
    let z_max = vecutils::max(&raw);
    let wallz: Vec<f64> = raw.iter().map(|z| z - z_max).collect();

    let length_mm = wall.length() * 1e3;
    let s_vmax = vecutils::min(&wallz);

    let region_map = regions::region_map_with_deflections(&positions, &wallz);
    let d_deflection = region_map
        .regions
        .iter()
        .map(|r| r.d_deflection)
        .fold(0.0_f64, f64::max);

    let phi = calculate_phi(&positions, &wallz);
    let omega = calculate_omega(&positions, &wallz);
    let beta = if d_deflection != 0.0 {
        phi.abs() + omega.abs()
    } else {
        0.0
    };

    Ok((
        SriParameters {
            s_max: vecutils::min(&raw).abs(),
            delta_s_max: s_vmax.abs(),
            deflection_ratio: if length_mm == 0.0 {
                0.0
            } else {
                s_vmax.abs() / length_mm
            },
            d_deflection,
            omega: omega.abs(),
            phi: phi.abs(),
            beta,
        },
        region_map,
    ))
}
