//! Curvature-sign decomposition of a wall profile into hogging and sagging
//! regions.

use crate::assess::sri::relative_displacement_scan;
use crate::vecutils;
use serde::Serialize;

/// Curvature type of a region.
///
/// Numeric convention in reports: hogging = -1, sagging = +1, undefined = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegionKind {
    /// Concave-down deflection (settlement accelerating towards the region).
    Hogging,
    /// Concave-up deflection (the trough interior).
    Sagging,
    /// Curvature too small or too few samples to tell.
    Undefined,
}

impl RegionKind {
    pub fn sign(&self) -> i8 {
        match self {
            RegionKind::Hogging => -1,
            RegionKind::Sagging => 1,
            RegionKind::Undefined => 0,
        }
    }
}

/// One contiguous curvature region of a wall profile.
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub kind: RegionKind,
    /// Axis interval [m].
    pub start: f64,
    pub end: f64,
    /// Interval length [m].
    pub length: f64,
    /// Maximum relative displacement within the region [mm], absolute.
    pub d_deflection: f64,
}

/// Ordered, contiguous partition of a wall profile into curvature regions.
///
/// Regions cover the whole wall length; adjacent regions share exactly one
/// boundary point. There is always at least one region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionMap {
    /// Axis positions of the inflection points delimiting regions [m].
    pub inflection_points: Vec<f64>,
    pub regions: Vec<Region>,
}

impl RegionMap {
    pub fn total_length(&self) -> f64 {
        self.regions.iter().map(|r| r.length).sum()
    }
}

/// Decomposes a profile into curvature regions.
///
/// Inflection points are the interior samples where the second difference of
/// displacement versus position changes sign. Each region between consecutive
/// inflection points is tagged sagging when its curvature is predominantly
/// positive (concave up), hogging when negative. Profiles with fewer than 3
/// samples form a single region of undefined type.
pub fn region_map(positions: &[f64], displacements: &[f64]) -> RegionMap {
    let n = positions.len();
    if n < 3 {
        return RegionMap {
            inflection_points: vec![],
            regions: vec![Region {
                kind: RegionKind::Undefined,
                start: positions[0],
                end: positions[n - 1],
                length: positions[n - 1] - positions[0],
                d_deflection: 0.0,
            }],
        };
    }

    let grad1 = vecutils::gradient(displacements, positions);
    let grad2 = vecutils::gradient(&grad1, positions);

    // Only central-stencil curvature estimates delimit regions; the
    // one-sided values at the profile ends are unreliable sign-wise.
    let mut inflection_idx: Vec<usize> = Vec::new();
    for i in 2..n - 1 {
        if grad2[i] * grad2[i - 1] < 0.0 {
            inflection_idx.push(i);
        }
    }

    let mut boundaries = vec![0];
    boundaries.extend(inflection_idx.iter().copied());
    boundaries.push(n - 1);
    boundaries.dedup();

    let mut regions = Vec::new();
    for pair in boundaries.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        regions.push(Region {
            kind: kind_from_curvature(&grad2[a..=b]),
            start: positions[a],
            end: positions[b],
            length: positions[b] - positions[a],
            d_deflection: 0.0,
        });
    }

    RegionMap {
        inflection_points: inflection_idx.iter().map(|&i| positions[i]).collect(),
        regions,
    }
}

/// [`region_map`] with the in-region maximum relative displacement filled in
/// from the exhaustive chord scan.
pub fn region_map_with_deflections(positions: &[f64], displacements: &[f64]) -> RegionMap {
    let mut map = region_map(positions, displacements);
    for region in &mut map.regions {
        let i = index_of(positions, region.start);
        let j = index_of(positions, region.end);
        region.d_deflection =
            relative_displacement_scan(&positions[i..=j], &displacements[i..=j]).abs();
    }
    map
}

fn index_of(positions: &[f64], value: f64) -> usize {
    vecutils::argmin_distance(positions, value)
}

fn kind_from_curvature(grad2: &[f64]) -> RegionKind {
    let mean: f64 = grad2.iter().sum::<f64>() / grad2.len() as f64;
    if mean > 1e-12 {
        RegionKind::Sagging
    } else if mean < -1e-12 {
        RegionKind::Hogging
    } else {
        RegionKind::Undefined
    }
}
