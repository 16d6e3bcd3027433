//! Limit-Tensile-Strain-Method (LTSM) strain computation.
//!
//! Converts deflection geometry (from the fitted greenfield trough or from
//! measured curvature regions) into bending, shear, horizontal and combined
//! tensile strain using deep-beam formulas parameterized by the facade's
//! extensional-to-shear stiffness ratio.

use crate::assess::greenfield::GreenfieldFit;
use crate::assess::sri::regions::{RegionKind, RegionMap};
use crate::assess::sri::relative_displacement_scan;
use crate::geom::wall::Wall;
use crate::vecutils;
use serde::Serialize;

/// Configuration for the LTSM evaluation.
#[derive(Debug, Clone)]
pub struct LtsmConfig {
    /// Settlement ordinate defining the edge of the influence zone [mm].
    pub limit_line: f64,
    /// Fixed E/G stiffness ratio; when `None` it is derived from the wall's
    /// opening percentage.
    pub eg_ratio: Option<f64>,
}

impl Default for LtsmConfig {
    fn default() -> Self {
        Self {
            limit_line: -1.0,
            eg_ratio: None,
        }
    }
}

/// Strain record for one wall. All values are absolute magnitudes [-].
#[derive(Debug, Clone, Serialize)]
pub struct StrainMeasures {
    pub e_bending_hogging: f64,
    pub e_shear_hogging: f64,
    pub e_bending_sagging: f64,
    pub e_shear_sagging: f64,
    pub e_horizontal: f64,
    /// Bending plus horizontal strain.
    pub e_bt: f64,
    /// Diagonal-tension combination of horizontal and shear strain.
    pub e_dt: f64,
    /// Governing design value: max of `e_bt` and `e_dt`.
    pub e_total: f64,
}

/// Geometry of the governing deflection segment for one mode.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentGeometry {
    /// Segment length [mm].
    pub length: f64,
    /// Length over (effective) wall height [-].
    pub normalized_length: f64,
    /// Relative displacement over length [-].
    pub deflection_ratio: f64,
    /// Relative displacement [mm].
    pub d_deflection: f64,
}

impl SegmentGeometry {
    fn zero() -> Self {
        Self {
            length: 0.0,
            normalized_length: 0.0,
            deflection_ratio: 0.0,
            d_deflection: 0.0,
        }
    }
}

/// Full LTSM output for one wall.
#[derive(Debug, Clone, Serialize)]
pub struct LtsmResult {
    pub strains: StrainMeasures,
    pub hogging: SegmentGeometry,
    pub sagging: SegmentGeometry,
    pub eg_ratio: f64,
    /// Trough inflection distance [m], greenfield path only.
    pub x_inflection: Option<f64>,
    /// Influence-zone limit abscissa [m], greenfield path only.
    pub x_limit: Option<f64>,
}

/// E/G stiffness ratio from the facade opening percentage.
///
/// Piecewise-linear over the Son & Cording break points: 0%, 10% and 30%
/// openings map to ratios 2.6, 8 and 11. Walls whose opening fraction cannot
/// be computed take the lowest ratio; heavily perforated walls saturate at
/// the highest.
pub fn eg_ratio_from_openings(wall: &Wall) -> f64 {
    const RATIOS: [f64; 3] = [2.6, 8.0, 11.0];
    const PERCENT: [f64; 3] = [0.0, 10.0, 30.0];

    let Some(p) = wall.opening_percentage() else {
        return RATIOS[0];
    };
    if p <= PERCENT[0] {
        return RATIOS[0];
    }
    for i in 1..PERCENT.len() {
        if p < PERCENT[i] {
            let t = (p - PERCENT[i - 1]) / (PERCENT[i] - PERCENT[i - 1]);
            return RATIOS[i - 1] + t * (RATIOS[i] - RATIOS[i - 1]);
        }
    }
    RATIOS[RATIOS.len() - 1]
}

/// Bending and shear strain of a hogging segment.
fn e_hog(dl: f64, lh: f64, eg_rat: f64) -> (f64, f64) {
    let bending = dl * (3.0 * lh / (0.25 * lh * lh + 1.2 * eg_rat));
    let shear = dl * (3.0 * eg_rat / (0.5 * lh * lh + 2.0 * 1.2 * eg_rat));
    (bending, shear)
}

/// Bending and shear strain of a sagging segment.
fn e_sag(dl: f64, lh: f64, eg_rat: f64) -> (f64, f64) {
    let bending = dl * (6.0 * lh / (lh * lh + 2.0 * eg_rat));
    let shear = dl * (3.0 * lh / (2.0 * lh * lh + 2.0 * 1.2 * eg_rat));
    (bending, shear)
}

/// Combines per-mode strains into the governing total.
fn e_total(e_bs: f64, e_bh: f64, e_ss: f64, e_sh: f64, e_h: f64) -> (f64, f64, f64) {
    let e_bending = e_bs.max(e_bh);
    let e_shear = e_ss.max(e_sh);
    let e_bt = e_bending + e_h;
    let e_dt = e_h / (2.0 + ((e_h / 2.0).powi(2) + e_shear * e_shear).sqrt());
    (e_bt.max(e_dt), e_bt, e_dt)
}

/// Horizontal strain from the differential rotation between the wall's two
/// end slopes, scaled by half the wall height over the wall length.
fn horizontal_strain(wall: &Wall) -> f64 {
    let x = wall.axis_positions();
    let w = wall.displacements();
    let n = x.len();
    let slope = |i: usize, j: usize| -> f64 {
        let run_mm = (x[j] - x[i]) * 1e3;
        if run_mm == 0.0 {
            0.0
        } else {
            ((w[j] - w[i]) / run_mm).atan()
        }
    };
    let theta_start = slope(0, 1);
    let theta_end = slope(n - 2, n - 1);
    let length_mm = wall.length() * 1e3;
    if length_mm == 0.0 {
        return 0.0;
    }
    ((theta_end - theta_start) * wall.height / 2.0 / length_mm).abs()
}

/// LTSM evaluation of the fitted greenfield trough.
///
/// The trough is split at the inflection distance: the part of the wall
/// beyond it hogs, the rest sags. Relative displacements per part come from
/// the exhaustive chord scan over the corresponding trough samples.
pub fn greenfield_strains(fit: &GreenfieldFit, wall: &Wall, cfg: &LtsmConfig) -> LtsmResult {
    let xs = &fit.xs;
    let ws = &fit.ws;
    let x_inflection = fit.x_inflection.abs();
    let length = wall.length();
    let height = wall.height;
    let eg_rat = cfg.eg_ratio.unwrap_or_else(|| eg_ratio_from_openings(wall));

    let w_inflection = ws[vecutils::argmin_distance(xs, x_inflection)];
    let x_limit = xs[vecutils::argmin_distance(ws, cfg.limit_line)].abs();

    let l_hogging = ((length - x_inflection) * 1e3).max(0.0);
    let lh_hogging = l_hogging / height;

    let mut limit_idx = vecutils::argmin_distance(ws, cfg.limit_line);
    let mut inflection_idx = vecutils::argmin_distance(ws, w_inflection);
    if limit_idx > inflection_idx {
        std::mem::swap(&mut limit_idx, &mut inflection_idx);
    }
    let dw_hogging =
        relative_displacement_scan(&xs[limit_idx..=inflection_idx], &ws[limit_idx..=inflection_idx])
            .abs();
    let dl_hogging = if l_hogging == 0.0 {
        0.0
    } else {
        dw_hogging / l_hogging
    };

    let l_sagging = length * 1e3 - l_hogging;
    let lh_sagging = l_sagging / (height / 2.0);
    let min_idx = vecutils::argmin(ws);
    let (sag_lo, sag_hi) = if inflection_idx <= min_idx {
        (inflection_idx, min_idx)
    } else {
        (min_idx, inflection_idx)
    };
    let dw_sagging = relative_displacement_scan(&xs[sag_lo..=sag_hi], &ws[sag_lo..=sag_hi]).abs();
    let dl_sagging = if l_sagging == 0.0 {
        0.0
    } else {
        dw_sagging / l_sagging
    };

    let e_h = horizontal_strain(wall);
    let (e_bh, e_sh) = e_hog(dl_hogging, lh_hogging, eg_rat);
    let (e_bs, e_ss) = e_sag(dl_sagging, lh_sagging, eg_rat);
    let (e_tot, e_bt, e_dt) = e_total(e_bs, e_bh, e_ss, e_sh, e_h);

    LtsmResult {
        strains: StrainMeasures {
            e_bending_hogging: e_bh.abs(),
            e_shear_hogging: e_sh.abs(),
            e_bending_sagging: e_bs.abs(),
            e_shear_sagging: e_ss.abs(),
            e_horizontal: e_h,
            e_bt: e_bt.abs(),
            e_dt: e_dt.abs(),
            e_total: e_tot.abs(),
        },
        hogging: SegmentGeometry {
            length: l_hogging,
            normalized_length: lh_hogging,
            deflection_ratio: dl_hogging,
            d_deflection: dw_hogging,
        },
        sagging: SegmentGeometry {
            length: l_sagging,
            normalized_length: lh_sagging,
            deflection_ratio: dl_sagging,
            d_deflection: dw_sagging,
        },
        eg_ratio: eg_rat,
        x_inflection: Some(x_inflection),
        x_limit: Some(x_limit),
    }
}

/// LTSM evaluation of the measured curvature regions.
///
/// Every hogging and sagging region is a candidate segment; per mode the
/// segment yielding the largest bending strain governs and its geometry is
/// reported alongside the aggregate strain record.
pub fn measured_strains(regions: &RegionMap, wall: &Wall, cfg: &LtsmConfig) -> LtsmResult {
    let height = wall.height;
    let eg_rat = cfg.eg_ratio.unwrap_or_else(|| eg_ratio_from_openings(wall));

    let mut e_bending_sagging: f64 = 0.0;
    let mut e_shear_sagging: f64 = 0.0;
    let mut best_sagging: Option<SegmentGeometry> = None;
    let mut e_bending_hogging: f64 = 0.0;
    let mut e_shear_hogging: f64 = 0.0;
    let mut best_hogging: Option<SegmentGeometry> = None;

    for region in &regions.regions {
        let length_mm = region.length * 1e3;
        if length_mm == 0.0 {
            continue;
        }
        let dl = region.d_deflection / length_mm;
        match region.kind {
            RegionKind::Sagging => {
                let lh = length_mm / (height / 2.0);
                let (e_b, e_s) = e_sag(dl, lh, eg_rat);
                if e_b.abs() >= e_bending_sagging {
                    best_sagging = Some(SegmentGeometry {
                        length: length_mm,
                        normalized_length: lh,
                        deflection_ratio: dl,
                        d_deflection: region.d_deflection,
                    });
                }
                e_bending_sagging = e_bending_sagging.max(e_b.abs());
                e_shear_sagging = e_shear_sagging.max(e_s.abs());
            }
            RegionKind::Hogging => {
                let lh = length_mm / height;
                let (e_b, e_s) = e_hog(dl, lh, eg_rat);
                if e_b.abs() >= e_bending_hogging {
                    best_hogging = Some(SegmentGeometry {
                        length: length_mm,
                        normalized_length: lh,
                        deflection_ratio: dl,
                        d_deflection: region.d_deflection,
                    });
                }
                e_bending_hogging = e_bending_hogging.max(e_b.abs());
                e_shear_hogging = e_shear_hogging.max(e_s.abs());
            }
            RegionKind::Undefined => {}
        }
    }

    let e_h = horizontal_strain(wall);
    let (e_tot, e_bt, e_dt) = e_total(
        e_bending_sagging,
        e_bending_hogging,
        e_shear_sagging,
        e_shear_hogging,
        e_h,
    );

    LtsmResult {
        strains: StrainMeasures {
            e_bending_hogging,
            e_shear_hogging,
            e_bending_sagging,
            e_shear_sagging,
            e_horizontal: e_h,
            e_bt: e_bt.abs(),
            e_dt: e_dt.abs(),
            e_total: e_tot.abs(),
        },
        hogging: best_hogging.unwrap_or_else(SegmentGeometry::zero),
        sagging: best_sagging.unwrap_or_else(SegmentGeometry::zero),
        eg_ratio: eg_rat,
        x_inflection: None,
        x_limit: None,
    }
}
