//! Idealized greenfield subsidence trough fitting.
//!
//! Each wall profile is mirrored about its settlement minimum and fitted with
//! a zero-mean Gaussian trough. The fitted parameters and the trough's
//! influence domain feed the greenfield LTSM path.

use crate::assess::surface::WallProfile;
use crate::error::{AssessError, Result};
use crate::vecutils;
use serde::Serialize;
use tracing::debug;

/// Configuration for the Gaussian fit and the influence-domain search.
#[derive(Debug, Clone)]
pub struct GreenfieldConfig {
    /// Starting abscissa for the outward root walk [m].
    pub initial_guess: f64,
    /// Settlement magnitude below which the trough is considered to have
    /// died out [mm].
    pub tolerance: f64,
    /// Outward step of the root walk [m].
    pub step: f64,
    /// Hard cap on root-walk steps; exceeding it is a fit failure.
    pub max_steps: usize,
    /// Maximum Gauss-Newton iterations.
    pub max_iterations: usize,
}

impl Default for GreenfieldConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.1,
            tolerance: 1e-2,
            step: 0.1,
            max_steps: 100_000,
            max_iterations: 50,
        }
    }
}

/// Fitted trough for one wall.
#[derive(Debug, Clone, Serialize)]
pub struct GreenfieldFit {
    /// Peak settlement [mm] (negative for settlement).
    pub s_vmax: f64,
    /// Distance from the trough center to the inflection point [m].
    pub x_inflection: f64,
    /// Outer limit of the influence domain found by the root walk [m].
    pub domain_limit: f64,
    /// Symmetric sample abscissas over the influence domain [m].
    pub xs: Vec<f64>,
    /// Trough ordinates at `xs` [mm].
    pub ws: Vec<f64>,
}

/// The idealized trough shape `s_vmax * exp(-x^2 / (2 * x_inflection^2))`.
pub fn gaussian_shape(x: f64, s_vmax: f64, x_inflection: f64) -> f64 {
    s_vmax * (-x * x / (2.0 * x_inflection * x_inflection)).exp()
}

/// Fits the Gaussian trough to a measured wall profile.
///
/// NaN samples are dropped first; fewer than 2 usable points is a fit
/// failure, never a silent default. The profile is mirrored about its
/// minimum to build the symmetric dataset the zero-mean form expects, then
/// `(s_vmax, x_inflection)` are found by damped Gauss-Newton least squares.
pub fn fit_wall(profile: &WallProfile, cfg: &GreenfieldConfig) -> Result<GreenfieldFit> {
    let mut x_data: Vec<f64> = Vec::new();
    let mut w_data: Vec<f64> = Vec::new();
    for (x, w) in profile.relative.iter().zip(profile.displacements.iter()) {
        if !w.is_nan() {
            x_data.push(*x);
            w_data.push(*w);
        }
    }
    if x_data.len() < 2 {
        return Err(AssessError::FitFailed(format!(
            "{} usable samples after NaN removal",
            x_data.len()
        )));
    }

    // Mirror about the settlement minimum: left half plus its reflection
    let index = vecutils::argmin(&w_data);
    let mut w_sym: Vec<f64> = w_data[..=index].to_vec();
    w_sym.extend(vecutils::flip(&w_data[..index]));
    let mut x_mirror: Vec<f64> = x_data[..=index]
        .iter()
        .map(|x| x - x_data[index])
        .collect();
    x_mirror.extend(x_data[..index].iter().rev().map(|x| x_data[index] - x));

    let (s_vmax, x_inflection) = gauss_newton(&x_mirror, &w_sym, cfg)?;
    let domain_limit = find_root_iterative(s_vmax, x_inflection, cfg)?;

    // Symmetric display grid over the influence domain, 50 samples per half
    let half = vecutils::linspace(0.0, domain_limit, 50);
    let mut xs: Vec<f64> = vecutils::flip(&half).iter().map(|x| -x).collect();
    xs.extend(half.iter());
    let ws: Vec<f64> = xs
        .iter()
        .map(|&x| gaussian_shape(x, s_vmax, x_inflection))
        .collect();

    debug!(
        s_vmax,
        x_inflection, domain_limit, "greenfield trough fitted"
    );

    Ok(GreenfieldFit {
        s_vmax,
        x_inflection,
        domain_limit,
        xs,
        ws,
    })
}

/// Damped Gauss-Newton least squares for `(s_vmax, x_inflection)`.
fn gauss_newton(xs: &[f64], ws: &[f64], cfg: &GreenfieldConfig) -> Result<(f64, f64)> {
    let mut a = vecutils::min(ws);
    if a == 0.0 {
        a = -1.0;
    }
    let spread = vecutils::max(xs) - vecutils::min(xs);
    let mut b = (spread / 4.0).max(1e-3);

    for _ in 0..cfg.max_iterations {
        // Normal equations for the 2-parameter model
        let mut jtj = [[0.0_f64; 2]; 2];
        let mut jtr = [0.0_f64; 2];
        for (&x, &w) in xs.iter().zip(ws.iter()) {
            let e = (-x * x / (2.0 * b * b)).exp();
            let f = a * e;
            let r = f - w;
            let da = e;
            let db = a * e * x * x / (b * b * b);
            jtj[0][0] += da * da;
            jtj[0][1] += da * db;
            jtj[1][0] += db * da;
            jtj[1][1] += db * db;
            jtr[0] += da * r;
            jtr[1] += db * r;
        }
        let det = jtj[0][0] * jtj[1][1] - jtj[0][1] * jtj[1][0];
        if det.abs() < 1e-30 || !det.is_finite() {
            return Err(AssessError::FitFailed(
                "singular normal equations".to_string(),
            ));
        }
        let delta_a = -(jtj[1][1] * jtr[0] - jtj[0][1] * jtr[1]) / det;
        let delta_b = -(jtj[0][0] * jtr[1] - jtj[1][0] * jtr[0]) / det;

        // Damped update; never let the width jump by more than half its size
        let damping = (0.5 * b.abs() / delta_b.abs().max(1e-30)).min(1.0);
        let step_a = damping * delta_a;
        let step_b = damping * delta_b;
        a += step_a;
        b = (b + step_b).abs().max(1e-6);

        if !a.is_finite() || !b.is_finite() {
            return Err(AssessError::FitFailed("parameters diverged".to_string()));
        }
        if step_a.abs() < 1e-12 && step_b.abs() < 1e-12 {
            break;
        }
    }
    Ok((a, b.abs()))
}

/// Walks outward from the initial guess in fixed steps until the trough
/// magnitude drops below the tolerance. The abscissa found this way, not an
/// analytic closed form, is the influence-domain boundary used downstream.
fn find_root_iterative(s_vmax: f64, x_inflection: f64, cfg: &GreenfieldConfig) -> Result<f64> {
    let mut guess = cfg.initial_guess;
    let mut steps = 0;
    while gaussian_shape(guess, s_vmax, x_inflection).abs() > cfg.tolerance {
        guess += cfg.step;
        steps += 1;
        if steps > cfg.max_steps {
            return Err(AssessError::FitFailed(format!(
                "influence domain not found within {} steps",
                cfg.max_steps
            )));
        }
    }
    Ok(guess)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_from_trough(s_vmax: f64, x_inflection: f64, center: f64, n: usize) -> WallProfile {
        let positions = vecutils::linspace(0.0, 2.0 * center, n);
        let displacements: Vec<f64> = positions
            .iter()
            .map(|&x| gaussian_shape(x - center, s_vmax, x_inflection))
            .collect();
        WallProfile {
            positions: positions.clone(),
            relative: positions,
            displacements,
        }
    }

    #[test]
    fn test_round_trip_fit() {
        // A profile generated from known parameters must be recovered
        let profile = profile_from_trough(-12.0, 2.0, 6.0, 61);
        let fit = fit_wall(&profile, &GreenfieldConfig::default()).unwrap();
        assert!((fit.s_vmax - -12.0).abs() < 1e-3, "s_vmax = {}", fit.s_vmax);
        assert!(
            (fit.x_inflection - 2.0).abs() < 1e-3,
            "x_inflection = {}",
            fit.x_inflection
        );
    }

    #[test]
    fn test_domain_limit_beyond_inflection() {
        let profile = profile_from_trough(-12.0, 2.0, 6.0, 61);
        let cfg = GreenfieldConfig::default();
        let fit = fit_wall(&profile, &cfg).unwrap();
        // At the domain limit the trough has died out below the tolerance
        assert!(fit.domain_limit > fit.x_inflection);
        let residual = gaussian_shape(fit.domain_limit, fit.s_vmax, fit.x_inflection).abs();
        assert!(residual <= cfg.tolerance);
    }

    #[test]
    fn test_sample_grid_is_symmetric() {
        let profile = profile_from_trough(-8.0, 1.5, 4.0, 41);
        let fit = fit_wall(&profile, &GreenfieldConfig::default()).unwrap();
        assert_eq!(fit.xs.len(), 100);
        assert_eq!(fit.ws.len(), 100);
        let n = fit.xs.len();
        for i in 0..n / 2 {
            assert!((fit.xs[i] + fit.xs[n - 1 - i]).abs() < 1e-9);
            assert!((fit.ws[i] - fit.ws[n - 1 - i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_too_few_samples_is_failure() {
        let profile = WallProfile {
            positions: vec![0.0, 1.0, 2.0],
            relative: vec![0.0, 1.0, 2.0],
            displacements: vec![-1.0, f64::NAN, f64::NAN],
        };
        let err = fit_wall(&profile, &GreenfieldConfig::default()).unwrap_err();
        assert!(matches!(err, AssessError::FitFailed(_)));
    }
}
