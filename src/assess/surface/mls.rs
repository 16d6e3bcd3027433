//! Moving-least-squares quadratic surface fit, used for the higher-order
//! displacement surface.

/// Evaluates a weighted quadratic fit of the scattered samples at `(x, y)`.
///
/// Basis `[1, dx, dy, dx^2, dx*dy, dy^2]` with Gaussian weights of the given
/// support radius. Falls back to the weighted mean when the normal equations
/// are singular (all samples colinear or too few in support).
pub fn mls_quadratic(samples: &[(f64, f64, f64)], x: f64, y: f64, radius: f64) -> Option<f64> {
    if samples.is_empty() || radius <= 0.0 {
        return None;
    }

    const NB: usize = 6;
    let mut ata = [[0.0_f64; NB]; NB];
    let mut atz = [0.0_f64; NB];
    let mut weight_sum = 0.0;
    let mut weighted_mean = 0.0;

    for &(sx, sy, sz) in samples {
        let dx = sx - x;
        let dy = sy - y;
        let w = (-(dx * dx + dy * dy) / (radius * radius)).exp();
        if w < 1e-12 {
            continue;
        }
        let basis = [1.0, dx, dy, dx * dx, dx * dy, dy * dy];
        for i in 0..NB {
            for j in 0..NB {
                ata[i][j] += w * basis[i] * basis[j];
            }
            atz[i] += w * basis[i] * sz;
        }
        weight_sum += w;
        weighted_mean += w * sz;
    }

    if weight_sum < 1e-12 {
        return None;
    }
    weighted_mean /= weight_sum;

    // The constant basis coefficient is the value at the evaluation point
    match solve(ata, atz) {
        Some(coeffs) if coeffs[0].is_finite() => Some(coeffs[0]),
        _ => Some(weighted_mean),
    }
}

/// Gaussian elimination with partial pivoting for the 6x6 normal equations.
fn solve(mut a: [[f64; 6]; 6], mut b: [f64; 6]) -> Option<[f64; 6]> {
    const N: usize = 6;
    for col in 0..N {
        let mut pivot = col;
        for row in col + 1..N {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..N {
            let factor = a[row][col] / a[col][col];
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0_f64; N];
    for col in (0..N).rev() {
        let mut sum = b[col];
        for k in col + 1..N {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_field_reproduced() {
        // z = x^2 + 2y^2 - x*y + 3 lies in the basis span, so the fit is exact
        let mut samples = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                let (x, y) = (i as f64, j as f64);
                samples.push((x, y, x * x + 2.0 * y * y - x * y + 3.0));
            }
        }
        for &(x, y) in &[(2.5, 2.5), (1.2, 3.8), (0.0, 0.0)] {
            let z = mls_quadratic(&samples, x, y, 3.0).unwrap();
            let expected = x * x + 2.0 * y * y - x * y + 3.0;
            assert!((z - expected).abs() < 1e-6, "at ({x},{y}): {z} vs {expected}");
        }
    }

    #[test]
    fn test_colinear_samples_fall_back_to_mean() {
        let samples = vec![(0.0, 0.0, 1.0), (1.0, 0.0, 1.0), (2.0, 0.0, 1.0)];
        let z = mls_quadratic(&samples, 1.0, 0.0, 2.0).unwrap();
        assert!((z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        assert!(mls_quadratic(&[], 0.0, 0.0, 1.0).is_none());
    }
}
