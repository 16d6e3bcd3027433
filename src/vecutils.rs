//! Slice utility functions like min(), max(), argmin(), gradient()

pub fn max(vec: &[f64]) -> f64 {
    vec.iter().cloned().max_by(f64::total_cmp).unwrap()
}

pub fn min(vec: &[f64]) -> f64 {
    vec.iter().cloned().min_by(f64::total_cmp).unwrap()
}

/// Index of the smallest element.
pub fn argmin(vec: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in vec.iter().enumerate() {
        if v < &vec[best] {
            best = i;
        }
    }
    best
}

/// Index of the element closest to `target`.
pub fn argmin_distance(vec: &[f64], target: f64) -> usize {
    let mut best = 0;
    for (i, v) in vec.iter().enumerate() {
        if (v - target).abs() < (vec[best] - target).abs() {
            best = i;
        }
    }
    best
}

/// Reverses `v` and returns it as a new vector.
pub fn flip<T: Clone>(v: &[T]) -> Vec<T> {
    let mut reversed: Vec<T> = Vec::new();
    for i in (0..v.len()).rev() {
        reversed.push(v[i].clone());
    }
    reversed
}

/// `n` evenly spaced values from `start` to `stop`, both inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![];
    }
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// First derivative of `y` with respect to `x` using second-order central
/// differences in the interior and one-sided differences at the ends.
///
/// Supports non-uniform spacing. Both slices must have the same length (>= 2).
pub fn gradient(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len();
    assert_eq!(n, x.len());
    assert!(n >= 2);

    let mut out = vec![0.0; n];
    out[0] = (y[1] - y[0]) / (x[1] - x[0]);
    out[n - 1] = (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]);
    for i in 1..n - 1 {
        let hs = x[i] - x[i - 1];
        let hd = x[i + 1] - x[i];
        out[i] = (hs * hs * y[i + 1] + (hd * hd - hs * hs) * y[i] - hd * hd * y[i - 1])
            / (hs * hd * (hd + hs));
    }
    out
}

/// Checks if two arrays or vectors are almost equal.
///
/// Elements in both containers must be in the same order.
pub fn almost_equal(a: &[f64], b: &[f64], eps: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(&x, &y)| (x - y).abs() <= eps)
}
