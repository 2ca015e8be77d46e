//! Small numeric helpers used by profile leveling.
//!
//! Least-squares polynomial fitting over a handful of anchor samples and
//! Horner evaluation; nothing here is aware of the file format.

use super::{Error, Result};

/// Index of the first element of `xs` that is `>= v`.
///
/// `xs` must be sorted ascending. Returns `xs.len()` when every element is
/// smaller than `v`.
pub fn search_sorted(xs: &[f64], v: f64) -> usize {
    xs.partition_point(|&x| x < v)
}

/// Evaluate a polynomial with coefficients `coefs` (lowest degree first)
/// at `x` using Horner's rule.
pub fn polyval(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Least-squares fit of a degree-`deg` polynomial through `(xs, ys)`.
///
/// Returns coefficients ordered lowest degree first. Solves the normal
/// equations of the Vandermonde system by Gaussian elimination with partial
/// pivoting; requires at least `deg + 1` points and fails on singular
/// systems (e.g. all anchor positions identical).
pub fn polyfit(xs: &[f64], ys: &[f64], deg: usize) -> Result<Vec<f64>> {
    if xs.len() != ys.len() {
        return Err(Error::other(format!(
            "polyfit: {} x values vs {} y values",
            xs.len(),
            ys.len()
        )));
    }
    let n = deg + 1;
    if xs.len() < n {
        return Err(Error::other(format!(
            "polyfit: degree {} needs at least {} points, got {}",
            deg,
            n,
            xs.len()
        )));
    }

    // Normal equations: A c = b with A[i][j] = sum x^(i+j), b[i] = sum y x^i.
    let mut powers = vec![0.0f64; 2 * n - 1];
    let mut b = vec![0.0f64; n];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut xp = 1.0;
        for p in powers.iter_mut() {
            *p += xp;
            xp *= x;
        }
        let mut xp = 1.0;
        for bi in b.iter_mut() {
            *bi += y * xp;
            xp *= x;
        }
    }

    let mut a = vec![vec![0.0f64; n]; n];
    for (i, row) in a.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = powers[i + j];
        }
    }

    solve(&mut a, &mut b)?;
    Ok(b)
}

/// In-place Gaussian elimination with partial pivoting; solution lands in `b`.
fn solve(a: &mut [Vec<f64>], b: &mut [f64]) -> Result<()> {
    let n = b.len();
    for col in 0..n {
        // Pivot on the largest remaining magnitude in this column
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < f64::EPSILON {
            return Err(Error::other("polyfit: singular system"));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    for col in (0..n).rev() {
        let mut acc = b[col];
        for k in (col + 1)..n {
            acc -= a[col][k] * b[k];
        }
        b[col] = acc / a[col][col];
    }
    Ok(())
}
