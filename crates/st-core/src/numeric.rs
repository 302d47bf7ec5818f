use crate::CoreError;

/// Scalar type for stored result values.
pub type Real = f64;

/// Absolute and relative comparison bounds, used together: the absolute
/// bound handles values near zero, the relative one everything else.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Mean over the present cells of a sparse row; `None` when no cell is present.
pub fn row_mean(cells: &[Option<Real>]) -> Option<Real> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in cells.iter().flatten() {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as Real) }
}

/// Maximum over the present cells of a sparse row.
pub fn row_max(cells: &[Option<Real>]) -> Option<Real> {
    cells.iter().flatten().copied().reduce(Real::max)
}

/// Minimum over the present cells of a sparse row.
pub fn row_min(cells: &[Option<Real>]) -> Option<Real> {
    cells.iter().flatten().copied().reduce(Real::min)
}
