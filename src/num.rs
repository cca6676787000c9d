//! Small float helpers that work without `std`.
//!
//! `core` does not expose `ceil`/`floor` for `f64` (they require platform
//! intrinsics), so the crate carries truncation-based versions. Inputs here
//! are finite pixel quantities well inside `i64` range.

pub(crate) fn ceil(x: f64) -> f64 {
    let t = (x as i64) as f64;
    if x > t { t + 1.0 } else { t }
}

pub(crate) fn floor(x: f64) -> f64 {
    let t = (x as i64) as f64;
    if x < t { t - 1.0 } else { t }
}
