//! Totals over normalized items.
//!
//! An absent value contributes nothing to a total, but the total itself is
//! always a number: an empty or all-absent column sums to `0.0`. Rounding
//! to two decimals happens exactly once, here, never per row.

/// Sum the present values of one numeric column.
pub fn sum_present<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().sum()
}

/// Round a presentation total to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
