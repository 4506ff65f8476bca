//! Numeric cell normalization.
//!
//! Upstream tables print quantities in Brazilian locale: `.` groups
//! thousands, `,` is the decimal separator, and `-` marks a value the
//! source did not disclose. `169.762.429` is about 170 million, not 169.76.

use tracing::warn;

/// Convert a raw table-cell string into a number.
///
/// Returns `None` for the `-` sentinel, for empty or whitespace-only cells,
/// and for cells that still do not parse after separator substitution. The
/// last case is logged; a bad cell never aborts the surrounding row walk.
/// No rounding happens here.
pub fn normalize(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }

    let cleaned = trimmed.replace('.', "").replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(cell = raw, "unparseable numeric cell, treating as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_and_blank_cells() {
        assert_eq!(normalize("-"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("\t\n"), None);
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(normalize("169.762.429"), Some(169_762_429.0));
        assert_eq!(normalize("1.234"), Some(1234.0));
        assert_eq!(normalize("217"), Some(217.0));
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(normalize("1.234,56"), Some(1234.56));
        assert_eq!(normalize("0,5"), Some(0.5));
    }

    #[test]
    fn test_non_numeric_residue() {
        assert_eq!(normalize("nd"), None);
        assert_eq!(normalize("1.2a3"), None);
        assert_eq!(normalize("12 345"), None);
    }

    #[test]
    fn test_zero_is_not_absent() {
        assert_eq!(normalize("0"), Some(0.0));
    }
}
