//! CSS-style length parsing for `width`/`height` attributes.

use crate::patterns::{DIMENSION, PIXEL_DIMENSION_MIN, RELATIVE_DIMENSION_MIN, RELATIVE_UNITS};

/// A parsed length: leading integer plus unit suffix (`px` when omitted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub value: u64,
    pub unit: String,
}

impl Dimension {
    /// Whether this length is large enough to suggest a content image.
    ///
    /// Pixels must exceed 150; `%`, `vh`, `vmin` and `vmax` must exceed 30.
    /// Other units never qualify.
    #[must_use]
    pub fn is_prominent(&self) -> bool {
        match self.unit.as_str() {
            "px" => self.value > PIXEL_DIMENSION_MIN,
            unit if RELATIVE_UNITS.contains(&unit) => self.value > RELATIVE_DIMENSION_MIN,
            _ => false,
        }
    }
}

/// Parse a length such as `"150px"`, `"30%"` or `"200"`.
///
/// Returns `None` for missing or non-numeric values (`"auto"`, `""`).
///
/// # Examples
///
/// ```
/// use rs_pagesift::dimension::parse_dimension;
///
/// let d = parse_dimension("200").expect("numeric");
/// assert_eq!(d.value, 200);
/// assert_eq!(d.unit, "px");
///
/// assert!(parse_dimension("auto").is_none());
/// ```
#[must_use]
pub fn parse_dimension(raw: &str) -> Option<Dimension> {
    let caps = DIMENSION.captures(raw.trim())?;
    let value = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().trim().to_ascii_lowercase())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "px".to_string());

    Some(Dimension { value, unit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_pixels_and_percentages() {
        assert_eq!(
            parse_dimension("150px"),
            Some(Dimension { value: 150, unit: "px".into() })
        );
        assert_eq!(
            parse_dimension("30%"),
            Some(Dimension { value: 30, unit: "%".into() })
        );
    }

    #[test]
    fn test_bare_number_defaults_to_pixels() {
        let d = parse_dimension(" 640 ").expect("numeric");
        assert_eq!(d.unit, "px");
        assert_eq!(d.value, 640);
    }

    #[test]
    fn test_non_numeric_values_are_unknown() {
        assert!(parse_dimension("").is_none());
        assert!(parse_dimension("auto").is_none());
        assert!(parse_dimension("px100").is_none());
    }

    #[test]
    fn test_prominence_thresholds_are_strict() {
        assert!(!parse_dimension("150px").expect("px").is_prominent());
        assert!(parse_dimension("151px").expect("px").is_prominent());
        assert!(!parse_dimension("30vh").expect("vh").is_prominent());
        assert!(parse_dimension("31vmax").expect("vmax").is_prominent());
        assert!(!parse_dimension("500em").expect("em").is_prominent());
    }

    #[test]
    fn test_overflowing_values_are_unknown() {
        assert!(parse_dimension("99999999999999999999999px").is_none());
    }
}
