//! Sexagesimal (base-60) angle parsing
//!
//! Catalogs publish right ascension as `H:M:S` and declination as `D:M:S`.
//! Both decode to decimal degrees here.

use crate::{ExoskyError, Result};

/// Degrees per hour of right ascension
const DEGREES_PER_HOUR: f64 = 15.0;

/// Unit of the leading field of a sexagesimal string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleKind {
    /// `H:M:S`, right ascension
    Hours,
    /// `D:M:S`, declination
    Degrees,
}

/// Parse a colon-delimited sexagesimal angle into decimal degrees
///
/// `decimal = |f0| + f1/60 + f2/3600`, times 15 for [`AngleKind::Hours`].
/// For [`AngleKind::Degrees`] the sign comes from the degree field alone,
/// so `-00:30:00` is -0.5°.
///
/// ```rust
/// use exosky::coordinates::sexagesimal::{parse_sexagesimal, AngleKind};
///
/// assert_eq!(parse_sexagesimal("12:30:00", AngleKind::Hours).unwrap(), 187.5);
/// assert_eq!(parse_sexagesimal("-45:30:00", AngleKind::Degrees).unwrap(), -45.5);
/// ```
///
/// # Errors
///
/// [`ExoskyError::Format`] when the text does not split into exactly three
/// fields or a field is not a finite number.
pub fn parse_sexagesimal(text: &str, kind: AngleKind) -> Result<f64> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        return Err(ExoskyError::Format(format!(
            "invalid sexagesimal format '{}': expected 3 fields, found {}",
            text,
            parts.len()
        )));
    }

    let field = |raw: &str| -> Result<f64> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| {
                ExoskyError::Format(format!(
                    "invalid sexagesimal format '{}': '{}' is not a number",
                    text, raw
                ))
            })
    };

    let lead = field(parts[0])?;
    let minutes = field(parts[1])?;
    let seconds = field(parts[2])?;

    let magnitude = lead.abs() + minutes / 60.0 + seconds / 3600.0;

    Ok(match kind {
        AngleKind::Hours => magnitude * DEGREES_PER_HOUR,
        AngleKind::Degrees if lead.is_sign_negative() => -magnitude,
        AngleKind::Degrees => magnitude,
    })
}

/// Right ascension `H:M:S` to degrees
pub fn parse_ra(text: &str) -> Result<f64> {
    parse_sexagesimal(text, AngleKind::Hours)
}

/// Declination `D:M:S` to degrees
pub fn parse_dec(text: &str) -> Result<f64> {
    parse_sexagesimal(text, AngleKind::Degrees)
}
