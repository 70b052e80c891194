//! Unit conversion utilities
//!
//! All geometry is carried in millimetres. This module formats lengths for
//! drawing annotations and parses user-supplied lengths with an optional unit
//! suffix (`mm`, `cm`, `in`/`"`), including fractional inches.

use crate::error::UnitsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format length value for display, one decimal place
///
/// * `value_mm` - Value in millimeters
/// * `system` - Target measurement system
pub fn format_length(value_mm: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => format!("{:.1}", value_mm),
        MeasurementSystem::Imperial => format!("{:.1}", value_mm / MM_PER_INCH),
    }
}

/// Parse length string to millimeters
///
/// A trailing `mm`, `cm`, `in` or `"` overrides `system`. Imperial values
/// accept whole-plus-fraction input such as `5 1/8`.
///
/// * `input` - String to parse
/// * `system` - Assumed measurement system when no suffix is given
pub fn parse_length(input: &str, system: MeasurementSystem) -> Result<f64, UnitsError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }

    let (number, factor) = split_unit_suffix(input, system)?;
    let value = if number.contains('/') {
        parse_fraction(number, input)?
    } else {
        parse_number(number, input)?
    };

    Ok(value * factor)
}

/// Get the unit label for the given system ("mm" or "in")
pub fn get_unit_label(system: MeasurementSystem) -> &'static str {
    match system {
        MeasurementSystem::Metric => "mm",
        MeasurementSystem::Imperial => "in",
    }
}

fn split_unit_suffix(input: &str, system: MeasurementSystem) -> Result<(&str, f64), UnitsError> {
    let split = input
        .find(|c: char| c.is_ascii_alphabetic() || c == '"')
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);

    let factor = match unit.trim().to_lowercase().as_str() {
        "" => match system {
            MeasurementSystem::Metric => 1.0,
            MeasurementSystem::Imperial => MM_PER_INCH,
        },
        "mm" => 1.0,
        "cm" => 10.0,
        "in" | "inch" | "\"" => MM_PER_INCH,
        other => {
            return Err(UnitsError::UnknownUnit {
                unit: other.to_string(),
            })
        }
    };

    Ok((number.trim(), factor))
}

fn parse_number(part: &str, input: &str) -> Result<f64, UnitsError> {
    part.parse::<f64>().map_err(|_| UnitsError::InvalidNumber {
        input: input.to_string(),
    })
}

fn parse_fraction(number: &str, input: &str) -> Result<f64, UnitsError> {
    let mut total = 0.0;
    let mut sign = 1.0;

    for part in number.split_whitespace() {
        if part.contains('/') {
            let frac_parts: Vec<&str> = part.split('/').collect();
            if frac_parts.len() != 2 {
                return Err(UnitsError::InvalidFraction {
                    input: input.to_string(),
                });
            }
            let num = parse_number(frac_parts[0], input)?;
            let den = parse_number(frac_parts[1], input)?;
            if den == 0.0 {
                return Err(UnitsError::DivisionByZero {
                    input: input.to_string(),
                });
            }
            if num.is_sign_negative() {
                sign = -1.0;
            }
            total += num.abs() / den;
        } else {
            let whole = parse_number(part, input)?;
            if whole.is_sign_negative() {
                sign = -1.0;
            }
            total += whole.abs();
        }
    }

    Ok(sign * total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_metric_formatting() {
        assert_eq!(format_length(200.0, MeasurementSystem::Metric), "200.0");
        assert_eq!(format_length(10.46, MeasurementSystem::Metric), "10.5");
        assert_eq!(format_length(25.4, MeasurementSystem::Imperial), "1.0");
    }

    #[test]
    fn test_plain_numbers() {
        assert!(approx(parse_length("10.5", MeasurementSystem::Metric).unwrap(), 10.5));
        assert!(approx(parse_length("1", MeasurementSystem::Imperial).unwrap(), 25.4));
        assert!(approx(parse_length("  180  ", MeasurementSystem::Metric).unwrap(), 180.0));
    }

    #[test]
    fn test_unit_suffixes() {
        assert!(approx(parse_length("20cm", MeasurementSystem::Metric).unwrap(), 200.0));
        assert!(approx(parse_length("150 mm", MeasurementSystem::Imperial).unwrap(), 150.0));
        assert!(approx(parse_length("2in", MeasurementSystem::Metric).unwrap(), 50.8));
        assert!(approx(parse_length("2\"", MeasurementSystem::Metric).unwrap(), 50.8));
    }

    #[test]
    fn test_imperial_fraction() {
        assert!(approx(parse_length("1 1/2", MeasurementSystem::Imperial).unwrap(), 38.1));
        assert!(approx(parse_length("5 1/8 in", MeasurementSystem::Metric).unwrap(), 130.175));
        assert!(approx(parse_length("1/4", MeasurementSystem::Imperial).unwrap(), 6.35));
        assert!(approx(parse_length("-1/2", MeasurementSystem::Imperial).unwrap(), -12.7));
    }

    #[test]
    fn test_zero_and_empty() {
        assert_eq!(parse_length("0", MeasurementSystem::Metric).unwrap(), 0.0);
        assert_eq!(parse_length("", MeasurementSystem::Metric).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            parse_length("abc", MeasurementSystem::Metric),
            Err(UnitsError::UnknownUnit { .. })
        ));
        assert!(matches!(
            parse_length("1.2.3", MeasurementSystem::Metric),
            Err(UnitsError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_length("1/0", MeasurementSystem::Imperial),
            Err(UnitsError::DivisionByZero { .. })
        ));
        assert!(matches!(
            parse_length("1/2/3", MeasurementSystem::Imperial),
            Err(UnitsError::InvalidFraction { .. })
        ));
        assert!(matches!(
            parse_length("3ft", MeasurementSystem::Metric),
            Err(UnitsError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(get_unit_label(MeasurementSystem::Metric), "mm");
        assert_eq!(get_unit_label(MeasurementSystem::Imperial), "in");
        assert_eq!("inch".parse::<MeasurementSystem>(), Ok(MeasurementSystem::Imperial));
    }
}
