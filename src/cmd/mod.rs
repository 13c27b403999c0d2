pub mod calibrate;
pub mod edit;
pub mod export;
pub mod reset;
pub mod show;
pub mod tap;

use scorecard::error::{ScResult, ScorecardError};

/// Parses "x,y" into a point.
pub fn parse_point(raw: &str) -> ScResult<(f64, f64)> {
    let invalid = || ScorecardError::Validation(format!("'{}' is not an x,y point", raw));
    let (x, y) = raw.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    // f64 parsing accepts "NaN" and "inf".
    if !(x.is_finite() && y.is_finite()) {
        return Err(invalid());
    }
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse_with_spaces_and_signs() {
        assert_eq!(parse_point("10, -4.5").unwrap(), (10.0, -4.5));
    }

    #[test]
    fn non_finite_and_malformed_points_are_rejected() {
        for raw in ["NaN,1", "1,inf", "-inf,0", "1", "a,b", ""] {
            assert!(parse_point(raw).is_err(), "accepted {:?}", raw);
        }
    }
}
