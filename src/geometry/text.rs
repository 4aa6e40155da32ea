use std::str::FromStr;

use crate::error::{GeometryError, Result};
use crate::math::Point3;

/// Formats a point as `x/y/z` with four decimals.
#[must_use]
pub fn format_point(p: &Point3) -> String {
    format!("{:.4}/{:.4}/{:.4}", p.x, p.y, p.z)
}

/// Parses the `x/y/z` form written by [`format_point`].
///
/// # Errors
///
/// Returns `GeometryError::Parse` unless there are exactly three numbers.
pub fn parse_point(s: &str) -> Result<Point3> {
    let parts: Vec<&str> = s.trim().split('/').collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(GeometryError::Parse(format!("expected x/y/z, got '{s}'")).into());
    };
    Ok(Point3::new(parse_field(x)?, parse_field(y)?, parse_field(z)?))
}

/// Parses one numeric field.
///
/// # Errors
///
/// Returns `GeometryError::Parse` for malformed input.
pub fn parse_field<T: FromStr>(s: &str) -> Result<T> {
    s.trim()
        .parse()
        .map_err(|_| GeometryError::Parse(format!("bad number '{s}'")).into())
}
