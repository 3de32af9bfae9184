//! `Point3`: a plain 3D coordinate triple
//!
//! `Point3` is `repr(C)` over three `f64`s so a slice of points can be viewed
//! as a flat `[f64]` buffer (x0, y0, z0, x1, ...) and shipped between ranks
//! through `bytemuck` without copying.

use std::fmt;

use bytemuck::{Pod, Zeroable};

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable, serde::Serialize, serde::Deserialize,
)]
#[repr(C)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Coordinates in column order (x, y, z).
    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Coordinate for store column `column` (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn component(&self, column: usize) -> Option<f64> {
        match column {
            0 => Some(self.x),
            1 => Some(self.y),
            2 => Some(self.z),
            _ => None,
        }
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Renders as `(x, y, z)`, each coordinate in general notation with six
/// significant digits (`0.123457`, `1e+06`).
impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            General(self.x),
            General(self.y),
            General(self.z)
        )
    }
}

const SIGNIFICANT_DIGITS: i32 = 6;

/// `%g`-style float: fixed notation for exponents in `[-4, 6)`, scientific
/// otherwise, trailing zeros dropped.
struct General(f64);

impl fmt::Display for General {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("nan");
        }
        if v.is_infinite() {
            return f.write_str(if v < 0.0 { "-inf" } else { "inf" });
        }

        // Round to the digit budget first; the exponent can move (9.999995 -> 10).
        let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, v);
        let (mantissa, exp) = sci.split_once('e').ok_or(fmt::Error)?;
        let exp: i32 = exp.parse().map_err(|_| fmt::Error)?;

        if exp < -4 || exp >= SIGNIFICANT_DIGITS {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{}e{sign}{:02}", trim_zeros(mantissa), exp.abs())
        } else {
            let decimals = (SIGNIFICANT_DIGITS - 1 - exp) as usize;
            f.write_str(trim_zeros(&format!("{v:.decimals$}")))
        }
    }
}

fn trim_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(Point3, [f64; 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_drops_trailing_zeros() {
        assert_eq!(Point3::new(0.0, 1.0, 2.5).to_string(), "(0, 1, 2.5)");
        assert_eq!(Point3::new(-1.25, 1e3, 0.1).to_string(), "(-1.25, 1000, 0.1)");
    }

    #[test]
    fn display_rounds_to_six_significant_digits() {
        assert_eq!(
            Point3::new(0.1234567, 123456.7, -2.0 / 3.0).to_string(),
            "(0.123457, 123457, -0.666667)"
        );
        assert_eq!(Point3::new(9.9999996, 0.0001, 1.0).to_string(), "(10, 0.0001, 1)");
    }

    #[test]
    fn display_switches_to_exponent_form() {
        assert_eq!(
            Point3::new(1e6, 1.5e-5, -2.5e-12).to_string(),
            "(1e+06, 1.5e-05, -2.5e-12)"
        );
        assert_eq!(Point3::new(1234567.0, 1e100, 0.0).to_string(), "(1.23457e+06, 1e+100, 0)");
    }

    #[test]
    fn display_non_finite() {
        assert_eq!(
            Point3::new(f64::INFINITY, f64::NEG_INFINITY, f64::NAN).to_string(),
            "(inf, -inf, nan)"
        );
    }

    #[test]
    fn components_follow_column_order() {
        let p = Point3::new(4.0, 5.0, 6.0);
        assert_eq!(p.component(0), Some(4.0));
        assert_eq!(p.component(1), Some(5.0));
        assert_eq!(p.component(2), Some(6.0));
        assert_eq!(p.component(3), None);
        assert_eq!(p.to_array(), [4.0, 5.0, 6.0]);
    }

    #[test]
    fn slice_casts_to_flat_coordinates() {
        let pts = [Point3::new(1.0, 2.0, 3.0), Point3::new(4.0, 5.0, 6.0)];
        let flat: &[f64] = bytemuck::cast_slice(&pts);
        assert_eq!(flat, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
