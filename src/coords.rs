//! Signed fixed point numbers as they appear in the source files, and the latitude and longitude
//! coordinates they scale to.

use crate::errors::IsdDataErr;
use std::fmt::Display;

/// The latitude and longitude in decimal degrees.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lon: f64,
}

impl From<(f64, f64)> for Coords {
    fn from(pair: (f64, f64)) -> Self {
        Self {
            lat: pair.0,
            lon: pair.1,
        }
    }
}

/// A signed integer with an implied number of decimal places, e.g. `+40783` with 3 decimals is
/// `40.783`.
///
/// The value is kept exactly as encoded in the source, scaling to a float is left to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    raw: i32,
    decimals: u8,
}

impl FixedPoint {
    /// Create a new one.
    pub const fn new(raw: i32, decimals: u8) -> Self {
        FixedPoint { raw, decimals }
    }

    /// Parse an optionally signed run of digits with an implied number of decimal places, as used
    /// in the fixed width ISD records.
    pub fn parse_implied(text: &str, decimals: u8) -> Result<Self, IsdDataErr> {
        let (negative, digits) = split_sign(text);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IsdDataErr::InvalidFixedPoint(text.to_owned()));
        }

        let magnitude: i32 = digits
            .parse()
            .map_err(|_| IsdDataErr::InvalidFixedPoint(text.to_owned()))?;

        Ok(FixedPoint {
            raw: if negative { -magnitude } else { magnitude },
            decimals,
        })
    }

    /// Parse a decimal string like `+40.783` or `-0229.0`. The number of decimal places written
    /// in the string is kept.
    pub fn parse_decimal(text: &str) -> Result<Self, IsdDataErr> {
        let text = text.trim();
        let (negative, unsigned) = split_sign(text);

        let (int_part, frac_part) = match unsigned.find('.') {
            Some(idx) => (&unsigned[..idx], &unsigned[idx + 1..]),
            None => (unsigned, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
            || frac_part.len() > 9
        {
            return Err(IsdDataErr::InvalidFixedPoint(text.to_owned()));
        }

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);

        let magnitude: i32 = digits
            .parse()
            .map_err(|_| IsdDataErr::InvalidFixedPoint(text.to_owned()))?;

        Ok(FixedPoint {
            raw: if negative { -magnitude } else { magnitude },
            decimals: frac_part.len() as u8,
        })
    }

    /// The value as it was encoded, without the decimal point.
    pub fn raw(self) -> i32 {
        self.raw
    }

    /// Number of implied decimal places.
    pub fn decimals(self) -> u8 {
        self.decimals
    }

    /// Scale to a float.
    pub fn to_f64(self) -> f64 {
        f64::from(self.raw) / 10f64.powi(i32::from(self.decimals))
    }
}

impl Display for FixedPoint {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        write!(
            formatter,
            "{:.*}",
            usize::from(self.decimals),
            self.to_f64()
        )
    }
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
