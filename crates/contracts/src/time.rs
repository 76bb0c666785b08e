//! PrecisionTime - fixed-point timeline clock
//!
//! All timestamps are microseconds since the timeline origin, stored as `i64`.
//! Floating-point inputs are converted once, at the boundary, using decimal
//! round-half-up (ties away from zero); every comparison afterwards is integer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::ContractError;

const MICROS_PER_MILLI: i64 = 1_000;
const MILLI_DIGITS: u32 = 3;
const SECOND_DIGITS: u32 = 6;

/// Largest accepted timestamp magnitude: 10^15 µs, about 31 years.
const MAX_MICROS: i64 = 1_000_000_000_000_000;

/// Millisecond timestamp with microsecond resolution.
///
/// # Examples
/// ```
/// use contracts::PrecisionTime;
///
/// let a = PrecisionTime::from_millis(4950);
/// let b = PrecisionTime::from_millis_f64(5000.0).unwrap();
/// assert!(a.is_within(b, PrecisionTime::from_millis(50)));
/// assert_eq!((b - a).as_micros(), 50_000);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrecisionTime(i64);

impl PrecisionTime {
    pub const ZERO: Self = Self(0);

    /// Upper bound for timestamps converted from external input.
    pub const MAX: Self = Self(MAX_MICROS);

    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis * MICROS_PER_MILLI)
    }

    /// Convert fractional milliseconds, rounding half-up at the third decimal.
    /// Values beyond [`PrecisionTime::MAX`] in magnitude are rejected.
    pub fn from_millis_f64(millis: f64) -> Result<Self, ContractError> {
        round_decimal(millis, MILLI_DIGITS)
            .map(Self)
            .filter(|t| t.is_in_range())
            .ok_or_else(|| ContractError::invalid_time(millis, "ms"))
    }

    /// Convert fractional seconds, rounding half-up at the microsecond.
    pub fn from_secs_f64(secs: f64) -> Result<Self, ContractError> {
        round_decimal(secs, SECOND_DIGITS)
            .map(Self)
            .filter(|t| t.is_in_range())
            .ok_or_else(|| ContractError::invalid_time(secs, "s"))
    }

    /// `numerator / denominator` microseconds, rounded half-up.
    ///
    /// Returns `ZERO` for a zero denominator.
    pub fn from_ratio(numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }
        let n = numerator as i128;
        let d = denominator as i128;
        let negative = (n < 0) != (d < 0);
        let (n, d) = (n.abs(), d.abs());
        let rounded = (2 * n + d) / (2 * d);
        let value = if negative { -rounded } else { rounded };
        Self(value.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    #[inline]
    pub const fn as_micros(self) -> i64 {
        self.0
    }

    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / MICROS_PER_MILLI as f64
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// True when the magnitude does not exceed [`PrecisionTime::MAX`].
    #[inline]
    pub const fn is_in_range(self) -> bool {
        -MAX_MICROS <= self.0 && self.0 <= MAX_MICROS
    }

    /// Absolute distance between two timestamps, saturating at `i64::MAX` µs.
    #[inline]
    pub fn abs_diff(self, other: Self) -> Self {
        Self(i64::try_from(self.0.abs_diff(other.0)).unwrap_or(i64::MAX))
    }

    /// True when `other` lies within `tolerance` of `self` (inclusive).
    #[inline]
    pub fn is_within(self, other: Self, tolerance: Self) -> bool {
        self.abs_diff(other) <= tolerance
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

/// Round the shortest decimal representation of `value` to `scale` fractional
/// digits, ties away from zero, and return it as a scaled integer.
///
/// Working on the decimal digits rather than `value * 10^scale` keeps inputs
/// such as `0.0015` ms rounding to `2` µs instead of `1`.
fn round_decimal(value: f64, scale: u32) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }

    let repr = format!("{}", value.abs());
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let frac = frac_part.as_bytes();

    let mut scaled: i64 = int_part.parse().ok()?;
    for idx in 0..scale as usize {
        let digit = frac.get(idx).map(|b| i64::from(b - b'0')).unwrap_or(0);
        scaled = scaled.checked_mul(10)?.checked_add(digit)?;
    }
    if frac.get(scale as usize).is_some_and(|b| *b >= b'5') {
        scaled = scaled.checked_add(1)?;
    }

    Some(if value.is_sign_negative() {
        -scaled
    } else {
        scaled
    })
}

// Arithmetic saturates at the i64 limits instead of wrapping.
impl Add for PrecisionTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for PrecisionTime {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for PrecisionTime {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for PrecisionTime {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl fmt::Display for PrecisionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_milli = MICROS_PER_MILLI as u64;
        write!(f, "{sign}{}.{:03}ms", abs / per_milli, abs % per_milli)
    }
}

// Serialized as a number of milliseconds, matching the external time unit.
impl Serialize for PrecisionTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MICROS_PER_MILLI == 0 {
            serializer.serialize_i64(self.0 / MICROS_PER_MILLI)
        } else {
            serializer.serialize_f64(self.as_millis_f64())
        }
    }
}

impl<'de> Deserialize<'de> for PrecisionTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        Self::from_millis_f64(millis).map_err(serde::de::Error::custom)
    }
}

/// Rational frame rate, e.g. `30000/1001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub num: u32,
    pub den: u32,
}

impl FrameRate {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    pub fn as_f64(&self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            f64::from(self.num) / f64::from(self.den)
        }
    }

    /// Duration of a single frame.
    pub fn frame_duration(&self) -> PrecisionTime {
        PrecisionTime::from_ratio(i64::from(self.den) * 1_000_000, i64::from(self.num))
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::new(30, 1)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}
