use std::ops::{Add, AddAssign, Sub};
use std::fmt;
use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};

pub type Quanta = i128;

/// Logical simulation time, in hours.
///
/// Stored as a fixed-point count of quanta so that instants are totally
/// ordered and sums of durations are exact. Only ever advanced by process
/// suspensions, never by a wall clock.
#[derive(Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq, Hash, Default)]
pub struct Time(Quanta);

macro_rules! pow10 {
    ($p:expr) => {
        {
            let mut res = 1i128;
            let mut i: i32 = 0;
            while i < $p {
                res *= 10i128;
                i += 1;
            }
            res
        }
    }
}

impl Time {
    pub const ONE_HOUR_BASE10: i32 = 9;
    pub const ONE_HOUR: Quanta = pow10!(Self::ONE_HOUR_BASE10);

    /// Largest amount of hours a configured duration or bound may span.
    pub const MAX_HOURS: f64 = 1e12;

    /// Build a time from a non-negative, finite amount of hours.
    /// Rounded to the nearest quantum, so anything under half a quantum is
    /// zero.
    pub fn hours(h: f64) -> Self {
        assert!(h.is_finite(), "time must be finite, got {h}");
        assert!(h >= 0., "time must not be negative, got {h}");
        Self((h * Self::ONE_HOUR as f64).round() as Quanta)
    }

    pub fn whole_hours(h: u32) -> Self {
        Self(h as Quanta * Self::ONE_HOUR)
    }

    pub fn minutes(m: u32) -> Self {
        Self(m as Quanta * Self::ONE_HOUR / 60)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    fn as_hours_dec(&self) -> Option<BigDecimal> {
        let q = BigDecimal::from_i128(self.0)?;
        let unit = BigDecimal::from_i128(Self::ONE_HOUR)?;
        Some(q / unit)
    }

    pub fn as_hours(&self) -> f64 {
        self.as_hours_dec()
            .and_then(|h| h.to_f64())
            .unwrap_or(f64::NAN)
    }

    pub fn as_quanta(&self) -> Quanta {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `None` if the sum no longer fits the clock.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Time)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.1}h", self.as_hours())
    }
}

impl Add for Time {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Time(self.0 + rhs.0)
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Saturates at zero: logical time never goes negative.
impl Sub for Time {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Time((self.0 - rhs.0).max(0))
    }
}
