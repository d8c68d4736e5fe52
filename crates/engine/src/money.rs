use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Absolute tolerance below which a balance is treated as zero.
///
/// Positions are real-valued currency figures, so repeated additions and
/// subtractions can leave a tiny residue where an exact computation would
/// give zero. Every comparison of an [`Amount`] against zero goes through
/// this tolerance. The tolerance is absolute, not relative: currency has a
/// fixed useful resolution (well below a cent) regardless of how large the
/// balance is.
pub const EPSILON: f64 = 1e-6;

/// Signed currency amount with tolerance-checked zero comparisons.
///
/// Use this type for **all** monetary values in the engine (positions,
/// transfer amounts, expense records). The sign convention is:
/// - positive = is owed money / incoming
/// - negative = owes money / outgoing
///
/// Construction validates the figure, so a `NaN` or infinity never enters
/// the engine:
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(12.34).unwrap();
/// assert_eq!(amount.to_string(), "12.34");
/// assert!(Amount::new(f64::NAN).is_err());
/// assert!(Amount::new(f64::INFINITY).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
#[repr(transparent)]
pub struct Amount(f64);

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    /// Creates a new amount from a raw figure.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAmount`] if the value is not finite.
    pub fn new(value: f64) -> Result<Amount, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "expected a finite currency figure, got {value}"
            )));
        }
        Ok(Amount(value))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` if the amount is within [`EPSILON`] of zero.
    #[must_use]
    pub fn is_settled(self) -> bool {
        self.0.abs() <= EPSILON
    }

    /// Returns `true` if the amount is above the tolerance.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > EPSILON
    }

    /// Returns `true` if the amount is below the negated tolerance.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < -EPSILON
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(self) -> Amount {
        Amount(self.0.abs())
    }

    /// Returns the smaller of two amounts.
    #[must_use]
    pub fn min(self, other: Amount) -> Amount {
        if self.0 <= other.0 { self } else { other }
    }

    /// Total ordering over the raw value. Finite values only (guaranteed by
    /// construction), so this agrees with the usual numeric order.
    #[must_use]
    pub fn total_cmp(&self, other: &Amount) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Amount {
    type Error = EngineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}
