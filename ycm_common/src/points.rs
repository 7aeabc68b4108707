use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------     Points       ------------------------------------------------------------
/// A member's point balance, or an amount of points charged or credited.
///
/// Balances are allowed to go negative. Settling a booking never blocks on an insufficient balance; a low-balance
/// notification is raised instead.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Points(i64);

op!(binary Points, Add, add);
op!(binary Points, Sub, sub);
op!(inplace Points, AddAssign, add_assign);
op!(inplace Points, SubAssign, sub_assign);
op!(unary Points, Neg, neg);

impl Mul<i64> for Points {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as points: {0}")]
pub struct PointsConversionError(String);

impl From<i64> for Points {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Points {
    type Error = PointsConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| PointsConversionError(format!("{value} is too large to convert to Points")))
    }
}

impl FromStr for Points {
    type Err = PointsConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self).map_err(|e| PointsConversionError(format!("'{s}' is not a whole number. {e}")))
    }
}

impl Display for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.unsigned_abs() == 1 {
            write!(f, "{} pt", self.0)
        } else {
            write!(f, "{} pts", self.0)
        }
    }
}

impl Points {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// `None` if the sum does not fit in a balance.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    /// Returns the larger of `self` and zero.
    pub fn floor_at_zero(self) -> Self {
        Self(self.0.max(0))
    }
}
