// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Demand: how many more items a subscriber is willing to accept.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

/// The number of items a subscriber is still willing to receive.
///
/// A demand is either a finite count or unbounded. It never goes negative:
/// subtraction saturates at zero and addition that would overflow becomes
/// [`Demand::Unbounded`].
///
/// # Example
///
/// ```
/// use tickflow_core::Demand;
///
/// let mut demand = Demand::max(2);
/// demand -= 1;
/// demand -= 1;
/// demand -= 1;
/// assert!(demand.is_none());
///
/// assert_eq!(Demand::max(3) + Demand::unlimited(), Demand::Unbounded);
/// assert!(Demand::unlimited() > Demand::max(usize::MAX));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Demand {
    /// No upper limit on the number of items.
    Unbounded,
    /// At most this many more items.
    Bounded(usize),
}

impl Demand {
    /// A demand of zero items.
    #[must_use]
    pub const fn none() -> Self {
        Self::Bounded(0)
    }

    /// A demand of at most `count` items.
    #[must_use]
    pub const fn max(count: usize) -> Self {
        Self::Bounded(count)
    }

    /// A demand with no upper limit.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self::Unbounded
    }

    /// Build a demand from a signed count, clamping negative values to zero.
    ///
    /// ```
    /// use tickflow_core::Demand;
    ///
    /// assert_eq!(Demand::from_signed(-4), Demand::none());
    /// assert_eq!(Demand::from_signed(4), Demand::max(4));
    /// ```
    #[must_use]
    pub fn from_signed(count: i64) -> Self {
        usize::try_from(count.max(0)).map_or(Self::Unbounded, Self::Bounded)
    }

    /// Returns `true` if no more items may be emitted.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::Bounded(0))
    }

    /// Returns `true` if at least one more item may be emitted.
    #[must_use]
    pub const fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Returns `true` for [`Demand::Unbounded`].
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// The finite count, or `None` when unbounded.
    #[must_use]
    pub const fn count(&self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(count) => Some(*count),
        }
    }

    /// The demand left after one emission.
    #[must_use]
    pub const fn decremented(self) -> Self {
        self.saturating_sub(1)
    }

    /// Subtract `count` items, stopping at zero. Unbounded stays unbounded.
    #[must_use]
    pub const fn saturating_sub(self, count: usize) -> Self {
        match self {
            Self::Unbounded => Self::Unbounded,
            Self::Bounded(current) => Self::Bounded(current.saturating_sub(count)),
        }
    }
}

impl Default for Demand {
    fn default() -> Self {
        Self::none()
    }
}

impl From<usize> for Demand {
    fn from(count: usize) -> Self {
        Self::Bounded(count)
    }
}

impl Ord for Demand {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Unbounded, Self::Unbounded) => Ordering::Equal,
            (Self::Unbounded, Self::Bounded(_)) => Ordering::Greater,
            (Self::Bounded(_), Self::Unbounded) => Ordering::Less,
            (Self::Bounded(a), Self::Bounded(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Demand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Demand {
    type Output = Demand;

    fn add(self, rhs: Demand) -> Demand {
        match (self, rhs) {
            (Self::Bounded(a), Self::Bounded(b)) => {
                a.checked_add(b).map_or(Self::Unbounded, Self::Bounded)
            }
            _ => Self::Unbounded,
        }
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, rhs: Demand) {
        *self = *self + rhs;
    }
}

impl Add<usize> for Demand {
    type Output = Demand;

    fn add(self, rhs: usize) -> Demand {
        self + Demand::Bounded(rhs)
    }
}

impl AddAssign<usize> for Demand {
    fn add_assign(&mut self, rhs: usize) {
        *self = *self + rhs;
    }
}

impl Sub<usize> for Demand {
    type Output = Demand;

    fn sub(self, rhs: usize) -> Demand {
        self.saturating_sub(rhs)
    }
}

impl SubAssign<usize> for Demand {
    fn sub_assign(&mut self, rhs: usize) {
        *self = self.saturating_sub(rhs);
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unlimited"),
            Self::Bounded(count) => write!(f, "max({count})"),
        }
    }
}
