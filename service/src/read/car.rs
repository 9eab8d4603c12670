//! [`Car`]-related read definitions.

use common::Period;
use derive_more::Deref;

#[cfg(doc)]
use crate::domain::{Booking, Car};

/// Indicator whether a [`Car`] has any active [`Booking`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct Occupied(pub bool);

impl PartialEq<bool> for Occupied {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

/// Selector of [`Car`]s bookable over a [`Period`].
///
/// Matches [`Car`]s free of blocking [`Booking`]s over the [`Period`] and not
/// withdrawn by an operator.
#[derive(Clone, Copy, Debug)]
pub struct AvailableFor(pub Period);
