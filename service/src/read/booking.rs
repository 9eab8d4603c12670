//! [`Booking`]-related read definitions.

use common::{Date, Period};
use derive_more::Deref;
use smart_default::SmartDefault;

use crate::domain::{booking, car};
#[cfg(doc)]
use crate::domain::{Booking, Car};

/// Indicator whether any blocking [`Booking`] overlaps a [`Period`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct Overlaps(pub bool);

impl PartialEq<bool> for Overlaps {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

/// Selector of [`Booking`]s overlapping a [`Period`] on a [`Car`].
#[derive(Clone, Copy, Debug)]
pub struct Overlapping {
    /// ID of the [`Car`] to check.
    pub car_id: car::Id,

    /// [`Period`] to check against.
    pub period: Period,

    /// [`booking::Status`]es treated as blocking.
    pub blocking: Blocking,
}

/// Set of [`booking::Status`]es blocking an overlapping [`Booking`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub enum Blocking {
    /// Both [`booking::Status::Pending`] and [`booking::Status::Confirmed`]
    /// block.
    #[default]
    Active,

    /// Only [`booking::Status::Confirmed`] blocks.
    Confirmed,
}

impl Blocking {
    /// Returns the blocking [`booking::Status`]es of this set.
    #[must_use]
    pub fn statuses(self) -> &'static [booking::Status] {
        match self {
            Self::Active => {
                &[booking::Status::Pending, booking::Status::Confirmed]
            }
            Self::Confirmed => &[booking::Status::Confirmed],
        }
    }
}

/// Wrapper around a [`Booking`] indicating that it [`is_active()`].
///
/// [`is_active()`]: Booking::is_active
#[derive(Clone, Debug)]
pub struct Active(pub booking::Booking);

/// Wrapper around a [`Booking`] indicating that it awaits review.
#[derive(Clone, Debug)]
pub struct Pending(pub booking::Booking);

/// Selector of [`booking::Status::Confirmed`] [`Booking`]s whose [`Period`]
/// fully elapsed before the given [`Date`].
#[derive(Clone, Copy, Debug)]
pub struct Elapsed(pub Date);
