//! [`Booking`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money, Period};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{car, renter, rule};
#[cfg(doc)]
use crate::domain::{Car, Quote};

/// Rent of a [`Car`] over a [`Period`] by a renter.
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the rented [`Car`].
    pub car_id: car::Id,

    /// ID of the renter.
    pub renter_id: renter::Id,

    /// Rented [`Period`], with both bounds billable.
    pub period: Period,

    /// Current [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`Cost`] snapshot taken when this [`Booking`] was placed.
    pub cost: Cost,

    /// Renter [`Snapshot`] taken when this [`Booking`] was placed.
    pub renter: Snapshot,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,
}

impl Booking {
    /// Checks whether this [`Booking`] occupies its [`Car`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// ID of a [`Booking`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "The [`Booking`] is placed and awaits an operator review."]
        Pending = 1,

        #[doc = "The [`Booking`] is approved by an operator."]
        Confirmed = 2,

        #[doc = "The [`Booking`] is cancelled."]
        Cancelled = 3,

        #[doc = "The [`Booking`] period has fully elapsed."]
        Completed = 4,
    }
}

impl Status {
    /// Indicates whether a [`Booking`] in this [`Status`] occupies its
    /// [`Car`] and blocks overlapping [`Booking`]s.
    #[must_use]
    pub fn is_active(self) -> bool {
        match self {
            Self::Pending | Self::Confirmed => true,
            Self::Cancelled | Self::Completed => false,
        }
    }
}

/// Cost snapshot of a [`Booking`].
///
/// Captures the [`Quote`] the renter paid, so later [`rule::Rule`] edits
/// never rewrite history.
#[derive(Clone, Debug)]
pub struct Cost {
    /// Number of billable days.
    pub days: car::Days,

    /// Daily rate of the [`Car`] at the time of booking.
    pub daily_rate: Money,

    /// Base cost before any [`rule::Rule`] adjustment.
    pub base: Money,

    /// Signed adjustment applied by the winning [`rule::Rule`], zero when
    /// none applied.
    pub adjustment: Money,

    /// ID of the winning [`rule::Rule`], if any applied.
    pub rule_id: Option<rule::Id>,

    /// Total charged to the renter.
    pub total: Money,
}

/// Renter details snapshot of a [`Booking`].
///
/// Captured at placement, so later profile edits never rewrite history.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// First name of the renter.
    pub first_name: renter::Name,

    /// Last name of the renter.
    pub last_name: renter::Name,

    /// Phone number of the renter.
    pub phone: renter::Phone,

    /// Identity document number of the renter.
    pub id_document: renter::IdDocument,
}

impl From<renter::Profile> for Snapshot {
    fn from(profile: renter::Profile) -> Self {
        let renter::Profile {
            renter_id: _,
            first_name,
            last_name,
            phone,
            id_document,
        } = profile;
        Self {
            first_name,
            last_name,
            phone,
            id_document,
        }
    }
}

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn only_pending_and_confirmed_are_active() {
        assert!(Status::Pending.is_active());
        assert!(Status::Confirmed.is_active());
        assert!(!Status::Cancelled.is_active());
        assert!(!Status::Completed.is_active());
    }
}
