//! Audit [`Event`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::renter;
#[cfg(doc)]
use crate::domain::{Booking, Car, Payment, Rule};

/// Single record of the audit trail.
///
/// [`Event`]s are written in the same transaction as the state change they
/// describe.
#[derive(Clone, Debug)]
pub struct Event {
    /// ID of this [`Event`].
    pub id: Id,

    /// ID of the user who triggered this [`Event`].
    pub actor_id: renter::Id,

    /// Performed [`Action`].
    pub action: Action,

    /// [`Target`] of the [`Action`].
    pub target: Target,

    /// Free-form details of this [`Event`].
    pub detail: String,

    /// [`DateTime`] when this [`Event`] was created.
    pub created_at: CreationDateTime,
}

impl Event {
    /// Creates a new [`Event`] happening right now.
    #[must_use]
    pub fn new(
        actor_id: renter::Id,
        action: Action,
        target: Target,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: Id::new(),
            actor_id,
            action,
            target,
            detail: detail.into(),
            created_at: CreationDateTime::now(),
        }
    }
}

/// ID of an [`Event`].
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
    #[doc = "Action recorded by an [`Event`]."]
    enum Action {
        #[doc = "A [`Booking`] was placed."]
        CreateBooking = 1,

        #[doc = "A [`Payment`] attempt was made."]
        CreatePayment = 2,

        #[doc = "A [`Booking`] was approved."]
        ApproveBooking = 3,

        #[doc = "A [`Booking`] was rejected."]
        RejectBooking = 4,

        #[doc = "A [`Booking`] was cancelled."]
        CancelBooking = 5,

        #[doc = "A [`Booking`] was completed."]
        CompleteBooking = 6,

        #[doc = "A pricing [`Rule`] was created."]
        CreateRule = 7,

        #[doc = "A pricing [`Rule`] was updated."]
        UpdateRule = 8,

        #[doc = "A [`renter::Profile`] was saved."]
        SaveProfile = 9,
    }
}

/// Target of an [`Event`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Target {
    /// [`target::Kind`] of the affected entity.
    pub kind: target::Kind,

    /// ID of the affected entity.
    pub id: Uuid,
}

pub mod target {
    //! [`Event`] target definitions.

    use common::define_kind;

    #[cfg(doc)]
    use crate::domain::{Booking, Car, Payment, Rule};

    #[cfg(doc)]
    use super::Event;

    define_kind! {
        #[doc = "Kind of an entity affected by an [`Event`]."]
        enum Kind {
            #[doc = "A [`Booking`]."]
            Booking = 1,

            #[doc = "A [`Payment`]."]
            Payment = 2,

            #[doc = "A [`Car`]."]
            Car = 3,

            #[doc = "A pricing [`Rule`]."]
            Rule = 4,

            #[doc = "A [`crate::domain::renter::Profile`]."]
            Profile = 5,
        }
    }
}

/// [`DateTime`] when an [`Event`] was created.
pub type CreationDateTime = DateTimeOf<(Event, unit::Creation)>;
