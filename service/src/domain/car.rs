//! [`Car`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Booking;

/// Car of the rental fleet.
#[derive(Clone, Debug)]
pub struct Car {
    /// ID of this [`Car`].
    pub id: Id,

    /// [`Make`] of this [`Car`].
    pub make: Make,

    /// [`Model`] of this [`Car`].
    pub model: Model,

    /// Production year of this [`Car`].
    pub year: Year,

    /// Odometer reading of this [`Car`].
    pub kilometre: Kilometre,

    /// Price of renting this [`Car`] for a single day.
    pub daily_rate: Money,

    /// Minimum number of days this [`Car`] can be rented for.
    pub min_days: Days,

    /// Maximum number of days this [`Car`] can be rented for.
    pub max_days: Days,

    /// Current [`Status`] of this [`Car`].
    pub status: Status,

    /// [`DateTime`] when this [`Car`] was created.
    pub created_at: CreationDateTime,
}

impl Car {
    /// Checks whether a rent of the given number of `days` fits into the
    /// rentable range of this [`Car`].
    #[must_use]
    pub fn admits_days(&self, days: Days) -> bool {
        (self.min_days..=self.max_days).contains(&days)
    }

    /// Returns the [`Status`] this [`Car`] should carry, considering whether
    /// any active [`Booking`] `occupies` it.
    ///
    /// Manually assigned [`Status`]es are never overridden.
    #[must_use]
    pub fn recomputed_status(&self, occupied: bool) -> Status {
        if self.status.is_manual() {
            self.status
        } else if occupied {
            Status::Reserved
        } else {
            Status::Available
        }
    }
}

/// ID of a [`Car`].
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

/// Make of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Make(String);

impl Make {
    /// Creates a new [`Make`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `make` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(make: impl Into<String>) -> Self {
        Self(make.into())
    }

    /// Creates a new [`Make`] if the given `make` is valid.
    #[must_use]
    pub fn new(make: impl Into<String>) -> Option<Self> {
        let make = make.into();
        Self::check(&make).then_some(Self(make))
    }

    /// Checks whether the given `make` is a valid [`Make`].
    fn check(make: impl AsRef<str>) -> bool {
        let make = make.as_ref();
        make.trim() == make && !make.is_empty() && make.len() <= 64
    }
}

impl FromStr for Make {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Make`")
    }
}

/// Model of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Model(String);

impl Model {
    /// Creates a new [`Model`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `model` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(model: impl Into<String>) -> Self {
        Self(model.into())
    }

    /// Creates a new [`Model`] if the given `model` is valid.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Option<Self> {
        let model = model.into();
        Self::check(&model).then_some(Self(model))
    }

    /// Checks whether the given `model` is a valid [`Model`].
    fn check(model: impl AsRef<str>) -> bool {
        let model = model.as_ref();
        model.trim() == model && !model.is_empty() && model.len() <= 64
    }
}

impl FromStr for Model {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Model`")
    }
}

/// Production year of a [`Car`].
pub type Year = u16;

/// Odometer reading of a [`Car`], in kilometres.
pub type Kilometre = u32;

/// Number of rentable days.
pub type Days = u32;

define_kind! {
    #[doc = "Status of a [`Car`]."]
    enum Status {
        #[doc = "The [`Car`] can be booked."]
        Available = 1,

        #[doc = "The [`Car`] has an active [`Booking`]."]
        Reserved = 2,

        #[doc = "The [`Car`] is withdrawn from the fleet by an operator."]
        Unavailable = 3,

        #[doc = "The [`Car`] is under maintenance."]
        Maintenance = 4,
    }
}

impl Status {
    /// Indicates whether this [`Status`] is assigned manually by an operator,
    /// rather than derived from [`Booking`]s.
    #[must_use]
    pub fn is_manual(self) -> bool {
        match self {
            Self::Unavailable | Self::Maintenance => true,
            Self::Available | Self::Reserved => false,
        }
    }
}

/// [`DateTime`] when a [`Car`] was created.
pub type CreationDateTime = DateTimeOf<(Car, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{Car, CreationDateTime, Id, Make, Model, Status};

    fn car(status: Status) -> Car {
        Car {
            id: Id::new(),
            make: Make::new("Toyota").unwrap(),
            model: Model::new("Corolla").unwrap(),
            year: 2021,
            kilometre: 54_000,
            daily_rate: "50NZD".parse::<Money>().unwrap(),
            min_days: 1,
            max_days: 30,
            status,
            created_at: CreationDateTime::now(),
        }
    }

    #[test]
    fn recomputes_status_from_occupancy() {
        assert_eq!(
            car(Status::Available).recomputed_status(true),
            Status::Reserved,
        );
        assert_eq!(
            car(Status::Reserved).recomputed_status(false),
            Status::Available,
        );
    }

    #[test]
    fn keeps_manual_status() {
        assert_eq!(
            car(Status::Maintenance).recomputed_status(false),
            Status::Maintenance,
        );
        assert_eq!(
            car(Status::Unavailable).recomputed_status(true),
            Status::Unavailable,
        );
    }

    #[test]
    fn admits_days_within_range() {
        let car = car(Status::Available);
        assert!(car.admits_days(1));
        assert!(car.admits_days(30));
        assert!(!car.admits_days(0));
        assert!(!car.admits_days(31));
    }
}
