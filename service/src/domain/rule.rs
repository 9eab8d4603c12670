//! Pricing [`Rule`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money, Percent, Period};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::car;
#[cfg(doc)]
use crate::domain::{Booking, Car};

/// Pricing rule adjusting the base cost of a [`Booking`].
#[derive(Clone, Debug)]
pub struct Rule {
    /// ID of this [`Rule`].
    pub id: Id,

    /// Human-readable [`Name`] of this [`Rule`].
    pub name: Name,

    /// [`Kind`] of this [`Rule`].
    pub kind: Kind,

    /// [`Amount`] this [`Rule`] adjusts the base cost by.
    pub amount: Amount,

    /// [`Scope`] of [`Car`]s this [`Rule`] applies to.
    pub scope: Scope,

    /// Minimum rent duration (in days) for this [`Rule`] to apply.
    pub min_days: car::Days,

    /// Calendar [`Window`] this [`Rule`] is effective within.
    pub window: Window,

    /// Indicator whether this [`Rule`] is active.
    pub is_active: bool,

    /// [`DateTime`] when this [`Rule`] was created.
    pub created_at: CreationDateTime,
}

impl Rule {
    /// Checks whether this [`Rule`] applies to a rent of the given [`Car`]
    /// over the given [`Period`].
    ///
    /// The whole [`Period`] must fit into the [`Window`] of this [`Rule`].
    #[must_use]
    pub fn applies(&self, car_id: car::Id, period: &Period) -> bool {
        self.is_active
            && self.scope.covers(car_id)
            && self.window.contains(period)
            && self.min_days <= period.days()
    }

    /// Returns the signed adjustment of this [`Rule`] against the given
    /// `base` cost.
    ///
    /// [`Kind::Discount`]s always yield a negative amount, and
    /// [`Kind::Surcharge`]s a positive one, regardless of the sign the
    /// [`Amount`] was stored with.
    #[must_use]
    pub fn delta(&self, base: Money) -> Money {
        let raw = match self.amount {
            Amount::Percent(p) => p.of(base.amount),
            Amount::Fixed(v) => v,
        }
        .abs();
        Money {
            amount: match self.kind {
                Kind::Discount => -raw,
                Kind::Surcharge => raw,
            },
            currency: base.currency,
        }
    }
}

/// ID of a [`Rule`].
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
    Ord,
    PartialEq,
    PartialOrd,
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

/// Name of a [`Rule`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 80
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Rule`]."]
    enum Kind {
        #[doc = "The [`Rule`] lowers the base cost."]
        Discount = 1,

        #[doc = "The [`Rule`] raises the base cost."]
        Surcharge = 2,
    }
}

/// Adjustment amount of a [`Rule`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Amount {
    /// Percentage of the base cost.
    Percent(Percent),

    /// Fixed amount in the [`Booking`] currency.
    ///
    /// [`Booking`]: crate::domain::Booking
    Fixed(Decimal),
}

/// Scope of [`Car`]s a [`Rule`] applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    /// The [`Rule`] applies to the whole fleet.
    Global,

    /// The [`Rule`] applies to a single [`Car`] only.
    Car(car::Id),
}

impl Scope {
    /// Checks whether this [`Scope`] covers the given [`Car`].
    #[must_use]
    pub fn covers(self, car_id: car::Id) -> bool {
        match self {
            Self::Global => true,
            Self::Car(id) => id == car_id,
        }
    }
}

/// Calendar window a [`Rule`] is effective within.
///
/// An unset bound means the [`Window`] is unbounded on that side.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Window {
    /// First [`Date`] this [`Window`] is effective from.
    ///
    /// [`Date`]: common::Date
    from: Option<common::Date>,

    /// Last [`Date`] this [`Window`] is effective to.
    ///
    /// [`Date`]: common::Date
    to: Option<common::Date>,
}

impl Window {
    /// Creates a new [`Window`] if the given bounds are ordered.
    #[must_use]
    pub fn new(from: Option<common::Date>, to: Option<common::Date>) -> Option<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            (from <= to).then_some(())?;
        }
        Some(Self { from, to })
    }

    /// Returns the first [`Date`] this [`Window`] is effective from.
    ///
    /// [`Date`]: common::Date
    #[must_use]
    pub fn from(&self) -> Option<common::Date> {
        self.from
    }

    /// Returns the last [`Date`] this [`Window`] is effective to.
    ///
    /// [`Date`]: common::Date
    #[must_use]
    pub fn to(&self) -> Option<common::Date> {
        self.to
    }

    /// Checks whether the whole given [`Period`] lies within this [`Window`].
    #[must_use]
    pub fn contains(&self, period: &Period) -> bool {
        self.from.map_or(true, |from| from <= period.start())
            && self.to.map_or(true, |to| period.end() <= to)
    }
}

/// [`DateTime`] when a [`Rule`] was created.
pub type CreationDateTime = DateTimeOf<(Rule, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::{Date, Money, Percent, Period};
    use rust_decimal::Decimal;

    use crate::domain::car;

    use super::{Amount, CreationDateTime, Id, Kind, Name, Rule, Window};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn period(start: &str, end: &str) -> Period {
        Period::new(date(start), date(end)).unwrap()
    }

    fn rule(kind: Kind, amount: Amount) -> Rule {
        Rule {
            id: Id::new(),
            name: Name::new("Summer special").unwrap(),
            kind,
            amount,
            scope: super::Scope::Global,
            min_days: 1,
            window: Window::default(),
            is_active: true,
            created_at: CreationDateTime::now(),
        }
    }

    #[test]
    fn window_rejects_reversed_bounds() {
        assert!(
            Window::new(Some(date("2026-02-01")), Some(date("2026-01-01")))
                .is_none()
        );
    }

    #[test]
    fn window_contains_whole_period_only() {
        let window =
            Window::new(Some(date("2026-01-10")), Some(date("2026-01-20")))
                .unwrap();
        assert!(window.contains(&period("2026-01-10", "2026-01-20")));
        assert!(window.contains(&period("2026-01-12", "2026-01-15")));
        assert!(!window.contains(&period("2026-01-09", "2026-01-15")));
        assert!(!window.contains(&period("2026-01-15", "2026-01-21")));
    }

    #[test]
    fn unbounded_window_contains_any_period() {
        assert!(Window::default().contains(&period("1996-01-01", "2100-12-31")));
    }

    #[test]
    fn discount_delta_is_negative() {
        let base = "150NZD".parse::<Money>().unwrap();
        let rule = rule(
            Kind::Discount,
            Amount::Percent(Percent::new(Decimal::TEN).unwrap()),
        );
        assert_eq!(rule.delta(base).amount, "-15".parse::<Decimal>().unwrap());
    }

    #[test]
    fn surcharge_delta_is_positive() {
        let base = "150NZD".parse::<Money>().unwrap();
        let rule = rule(
            Kind::Surcharge,
            Amount::Fixed("-20".parse::<Decimal>().unwrap()),
        );
        // Sign of the stored amount is ignored.
        assert_eq!(rule.delta(base).amount, "20".parse::<Decimal>().unwrap());
    }

    #[test]
    fn min_days_gates_applicability() {
        let mut r = rule(
            Kind::Discount,
            Amount::Fixed("5".parse::<Decimal>().unwrap()),
        );
        r.min_days = 4;
        let car_id = car::Id::new();
        assert!(!r.applies(car_id, &period("2026-01-01", "2026-01-03")));
        assert!(r.applies(car_id, &period("2026-01-01", "2026-01-04")));
    }

    #[test]
    fn inactive_rule_never_applies() {
        let mut r = rule(
            Kind::Discount,
            Amount::Fixed("5".parse::<Decimal>().unwrap()),
        );
        r.is_active = false;
        assert!(!r.applies(car::Id::new(), &period("2026-01-01", "2026-01-05")));
    }
}
