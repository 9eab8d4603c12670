//! Calendar date utilities.
//!
//! Rentals are scheduled with day granularity, so a dedicated [`Date`] type
//! (and an inclusive [`Period`] of them) is used instead of [`DateTime`].
//!
//! [`DateTime`]: crate::DateTime

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use time::format_description::well_known::Iso8601;

/// Calendar date (no time component, no offset).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Date(time::Date);

impl Date {
    /// Returns today's [`Date`] in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Number of whole days from `other` to this [`Date`].
    ///
    /// Negative if this [`Date`] is earlier than `other`.
    #[must_use]
    pub fn days_since(self, other: Self) -> i64 {
        i64::from(self.0.to_julian_day() - other.0.to_julian_day())
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.0.to_calendar_date();
        write!(f, "{year:04}-{:02}-{day:02}", u8::from(month))
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, &Iso8601::DATE)
            .map(Self)
            .map_err(ParseError)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `Date`: {_0}")]
pub struct ParseError(time::error::Parse);

/// Inclusive interval of [`Date`]s.
///
/// Both bounds are part of the interval: a [`Period`] of one day has
/// `start() == end()` and lasts 1 day.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Period {
    /// First [`Date`] of this [`Period`].
    start: Date,

    /// Last [`Date`] of this [`Period`].
    end: Date,
}

impl Period {
    /// Creates a new [`Period`] if `start ≤ end`.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Returns the first [`Date`] of this [`Period`].
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the last [`Date`] of this [`Period`].
    #[must_use]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Returns the number of days in this [`Period`], both bounds included.
    #[expect(
        clippy::missing_panics_doc,
        reason = "`start ≤ end` is guaranteed on construction"
    )]
    #[must_use]
    pub fn days(&self) -> u32 {
        u32::try_from(self.end.days_since(self.start) + 1)
            .expect("`start ≤ end` is guaranteed on construction")
    }

    /// Indicates whether this [`Period`] shares at least one day with the
    /// `other` one.
    ///
    /// `[s1, e1]` and `[s2, e2]` overlap iff `s1 ≤ e2` and `e1 ≥ s2`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in `YYYY-MM-DD` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = super::Date;

    impl Date {
        fn to_output<S: ScalarValue>(d: &Date) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::{Date, Period};

    fn date(s: &str) -> Date {
        Date::from_str(s).unwrap()
    }

    fn period(start: &str, end: &str) -> Period {
        Period::new(date(start), date(end)).unwrap()
    }

    #[test]
    fn parses_and_displays() {
        assert_eq!(date("2025-03-07").to_string(), "2025-03-07");
        assert!(Date::from_str("07-03-2025").is_err());
        assert!(Date::from_str("not a date").is_err());
    }

    #[test]
    fn rejects_reversed_bounds() {
        assert!(Period::new(date("2025-03-08"), date("2025-03-07")).is_none());
    }

    #[test]
    fn counts_days_inclusively() {
        assert_eq!(period("2025-03-07", "2025-03-07").days(), 1);
        assert_eq!(period("2025-03-07", "2025-03-09").days(), 3);
        assert_eq!(period("2025-12-30", "2026-01-02").days(), 4);
    }

    #[test]
    fn overlap_is_inclusive() {
        let base = period("2025-03-10", "2025-03-15");

        // Sharing a single boundary day is an overlap.
        assert!(base.overlaps(&period("2025-03-15", "2025-03-20")));
        assert!(base.overlaps(&period("2025-03-01", "2025-03-10")));

        // Containment in both directions.
        assert!(base.overlaps(&period("2025-03-11", "2025-03-12")));
        assert!(base.overlaps(&period("2025-03-01", "2025-03-31")));

        // Adjacent but disjoint.
        assert!(!base.overlaps(&period("2025-03-16", "2025-03-20")));
        assert!(!base.overlaps(&period("2025-03-01", "2025-03-09")));
    }
}
