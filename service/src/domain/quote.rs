//! [`Quote`] resolution.

use common::{Money, Period};
use rust_decimal::Decimal;

use crate::domain::{booking, car, rule, Car, Rule};

/// Priced rent of a [`Car`] over a [`Period`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Quote {
    /// Number of billable days.
    pub days: car::Days,

    /// Daily rate of the [`Car`].
    pub daily_rate: Money,

    /// Base cost before any [`Rule`] adjustment.
    pub base: Money,

    /// Signed adjustment applied by the winning [`Rule`], zero when none
    /// applied.
    pub adjustment: Money,

    /// ID of the winning [`Rule`], if any applied.
    pub rule_id: Option<rule::Id>,

    /// Total to be charged to the renter.
    pub total: Money,
}

impl Quote {
    /// Resolves a [`Quote`] for renting the given [`Car`] over the given
    /// [`Period`] against the given candidate [`Rule`]s.
    ///
    /// At most one [`Rule`] wins: the strongest applicable discount, or the
    /// strongest applicable surcharge when no discount applies. Ties are
    /// broken towards the lowest [`rule::Id`].
    #[must_use]
    pub fn resolve<'r>(
        car: &Car,
        period: Period,
        rules: impl IntoIterator<Item = &'r Rule>,
    ) -> Self {
        let days = period.days();
        let currency = car.daily_rate.currency;
        let base = Money {
            amount: car.daily_rate.amount * Decimal::from(days),
            currency,
        };

        let mut discount: Option<(&Rule, Money)> = None;
        let mut surcharge: Option<(&Rule, Money)> = None;
        for rule in rules {
            if !rule.applies(car.id, &period) {
                continue;
            }
            let delta = rule.delta(base);
            let slot = match rule.kind {
                rule::Kind::Discount => &mut discount,
                rule::Kind::Surcharge => &mut surcharge,
            };
            let stronger = slot.as_ref().map_or(true, |(best, strongest)| {
                // `Discount` deltas are negative, so the strongest one of
                // either `Kind` is the furthest from zero.
                let abs = delta.amount.abs();
                let strongest = strongest.amount.abs();
                abs > strongest || (abs == strongest && rule.id < best.id)
            });
            if stronger {
                *slot = Some((rule, delta));
            }
        }

        let winner = discount.or(surcharge);
        let adjustment = winner.map_or(
            Money {
                amount: Decimal::ZERO,
                currency,
            },
            |(_, delta)| delta,
        );

        Self {
            days,
            daily_rate: car.daily_rate,
            base,
            adjustment,
            rule_id: winner.map(|(rule, _)| rule.id),
            total: Money {
                amount: base.amount + adjustment.amount,
                currency,
            },
        }
    }
}

impl From<Quote> for booking::Cost {
    fn from(quote: Quote) -> Self {
        let Quote {
            days,
            daily_rate,
            base,
            adjustment,
            rule_id,
            total,
        } = quote;
        Self {
            days,
            daily_rate,
            base,
            adjustment,
            rule_id,
            total,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{Date, Money, Percent, Period};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::domain::{car, rule, Car, Rule};

    use super::Quote;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn period(start: &str, end: &str) -> Period {
        Period::new(date(start), date(end)).unwrap()
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn car() -> Car {
        Car {
            id: car::Id::new(),
            make: car::Make::new("Mazda").unwrap(),
            model: car::Model::new("3").unwrap(),
            year: 2022,
            kilometre: 31_000,
            daily_rate: money("50NZD"),
            min_days: 1,
            max_days: 30,
            status: car::Status::Available,
            created_at: car::CreationDateTime::now(),
        }
    }

    fn rule(kind: rule::Kind, amount: rule::Amount) -> Rule {
        Rule {
            id: rule::Id::new(),
            name: rule::Name::new("Promo").unwrap(),
            kind,
            amount,
            scope: rule::Scope::Global,
            min_days: 1,
            window: rule::Window::default(),
            is_active: true,
            created_at: rule::CreationDateTime::now(),
        }
    }

    fn fixed(s: &str) -> rule::Amount {
        rule::Amount::Fixed(s.parse().unwrap())
    }

    #[test]
    fn base_is_daily_rate_times_inclusive_days() {
        // 3 billable days: 1st, 2nd and 3rd.
        let quote =
            Quote::resolve(&car(), period("2026-01-01", "2026-01-03"), []);
        assert_eq!(quote.days, 3);
        assert_eq!(quote.base, money("150NZD"));
        assert_eq!(quote.total, money("150NZD"));
        assert_eq!(quote.adjustment.amount, Decimal::ZERO);
        assert_eq!(quote.rule_id, None);
    }

    #[test]
    fn discount_beats_surcharge() {
        let discount = rule(
            rule::Kind::Discount,
            rule::Amount::Percent(Percent::new(Decimal::TEN).unwrap()),
        );
        let surcharge = rule(rule::Kind::Surcharge, fixed("40"));

        let quote = Quote::resolve(
            &car(),
            period("2026-01-01", "2026-01-03"),
            [&surcharge, &discount],
        );
        assert_eq!(quote.rule_id, Some(discount.id));
        assert_eq!(quote.adjustment, money("-15NZD"));
        assert_eq!(quote.total, money("135NZD"));
    }

    #[test]
    fn strongest_discount_wins() {
        let weak = rule(rule::Kind::Discount, fixed("5"));
        let strong = rule(rule::Kind::Discount, fixed("25"));

        let quote = Quote::resolve(
            &car(),
            period("2026-01-01", "2026-01-03"),
            [&weak, &strong],
        );
        assert_eq!(quote.rule_id, Some(strong.id));
        assert_eq!(quote.total, money("125NZD"));
    }

    #[test]
    fn surcharge_applies_when_no_discount_does() {
        let surcharge = rule(rule::Kind::Surcharge, fixed("30"));
        let mut gated = rule(rule::Kind::Discount, fixed("100"));
        gated.min_days = 10;

        let quote = Quote::resolve(
            &car(),
            period("2026-01-01", "2026-01-03"),
            [&gated, &surcharge],
        );
        assert_eq!(quote.rule_id, Some(surcharge.id));
        assert_eq!(quote.total, money("180NZD"));
    }

    #[test]
    fn ties_break_towards_lowest_id() {
        let mut a = rule(rule::Kind::Discount, fixed("10"));
        let mut b = rule(rule::Kind::Discount, fixed("10"));
        a.id = rule::Id::from(Uuid::from_u128(1));
        b.id = rule::Id::from(Uuid::from_u128(2));

        // Resolution order must not matter.
        for rules in [[&a, &b], [&b, &a]] {
            let quote = Quote::resolve(
                &car(),
                period("2026-01-01", "2026-01-03"),
                rules,
            );
            assert_eq!(quote.rule_id, Some(a.id));
        }
    }

    #[test]
    fn car_scoped_rule_skips_other_cars() {
        let car = car();
        let mut foreign = rule(rule::Kind::Discount, fixed("10"));
        foreign.scope = rule::Scope::Car(car::Id::new());

        let quote = Quote::resolve(
            &car,
            period("2026-01-01", "2026-01-03"),
            [&foreign],
        );
        assert_eq!(quote.rule_id, None);
        assert_eq!(quote.total, money("150NZD"));
    }
}
