//! Pricing [`Rule`]-related definitions.

use common::{Date, DateTime, Percent};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use rust_decimal::prelude::ToPrimitive as _;
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A pricing rule adjusting the base cost of an order.
#[derive(Clone, Debug, From)]
pub struct Rule(domain::Rule);

/// A pricing rule adjusting the base cost of an order.
#[graphql_object(name = "PricingRule", context = Context)]
impl Rule {
    /// Unique identifier of this `PricingRule`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `PricingRule`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Kind of this `PricingRule`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Percentage of the base cost this `PricingRule` adjusts by, if
    /// percentage-based.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.percent",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn percent(&self) -> Option<Percent> {
        match self.0.amount {
            domain::rule::Amount::Percent(p) => Some(p),
            domain::rule::Amount::Fixed(_) => None,
        }
    }

    /// Fixed amount this `PricingRule` adjusts by, if flat.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.fixed",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn fixed(&self) -> Option<f64> {
        match self.0.amount {
            domain::rule::Amount::Percent(_) => None,
            domain::rule::Amount::Fixed(v) => v.to_f64(),
        }
    }

    /// ID of the `Car` this `PricingRule` is scoped to, if not global.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.carId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn car_id(&self) -> Option<api::car::Id> {
        match self.0.scope {
            domain::rule::Scope::Global => None,
            domain::rule::Scope::Car(id) => Some(id.into()),
        }
    }

    /// Minimum number of rental days this `PricingRule` requires.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.minDays",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn min_days(&self) -> Result<i32, Error> {
        self.0.min_days.try_into().map_err(AsError::into_error)
    }

    /// First `Date` this `PricingRule` is effective from, if bounded.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.windowFrom",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn window_from(&self) -> Option<Date> {
        self.0.window.from()
    }

    /// Last `Date` this `PricingRule` is effective to, if bounded.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.windowTo",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn window_to(&self) -> Option<Date> {
        self.0.window.to()
    }

    /// Indicator whether this `PricingRule` is applied to new orders.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.isActive",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn is_active(&self) -> bool {
        self.0.is_active
    }

    /// `DateTime` when this `PricingRule` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "PricingRule.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `PricingRule`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::rule::Id)]
#[into(domain::rule::Id)]
#[graphql(name = "PricingRuleId", transparent)]
pub struct Id(Uuid);

/// Name of a `PricingRule`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PricingRuleName",
    with = scalar::Via::<domain::rule::Name>,
)]
pub struct Name(domain::rule::Name);

/// Kind of a `PricingRule`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "PricingRuleKind")]
pub enum Kind {
    /// The `PricingRule` lowers the base cost.
    Discount,

    /// The `PricingRule` raises the base cost.
    Surcharge,
}

impl From<domain::rule::Kind> for Kind {
    fn from(kind: domain::rule::Kind) -> Self {
        use domain::rule::Kind as K;
        match kind {
            K::Discount => Self::Discount,
            K::Surcharge => Self::Surcharge,
        }
    }
}

impl From<Kind> for domain::rule::Kind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Discount => Self::Discount,
            Kind::Surcharge => Self::Surcharge,
        }
    }
}
