//! [`Quote`]-related definitions.

use common::Money;
use derive_more::From;
use juniper::graphql_object;
use service::domain;

use crate::{api, AsError, Context, Error};

/// Priced rental quote for a `Car` over a period of dates.
#[derive(Clone, Debug, From)]
pub struct Quote(domain::Quote);

/// Priced rental quote for a `Car` over a period of dates.
#[graphql_object(context = Context)]
impl Quote {
    /// Number of billable days.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.days",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn days(&self) -> Result<i32, Error> {
        self.0.days.try_into().map_err(AsError::into_error)
    }

    /// Daily rate the `Car` is priced at.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.dailyRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn daily_rate(&self) -> Money {
        self.0.daily_rate
    }

    /// Base cost before any pricing adjustment.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.base",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn base(&self) -> Money {
        self.0.base
    }

    /// Adjustment applied by the winning pricing rule.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.adjustment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn adjustment(&self) -> Money {
        self.0.adjustment
    }

    /// ID of the winning pricing rule, if any applies.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.ruleId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn rule_id(&self) -> Option<api::rule::Id> {
        self.0.rule_id.map(Into::into)
    }

    /// Total amount the order would be charged with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.total",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total(&self) -> Money {
        self.0.total
    }
}
