//! [`Booking`]-related definitions.

use std::future;

use common::{Date, DateTime, Handler as _, Money};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A booking of a `Car` over a period of dates.
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    id: Id,

    /// Underlying [`domain::Booking`].
    booking: OnceCell<domain::Booking>,
}

impl From<domain::Booking> for Booking {
    fn from(booking: domain::Booking) -> Self {
        Self {
            id: booking.id.into(),
            booking: OnceCell::new_with(Some(booking)),
        }
    }
}

impl Booking {
    /// Creates a new [`Booking`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Booking`] with the provided ID exists,
    /// otherwise accessing this [`Booking`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            booking: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Booking`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Booking`] doesn't exist.
    async fn booking(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Booking, Error> {
        let id = self.id.into();
        self.booking
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::booking::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(b.ok_or_else(|| {
                            api::query::BookingError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A booking of a `Car` over a period of dates.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// `Car` this `Booking` is placed for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.car",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn car(&self, ctx: &Context) -> Result<api::Car, Error> {
        let car_id = self.booking(ctx).await?.car_id;
        #[expect(
            unsafe_code,
            reason = "loaded `Booking` guarantees `Car` existence"
        )]
        Ok(unsafe { api::Car::new_unchecked(car_id) })
    }

    /// ID of the renter this `Booking` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.renterId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn renter_id(
        &self,
        ctx: &Context,
    ) -> Result<api::profile::Id, Error> {
        Ok(self.booking(ctx).await?.renter_id.into())
    }

    /// First billable `Date` of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.start",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn start(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.booking(ctx).await?.period.start())
    }

    /// Last billable `Date` of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.end",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn end(&self, ctx: &Context) -> Result<Date, Error> {
        Ok(self.booking(ctx).await?.period.end())
    }

    /// Status of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.booking(ctx).await?.status.into())
    }

    /// Cost breakdown this `Booking` was charged with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.cost",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn cost(&self, ctx: &Context) -> Result<Cost, Error> {
        Ok(self.booking(ctx).await?.cost.clone().into())
    }

    /// Snapshot of the renter's profile taken when this `Booking` was placed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.renter",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn renter(&self, ctx: &Context) -> Result<Snapshot, Error> {
        Ok(self.booking(ctx).await?.renter.clone().into())
    }

    /// `Payment` attempts made for this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.payments",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payments(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Payment>, Error> {
        ctx.service()
            .execute(query::payments::OfBooking::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|payments| payments.into_iter().map(Into::into).collect())
    }

    /// `DateTime` when this `Booking` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.booking(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Booking`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// The `Booking` is placed and awaits an operator review.
    Pending,

    /// The `Booking` is approved by an operator.
    Confirmed,

    /// The `Booking` is cancelled.
    Cancelled,

    /// The `Booking` period has fully elapsed.
    Completed,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Cancelled => Self::Cancelled,
            S::Completed => Self::Completed,
        }
    }
}

/// Cost breakdown of a `Booking`.
#[derive(Clone, Debug, From)]
pub struct Cost(domain::booking::Cost);

/// Cost breakdown of a `Booking`.
#[graphql_object(name = "BookingCost", context = Context)]
impl Cost {
    /// Number of billable days.
    pub fn days(&self) -> Result<i32, Error> {
        self.0.days.try_into().map_err(AsError::into_error)
    }

    /// Daily rate the `Car` was priced at.
    pub fn daily_rate(&self) -> Money {
        self.0.daily_rate
    }

    /// Base cost before any pricing adjustment.
    pub fn base(&self) -> Money {
        self.0.base
    }

    /// Adjustment applied by the winning pricing rule.
    pub fn adjustment(&self) -> Money {
        self.0.adjustment
    }

    /// ID of the winning pricing rule, if any applied.
    pub fn rule_id(&self) -> Option<api::rule::Id> {
        self.0.rule_id.map(Into::into)
    }

    /// Total charged amount.
    pub fn total(&self) -> Money {
        self.0.total
    }
}

/// Snapshot of a renter's profile embedded into a `Booking`.
#[derive(Clone, Debug, From)]
pub struct Snapshot(domain::booking::Snapshot);

/// Snapshot of a renter's profile embedded into a `Booking`.
#[graphql_object(name = "BookingRenterSnapshot", context = Context)]
impl Snapshot {
    /// First name of the renter.
    pub fn first_name(&self) -> api::profile::Name {
        self.0.first_name.clone().into()
    }

    /// Last name of the renter.
    pub fn last_name(&self) -> api::profile::Name {
        self.0.last_name.clone().into()
    }

    /// Contact phone number of the renter.
    pub fn phone(&self) -> api::profile::Phone {
        self.0.phone.clone().into()
    }

    /// Identity document number of the renter.
    pub fn id_document(&self) -> api::profile::IdDocument {
        self.0.id_document.clone().into()
    }
}
