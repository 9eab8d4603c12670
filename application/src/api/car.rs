//! [`Car`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A car of the fleet.
#[derive(Clone, Debug)]
pub struct Car {
    /// ID of this [`Car`].
    id: Id,

    /// Underlying [`domain::Car`].
    car: OnceCell<domain::Car>,
}

impl From<domain::Car> for Car {
    fn from(car: domain::Car) -> Self {
        Self {
            id: car.id.into(),
            car: OnceCell::new_with(Some(car)),
        }
    }
}

impl Car {
    /// Creates a new [`Car`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Car`] with the provided ID exists, otherwise
    /// accessing this [`Car`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            car: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Car`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Car`] doesn't exist.
    async fn car(&self, ctx: &Context) -> Result<&domain::Car, Error> {
        let id = self.id.into();
        self.car
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::car::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::CarError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A car of the fleet.
#[graphql_object(context = Context)]
impl Car {
    /// Unique identifier of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Make of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.make",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn make(&self, ctx: &Context) -> Result<Make, Error> {
        Ok(self.car(ctx).await?.make.clone().into())
    }

    /// Model of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.model",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn model(&self, ctx: &Context) -> Result<Model, Error> {
        Ok(self.car(ctx).await?.model.clone().into())
    }

    /// Production year of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.year",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn year(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.car(ctx).await?.year.into())
    }

    /// Mileage of this `Car`, in kilometres.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.kilometre",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn kilometre(&self, ctx: &Context) -> Result<i32, Error> {
        self.car(ctx)
            .await?
            .kilometre
            .try_into()
            .map_err(AsError::into_error)
    }

    /// Rental price of this `Car` per day.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.dailyRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn daily_rate(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.car(ctx).await?.daily_rate)
    }

    /// Minimum number of days this `Car` can be rented for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.minDays",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn min_days(&self, ctx: &Context) -> Result<i32, Error> {
        self.car(ctx)
            .await?
            .min_days
            .try_into()
            .map_err(AsError::into_error)
    }

    /// Maximum number of days this `Car` can be rented for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.maxDays",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn max_days(&self, ctx: &Context) -> Result<i32, Error> {
        self.car(ctx)
            .await?
            .max_days
            .try_into()
            .map_err(AsError::into_error)
    }

    /// Status of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.car(ctx).await?.status.into())
    }

    /// `DateTime` when this `Car` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.car(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Car`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::car::Id)]
#[into(domain::car::Id)]
#[graphql(name = "CarId", transparent)]
pub struct Id(Uuid);

/// Make of a `Car`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CarMake",
    with = scalar::Via::<domain::car::Make>,
)]
pub struct Make(domain::car::Make);

/// Model of a `Car`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CarModel",
    with = scalar::Via::<domain::car::Model>,
)]
pub struct Model(domain::car::Model);

/// Status of a `Car`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "CarStatus")]
pub enum Status {
    /// The `Car` can be booked.
    Available,

    /// The `Car` has an active `Booking`.
    Reserved,

    /// The `Car` is withdrawn from the fleet by an operator.
    Unavailable,

    /// The `Car` is under maintenance.
    Maintenance,
}

impl From<domain::car::Status> for Status {
    fn from(status: domain::car::Status) -> Self {
        use domain::car::Status as S;
        match status {
            S::Available => Self::Available,
            S::Reserved => Self::Reserved,
            S::Unavailable => Self::Unavailable,
            S::Maintenance => Self::Maintenance,
        }
    }
}
