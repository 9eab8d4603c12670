//! GraphQL [`Query`]s definitions.

use common::{Date, Period};
use juniper::graphql_object;
use service::{domain, query, read, Query as _};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Car` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CAR_NOT_EXISTS` - the `Car` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "car",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn car(
        id: api::car::Id,
        ctx: &Context,
    ) -> Result<api::Car, Error> {
        ctx.service()
            .execute(query::car::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CarError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the `Car`s bookable over the specified period of dates.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PERIOD` - the `end` date is earlier than the `start` date.
    #[tracing::instrument(
        skip_all,
        fields(
            end = %end,
            gql.name = "availableCars",
            otel.name = Self::SPAN_NAME,
            start = %start,
        ),
    )]
    pub async fn available_cars(
        start: Date,
        end: Date,
        ctx: &Context,
    ) -> Result<Vec<api::Car>, Error> {
        let period = Period::new(start, end)
            .ok_or_else(|| PeriodError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::cars::AvailableFor::by(read::car::AvailableFor(
                period,
            )))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cars| cars.into_iter().map(Into::into).collect())
    }

    /// Prices a prospective rent of the `Car` over the specified period of
    /// dates, without placing it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CAR_NOT_AVAILABLE` - the `Car` with the specified ID does not exist
    ///                         or is not available;
    /// - `INVALID_PERIOD` - the `end` date is earlier than the `start` date.
    #[tracing::instrument(
        skip_all,
        fields(
            car_id = %car_id,
            end = %end,
            gql.name = "quote",
            otel.name = Self::SPAN_NAME,
            start = %start,
        ),
    )]
    pub async fn quote(
        car_id: api::car::Id,
        start: Date,
        end: Date,
        ctx: &Context,
    ) -> Result<api::Quote, Error> {
        ctx.service()
            .execute(query::quote::Estimate {
                car_id: car_id.into(),
                start,
                end,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "booking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BookingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the active `Booking`s of the specified renter.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myBookings",
            otel.name = Self::SPAN_NAME,
            renter_id = %renter_id,
        ),
    )]
    pub async fn my_bookings(
        renter_id: api::profile::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        ctx.service()
            .execute(query::bookings::ActiveOf::by(renter_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|bookings| {
                bookings
                    .into_iter()
                    .map(|read::booking::Active(b)| b.into())
                    .collect()
            })
    }

    /// Fetches the `Booking`s awaiting an operator review.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "pendingBookings",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn pending_bookings(
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        ctx.service()
            .execute(query::bookings::Pending::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|bookings| {
                bookings
                    .into_iter()
                    .map(|read::booking::Pending(b)| b.into())
                    .collect()
            })
    }

    /// Fetches all the `PricingRule`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rules",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rules(ctx: &Context) -> Result<Vec<api::Rule>, Error> {
        ctx.service()
            .execute(query::rules::All::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rules| rules.into_iter().map(Into::into).collect())
    }

    /// Returns the `RenterProfile` of the specified renter.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROFILE_NOT_EXISTS` - the specified renter has no `RenterProfile`
    ///                          yet.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "profile",
            otel.name = Self::SPAN_NAME,
            renter_id = %renter_id,
        ),
    )]
    pub async fn profile(
        renter_id: api::profile::Id,
        ctx: &Context,
    ) -> Result<api::Profile, Error> {
        ctx.service()
            .execute(query::profile::ById::by(renter_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ProfileError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the `AuditEvent`s recorded for the specified entity.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "auditTrail",
            id = %id,
            kind = ?kind,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn audit_trail(
        kind: api::audit::TargetKind,
        id: Uuid,
        ctx: &Context,
    ) -> Result<Vec<api::audit::Event>, Error> {
        ctx.service()
            .execute(query::audit::OfTarget::by(domain::audit::Target {
                kind: kind.into(),
                id,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|events| events.into_iter().map(Into::into).collect())
    }
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum CarError {
        #[code = "CAR_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Car` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum PeriodError {
        #[code = "INVALID_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "End date cannot be earlier than the start date"]
        Invalid,
    }
}

define_error! {
    enum ProfileError {
        #[code = "PROFILE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Specified renter has no `RenterProfile` yet"]
        NotExists,
    }
}

impl AsError for query::quote::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_NOT_AVAILABLE"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the specified ID does not exist or \
                             is not available"]
                CarNotAvailable,
            }
        }

        Some(match self {
            Self::CarNotAvailable(_) => Error::CarNotAvailable.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidPeriod => PeriodError::Invalid.into(),
        })
    }
}
