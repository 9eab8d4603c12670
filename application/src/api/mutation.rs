//! GraphQL [`Mutation`]s definitions.

use common::{Date, Percent};
use juniper::graphql_object;
use rust_decimal::Decimal;
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Places a new order: prices the rent, charges the payment and books the
    /// `Car` for the specified period of dates.
    ///
    /// The created `Booking` awaits an operator review in the `PENDING`
    /// status.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CAR_NOT_EXISTS` - the `Car` with the specified ID does not exist;
    /// - `DAYS_OUT_OF_RANGE` - the rent duration falls outside the `Car`s
    ///                         rentable range;
    /// - `INVALID_PAYMENT_METHOD` - the provided payment method details do
    ///                              not match its kind;
    /// - `INVALID_PERIOD` - the `end` date is earlier than the `start` date;
    /// - `PAYMENT_DECLINED` - the payment provider refused the charge;
    /// - `PROFILE_REQUIRED` - the renter has no `RenterProfile` yet;
    /// - `SLOT_TAKEN` - the `Car` is already booked over an overlapping
    ///                  period.
    #[tracing::instrument(
        skip_all,
        fields(
            car_id = %car_id,
            end = %end,
            gql.name = "placeOrder",
            method = ?method.kind,
            otel.name = Self::SPAN_NAME,
            renter_id = %renter_id,
            start = %start,
        ),
    )]
    pub async fn place_order(
        car_id: api::car::Id,
        renter_id: api::profile::Id,
        start: Date,
        end: Date,
        method: api::payment::MethodInput,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let method = method.into_domain().map_err(ctx.error())?;

        ctx.service()
            .execute(command::PlaceOrder {
                car_id: car_id.into(),
                renter_id: renter_id.into(),
                start,
                end,
                method,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Approves the `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist;
    /// - `BOOKING_NOT_PENDING` - the `Booking` is not awaiting review.
    #[tracing::instrument(
        skip_all,
        fields(
            actor_id = %actor_id,
            gql.name = "approveBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn approve_booking(
        id: api::booking::Id,
        actor_id: api::profile::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::ApproveBooking {
                actor_id: actor_id.into(),
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Rejects the `Booking` with the specified ID, freeing its `Car` for
    /// other orders.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist;
    /// - `BOOKING_NOT_PENDING` - the `Booking` is not awaiting review.
    #[tracing::instrument(
        skip_all,
        fields(
            actor_id = %actor_id,
            gql.name = "rejectBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reject_booking(
        id: api::booking::Id,
        actor_id: api::profile::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::RejectBooking {
                actor_id: actor_id.into(),
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the confirmed `Booking` with the specified ID, freeing its
    /// `Car` for other orders.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_CONFIRMED` - the `Booking` is not confirmed;
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            actor_id = %actor_id,
            gql.name = "cancelBooking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_booking(
        id: api::booking::Id,
        actor_id: api::profile::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CancelBooking {
                actor_id: actor_id.into(),
                booking_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new active `PricingRule` with the provided details.
    ///
    /// Exactly one of `percent` or `fixed` must be provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_RULE_AMOUNT` - none or both of `percent` and `fixed` are
    ///                             provided;
    /// - `CAR_NOT_EXISTS` - the `Car` the rule is scoped to does not exist;
    /// - `INVALID_RULE_AMOUNT` - the provided `fixed` amount is not
    ///                           representable;
    /// - `INVALID_RULE_WINDOW` - the `to` date is earlier than the `from`
    ///                           date.
    #[tracing::instrument(
        skip_all,
        fields(
            actor_id = %actor_id,
            car_id = ?car_id.as_ref().map(ToString::to_string),
            fixed = ?fixed,
            from = ?from.as_ref().map(ToString::to_string),
            gql.name = "createPricingRule",
            kind = ?kind,
            min_days = ?min_days,
            name = %name,
            otel.name = Self::SPAN_NAME,
            percent = ?percent.as_ref().map(ToString::to_string),
            to = ?to.as_ref().map(ToString::to_string),
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_pricing_rule(
        actor_id: api::profile::Id,
        name: api::rule::Name,
        kind: api::rule::Kind,
        percent: Option<Percent>,
        fixed: Option<f64>,
        car_id: Option<api::car::Id>,
        min_days: Option<i32>,
        from: Option<Date>,
        to: Option<Date>,
        ctx: &Context,
    ) -> Result<api::Rule, Error> {
        let amount = match (percent, fixed) {
            (Some(p), None) => domain::rule::Amount::Percent(p),
            (None, Some(v)) => domain::rule::Amount::Fixed(
                Decimal::try_from(v)
                    .map_err(|_| AmountError::Invalid.into())
                    .map_err(ctx.error())?,
            ),
            (None, None) | (Some(_), Some(_)) => {
                return Err(AmountError::Ambiguous.into())
                    .map_err(ctx.error());
            }
        };
        let min_days = min_days
            .unwrap_or(1)
            .try_into()
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let window = domain::rule::Window::new(from, to)
            .ok_or_else(|| WindowError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreatePricingRule {
                actor_id: actor_id.into(),
                name: name.into(),
                kind: kind.into(),
                amount,
                scope: car_id
                    .map_or(domain::rule::Scope::Global, |id| {
                        domain::rule::Scope::Car(id.into())
                    }),
                min_days,
                window,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Activates or deactivates the `PricingRule` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RULE_NOT_EXISTS` - the `PricingRule` with the specified ID does not
    ///                       exist.
    #[tracing::instrument(
        skip_all,
        fields(
            actor_id = %actor_id,
            gql.name = "setPricingRuleActive",
            id = %id,
            is_active = %is_active,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn set_pricing_rule_active(
        id: api::rule::Id,
        is_active: bool,
        actor_id: api::profile::Id,
        ctx: &Context,
    ) -> Result<api::Rule, Error> {
        ctx.service()
            .execute(command::SetPricingRuleActive {
                actor_id: actor_id.into(),
                rule_id: id.into(),
                is_active,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates or updates the `RenterProfile` of the specified renter.
    #[tracing::instrument(
        skip_all,
        fields(
            first_name = %first_name,
            gql.name = "saveRenterProfile",
            id_document = %id_document,
            last_name = %last_name,
            otel.name = Self::SPAN_NAME,
            phone = %phone,
            renter_id = %renter_id,
        ),
    )]
    pub async fn save_renter_profile(
        renter_id: api::profile::Id,
        first_name: api::profile::Name,
        last_name: api::profile::Name,
        phone: api::profile::Phone,
        id_document: api::profile::IdDocument,
        ctx: &Context,
    ) -> Result<api::Profile, Error> {
        ctx.service()
            .execute(command::SaveRenterProfile {
                renter_id: renter_id.into(),
                first_name: first_name.into(),
                last_name: last_name.into(),
                phone: phone.into(),
                id_document: id_document.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum AmountError {
        #[code = "AMBIGUOUS_RULE_AMOUNT"]
        #[status = BAD_REQUEST]
        #[message = "Exactly one of `percent` or `fixed` must be provided"]
        Ambiguous,

        #[code = "INVALID_RULE_AMOUNT"]
        #[status = BAD_REQUEST]
        #[message = "Provided `fixed` amount is not representable"]
        Invalid,
    }
}

define_error! {
    enum WindowError {
        #[code = "INVALID_RULE_WINDOW"]
        #[status = BAD_REQUEST]
        #[message = "`to` date cannot be earlier than the `from` date"]
        Invalid,
    }
}

impl AsError for command::place_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the specified ID does not exist"]
                CarNotExists,

                #[code = "DAYS_OUT_OF_RANGE"]
                #[status = BAD_REQUEST]
                #[message = "Rent duration falls outside the `Car`s rentable \
                             range"]
                DaysOutOfRange,

                #[code = "INVALID_PERIOD"]
                #[status = BAD_REQUEST]
                #[message = "End date cannot be earlier than the start date"]
                InvalidPeriod,

                #[code = "PAYMENT_DECLINED"]
                #[status = PAYMENT_REQUIRED]
                #[message = "Payment provider refused the charge"]
                PaymentDeclined,

                #[code = "PROFILE_REQUIRED"]
                #[status = BAD_REQUEST]
                #[message = "`RenterProfile` must be saved before placing an \
                             order"]
                ProfileRequired,

                #[code = "SLOT_TAKEN"]
                #[status = CONFLICT]
                #[message = "`Car` is already booked over an overlapping \
                             period"]
                SlotTaken,
            }
        }

        Some(match self {
            Self::CarNotExists(_) => Error::CarNotExists.into(),
            Self::DaysOutOfRange { .. } => Error::DaysOutOfRange.into(),
            Self::Db(e) => return e.try_as_error(),
            Self::Gateway(_) => return None,
            Self::InvalidPeriod => Error::InvalidPeriod.into(),
            Self::PaymentDeclined { .. } => Error::PaymentDeclined.into(),
            Self::ProfileRequired(_) => Error::ProfileRequired.into(),
            Self::SlotTaken(_) => Error::SlotTaken.into(),
        })
    }
}

impl AsError for command::approve_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Booking` with the specified ID does not exist"]
                BookingNotExists,

                #[code = "BOOKING_NOT_PENDING"]
                #[status = CONFLICT]
                #[message = "`Booking` is not awaiting review"]
                NotPending,
            }
        }

        Some(match self {
            Self::BookingNotExists(_) => Error::BookingNotExists.into(),
            Self::CarNotExists(_) => return None,
            Self::Db(e) => return e.try_as_error(),
            Self::NotPending(_) => Error::NotPending.into(),
        })
    }
}

impl AsError for command::reject_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Booking` with the specified ID does not exist"]
                BookingNotExists,

                #[code = "BOOKING_NOT_PENDING"]
                #[status = CONFLICT]
                #[message = "`Booking` is not awaiting review"]
                NotPending,
            }
        }

        Some(match self {
            Self::BookingNotExists(_) => Error::BookingNotExists.into(),
            Self::CarNotExists(_) => return None,
            Self::Db(e) => return e.try_as_error(),
            Self::NotPending(_) => Error::NotPending.into(),
        })
    }
}

impl AsError for command::cancel_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_NOT_CONFIRMED"]
                #[status = CONFLICT]
                #[message = "`Booking` is not confirmed"]
                NotConfirmed,

                #[code = "BOOKING_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Booking` with the specified ID does not exist"]
                BookingNotExists,
            }
        }

        Some(match self {
            Self::BookingNotExists(_) => Error::BookingNotExists.into(),
            Self::CarNotExists(_) => return None,
            Self::Db(e) => return e.try_as_error(),
            Self::NotConfirmed(_) => Error::NotConfirmed.into(),
        })
    }
}

impl AsError for command::create_pricing_rule::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the specified ID does not exist"]
                CarNotExists,
            }
        }

        Some(match self {
            Self::CarNotExists(_) => Error::CarNotExists.into(),
            Self::Db(e) => return e.try_as_error(),
        })
    }
}

impl AsError for command::set_pricing_rule_active::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "RULE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`PricingRule` with the specified ID does not \
                             exist"]
                RuleNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RuleNotExists(_) => Error::RuleNotExists.into(),
        })
    }
}
