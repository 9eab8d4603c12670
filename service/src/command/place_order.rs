//! [`Command`] for placing a [`Booking`] and charging it.

use common::{
    operations::{
        By, Commit, Insert, Lock, Perform, Select, Transact, Transacted,
        Update,
    },
    Date, DateTime, Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        audit, booking, car, payment, renter, Booking, Car, Payment, Quote,
        Rule,
    },
    infra::{database, gateway, Database, Gateway},
    read,
    Service,
};

use super::Command;

/// Name of the storage constraint rejecting overlapping [`Booking`]s.
///
/// Backstop for the in-transaction re-check: two transactions may both pass
/// the check before either commits, the constraint rejects the loser.
const NO_OVERLAP_CONSTRAINT: &str = "bookings_no_overlap";

/// [`Command`] for placing a new [`Booking`] and charging it in one go.
///
/// Nothing is persisted unless the charge succeeds, and the payment
/// [`Gateway`] is never called while holding a [`Lock`].
#[derive(Clone, Debug)]
pub struct PlaceOrder {
    /// ID of the [`Car`] to rent.
    pub car_id: car::Id,

    /// ID of the renter placing the order.
    pub renter_id: renter::Id,

    /// First billable [`Date`].
    pub start: Date,

    /// Last billable [`Date`].
    pub end: Date,

    /// [`payment::Method`] to charge with.
    pub method: payment::Method,
}

impl<Db, Gw> Command<PlaceOrder> for Service<Db, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<renter::Profile>, renter::Id>>,
            Ok = Option<renter::Profile>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Rule>, read::rule::Candidates>>,
            Ok = Vec<Rule>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::booking::Overlaps, read::booking::Overlapping>>,
            Ok = read::booking::Overlaps,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Car, car::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<read::booking::Overlaps, read::booking::Overlapping>>,
            Ok = read::booking::Overlaps,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Update<Car>, Err = Traced<database::Error>>
        + Database<Insert<audit::Event>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Gw: Gateway<
        Perform<gateway::Request>,
        Ok = gateway::Receipt,
        Err = Traced<gateway::Error>,
    >,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: PlaceOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PlaceOrder {
            car_id,
            renter_id,
            start,
            end,
            method,
        } = cmd;

        let period = Period::new(start, end)
            .ok_or(E::InvalidPeriod)
            .map_err(tracerr::wrap!())?;

        let car = self
            .database()
            .execute(Select(By::<Option<Car>, _>::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarNotExists(car_id))
            .map_err(tracerr::wrap!())?;

        if !car.admits_days(period.days()) {
            return Err(tracerr::new!(E::DaysOutOfRange {
                min: car.min_days,
                max: car.max_days,
            }));
        }

        let profile = self
            .database()
            .execute(Select(By::<Option<renter::Profile>, _>::new(renter_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProfileRequired(renter_id))
            .map_err(tracerr::wrap!())?;

        let overlapping = read::booking::Overlapping {
            car_id,
            period,
            blocking: read::booking::Blocking::Active,
        };
        if *self
            .database()
            .execute(Select(By::<read::booking::Overlaps, _>::new(overlapping)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::SlotTaken(car_id)));
        }

        let rules = self
            .database()
            .execute(Select(By::<Vec<Rule>, _>::new(
                read::rule::Candidates { car_id },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let quote = Quote::resolve(&car, period, &rules);

        // Charge before opening the transaction: the provider roundtrip must
        // not extend any lock, and nothing is persisted on a decline.
        let receipt = self
            .gateway()
            .execute(Perform(gateway::Request {
                amount: quote.total,
                payer_id: renter_id,
                method: method.clone(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent orders upon the same `Car`.
        tx.execute(Lock(By::new(car.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Re-check under the lock: another order may have been committed
        // between the first check and here.
        if *tx
            .execute(Select(By::<read::booking::Overlaps, _>::new(overlapping)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::SlotTaken(car_id)));
        }

        let booking = Booking {
            id: booking::Id::new(),
            car_id: car.id,
            renter_id,
            period,
            status: booking::Status::Pending,
            cost: quote.clone().into(),
            renter: profile.into(),
            created_at: DateTime::now().coerce(),
        };
        // The exclusion constraint is deferred, but is still checked here if
        // the schema runs without deferral.
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(|e| {
                if e.as_ref()
                    .is_exclusion_violation(Some(NO_OVERLAP_CONSTRAINT))
                {
                    tracerr::new!(E::SlotTaken(car_id))
                } else {
                    tracerr::map_from_and_wrap!(=> E)(e)
                }
            })
            .map(drop)?;

        let payment = Payment {
            id: payment::Id::new(),
            booking_id: booking.id,
            method: method.kind(),
            amount: quote.total,
            ok: true,
            message: Some(receipt.message),
            txn_id: Some(receipt.txn_id.clone()),
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // The just inserted `Booking` is active, so the `Car` is occupied.
        let mut car = car;
        car.status = car.recomputed_status(true);
        tx.execute(Update(car.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Insert(audit::Event::new(
            renter_id,
            audit::Action::CreatePayment,
            audit::Target {
                kind: audit::target::Kind::Payment,
                id: payment.id.into(),
            },
            format!(
                "booking#{} {} ok=true txn={}",
                booking.id,
                method.kind(),
                receipt.txn_id,
            ),
        )))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;
        tx.execute(Insert(audit::Event::new(
            renter_id,
            audit::Action::CreateBooking,
            audit::Target {
                kind: audit::target::Kind::Booking,
                id: booking.id.into(),
            },
            format!("car={car_id} {start}->{end} pending(after-paid)"),
        )))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;

        tx.execute(Commit).await.map_err(|e| {
            if e.as_ref()
                .is_exclusion_violation(Some(NO_OVERLAP_CONSTRAINT))
            {
                tracerr::new!(E::SlotTaken(car_id))
            } else {
                tracerr::map_from_and_wrap!(=> E)(e)
            }
        })?;

        Ok(booking)
    }
}

/// Error of [`PlaceOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided [`Period`] bounds are reversed.
    #[display("`Period` end cannot be earlier than its start")]
    InvalidPeriod,

    /// [`Car`] with the provided ID does not exist.
    #[display("`Car(id: {_0})` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),

    /// Rent duration falls outside the [`Car`]s rentable range.
    #[display("rental days must be between {min} and {max}")]
    DaysOutOfRange {
        /// Minimum number of rentable days.
        min: car::Days,

        /// Maximum number of rentable days.
        max: car::Days,
    },

    /// Renter has no [`renter::Profile`] yet.
    #[display("`renter::Profile` of the renter {_0} is required")]
    ProfileRequired(#[error(not(source))] renter::Id),

    /// [`Car`] is already booked over an overlapping [`Period`].
    #[display("`Car(id: {_0})` is already booked for this period")]
    SlotTaken(#[error(not(source))] car::Id),

    /// Payment provider refused the charge.
    #[display("payment declined: {message}")]
    PaymentDeclined {
        /// Provider message accompanying the refusal.
        message: String,
    },

    /// Payment [`Gateway`] failure.
    ///
    /// [`Gateway`]: crate::infra::Gateway
    #[display("payment gateway failed: {_0}")]
    Gateway(gateway::Error),
}

impl From<gateway::Error> for ExecutionError {
    fn from(e: gateway::Error) -> Self {
        match e {
            gateway::Error::Declined { message } => {
                Self::PaymentDeclined { message }
            }
            e @ gateway::Error::Unavailable { .. } => Self::Gateway(e),
        }
    }
}
