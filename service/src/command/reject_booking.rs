//! [`Command`] for rejecting a pending [`Booking`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, booking, car, renter, Booking, Car},
    infra::{database, Database},
    read,
    Service,
};

use super::Command;

/// [`Command`] for rejecting a [`booking::Status::Pending`] [`Booking`].
///
/// Rejection frees the [`Car`] for other orders right away.
#[derive(Clone, Copy, Debug)]
pub struct RejectBooking {
    /// ID of the operator rejecting the [`Booking`].
    pub actor_id: renter::Id,

    /// ID of the [`Booking`] to reject.
    pub booking_id: booking::Id,
}

impl<Db, Gw> Command<RejectBooking> for Service<Db, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Car, car::Id>>, Err = Traced<database::Error>>
        + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<
            Select<By<read::car::Occupied, car::Id>>,
            Ok = read::car::Occupied,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<Update<Car>, Err = Traced<database::Error>>
        + Database<Insert<audit::Event>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RejectBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RejectBooking {
            actor_id,
            booking_id,
        } = cmd;

        let mut booking = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        if booking.status != booking::Status::Pending {
            return Err(tracerr::new!(E::NotPending(booking.status)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Car`.
        tx.execute(Lock(By::new(booking.car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        booking.status = booking::Status::Cancelled;
        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let occupied = tx
            .execute(Select(By::<read::car::Occupied, _>::new(booking.car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let mut car = tx
            .execute(Select(By::<Option<Car>, _>::new(booking.car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarNotExists(booking.car_id))
            .map_err(tracerr::wrap!())?;
        car.status = car.recomputed_status(*occupied);
        tx.execute(Update(car))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Insert(audit::Event::new(
            actor_id,
            audit::Action::RejectBooking,
            audit::Target {
                kind: audit::target::Kind::Booking,
                id: booking.id.into(),
            },
            format!("car#{}", booking.car_id),
        )))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`RejectBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Booking`] is not awaiting review.
    #[display("`Booking` cannot be rejected in the `{_0}` status")]
    NotPending(#[error(not(source))] booking::Status),

    /// [`Car`] of the [`Booking`] does not exist.
    #[display("`Car(id: {_0})` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),
}
