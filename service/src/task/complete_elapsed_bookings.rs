//! [`CompleteElapsedBookings`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Commit, Perform, Start, Transact, Transacted},
    Date,
};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{Booking, Car};
use crate::{
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`CompleteElapsedBookings`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between the sweeps.
    pub interval: time::Duration,
}

/// [`Task`] completing [`Booking`]s whose rental [`Period`] has elapsed.
///
/// Freed [`Car`]s become rentable again on the same sweep.
///
/// [`Period`]: common::Period
#[derive(Clone, Copy, Debug)]
pub struct CompleteElapsedBookings<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Gw> Task<Start<By<CompleteElapsedBookings<Self>, Config>>>
    for Service<Db, Gw>
where
    CompleteElapsedBookings<Service<Db, Gw>>:
        Task<Perform<()>, Ok = u64, Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<CompleteElapsedBookings<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = CompleteElapsedBookings {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task
                .execute(Perform(()))
                .await
                .map(|completed| {
                    if completed > 0 {
                        log::info!("{completed} `Booking`(s) completed");
                    }
                })
                .map_err(|e| {
                    log::error!(
                        "`task::CompleteElapsedBookings` failed: {e}",
                    );
                });
        }
    }
}

impl<Db, Gw> Task<Perform<()>> for CompleteElapsedBookings<Service<Db, Gw>>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Perform<read::booking::Elapsed>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = u64;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let tx = self
            .service
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        let completed = tx
            .execute(Perform(read::booking::Elapsed(Date::today())))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!())
            .map(drop)?;

        Ok(completed)
    }
}

/// Error of [`CompleteElapsedBookings`] execution.
pub type ExecutionError = Traced<database::Error>;
