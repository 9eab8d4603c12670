//! [`Estimate`] definition.

use common::{
    operations::{By, Select},
    Date, Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{self, car, Car, Rule},
    infra::{database, Database},
    read, Query, Service,
};

/// [`Query`] to price a prospective rent without placing it.
///
/// Returns the same [`domain::Quote`] the order would be charged with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Estimate {
    /// ID of the [`Car`] to price.
    pub car_id: car::Id,

    /// First billable [`Date`].
    pub start: Date,

    /// Last billable [`Date`].
    pub end: Date,
}

impl<Db, Gw> Query<Estimate> for Service<Db, Gw>
where
    Db: Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Rule>, read::rule::Candidates>>,
            Ok = Vec<Rule>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = domain::Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Estimate) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Estimate {
            car_id,
            start,
            end,
        } = query;

        let period = Period::new(start, end)
            .ok_or(E::InvalidPeriod)
            .map_err(tracerr::wrap!())?;

        let car = self
            .database()
            .execute(Select(By::<Option<Car>, _>::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|car| car.status == car::Status::Available)
            .ok_or(E::CarNotAvailable(car_id))
            .map_err(tracerr::wrap!())?;

        let rules = self
            .database()
            .execute(Select(By::<Vec<Rule>, _>::new(read::rule::Candidates {
                car_id,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(domain::Quote::resolve(&car, period, &rules))
    }
}

/// Error of [`Estimate`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided [`Period`] bounds are reversed.
    #[display("`Period` end cannot be earlier than its start")]
    InvalidPeriod,

    /// [`Car`] does not exist or is not open for rent.
    #[display("`Car(id: {_0})` not found or not available")]
    CarNotAvailable(#[error(not(source))] car::Id),
}
