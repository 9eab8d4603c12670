//! [`Command`] for creating a new pricing [`Rule`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, car, renter, rule, Car, Rule},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new pricing [`Rule`].
///
/// The created [`Rule`] is active right away.
#[derive(Clone, Debug)]
pub struct CreatePricingRule {
    /// ID of the operator creating the [`Rule`].
    pub actor_id: renter::Id,

    /// [`rule::Name`] of a new [`Rule`].
    pub name: rule::Name,

    /// [`rule::Kind`] of a new [`Rule`].
    pub kind: rule::Kind,

    /// [`rule::Amount`] of a new [`Rule`].
    pub amount: rule::Amount,

    /// [`rule::Scope`] of a new [`Rule`].
    pub scope: rule::Scope,

    /// Minimum rent duration (in days) for a new [`Rule`] to apply.
    pub min_days: car::Days,

    /// Calendar [`rule::Window`] a new [`Rule`] is effective within.
    pub window: rule::Window,
}

impl<Db, Gw> Command<CreatePricingRule> for Service<Db, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Rule>, Err = Traced<database::Error>>
        + Database<Insert<audit::Event>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rule;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreatePricingRule,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePricingRule {
            actor_id,
            name,
            kind,
            amount,
            scope,
            min_days,
            window,
        } = cmd;

        if let rule::Scope::Car(car_id) = scope {
            _ = self
                .database()
                .execute(Select(By::<Option<Car>, _>::new(car_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::CarNotExists(car_id))
                .map_err(tracerr::wrap!())?;
        }

        let rule = Rule {
            id: rule::Id::new(),
            name,
            kind,
            amount,
            scope,
            min_days,
            window,
            is_active: true,
            created_at: rule::CreationDateTime::now(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Insert(rule.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let amount_repr = match rule.amount {
            rule::Amount::Percent(p) => format!("PERCENT {p}"),
            rule::Amount::Fixed(v) => format!("FIXED {v}"),
        };
        let scope_repr = match rule.scope {
            rule::Scope::Global => "global".to_owned(),
            rule::Scope::Car(id) => format!("car#{id}"),
        };
        tx.execute(Insert(audit::Event::new(
            actor_id,
            audit::Action::CreateRule,
            audit::Target {
                kind: audit::target::Kind::Rule,
                id: rule.id.into(),
            },
            format!(
                "{} {amount_repr} scope={scope_repr} min_days={min_days}",
                rule.kind,
            ),
        )))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))
        .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rule)
    }
}

/// Error of [`CreatePricingRule`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Car`] the [`Rule`] is scoped to does not exist.
    #[display("`Car(id: {_0})` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),
}
