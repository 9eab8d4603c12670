//! [`Command`] for toggling a pricing [`Rule`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{audit, renter, rule, Rule},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for activating or deactivating a pricing [`Rule`].
///
/// Deactivated [`Rule`]s stop applying to new quotes immediately, already
/// placed [`Booking`]s keep the cost they were charged with.
///
/// [`Booking`]: crate::domain::Booking
#[derive(Clone, Copy, Debug)]
pub struct SetPricingRuleActive {
    /// ID of the operator toggling the [`Rule`].
    pub actor_id: renter::Id,

    /// ID of the [`Rule`] to toggle.
    pub rule_id: rule::Id,

    /// Whether the [`Rule`] should be active.
    pub is_active: bool,
}

impl<Db, Gw> Command<SetPricingRuleActive> for Service<Db, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Rule>, rule::Id>>,
            Ok = Option<Rule>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Update<Rule>, Err = Traced<database::Error>>
        + Database<Insert<audit::Event>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rule;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SetPricingRuleActive,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetPricingRuleActive {
            actor_id,
            rule_id,
            is_active,
        } = cmd;

        let mut rule = self
            .database()
            .execute(Select(By::<Option<Rule>, _>::new(rule_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RuleNotExists(rule_id))
            .map_err(tracerr::wrap!())?;
        rule.is_active = is_active;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Update(rule.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Insert(audit::Event::new(
            actor_id,
            audit::Action::UpdateRule,
            audit::Target {
                kind: audit::target::Kind::Rule,
                id: rule.id.into(),
            },
            format!("set_active={is_active}"),
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

/// Error of [`SetPricingRuleActive`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rule`] with the provided ID does not exist.
    #[display("`Rule(id: {_0})` does not exist")]
    RuleNotExists(#[error(not(source))] rule::Id),
}
