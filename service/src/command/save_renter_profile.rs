//! [`Command`] for saving a [`renter::Profile`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted, Update};
use tracerr::Traced;

use crate::{
    domain::{audit, renter},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating or updating a [`renter::Profile`].
///
/// A renter must have a [`renter::Profile`] before placing any orders.
#[derive(Clone, Debug)]
pub struct SaveRenterProfile {
    /// ID of the renter the [`renter::Profile`] belongs to.
    pub renter_id: renter::Id,

    /// First [`renter::Name`] of the renter.
    pub first_name: renter::Name,

    /// Last [`renter::Name`] of the renter.
    pub last_name: renter::Name,

    /// [`renter::Phone`] number of the renter.
    pub phone: renter::Phone,

    /// [`renter::IdDocument`] of the renter.
    pub id_document: renter::IdDocument,
}

impl<Db, Gw> Command<SaveRenterProfile> for Service<Db, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<renter::Profile>, renter::Id>>,
            Ok = Option<renter::Profile>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Update<renter::Profile>, Err = Traced<database::Error>>
        + Database<Insert<audit::Event>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = renter::Profile;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SaveRenterProfile,
    ) -> Result<Self::Ok, Self::Err> {
        let SaveRenterProfile {
            renter_id,
            first_name,
            last_name,
            phone,
            id_document,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::<Option<renter::Profile>, _>::new(renter_id)))
            .await
            .map_err(tracerr::wrap!())?;

        let profile = renter::Profile {
            renter_id,
            first_name,
            last_name,
            phone,
            id_document,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        tx.execute(Update(profile.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tx.execute(Insert(audit::Event::new(
            renter_id,
            audit::Action::SaveProfile,
            audit::Target {
                kind: audit::target::Kind::Profile,
                id: renter_id.into(),
            },
            if existing.is_some() { "updated" } else { "created" },
        )))
        .await
        .map_err(tracerr::wrap!())
        .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(profile)
    }
}

/// Error of [`SaveRenterProfile`] [`Command`] execution.
pub type ExecutionError = database::Error;
