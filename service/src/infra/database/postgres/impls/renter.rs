//! Renter-related [`Database`] implementations.

use common::operations::{By, Select, Update};
use tracerr::Traced;

use crate::{
    domain::renter,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<renter::Profile>, renter::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<renter::Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<renter::Profile>, renter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let renter_id: renter::Id = by.into_inner();

        const SQL: &str = "\
            SELECT renter_id, first_name, last_name, phone, id_document \
            FROM profiles \
            WHERE renter_id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&renter_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| renter::Profile {
                renter_id: row.get("renter_id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                phone: row.get("phone"),
                id_document: row.get("id_document"),
            }))
    }
}

impl<C> Database<Update<renter::Profile>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(profile): Update<renter::Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let renter::Profile {
            renter_id,
            first_name,
            last_name,
            phone,
            id_document,
        } = profile;

        const SQL: &str = "\
            INSERT INTO profiles (\
                renter_id, first_name, last_name, phone, id_document \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR \
            ) \
            ON CONFLICT (renter_id) DO UPDATE \
            SET first_name = EXCLUDED.first_name, \
                last_name = EXCLUDED.last_name, \
                phone = EXCLUDED.phone, \
                id_document = EXCLUDED.id_document";
        self.exec(
            SQL,
            &[&renter_id, &first_name, &last_name, &phone, &id_document],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
