//! Audit [`Event`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::audit::{self, Event},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Insert<Event>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(event): Insert<Event>,
    ) -> Result<Self::Ok, Self::Err> {
        let Event {
            id,
            actor_id,
            action,
            target,
            detail,
            created_at,
        } = event;

        const SQL: &str = "\
            INSERT INTO audit_events (\
                id, actor_id, action, target_kind, target_id, detail, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT2, $4::INT2, $5::UUID, \
                $6::VARCHAR, $7::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &actor_id,
                &action,
                &target.kind,
                &target.id,
                &detail,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Event>, audit::Target>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Event>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Event>, audit::Target>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let target: audit::Target = by.into_inner();

        const SQL: &str = "\
            SELECT id, actor_id, action, target_kind, target_id, detail, \
                   created_at \
            FROM audit_events \
            WHERE target_kind = $1::INT2 \
              AND target_id = $2::UUID \
            ORDER BY created_at, id";
        Ok(self
            .query(SQL, &[&target.kind, &target.id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Event {
                id: row.get("id"),
                actor_id: row.get("actor_id"),
                action: row.get("action"),
                target: audit::Target {
                    kind: row.get("target_kind"),
                    id: row.get("target_id"),
                },
                detail: row.get("detail"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
