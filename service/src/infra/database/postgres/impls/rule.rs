//! Pricing [`Rule`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select, Update},
    Percent,
};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{car, rule, Rule},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of a [`Rule`] row.
const COLUMNS: &str = "\
    id, name, kind, percent, fixed, car_id, min_days, \
    window_from, window_to, is_active, created_at";

/// Restores a [`Rule`] from the provided [`Row`].
fn from_row(row: &Row) -> Rule {
    let amount = match row.get::<_, Option<Percent>>("percent") {
        Some(percent) => rule::Amount::Percent(percent),
        None => rule::Amount::Fixed(
            row.get::<_, Option<Decimal>>("fixed")
                .expect("either `percent` or `fixed` is set"),
        ),
    };
    Rule {
        id: row.get("id"),
        name: row.get("name"),
        kind: row.get("kind"),
        amount,
        scope: row
            .get::<_, Option<car::Id>>("car_id")
            .map_or(rule::Scope::Global, rule::Scope::Car),
        min_days: u32::try_from(row.get::<_, i32>("min_days"))
            .expect("`min_days` overflow"),
        window: rule::Window::new(
            row.get("window_from"),
            row.get("window_to"),
        )
        .expect("stored `Window` is ordered"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Insert<Rule>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Rule>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rule): Insert<Rule>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(rule)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Rule>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rule): Update<Rule>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rule {
            id,
            name,
            kind,
            amount,
            scope,
            min_days,
            window,
            is_active,
            created_at,
        } = rule;

        let (percent, fixed) = match amount {
            rule::Amount::Percent(p) => (Some(p), None),
            rule::Amount::Fixed(v) => (None, Some(v)),
        };
        let car_id = match scope {
            rule::Scope::Global => None,
            rule::Scope::Car(id) => Some(id),
        };
        let min_days = i32::try_from(min_days).expect("`min_days` overflow");
        let window_from = window.from();
        let window_to = window.to();

        const SQL: &str = "\
            INSERT INTO pricing_rules (\
                id, name, kind, percent, fixed, car_id, min_days, \
                window_from, window_to, is_active, created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, \
                $4::NUMERIC, $5::NUMERIC, $6::UUID, $7::INT4, \
                $8::DATE, $9::DATE, $10::BOOL, $11::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                kind = EXCLUDED.kind, \
                percent = EXCLUDED.percent, \
                fixed = EXCLUDED.fixed, \
                car_id = EXCLUDED.car_id, \
                min_days = EXCLUDED.min_days, \
                window_from = EXCLUDED.window_from, \
                window_to = EXCLUDED.window_to, \
                is_active = EXCLUDED.is_active, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &name,
                &kind,
                &percent,
                &fixed,
                &car_id,
                &min_days,
                &window_from,
                &window_to,
                &is_active,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Option<Rule>, rule::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Rule>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rule>, rule::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: rule::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM pricing_rules \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| from_row(&row)))
    }
}

impl<C> Database<Select<By<Vec<Rule>, read::rule::Candidates>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Rule>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rule>, read::rule::Candidates>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rule::Candidates { car_id } = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM pricing_rules \
             WHERE is_active \
               AND (car_id IS NULL OR car_id = $1::UUID)",
        );
        Ok(self
            .query(&sql, &[&car_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Rule>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Rule>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Rule>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM pricing_rules \
             ORDER BY created_at, id",
        );
        Ok(self
            .query(&sql, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}
