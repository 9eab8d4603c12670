//! [`Car`]-related [`Database`] implementations.

use common::operations::{By, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{car, Car},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of a [`Car`] row.
const COLUMNS: &str = "\
    id, make, model, year, kilometre, \
    daily_rate, currency, min_days, max_days, \
    status, created_at";

/// Restores a [`Car`] from the provided [`Row`].
fn from_row(row: &Row) -> Car {
    Car {
        id: row.get("id"),
        make: row.get("make"),
        model: row.get("model"),
        year: u16::try_from(row.get::<_, i32>("year"))
            .expect("`year` overflow"),
        kilometre: u32::try_from(row.get::<_, i64>("kilometre"))
            .expect("`kilometre` overflow"),
        daily_rate: common::Money {
            amount: row.get("daily_rate"),
            currency: row.get("currency"),
        },
        min_days: u32::try_from(row.get::<_, i32>("min_days"))
            .expect("`min_days` overflow"),
        max_days: u32::try_from(row.get::<_, i32>("max_days"))
            .expect("`max_days` overflow"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Car>, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: car::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM cars \
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

impl<C> Database<Select<By<Vec<Car>, read::car::AvailableFor>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Car>, read::car::AvailableFor>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::car::AvailableFor(period) = by.into_inner();
        let start = period.start();
        let end = period.end();

        // Browsing is blocked by confirmed rents only, so other renters'
        // pending carts don't hide the car.
        let blocking = read::booking::Blocking::Confirmed.statuses();
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM cars \
             WHERE status NOT IN ($1::INT2, $2::INT2) \
               AND NOT EXISTS (\
                   SELECT 1 \
                   FROM bookings \
                   WHERE bookings.car_id = cars.id \
                     AND bookings.status = ANY($3::INT2[]) \
                     AND bookings.start_date <= $5::DATE \
                     AND bookings.end_date >= $4::DATE) \
             ORDER BY created_at, id",
        );
        Ok(self
            .query(
                &sql,
                &[
                    &car::Status::Unavailable,
                    &car::Status::Maintenance,
                    &blocking,
                    &start,
                    &end,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Update<Car>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(car): Update<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        let Car {
            id,
            make,
            model,
            year,
            kilometre,
            daily_rate,
            min_days,
            max_days,
            status,
            created_at,
        } = car;

        let year = i32::from(year);
        let kilometre = i64::from(kilometre);
        let min_days = i32::try_from(min_days).expect("`min_days` overflow");
        let max_days = i32::try_from(max_days).expect("`max_days` overflow");

        const SQL: &str = "\
            INSERT INTO cars (\
                id, make, model, year, kilometre, \
                daily_rate, currency, min_days, max_days, \
                status, created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::INT4, $5::INT8, \
                $6::NUMERIC, $7::INT2, $8::INT4, $9::INT4, \
                $10::INT2, $11::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET make = EXCLUDED.make, \
                model = EXCLUDED.model, \
                year = EXCLUDED.year, \
                kilometre = EXCLUDED.kilometre, \
                daily_rate = EXCLUDED.daily_rate, \
                currency = EXCLUDED.currency, \
                min_days = EXCLUDED.min_days, \
                max_days = EXCLUDED.max_days, \
                status = EXCLUDED.status, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &make,
                &model,
                &year,
                &kilometre,
                &daily_rate.amount,
                &daily_rate.currency,
                &min_days,
                &max_days,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Car, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: car::Id = by.into_inner();

        // `DO UPDATE` locks an already existing row, unlike `DO NOTHING`,
        // so concurrent transactions serialize on it.
        const SQL: &str = "\
            INSERT INTO cars_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = cars_lock.id";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<read::car::Occupied, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::car::Occupied;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::car::Occupied, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let car_id: car::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE car_id = $1::UUID \
              AND status = ANY($2::INT2[]) \
            LIMIT 1";
        self.query_opt(
            SQL,
            &[&car_id, &read::booking::Blocking::Active.statuses()],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(|r| read::car::Occupied(r.is_some()))
    }
}
