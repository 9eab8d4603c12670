//! [`Booking`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Perform, Select, Update},
    Money, Period,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, car, renter, Booking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns of a [`Booking`] row.
const COLUMNS: &str = "\
    id, car_id, renter_id, start_date, end_date, status, \
    days, daily_rate, base, adjustment, rule_id, total, currency, \
    first_name, last_name, phone, id_document, \
    created_at";

/// Restores a [`Booking`] from the provided [`Row`].
fn from_row(row: &Row) -> Booking {
    let currency = row.get("currency");
    Booking {
        id: row.get("id"),
        car_id: row.get("car_id"),
        renter_id: row.get("renter_id"),
        period: Period::new(row.get("start_date"), row.get("end_date"))
            .expect("stored `Period` is ordered"),
        status: row.get("status"),
        cost: booking::Cost {
            days: u32::try_from(row.get::<_, i32>("days"))
                .expect("`days` overflow"),
            daily_rate: Money {
                amount: row.get("daily_rate"),
                currency,
            },
            base: Money {
                amount: row.get("base"),
                currency,
            },
            adjustment: Money {
                amount: row.get("adjustment"),
                currency,
            },
            rule_id: row.get("rule_id"),
            total: Money {
                amount: row.get("total"),
                currency,
            },
        },
        renter: booking::Snapshot {
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            phone: row.get("phone"),
            id_document: row.get("id_document"),
        },
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            car_id,
            renter_id,
            period,
            status,
            cost:
                booking::Cost {
                    days,
                    daily_rate,
                    base,
                    adjustment,
                    rule_id,
                    total,
                },
            renter:
                booking::Snapshot {
                    first_name,
                    last_name,
                    phone,
                    id_document,
                },
            created_at,
        } = booking;

        let start = period.start();
        let end = period.end();
        let days = i32::try_from(days).expect("`days` overflow");

        // Plain `INSERT`, so the `bookings_no_overlap` exclusion constraint
        // rejects concurrently committed overlaps.
        const SQL: &str = "\
            INSERT INTO bookings (\
                id, car_id, renter_id, start_date, end_date, status, \
                days, daily_rate, base, adjustment, rule_id, total, \
                currency, \
                first_name, last_name, phone, id_document, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::DATE, $5::DATE, $6::INT2, \
                $7::INT4, $8::NUMERIC, $9::NUMERIC, $10::NUMERIC, \
                $11::UUID, $12::NUMERIC, $13::INT2, \
                $14::VARCHAR, $15::VARCHAR, $16::VARCHAR, $17::VARCHAR, \
                $18::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &car_id,
                &renter_id,
                &start,
                &end,
                &status,
                &days,
                &daily_rate.amount,
                &base.amount,
                &adjustment.amount,
                &rule_id,
                &total.amount,
                &total.currency,
                &first_name,
                &last_name,
                &phone,
                &id_document,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        // Cost and renter snapshots are immutable once placed.
        const SQL: &str = "\
            UPDATE bookings \
            SET status = $2::INT2 \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&booking.id, &booking.status])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings \
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

impl<C> Database<Select<By<read::booking::Overlaps, read::booking::Overlapping>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::booking::Overlaps;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::Overlaps, read::booking::Overlapping>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Overlapping {
            car_id,
            period,
            blocking,
        } = by.into_inner();
        let start = period.start();
        let end = period.end();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE car_id = $1::UUID \
              AND status = ANY($2::INT2[]) \
              AND start_date <= $4::DATE \
              AND end_date >= $3::DATE \
            LIMIT 1";
        self.query_opt(SQL, &[&car_id, &blocking.statuses(), &start, &end])
            .await
            .map_err(tracerr::wrap!())
            .map(|r| read::booking::Overlaps(r.is_some()))
    }
}

impl<C> Database<Select<By<Vec<read::booking::Active>, renter::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::booking::Active>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::Active>, renter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let renter_id: renter::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings \
             WHERE renter_id = $1::UUID \
               AND status = ANY($2::INT2[]) \
             ORDER BY start_date, id",
        );
        Ok(self
            .query(
                &sql,
                &[&renter_id, &read::booking::Blocking::Active.statuses()],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| read::booking::Active(from_row(row)))
            .collect())
    }
}

impl<C> Database<Select<By<Vec<read::booking::Pending>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::booking::Pending>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<read::booking::Pending>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings \
             WHERE status = $1::INT2 \
             ORDER BY created_at, id",
        );
        Ok(self
            .query(&sql, &[&booking::Status::Pending])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| read::booking::Pending(from_row(row)))
            .collect())
    }
}

impl<C> Database<Perform<read::booking::Elapsed>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(elapsed): Perform<read::booking::Elapsed>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Elapsed(today) = elapsed;

        const COMPLETE_SQL: &str = "\
            UPDATE bookings \
            SET status = $1::INT2 \
            WHERE status = $2::INT2 \
              AND end_date < $3::DATE \
            RETURNING car_id";
        let car_ids = self
            .query(
                COMPLETE_SQL,
                &[
                    &booking::Status::Completed,
                    &booking::Status::Confirmed,
                    &today,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| row.get::<_, car::Id>("car_id"))
            .collect::<Vec<_>>();
        if car_ids.is_empty() {
            return Ok(0);
        }

        // Freed cars drop back to `Available` unless another active
        // `Booking` still occupies them. Manual statuses stay untouched.
        const RECOMPUTE_SQL: &str = "\
            UPDATE cars \
            SET status = CASE \
                WHEN EXISTS (\
                    SELECT 1 \
                    FROM bookings \
                    WHERE bookings.car_id = cars.id \
                      AND bookings.status = ANY($2::INT2[])) \
                THEN $3::INT2 \
                ELSE $4::INT2 \
            END \
            WHERE id = ANY($1::UUID[]) \
              AND status IN ($3::INT2, $4::INT2)";
        let _ = self
            .exec(
                RECOMPUTE_SQL,
                &[
                    &car_ids,
                    &read::booking::Blocking::Active.statuses(),
                    &car::Status::Reserved,
                    &car::Status::Available,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;

        Ok(u64::try_from(car_ids.len()).expect("`usize` fits into `u64`"))
    }
}
