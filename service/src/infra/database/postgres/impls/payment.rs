//! [`Payment`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, Payment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of a [`Payment`] row.
const COLUMNS: &str = "\
    id, booking_id, method, amount, currency, ok, message, txn_id, \
    created_at";

/// Restores a [`Payment`] from the provided [`Row`].
fn from_row(row: &Row) -> Payment {
    Payment {
        id: row.get("id"),
        booking_id: row.get("booking_id"),
        method: row.get("method"),
        amount: Money {
            amount: row.get("amount"),
            currency: row.get("currency"),
        },
        ok: row.get("ok"),
        message: row.get("message"),
        txn_id: row.get("txn_id"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            booking_id,
            method,
            amount,
            ok,
            message,
            txn_id,
            created_at,
        } = payment;

        const SQL: &str = "\
            INSERT INTO payments (\
                id, booking_id, method, amount, currency, ok, message, \
                txn_id, created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT2, $4::NUMERIC, $5::INT2, \
                $6::BOOL, $7::VARCHAR, $8::VARCHAR, $9::TIMESTAMPTZ \
            )";
        self.exec(
            SQL,
            &[
                &id,
                &booking_id,
                &method,
                &amount.amount,
                &amount.currency,
                &ok,
                &message,
                &txn_id,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Payment>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let booking_id: booking::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payments \
             WHERE booking_id = $1::UUID \
             ORDER BY created_at, id",
        );
        Ok(self
            .query(&sql, &[&booking_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}
