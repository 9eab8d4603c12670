//! Payment [`Gateway`]-related implementations.

pub mod sandbox;

use common::Money;
use derive_more::{Display, Error as StdError};

use crate::domain::{payment, renter};

pub use self::sandbox::Sandbox;

/// Payment gateway operation.
pub use common::Handler as Gateway;

/// Charge request to a payment [`Gateway`].
#[derive(Clone, Debug)]
pub struct Request {
    /// Amount to charge.
    pub amount: Money,

    /// ID of the paying renter.
    pub payer_id: renter::Id,

    /// [`payment::Method`] to charge with.
    pub method: payment::Method,
}

/// Receipt of a charge accepted by a payment [`Gateway`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Receipt {
    /// Provider transaction ID.
    pub txn_id: payment::TxnId,

    /// Provider message accompanying the charge.
    pub message: String,
}

/// [`Gateway`] error.
#[derive(Clone, Debug, Display, StdError)]
pub enum Error {
    /// Provider refused the charge.
    #[display("charge declined: {message}")]
    Declined {
        /// Provider message accompanying the refusal.
        message: String,
    },

    /// Provider could not be reached.
    #[display("payment provider unavailable: {message}")]
    Unavailable {
        /// Transport error description.
        message: String,
    },
}
