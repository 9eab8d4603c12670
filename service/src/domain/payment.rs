//! [`Payment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::booking;
#[cfg(doc)]
use crate::domain::Booking;

/// Payment charged for a [`Booking`].
///
/// Recorded only once the provider accepts the charge: a declined attempt
/// persists nothing.
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the paid [`Booking`].
    pub booking_id: booking::Id,

    /// [`method::Kind`] this [`Payment`] was made with.
    pub method: method::Kind,

    /// Charged amount.
    pub amount: Money,

    /// Indicator whether the provider accepted this [`Payment`].
    pub ok: bool,

    /// Provider message accompanying the outcome.
    pub message: Option<String>,

    /// Provider transaction ID, absent on declined attempts.
    pub txn_id: Option<TxnId>,

    /// [`DateTime`] when this [`Payment`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Payment`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Payment method with its provider-specific details.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Method {
    /// PayPal account.
    PayPal {
        /// PayPal account email.
        email: String,
    },

    /// Stripe customer.
    Stripe {
        /// Stripe customer ID.
        customer_id: String,
    },

    /// Plain credit card.
    CreditCard {
        /// Card number.
        number: String,

        /// Card verification value.
        cvv: String,

        /// Expiry in `MM/YY` format.
        expiry: String,
    },

    /// Bank transfer.
    BankTransfer {
        /// IBAN of the paying account.
        iban: String,
    },

    /// Cryptocurrency wallet.
    Crypto {
        /// Wallet address.
        wallet: String,

        /// Network the wallet lives on.
        network: String,
    },

    /// Google Pay token.
    GooglePay {
        /// Tokenized card.
        token: String,
    },
}

impl Method {
    /// Returns the [`method::Kind`] of this [`Method`].
    #[must_use]
    pub fn kind(&self) -> method::Kind {
        match self {
            Self::PayPal { .. } => method::Kind::PayPal,
            Self::Stripe { .. } => method::Kind::Stripe,
            Self::CreditCard { .. } => method::Kind::CreditCard,
            Self::BankTransfer { .. } => method::Kind::BankTransfer,
            Self::Crypto { .. } => method::Kind::Crypto,
            Self::GooglePay { .. } => method::Kind::GooglePay,
        }
    }
}

pub mod method {
    //! [`Payment`] method definitions.

    use common::define_kind;

    #[cfg(doc)]
    use super::Payment;

    define_kind! {
        #[doc = "Kind of a [`Payment`] method."]
        enum Kind {
            #[doc = "PayPal account."]
            PayPal = 1,

            #[doc = "Stripe customer."]
            Stripe = 2,

            #[doc = "Plain credit card."]
            CreditCard = 3,

            #[doc = "Bank transfer."]
            BankTransfer = 4,

            #[doc = "Cryptocurrency wallet."]
            Crypto = 5,

            #[doc = "Google Pay token."]
            GooglePay = 6,
        }
    }
}

/// Provider transaction ID of a [`Payment`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, Into, PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct TxnId(String);

/// [`DateTime`] when a [`Payment`] was created.
pub type CreationDateTime = DateTimeOf<(Payment, unit::Creation)>;
