//! [`Payment`]-related definitions.

use common::{DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar,
};
use service::domain;
use uuid::Uuid;

use crate::{api, define_error, Context, Error};

/// A payment attempt for a `Booking`.
#[derive(Clone, Debug, From)]
pub struct Payment(domain::Payment);

/// A payment attempt for a `Booking`.
#[graphql_object(context = Context)]
impl Payment {
    /// Unique identifier of this `Payment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the `Booking` this `Payment` was made for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.bookingId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn booking_id(&self) -> api::booking::Id {
        self.0.booking_id.into()
    }

    /// Method this `Payment` was made with.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.method",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn method(&self) -> MethodKind {
        self.0.method.into()
    }

    /// Charged amount.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.amount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// Indicator whether the charge was approved.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.ok",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn ok(&self) -> bool {
        self.0.ok
    }

    /// Provider message accompanying the charge result.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.message",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn message(&self) -> Option<&str> {
        self.0.message.as_deref()
    }

    /// Provider transaction ID of this `Payment`, if approved.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.txnId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn txn_id(&self) -> Option<&str> {
        self.0.txn_id.as_ref().map(AsRef::as_ref)
    }

    /// `DateTime` when this `Payment` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Payment`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::payment::Id)]
#[into(domain::payment::Id)]
#[graphql(name = "PaymentId", transparent)]
pub struct Id(Uuid);

/// Kind of a `Payment` method.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "PaymentMethodKind")]
pub enum MethodKind {
    /// PayPal account.
    PayPal,

    /// Stripe customer.
    Stripe,

    /// Plain credit card.
    CreditCard,

    /// Bank transfer.
    BankTransfer,

    /// Cryptocurrency wallet.
    Crypto,

    /// Google Pay token.
    GooglePay,
}

impl From<domain::payment::method::Kind> for MethodKind {
    fn from(kind: domain::payment::method::Kind) -> Self {
        use domain::payment::method::Kind as K;
        match kind {
            K::PayPal => Self::PayPal,
            K::Stripe => Self::Stripe,
            K::CreditCard => Self::CreditCard,
            K::BankTransfer => Self::BankTransfer,
            K::Crypto => Self::Crypto,
            K::GooglePay => Self::GooglePay,
        }
    }
}

/// Payment method with its provider-specific details.
///
/// Only the details matching the provided `kind` are expected to be set.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "PaymentMethodInput")]
pub struct MethodInput {
    /// Kind of the method.
    pub kind: MethodKind,

    /// PayPal account email.
    pub email: Option<String>,

    /// Stripe customer ID.
    pub customer_id: Option<String>,

    /// Credit card number.
    pub number: Option<String>,

    /// Credit card verification value.
    pub cvv: Option<String>,

    /// Credit card expiry in `MM/YY` format.
    pub expiry: Option<String>,

    /// IBAN of the paying bank account.
    pub iban: Option<String>,

    /// Cryptocurrency wallet address.
    pub wallet: Option<String>,

    /// Network the cryptocurrency wallet lives on.
    pub network: Option<String>,

    /// Tokenized Google Pay card.
    pub token: Option<String>,
}

impl MethodInput {
    /// Converts this [`MethodInput`] into a [`domain::payment::Method`].
    ///
    /// # Errors
    ///
    /// Errors if the details required by the `kind` are missing.
    pub fn into_domain(self) -> Result<domain::payment::Method, Error> {
        use domain::payment::Method as M;

        define_error! {
            enum MethodError {
                #[code = "INVALID_PAYMENT_METHOD"]
                #[status = BAD_REQUEST]
                #[message = "Provided `PaymentMethodInput` details do not \
                             match its kind"]
                Invalid,
            }
        }

        let Self {
            kind,
            email,
            customer_id,
            number,
            cvv,
            expiry,
            iban,
            wallet,
            network,
            token,
        } = self;

        match kind {
            MethodKind::PayPal => email.map(|email| M::PayPal { email }),
            MethodKind::Stripe => {
                customer_id.map(|customer_id| M::Stripe { customer_id })
            }
            MethodKind::CreditCard => number.zip(cvv).zip(expiry).map(
                |((number, cvv), expiry)| M::CreditCard {
                    number,
                    cvv,
                    expiry,
                },
            ),
            MethodKind::BankTransfer => {
                iban.map(|iban| M::BankTransfer { iban })
            }
            MethodKind::Crypto => wallet
                .zip(network)
                .map(|(wallet, network)| M::Crypto { wallet, network }),
            MethodKind::GooglePay => token.map(|token| M::GooglePay { token }),
        }
        .ok_or_else(|| MethodError::Invalid.into())
    }
}
