//! [`Sandbox`] payment [`Gateway`].

use common::operations::Perform;
use tracerr::Traced;

use crate::domain::payment;

use super::{Error, Gateway, Receipt, Request};

/// Payment [`Gateway`] accepting every well-formed charge.
///
/// Stands in for a real provider integration: issues deterministic
/// provider-styled transaction IDs and human-readable confirmation messages.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sandbox;

impl Gateway<Perform<Request>> for Sandbox {
    type Ok = Receipt;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(req): Perform<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        let Request {
            amount,
            payer_id,
            method,
        } = req;

        let (message, code) = match &method {
            payment::Method::PayPal { email } => {
                (format!("PayPal({email}) paid {amount}"), "001")
            }
            payment::Method::Stripe { customer_id } => {
                (format!("Stripe({customer_id}) paid {amount}"), "002")
            }
            payment::Method::CreditCard { number, .. } => {
                let last4 = number
                    .len()
                    .checked_sub(4)
                    .and_then(|at| number.get(at..))
                    .unwrap_or(number.as_str());
                (format!("CreditCard(**{last4}) paid {amount}"), "003")
            }
            payment::Method::BankTransfer { iban } => {
                let head = iban.get(..6).unwrap_or(iban.as_str());
                (format!("BankTransfer({head}...) sent {amount}"), "004")
            }
            payment::Method::Crypto { wallet, network } => {
                let head = wallet.get(..6).unwrap_or(wallet.as_str());
                (format!("Crypto({network}) {amount} from {head}..."), "005")
            }
            payment::Method::GooglePay { token } => {
                let head = token.get(..6).unwrap_or(token.as_str());
                (format!("GooglePay token({head}...) paid {amount}"), "006")
            }
        };

        let prefix = match method.kind() {
            payment::method::Kind::PayPal => "PP",
            payment::method::Kind::Stripe => "ST",
            payment::method::Kind::CreditCard => "CC",
            payment::method::Kind::BankTransfer => "BT",
            payment::method::Kind::Crypto => "CR",
            payment::method::Kind::GooglePay => "GP",
        };

        Ok(Receipt {
            txn_id: format!("{prefix}-{payer_id}-{code}").into(),
            message,
        })
    }
}

#[cfg(test)]
mod spec {
    use common::{operations::Perform, Money};

    use crate::domain::{payment, renter};
    use crate::infra::gateway::{Gateway as _, Request};

    use super::Sandbox;

    #[tokio::test]
    async fn issues_method_prefixed_txn_ids() {
        let payer_id = renter::Id::new();
        let receipt = Sandbox
            .execute(Perform(Request {
                amount: "99NZD".parse::<Money>().unwrap(),
                payer_id,
                method: payment::Method::PayPal {
                    email: "buyer@example.com".into(),
                },
            }))
            .await
            .unwrap();

        assert_eq!(
            receipt.txn_id,
            format!("PP-{payer_id}-001").into(),
        );
        assert_eq!(receipt.message, "PayPal(buyer@example.com) paid 99NZD");
    }

    #[tokio::test]
    async fn masks_card_numbers() {
        let receipt = Sandbox
            .execute(Perform(Request {
                amount: "150NZD".parse::<Money>().unwrap(),
                payer_id: renter::Id::new(),
                method: payment::Method::CreditCard {
                    number: "4111111111111111".into(),
                    cvv: "123".into(),
                    expiry: "09/26".into(),
                },
            }))
            .await
            .unwrap();

        assert_eq!(receipt.message, "CreditCard(**1111) paid 150NZD");
    }

    #[tokio::test]
    async fn tolerates_short_and_multibyte_card_numbers() {
        for number in ["123", "ab€€"] {
            let receipt = Sandbox
                .execute(Perform(Request {
                    amount: "150NZD".parse::<Money>().unwrap(),
                    payer_id: renter::Id::new(),
                    method: payment::Method::CreditCard {
                        number: number.into(),
                        cvv: "123".into(),
                        expiry: "09/26".into(),
                    },
                }))
                .await
                .unwrap();

            assert_eq!(
                receipt.message,
                format!("CreditCard(**{number}) paid 150NZD"),
            );
        }
    }
}
