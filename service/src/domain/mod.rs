//! Domain definitions.

pub mod audit;
pub mod booking;
pub mod car;
pub mod payment;
pub mod quote;
pub mod renter;
pub mod rule;

pub use self::{
    booking::Booking, car::Car, payment::Payment, quote::Quote, rule::Rule,
};
