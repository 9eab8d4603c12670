//! GraphQL API definitions.

pub mod audit;
pub mod booking;
pub mod car;
mod mutation;
pub mod payment;
pub mod profile;
mod query;
pub mod quote;
pub mod rule;
pub mod scalar;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    booking::Booking, car::Car, mutation::Mutation, payment::Payment,
    profile::Profile, query::Query, quote::Quote, rule::Rule,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;
