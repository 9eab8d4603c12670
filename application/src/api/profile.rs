//! [`Profile`]-related definitions.

use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// Profile of a renter.
#[derive(Clone, Debug, From)]
pub struct Profile(domain::renter::Profile);

/// Profile of a renter.
#[graphql_object(name = "RenterProfile", context = Context)]
impl Profile {
    /// ID of the renter this `RenterProfile` belongs to.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RenterProfile.renterId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn renter_id(&self) -> Id {
        self.0.renter_id.into()
    }

    /// First name of the renter.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RenterProfile.firstName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn first_name(&self) -> Name {
        self.0.first_name.clone().into()
    }

    /// Last name of the renter.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RenterProfile.lastName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn last_name(&self) -> Name {
        self.0.last_name.clone().into()
    }

    /// Contact phone number of the renter.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RenterProfile.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn phone(&self) -> Phone {
        self.0.phone.clone().into()
    }

    /// Identity document number of the renter.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RenterProfile.idDocument",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id_document(&self) -> IdDocument {
        self.0.id_document.clone().into()
    }
}

/// Unique identifier of a renter.
#[derive(Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq)]
#[from(domain::renter::Id)]
#[into(domain::renter::Id)]
#[graphql(name = "RenterId", transparent)]
pub struct Id(Uuid);

/// Name of a renter.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RenterName",
    with = scalar::Via::<domain::renter::Name>,
)]
pub struct Name(domain::renter::Name);

/// Contact phone number of a renter.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RenterPhone",
    with = scalar::Via::<domain::renter::Phone>,
)]
pub struct Phone(domain::renter::Phone);

/// Identity document number of a renter.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RenterIdDocument",
    with = scalar::Via::<domain::renter::IdDocument>,
)]
pub struct IdDocument(domain::renter::IdDocument);
