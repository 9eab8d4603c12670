//! Audit [`Event`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// An immutable record of a state-changing action.
#[derive(Clone, Debug, From)]
pub struct Event(domain::audit::Event);

/// An immutable record of a state-changing action.
#[graphql_object(name = "AuditEvent", context = Context)]
impl Event {
    /// Unique identifier of this `AuditEvent`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AuditEvent.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the actor who performed the action.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AuditEvent.actorId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn actor_id(&self) -> api::profile::Id {
        self.0.actor_id.into()
    }

    /// Action recorded by this `AuditEvent`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AuditEvent.action",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn action(&self) -> Action {
        self.0.action.into()
    }

    /// Kind of the affected entity.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AuditEvent.targetKind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn target_kind(&self) -> TargetKind {
        self.0.target.kind.into()
    }

    /// ID of the affected entity.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AuditEvent.targetId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn target_id(&self) -> Uuid {
        self.0.target.id
    }

    /// Human-readable summary of the action.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AuditEvent.detail",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn detail(&self) -> &str {
        &self.0.detail
    }

    /// `DateTime` when this `AuditEvent` was recorded.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AuditEvent.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of an `AuditEvent`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::audit::Id)]
#[into(domain::audit::Id)]
#[graphql(name = "AuditEventId", transparent)]
pub struct Id(Uuid);

/// Action recorded by an `AuditEvent`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "AuditAction")]
pub enum Action {
    /// A `Booking` was placed.
    CreateBooking,

    /// A `Payment` attempt was made.
    CreatePayment,

    /// A `Booking` was approved.
    ApproveBooking,

    /// A `Booking` was rejected.
    RejectBooking,

    /// A `Booking` was cancelled.
    CancelBooking,

    /// A `Booking` was completed.
    CompleteBooking,

    /// A `PricingRule` was created.
    CreateRule,

    /// A `PricingRule` was updated.
    UpdateRule,

    /// A `RenterProfile` was saved.
    SaveProfile,
}

impl From<domain::audit::Action> for Action {
    fn from(action: domain::audit::Action) -> Self {
        use domain::audit::Action as A;
        match action {
            A::CreateBooking => Self::CreateBooking,
            A::CreatePayment => Self::CreatePayment,
            A::ApproveBooking => Self::ApproveBooking,
            A::RejectBooking => Self::RejectBooking,
            A::CancelBooking => Self::CancelBooking,
            A::CompleteBooking => Self::CompleteBooking,
            A::CreateRule => Self::CreateRule,
            A::UpdateRule => Self::UpdateRule,
            A::SaveProfile => Self::SaveProfile,
        }
    }
}

/// Kind of an entity affected by an `AuditEvent`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "AuditTargetKind")]
pub enum TargetKind {
    /// A `Booking`.
    Booking,

    /// A `Payment`.
    Payment,

    /// A `Car`.
    Car,

    /// A `PricingRule`.
    Rule,

    /// A `RenterProfile`.
    Profile,
}

impl From<domain::audit::target::Kind> for TargetKind {
    fn from(kind: domain::audit::target::Kind) -> Self {
        use domain::audit::target::Kind as K;
        match kind {
            K::Booking => Self::Booking,
            K::Payment => Self::Payment,
            K::Car => Self::Car,
            K::Rule => Self::Rule,
            K::Profile => Self::Profile,
        }
    }
}

impl From<TargetKind> for domain::audit::target::Kind {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Booking => Self::Booking,
            TargetKind::Payment => Self::Payment,
            TargetKind::Car => Self::Car,
            TargetKind::Rule => Self::Rule,
            TargetKind::Profile => Self::Profile,
        }
    }
}
