//! [`Query`] collection related to a [`renter::Profile`].

use common::operations::By;

use crate::domain::renter;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`renter::Profile`] by its owning [`renter::Id`].
pub type ById = DatabaseQuery<By<Option<renter::Profile>, renter::Id>>;
