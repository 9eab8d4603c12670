//! [`Query`] collection related to multiple [`Booking`]s.

use common::operations::By;

use crate::{domain::renter, read};
#[cfg(doc)]
use crate::{domain::Booking, Query};

use super::DatabaseQuery;

/// Queries [`read::booking::Active`] [`Booking`]s of a renter.
pub type ActiveOf =
    DatabaseQuery<By<Vec<read::booking::Active>, renter::Id>>;

/// Queries all [`Booking`]s awaiting review.
pub type Pending = DatabaseQuery<By<Vec<read::booking::Pending>, ()>>;
