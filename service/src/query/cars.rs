//! [`Query`] collection related to multiple [`Car`]s.

use common::operations::By;

use crate::{domain::Car, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Car`]s free to rent over a [`Period`].
///
/// [`Period`]: common::Period
pub type AvailableFor = DatabaseQuery<By<Vec<Car>, read::car::AvailableFor>>;
