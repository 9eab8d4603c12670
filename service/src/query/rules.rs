//! [`Query`] collection related to pricing [`Rule`]s.

use common::operations::By;

use crate::domain::Rule;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all pricing [`Rule`]s, newest first.
pub type All = DatabaseQuery<By<Vec<Rule>, ()>>;
