//! [`Query`] collection related to the audit trail.

use common::operations::By;

use crate::domain::audit;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries audit [`audit::Event`]s recorded for a [`audit::Target`].
pub type OfTarget = DatabaseQuery<By<Vec<audit::Event>, audit::Target>>;
