//! [`Query`] collection related to [`Payment`]s.

use common::operations::By;

use crate::domain::{booking, Payment};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`Payment`]s charged for a [`Booking`].
///
/// [`Booking`]: crate::domain::Booking
pub type OfBooking = DatabaseQuery<By<Vec<Payment>, booking::Id>>;
