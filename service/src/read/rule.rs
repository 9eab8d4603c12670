//! Pricing [`Rule`]-related read definitions.

use crate::domain::car;
#[cfg(doc)]
use crate::domain::{Car, Rule};

/// Selector of active [`Rule`]s eligible for pricing a rent of a [`Car`].
///
/// Matches globally scoped [`Rule`]s along with the ones scoped to the
/// [`Car`] itself. Calendar and duration gating happens in
/// [`Quote::resolve()`].
///
/// [`Quote::resolve()`]: crate::domain::Quote::resolve
#[derive(Clone, Copy, Debug)]
pub struct Candidates {
    /// ID of the [`Car`] being priced.
    pub car_id: car::Id,
}
