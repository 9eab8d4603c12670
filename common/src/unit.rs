//! Marker types.

/// Marker type denoting the creation of an entity.
#[derive(Clone, Copy, Debug)]
pub struct Creation;
