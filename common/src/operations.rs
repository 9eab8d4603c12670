//! Abstract operations.

use std::marker::PhantomData;

use crate::Handler;

/// Operation of inserting a value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation of updating a value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Operation of selecting a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation of locking a value.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Operation of starting a value.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Operation of performing a value.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Operation of starting a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// [`Transact`]ed value.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Operation of committing a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of a `W` value by a `B` value.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Value to perform the selection by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector out of the provided value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps this [`By`] selector into its inner value.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
