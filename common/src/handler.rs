//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler of some operation.
pub trait Handler<Args = ()> {
    /// Type of the value this [`Handler`] resolves into on success.
    type Ok;

    /// Type of the error this [`Handler`] may fail with.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
