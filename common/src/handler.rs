//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous operation executed against some state.
///
/// Commands, queries and database operations are all expressed as
/// [`Handler`]s parametrized by the operation they perform.
pub trait Handler<Op = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes the provided operation.
    fn execute(
        &self,
        op: Op,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
