//! In-memory [`Database`] implementation.

pub mod client;
mod impls;

use std::{collections::HashSet, future::Future, ops::DerefMut};

use derive_more::{Deref, Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::database,
};
#[cfg(doc)]
use crate::infra::Database;

pub use self::client::{NonTx, Tx};

/// In-memory [`Database`] client keeping [`User`]s ordered by their IDs.
#[derive(Clone, Debug, Default, Deref)]
pub struct Memory<C = NonTx>(C);

impl Memory {
    /// Creates a new [`Memory`] client holding the provided [`User`]s.
    ///
    /// # Errors
    ///
    /// If several [`User`]s share the same [`user::Id`] or [`user::Email`].
    pub fn new(
        users: impl IntoIterator<Item = User>,
    ) -> Result<Self, Traced<database::Error>> {
        let mut users = users.into_iter().collect::<Vec<_>>();
        users.sort_by_key(|u| u.id);
        if let Some(dup) = users.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(tracerr::new!(database::Error::from(
                Error::IdOccupied(dup[0].id)
            )));
        }
        let occupied = {
            let mut emails = HashSet::with_capacity(users.len());
            users
                .iter()
                .find(|u| !emails.insert(AsRef::<str>::as_ref(&u.email)))
                .map(|u| u.email.clone())
        };
        if let Some(email) = occupied {
            return Err(tracerr::new!(database::Error::from(
                Error::EmailOccupied(email)
            )));
        }
        Ok(Self(NonTx::new(users)))
    }
}

/// Storage of [`User`]s behind a [`Memory`] client.
pub trait Connection {
    /// Guard providing exclusive access to the stored [`User`]s.
    type Guard<'c>: DerefMut<Target = Vec<User>>
    where
        Self: 'c;

    /// Acquires exclusive access to the stored [`User`]s.
    fn users(&self) -> impl Future<Output = Self::Guard<'_>>;
}

/// [`Memory`] database error.
#[derive(Clone, Debug, Display, StdError)]
pub enum Error {
    /// [`User`] with the same [`user::Id`] is stored already.
    #[display("`User(id: {_0})` already exists")]
    IdOccupied(#[error(not(source))] user::Id),

    /// [`User`] with the same [`user::Email`] is stored already.
    #[display("`{_0}` email is occupied")]
    EmailOccupied(#[error(not(source))] user::Email),

    /// No [`User`] is stored with the [`user::Id`].
    #[display("`User(id: {_0})` does not exist")]
    UserMissing(#[error(not(source))] user::Id),
}
