//! [`Memory`] clients.

use std::sync::Arc;

use tokio::sync::{
    MappedMutexGuard, Mutex, MutexGuard, OwnedRwLockWriteGuard, RwLock,
    RwLockWriteGuard,
};

use crate::domain::User;
#[cfg(doc)]
use crate::infra::Memory;

use super::Connection;

/// Non-transactional [`Memory`] client applying changes immediately.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Stored [`User`]s ordered by their IDs.
    users: Arc<RwLock<Vec<User>>>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client holding the provided [`User`]s, which
    /// must be ordered by their IDs.
    pub(super) fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Starts a new [`Tx`] over the [`User`]s of this [`NonTx`] client.
    ///
    /// Other clients wait until the returned [`Tx`] is dropped.
    pub async fn begin(&self) -> Tx {
        let committed = Arc::clone(&self.users).write_owned().await;
        Tx {
            inner: Mutex::new(Inner {
                staged: committed.to_vec(),
                committed,
            }),
        }
    }
}

impl Connection for NonTx {
    type Guard<'c> = RwLockWriteGuard<'c, Vec<User>>;

    async fn users(&self) -> Self::Guard<'_> {
        self.users.write().await
    }
}

/// Transactional [`Memory`] client.
///
/// Changes are staged until [`Tx::commit()`]. Dropping a [`Tx`] without
/// committing discards them.
#[derive(Debug)]
pub struct Tx {
    /// Inner state of this [`Tx`].
    inner: Mutex<Inner>,
}

/// Inner state of a [`Tx`].
#[derive(Debug)]
struct Inner {
    /// Exclusively locked [`User`]s as they were before this [`Tx`].
    committed: OwnedRwLockWriteGuard<Vec<User>>,

    /// [`User`]s with the changes of this [`Tx`] applied.
    staged: Vec<User>,
}

impl Tx {
    /// Makes the staged changes of this [`Tx`] visible to other clients.
    pub async fn commit(&self) {
        let mut inner = self.inner.lock().await;
        let Inner { committed, staged } = &mut *inner;
        **committed = staged.clone();
    }
}

impl Connection for Tx {
    type Guard<'c> = MappedMutexGuard<'c, Vec<User>>;

    async fn users(&self) -> Self::Guard<'_> {
        MutexGuard::map(self.inner.lock().await, |inner| &mut inner.staged)
    }
}
