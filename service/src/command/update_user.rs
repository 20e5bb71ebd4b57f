//! [`Command`] for updating a [`User`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for replacing a stored [`User`] with its new version.
#[derive(Clone, Debug, From)]
pub struct UpdateUser {
    /// New version of the [`User`], identified by its [`user::Id`].
    pub user: User,
}

impl<Db> Command<UpdateUser> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<User>, &'l user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Update<User>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(skip_all, fields(user.id = %cmd.user.id))]
    async fn execute(&self, cmd: UpdateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateUser { user } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let stored = tx
            .execute(Select(By::<Option<User>, _>::new(user.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user.id))
            .map_err(tracerr::wrap!())?;
        if stored == user {
            return Ok(user);
        }

        let holder = tx
            .execute(Select(By::<Option<User>, _>::new(&user.email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if holder.is_some_and(|u| u.id != user.id) {
            return Err(tracerr::new!(E::EmailOccupied(user.email)));
        }

        tx.execute(Update(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!("`User` updated");

        Ok(user)
    }
}

/// Error of [`UpdateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] doesn't exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`user::Email`] is already used by another [`User`].
    #[display("`{_0}` email is occupied")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] user::Email),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::Command as _,
        domain::{
            user::{Email, Id, Name, Role},
            User,
        },
        infra::Memory,
        Config, Service,
    };

    use super::{ExecutionError, UpdateUser};

    fn user(id: u64, name: &str, email: &str) -> User {
        User {
            id: Id::from(id),
            name: Name::new(name).unwrap(),
            email: Email::new(email).unwrap(),
            birth_date: None,
            role: Role::User,
        }
    }

    fn service() -> Service<Memory> {
        let db = Memory::new([
            user(1, "An", "an@example.com"),
            user(2, "Bình", "binh@example.com"),
        ])
        .unwrap();
        Service::new(Config::default(), db)
    }

    #[tokio::test]
    async fn updates_user() {
        let service = service();

        let updated = service
            .execute(UpdateUser::from(user(1, "Nguyễn Văn An", "an@example.com")))
            .await
            .unwrap();

        assert_eq!(updated.name.to_string(), "Nguyễn Văn An");
    }

    #[tokio::test]
    async fn keeps_own_email() {
        let service = service();
        let mut admin = user(2, "Bình", "binh@example.com");
        admin.role = Role::Admin;

        let updated = service.execute(UpdateUser::from(admin)).await.unwrap();

        assert_eq!(updated.role, Role::Admin);
    }

    #[tokio::test]
    async fn rejects_email_of_another_user() {
        let service = service();

        let err = service
            .execute(UpdateUser::from(user(1, "An", "binh@example.com")))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmailOccupied(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_user() {
        let service = service();

        let err = service
            .execute(UpdateUser::from(user(9, "Ghost", "ghost@example.com")))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::UserNotExists(id) if *id == Id::from(9),
        ));
    }
}
