//! [`User`]-related [`Database`] implementations.

use common::operations::{
    All, By, Commit, Delete, Insert, Select, Transact, Update,
};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        database::{self, memory::Error},
        Database,
    },
};

use super::{Connection, Memory, NonTx, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Memory(self.begin().await))
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await;
        Ok(())
    }
}

impl<C> Database<Select<All<Vec<User>>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<All<Vec<User>>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.users().await.to_vec())
    }
}

impl<C> Database<Select<By<Option<User>, user::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let users = self.users().await;
        Ok(users
            .binary_search_by_key(&id, |u| u.id)
            .ok()
            .map(|i| users[i].clone()))
    }
}

impl<'l, C> Database<Select<By<Option<User>, &'l user::Email>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .users()
            .await
            .iter()
            .find(|u| &u.email == email)
            .cloned())
    }
}

impl<C> Database<Insert<User>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut users = self.users().await;
        match users.binary_search_by_key(&user.id, |u| u.id) {
            Ok(_) => Err(tracerr::new!(database::Error::from(
                Error::IdOccupied(user.id)
            ))),
            Err(at) => {
                users.insert(at, user);
                Ok(())
            }
        }
    }
}

impl<C> Database<Update<User>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(user): Update<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut users = self.users().await;
        let at = users
            .binary_search_by_key(&user.id, |u| u.id)
            .map_err(|_| {
                tracerr::new!(database::Error::from(Error::UserMissing(
                    user.id
                )))
            })?;
        users[at] = user;
        Ok(())
    }
}

impl<C> Database<Delete<By<User, user::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = User;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<User, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let mut users = self.users().await;
        let at = users.binary_search_by_key(&id, |u| u.id).map_err(|_| {
            tracerr::new!(database::Error::from(Error::UserMissing(id)))
        })?;
        Ok(users.remove(at))
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{
        All, By, Commit, Delete, Insert, Select, Transact, Update,
    };

    use crate::{
        domain::{
            user::{Email, Id, Name, Role},
            User,
        },
        infra::{
            database::{self, memory},
            Database as _, Memory,
        },
    };

    fn user(id: u64, name: &str, email: &str) -> User {
        User {
            id: Id::from(id),
            name: Name::new(name).unwrap(),
            email: Email::new(email).unwrap(),
            birth_date: None,
            role: Role::User,
        }
    }

    async fn ids(db: &Memory) -> Vec<u64> {
        db.execute(Select(All::<Vec<User>>::default()))
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id.into())
            .collect()
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Memory::new([
            user(1, "An", "an@example.com"),
            user(1, "Bình", "binh@example.com"),
        ])
        .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(memory::Error::IdOccupied(id))
                if *id == Id::from(1),
        ));
    }

    #[test]
    fn rejects_duplicate_emails() {
        let err = Memory::new([
            user(1, "An", "same@example.com"),
            user(2, "Bình", "same@example.com"),
        ])
        .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(memory::Error::EmailOccupied(email))
                if email.to_string() == "same@example.com",
        ));
    }

    #[tokio::test]
    async fn keeps_users_ordered_by_id() {
        let db = Memory::new([
            user(3, "Cường", "cuong@example.com"),
            user(1, "An", "an@example.com"),
        ])
        .unwrap();

        db.execute(Insert(user(2, "Bình", "binh@example.com")))
            .await
            .unwrap();

        assert_eq!(ids(&db).await, [1, 2, 3]);
        assert!(db
            .execute(Insert(user(2, "Bình", "binh@example.com")))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn selects_by_id_and_email() {
        let db = Memory::new([user(1, "An", "an@example.com")]).unwrap();

        let by_id = db
            .execute(Select(By::<Option<User>, _>::new(Id::from(1))))
            .await
            .unwrap();
        assert_eq!(by_id.map(|u| u.name.to_string()), Some("An".into()));

        let email = Email::new("an@example.com").unwrap();
        let by_email = db
            .execute(Select(By::<Option<User>, _>::new(&email)))
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(Id::from(1)));

        let missing = db
            .execute(Select(By::<Option<User>, _>::new(Id::from(9))))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn updates_and_deletes_existing_only() {
        let db = Memory::new([user(1, "An", "an@example.com")]).unwrap();

        db.execute(Update(user(1, "An Nguyễn", "an@example.com")))
            .await
            .unwrap();
        assert!(db
            .execute(Update(user(2, "Bình", "binh@example.com")))
            .await
            .is_err());

        let deleted = db
            .execute(Delete(By::<User, _>::new(Id::from(1))))
            .await
            .unwrap();
        assert_eq!(deleted.name.to_string(), "An Nguyễn");
        assert!(db
            .execute(Delete(By::<User, _>::new(Id::from(1))))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn transaction_is_visible_after_commit_only() {
        let db = Memory::new([user(1, "An", "an@example.com")]).unwrap();

        {
            let tx = db.execute(Transact).await.unwrap();
            tx.execute(Insert(user(2, "Bình", "binh@example.com")))
                .await
                .unwrap();
        }
        assert_eq!(ids(&db).await, [1]);

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(user(2, "Bình", "binh@example.com")))
            .await
            .unwrap();
        tx.execute(Commit).await.unwrap();
        drop(tx);
        assert_eq!(ids(&db).await, [1, 2]);
    }
}
