//! [`Query`] collection related to the multiple [`User`]s.

use common::{
    operations::{All, Select},
    Page,
};
use derive_more::From;
use tracerr::Traced;

use crate::{
    collection,
    domain::User,
    infra::{database, Database},
    Service,
};

use super::Query;

/// Queries a [`Page`] of [`User`]s searched and sorted according to the
/// [`collection::Query`].
#[derive(Clone, Debug, From)]
pub struct List(pub collection::Query);

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<All<Vec<User>>>,
        Ok = Vec<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Page<User>;
    type Err = Traced<database::Error>;

    #[tracing::instrument(
        skip_all,
        fields(
            search = %query.search,
            page.index = query.page.index(),
            page.size = query.page.size().get(),
        ),
    )]
    async fn execute(
        &self,
        List(query): List,
    ) -> Result<Self::Ok, Self::Err> {
        let users = self
            .database()
            .execute(Select(All::default()))
            .await
            .map_err(tracerr::wrap!())?;

        let page = collection::process(&users, &query).map(User::clone);
        tracing::debug!(
            total_count = page.total_count,
            items = page.items.len(),
            "`User`s listed",
        );

        Ok(page)
    }
}
