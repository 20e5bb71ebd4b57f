//! [`Context`]-related definitions.

use std::time::{Duration, Instant};

use common::{pagination::Arguments, Page};
use service::{
    collection::{self, toggle_sort, SearchScope, Sort},
    command::{self, Command as _},
    domain::{user, User},
    query,
};

use crate::{define_error, AsError, Error, Service};

/// State of the users table shown to a single operator.
///
/// Holds the current search, sort and page of the listing together with
/// the in-place editing state and the last posted [`Notice`].
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Current search text.
    search: String,

    /// Fields the search text is matched against.
    scope: SearchScope,

    /// Current [`Sort`], if any.
    sort: Option<Sort>,

    /// Currently selected page.
    page: Arguments,

    /// Current [`EditState`].
    edit: EditState,

    /// Last posted [`Notice`].
    notice: Option<Notice>,

    /// Time a posted [`Notice`] stays visible.
    notice_timeout: Duration,
}

impl Context {
    /// Creates a new [`Context`] listing the first page of all the users.
    #[must_use]
    pub fn new(service: Service, notice_timeout: Duration) -> Self {
        let collection::Query {
            search,
            scope,
            sort,
            page,
        } = service.config().query();
        Self {
            service,
            search,
            scope,
            sort,
            page,
            edit: EditState::Viewing,
            notice: None,
            notice_timeout,
        }
    }

    /// Returns the current [`Sort`], if any.
    #[must_use]
    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Returns the currently selected page.
    #[must_use]
    pub fn arguments(&self) -> Arguments {
        self.page
    }

    /// Returns the current [`EditState`].
    #[must_use]
    pub fn edit_state(&self) -> EditState {
        self.edit
    }

    /// Returns the last posted [`Notice`] unless it has expired already.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        let now = Instant::now();
        self.notice.as_ref().filter(|n| !n.is_expired_at(now))
    }

    /// Hides the last posted [`Notice`] before it expires.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Sets the search text, returning to the first page.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.rewind();
    }

    /// Sets the fields the search text is matched against, returning to the
    /// first page.
    pub fn set_scope(&mut self, scope: SearchScope) {
        self.scope = scope;
        self.rewind();
    }

    /// Activates sorting by the given `field`, returning to the first page.
    ///
    /// Activating the currently sorted field flips its order. Sorting by a
    /// field [`User`]s don't have keeps their order and posts a warning
    /// [`Notice`].
    pub fn set_sort(&mut self, field: &str) -> &Sort {
        if !User::FIELDS.contains(&field) {
            self.post(
                NoticeLevel::Warning,
                format!("`User`s cannot be sorted by `{field}`"),
            );
        }
        let next = toggle_sort(self.sort.as_ref(), field);
        self.rewind();
        self.sort.insert(next)
    }

    /// Replaces the current [`Sort`], returning to the first page.
    pub fn sort_by(&mut self, sort: Option<Sort>) {
        self.sort = sort;
        self.rewind();
    }

    /// Selects the page with the given zero-based `index`.
    ///
    /// # Errors
    ///
    /// With `INVALID_PAGINATION` code if the `index` is negative.
    pub fn set_page<I: TryInto<usize>>(
        &mut self,
        index: I,
    ) -> Result<(), Error> {
        self.page = Arguments::new(index, self.page.size())
            .map_err(AsError::into_error)?;
        Ok(())
    }

    /// Sets the number of rows on a page, returning to the first page.
    ///
    /// # Errors
    ///
    /// With `INVALID_PAGINATION` code if the `size` is not positive.
    pub fn set_rows_per_page<S: TryInto<usize>>(
        &mut self,
        size: S,
    ) -> Result<(), Error> {
        self.page = Arguments::new(0, size).map_err(AsError::into_error)?;
        Ok(())
    }

    /// Returns the [`collection::Query`] describing the current listing.
    #[must_use]
    pub fn query(&self) -> collection::Query {
        collection::Query {
            search: self.search.clone(),
            scope: self.scope,
            sort: self.sort.clone(),
            page: self.page,
        }
    }

    /// Lists the currently selected [`Page`] of [`User`]s.
    ///
    /// # Errors
    ///
    /// If the [`Service`] fails to list the [`User`]s.
    pub async fn page(&self) -> Result<Page<User>, Error> {
        self.service
            .execute(query::users::List(self.query()))
            .await
            .map_err(AsError::into_error)
    }

    /// Creates a new [`User`], returning to the first page.
    ///
    /// # Errors
    ///
    /// With `EMAIL_OCCUPIED` code if the email is used by another [`User`].
    pub async fn add_user(
        &mut self,
        cmd: command::CreateUser,
    ) -> Result<User, Error> {
        let res = self.service.execute(cmd).await;
        let user = self.report(res, "User added")?;
        self.rewind();
        Ok(user)
    }

    /// Deletes the [`User`] with the given [`user::Id`], returning to the
    /// first page.
    ///
    /// Stops editing the deleted [`User`], if any.
    ///
    /// # Errors
    ///
    /// With `USER_NOT_EXISTS` code if there is no such [`User`].
    pub async fn delete_user(&mut self, id: user::Id) -> Result<User, Error> {
        let res = self.service.execute(command::DeleteUser::from(id)).await;
        let user = self.report(res, "User deleted")?;
        if self.edit == EditState::Editing(id) {
            self.edit = EditState::Viewing;
        }
        self.rewind();
        Ok(user)
    }

    /// Starts editing the [`User`] with the given [`user::Id`], returning
    /// its current version.
    ///
    /// # Errors
    ///
    /// - With `INVALID_EDIT_TRANSITION` code if another [`User`] is being
    ///   edited already.
    /// - With `USER_NOT_EXISTS` code if there is no such [`User`].
    pub async fn begin_edit(&mut self, id: user::Id) -> Result<User, Error> {
        if self.edit != EditState::Viewing {
            return Err(EditError::InvalidTransition.into());
        }

        let user = self
            .service
            .execute(query::user::ById::by(id))
            .await
            .map_err(AsError::into_error)?
            .ok_or(EditError::UserNotExists)?;

        self.edit = EditState::Editing(id);
        Ok(user)
    }

    /// Stops editing without saving any changes.
    ///
    /// # Errors
    ///
    /// With `INVALID_EDIT_TRANSITION` code if nothing is being edited.
    pub fn cancel_edit(&mut self) -> Result<(), Error> {
        match self.edit {
            EditState::Editing(_) => {
                self.edit = EditState::Viewing;
                Ok(())
            }
            EditState::Viewing => Err(EditError::InvalidTransition.into()),
        }
    }

    /// Saves the new version of the edited [`User`] and stops editing it,
    /// even if saving fails.
    ///
    /// # Errors
    ///
    /// - With `INVALID_EDIT_TRANSITION` code if the provided [`User`] is not
    ///   the one being edited.
    /// - With `EMAIL_OCCUPIED` code if the email is used by another
    ///   [`User`].
    pub async fn save_edit(&mut self, user: User) -> Result<User, Error> {
        if self.edit != EditState::Editing(user.id) {
            return Err(EditError::InvalidTransition.into());
        }
        self.edit = EditState::Viewing;

        let res = self.service.execute(command::UpdateUser::from(user)).await;
        self.report(res, "User updated")
    }

    /// Returns to the first page.
    fn rewind(&mut self) {
        self.page = self.page.with_index(0);
    }

    /// Posts a [`Notice`] about the outcome of a [`Command`] execution.
    ///
    /// [`Command`]: service::Command
    fn report<T, E>(
        &mut self,
        res: Result<T, E>,
        success: &str,
    ) -> Result<T, Error>
    where
        E: AsError + std::fmt::Display,
    {
        let (level, message, res) = match res {
            Ok(ok) => (NoticeLevel::Success, success.to_owned(), Ok(ok)),
            Err(e) => {
                let err = e.into_error();
                tracing::warn!("{err}");
                (NoticeLevel::Error, err.message.clone(), Err(err))
            }
        };
        self.post(level, message);
        res
    }

    /// Posts a new [`Notice`] replacing the previous one.
    fn post(&mut self, level: NoticeLevel, message: String) {
        self.notice = Some(Notice {
            level,
            message,
            expires_at: Instant::now().checked_add(self.notice_timeout),
        });
    }
}

/// State of editing [`User`]s in place.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EditState {
    /// Nothing is being edited.
    #[default]
    Viewing,

    /// [`User`] with the [`user::Id`] is being edited.
    Editing(user::Id),
}

/// Short-living message about the outcome of an operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    /// [`NoticeLevel`] of this [`Notice`].
    pub level: NoticeLevel,

    /// Message of this [`Notice`].
    pub message: String,

    /// Moment this [`Notice`] stops being shown.
    ///
    /// [`None`] if the timeout is too long to be represented, so this
    /// [`Notice`] never expires.
    pub expires_at: Option<Instant>,
}

impl Notice {
    /// Indicates whether this [`Notice`] is expired at the given moment.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoticeLevel {
    /// Operation succeeded.
    Success,

    /// Operation succeeded partially or needs attention.
    Warning,

    /// Operation failed.
    Error,
}

define_error! {
    enum EditError {
        #[code = "INVALID_EDIT_TRANSITION"]
        #[message = "Editing cannot be started or finished in the current \
                     state"]
        InvalidTransition,

        #[code = "USER_NOT_EXISTS"]
        #[message = "`User` does not exist"]
        UserNotExists,
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[message = "`UserEmail` is occupied by another `User`"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
        }
    }
}

impl AsError for command::update_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[message = "`UserEmail` is occupied by another `User`"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UserNotExists(_) => Some(EditError::UserNotExists.into()),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
        }
    }
}

impl AsError for command::delete_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UserNotExists(_) => Some(EditError::UserNotExists.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use service::{
        command::CreateUser,
        domain::{
            user::{Email, Id, Name, Role},
            User,
        },
        infra::Memory,
    };

    use crate::Service;

    use super::{Context, EditState, NoticeLevel};

    fn user(id: u64, name: &str, email: &str) -> User {
        User {
            id: Id::from(id),
            name: Name::new(name).unwrap(),
            email: Email::new(email).unwrap(),
            birth_date: None,
            role: Role::User,
        }
    }

    fn context() -> Context {
        let db = Memory::new([
            user(1, "Nguyễn Văn An", "an@example.com"),
            user(2, "Trần Thị Bình", "binh@example.com"),
            user(3, "Lê Hoàng Cường", "cuong@example.com"),
        ])
        .unwrap();
        let service = Service::new(service::Config::default(), db);
        Context::new(service, Duration::from_secs(3))
    }

    fn names(users: &[User]) -> Vec<String> {
        users.iter().map(|u| u.name.to_string()).collect()
    }

    #[tokio::test]
    async fn lists_searched_page() {
        let mut ctx = context();
        ctx.set_search("binh");

        let page = ctx.page().await.unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(names(&page.items), ["Trần Thị Bình"]);
    }

    #[tokio::test]
    async fn sorts_and_paginates() {
        let mut ctx = context();
        ctx.set_rows_per_page(2).unwrap();
        _ = ctx.set_sort("name");

        let page = ctx.page().await.unwrap();

        assert_eq!(page.total_count, 3);
        assert_eq!(names(&page.items), ["Lê Hoàng Cường", "Nguyễn Văn An"]);
    }

    #[tokio::test]
    async fn lists_nothing_past_the_end() {
        let mut ctx = context();
        ctx.set_rows_per_page(10).unwrap();
        ctx.set_page(5).unwrap();

        let page = ctx.page().await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
    }

    #[test]
    fn resets_page_on_search_and_sort() {
        let mut ctx = context();

        ctx.set_page(2).unwrap();
        ctx.set_search("an");
        assert_eq!(ctx.arguments().index(), 0);

        ctx.set_page(2).unwrap();
        let sort = ctx.set_sort("name").clone();
        assert_eq!(ctx.arguments().index(), 0);
        assert_eq!(sort.order, common::Order::Ascending);

        let sort = ctx.set_sort("name").clone();
        assert_eq!(sort.order, common::Order::Descending);
        let sort = ctx.set_sort("email").clone();
        assert_eq!(sort.field, "email");
        assert_eq!(sort.order, common::Order::Ascending);
        assert!(ctx.notice().is_none());
    }

    #[test]
    fn warns_about_unknown_sort_field() {
        let mut ctx = context();

        _ = ctx.set_sort("salary");

        assert_eq!(ctx.notice().map(|n| n.level), Some(NoticeLevel::Warning));
    }

    #[test]
    fn rejects_invalid_pagination() {
        let mut ctx = context();

        assert_eq!(ctx.set_page(-1).unwrap_err().code, "INVALID_PAGINATION");
        assert_eq!(
            ctx.set_rows_per_page(0).unwrap_err().code,
            "INVALID_PAGINATION",
        );
    }

    #[tokio::test]
    async fn adds_user_and_posts_notice() {
        let mut ctx = context();
        ctx.set_page(1).unwrap();

        let added = ctx
            .add_user(CreateUser {
                name: Name::new("Đặng Thị Hoa").unwrap(),
                email: Email::new("hoa@example.com").unwrap(),
                birth_date: None,
                role: Role::User,
            })
            .await
            .unwrap();

        assert_eq!(added.id, Id::from(4));
        assert_eq!(ctx.arguments().index(), 0);
        assert_eq!(ctx.notice().map(|n| n.level), Some(NoticeLevel::Success));
    }

    #[tokio::test]
    async fn reports_occupied_email() {
        let mut ctx = context();

        let err = ctx
            .add_user(CreateUser {
                name: Name::new("An").unwrap(),
                email: Email::new("an@example.com").unwrap(),
                birth_date: None,
                role: Role::User,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, "EMAIL_OCCUPIED");
        assert_eq!(ctx.notice().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[tokio::test]
    async fn deletes_user() {
        let mut ctx = context();

        _ = ctx.delete_user(Id::from(2)).await.unwrap();
        let err = ctx.delete_user(Id::from(2)).await.unwrap_err();

        assert_eq!(err.code, "USER_NOT_EXISTS");
        assert_eq!(ctx.page().await.unwrap().total_count, 2);
    }

    #[tokio::test]
    async fn edits_user_in_place() {
        let mut ctx = context();

        let mut edited = ctx.begin_edit(Id::from(1)).await.unwrap();
        assert_eq!(ctx.edit_state(), EditState::Editing(Id::from(1)));

        edited.name = Name::new("Nguyễn An").unwrap();
        let saved = ctx.save_edit(edited).await.unwrap();

        assert_eq!(saved.name.to_string(), "Nguyễn An");
        assert_eq!(ctx.edit_state(), EditState::Viewing);
    }

    #[tokio::test]
    async fn leaves_editing_when_saving_fails() {
        let mut ctx = context();

        let mut edited = ctx.begin_edit(Id::from(1)).await.unwrap();
        edited.email = Email::new("binh@example.com").unwrap();
        let err = ctx.save_edit(edited).await.unwrap_err();

        assert_eq!(err.code, "EMAIL_OCCUPIED");
        assert_eq!(ctx.edit_state(), EditState::Viewing);
    }

    #[tokio::test]
    async fn rejects_invalid_edit_transitions() {
        let mut ctx = context();

        assert_eq!(
            ctx.cancel_edit().unwrap_err().code,
            "INVALID_EDIT_TRANSITION",
        );
        assert_eq!(
            ctx.save_edit(user(1, "An", "an@example.com"))
                .await
                .unwrap_err()
                .code,
            "INVALID_EDIT_TRANSITION",
        );
        assert_eq!(
            ctx.begin_edit(Id::from(9)).await.unwrap_err().code,
            "USER_NOT_EXISTS",
        );

        _ = ctx.begin_edit(Id::from(1)).await.unwrap();
        assert_eq!(
            ctx.begin_edit(Id::from(2)).await.unwrap_err().code,
            "INVALID_EDIT_TRANSITION",
        );
        assert_eq!(
            ctx.save_edit(user(2, "Bình", "binh@example.com"))
                .await
                .unwrap_err()
                .code,
            "INVALID_EDIT_TRANSITION",
        );

        ctx.cancel_edit().unwrap();
        assert_eq!(ctx.edit_state(), EditState::Viewing);
    }

    #[tokio::test]
    async fn hides_expired_notice() {
        let db = Memory::default();
        let service = Service::new(service::Config::default(), db);
        let mut ctx = Context::new(service, Duration::ZERO);

        _ = ctx.delete_user(Id::from(1)).await.unwrap_err();

        assert!(ctx.notice().is_none());
    }

    #[tokio::test]
    async fn keeps_notice_with_unrepresentable_timeout() {
        let mut ctx = context();
        ctx.notice_timeout = Duration::MAX;

        _ = ctx.delete_user(Id::from(1)).await.unwrap();

        let notice = ctx.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert!(notice.expires_at.is_none());
    }

    #[tokio::test]
    async fn dismisses_notice() {
        let mut ctx = context();
        _ = ctx.delete_user(Id::from(1)).await.unwrap();
        assert!(ctx.notice().is_some());

        ctx.dismiss_notice();

        assert!(ctx.notice().is_none());
    }
}
