//! Processing of in-memory record collections: searching, sorting and
//! paginating them for display.
//!
//! Every function here is pure: the same records and [`Query`] always
//! produce the same [`Page`].

mod filter;
mod sort;

use std::borrow::Cow;

use common::{pagination::Arguments, Order, Page};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

pub use self::{
    filter::{filter, matches},
    sort::{sort, Key},
};

/// Record of a collection being processed.
pub trait Record {
    /// Type of the stable unique identifier of this [`Record`].
    type Id;

    /// Returns the identifier of this [`Record`].
    fn id(&self) -> Self::Id;

    /// Returns the name this [`Record`] is displayed and searched by.
    ///
    /// Records with several name fields return them joined with a single
    /// space and trimmed.
    fn display_name(&self) -> Cow<'_, str>;

    /// Returns the email this [`Record`] is searched by, if any.
    fn email(&self) -> Option<&str>;

    /// Returns the [`Value`] of the field with the given `name`.
    ///
    /// [`None`] means this [`Record`] has no such field.
    fn field(&self, name: &str) -> Option<Value<'_>>;
}

/// Value of a [`Record`] field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value<'r> {
    /// Integer value, compared numerically.
    Integer(i128),

    /// Calendar date, compared chronologically.
    Date(time::Date),

    /// Text value, compared by its [`text::fold`]ed form.
    ///
    /// [`text::fold`]: common::text::fold
    Text(Cow<'r, str>),
}

/// Fields of [`Record`]s matched against the search text.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SearchScope {
    /// Only the [`Record::display_name()`].
    Name,

    /// Either the [`Record::display_name()`] or the [`Record::email()`].
    #[default]
    NameAndEmail,
}

/// Sorting of a collection by a single field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sort {
    /// Name of the field to sort by.
    pub field: String,

    /// [`Order`] to sort in.
    pub order: Order,
}

impl Sort {
    /// Creates a new [`Sort`] by the given `field` in [`Order::Ascending`].
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: Order::Ascending,
        }
    }

    /// Returns the [`Sort`] to switch to once the `requested` field is
    /// activated while this [`Sort`] is current.
    ///
    /// Activating the current field flips its [`Order`], while activating
    /// another field sorts by it in [`Order::Ascending`].
    #[must_use]
    pub fn toggled(&self, requested: &str) -> Self {
        if self.field == requested {
            Self {
                field: self.field.clone(),
                order: self.order.flipped(),
            }
        } else {
            Self::ascending(requested)
        }
    }
}

/// Returns the [`Sort`] following the `current` one once the `requested`
/// field is activated.
///
/// See [`Sort::toggled()`] for details.
#[must_use]
pub fn toggle_sort(current: Option<&Sort>, requested: &str) -> Sort {
    current.map_or_else(|| Sort::ascending(requested), |s| s.toggled(requested))
}

/// Parameters of processing a collection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query {
    /// Free text to search for. Blank text matches everything.
    pub search: String,

    /// Fields the [`Query::search`] text is matched against.
    pub scope: SearchScope,

    /// [`Sort`] to apply, if any. Input order is kept when [`None`].
    pub sort: Option<Sort>,

    /// Page to select out of the searched and sorted collection.
    pub page: Arguments,
}

impl Query {
    /// Creates a new [`Query`] selecting the given page of the unfiltered,
    /// unsorted collection.
    #[must_use]
    pub fn new(page: Arguments) -> Self {
        Self {
            search: String::new(),
            scope: SearchScope::default(),
            sort: None,
            page,
        }
    }
}

/// Processes the provided `records` according to the given [`Query`].
///
/// Records are [`filter`]ed by the search text, then [`sort`]ed, then cut
/// into the requested page. [`Page::total_count`] is the number of records
/// matched by the search, before pagination. A page past the end is empty.
#[must_use]
pub fn process<'r, R>(records: &'r [R], query: &Query) -> Page<&'r R>
where
    R: Record,
{
    let mut matched = filter(records, &query.search, query.scope);
    sort(&mut matched, query.sort.as_ref());
    Page::cut(&matched, query.page)
}
