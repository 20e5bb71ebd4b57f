//! Abstractions for offset pagination.

use std::{cmp, num::NonZeroUsize, ops::Range};

use derive_more::{Display, Error};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

/// Pagination arguments selecting a single page out of a collection.
///
/// Can only be constructed with a non-negative page index and a positive
/// page size.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Arguments {
    /// Zero-based index of the requested page.
    index: usize,

    /// Maximum number of items on a page.
    size: NonZeroUsize,
}

impl Arguments {
    /// Creates new [`Arguments`] out of the raw page `index` and page `size`.
    ///
    /// # Errors
    ///
    /// Errors if the `index` is negative or the `size` is not positive.
    pub fn new<Idx, Size>(index: Idx, size: Size) -> Result<Self, ArgumentsError>
    where
        Idx: TryInto<usize>,
        Size: TryInto<usize>,
    {
        let index = index.try_into().map_err(|_| ArgumentsError::Index)?;
        let size = size
            .try_into()
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(ArgumentsError::Size)?;
        Ok(Self { index, size })
    }

    /// Creates [`Arguments`] selecting the first page of the given `size`.
    #[must_use]
    pub const fn first(size: NonZeroUsize) -> Self {
        Self { index: 0, size }
    }

    /// Returns zero-based index of the selected page.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(&self) -> NonZeroUsize {
        self.size
    }

    /// Returns these [`Arguments`] pointing to the page with the given
    /// `index`.
    #[must_use]
    pub const fn with_index(self, index: usize) -> Self {
        Self {
            index,
            size: self.size,
        }
    }

    /// Returns the number of items preceding the selected page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.index.saturating_mul(self.size.get())
    }

    /// Returns the range of the selected page inside a collection of `len`
    /// items.
    ///
    /// The range is clamped to the collection bounds, so a page past the end
    /// results in an empty range.
    #[must_use]
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = cmp::min(self.offset(), len);
        let end = cmp::min(start.saturating_add(self.size.get()), len);
        start..end
    }

    /// Returns the selected page of the provided `items`.
    #[must_use]
    pub fn slice<'i, T>(&self, items: &'i [T]) -> &'i [T] {
        &items[self.range(items.len())]
    }
}

/// Error of constructing pagination [`Arguments`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ArgumentsError {
    /// Page index is negative or doesn't fit into `usize`.
    #[display("page index must be a non-negative integer")]
    Index,

    /// Page size is zero, negative or doesn't fit into `usize`.
    #[display("page size must be a positive integer")]
    Size,
}

/// A page of items together with the total count of the paginated
/// collection.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// Number of items in the whole collection this [`Page`] is cut from.
    pub total_count: usize,

    /// [`Arguments`] this [`Page`] was selected by.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub arguments: Arguments,
}

impl<T> Page<T> {
    /// Cuts a [`Page`] out of the provided `items` according to the given
    /// [`Arguments`].
    #[must_use]
    pub fn cut(items: &[T], arguments: Arguments) -> Self
    where
        T: Clone,
    {
        Self {
            items: arguments.slice(items).to_vec(),
            total_count: items.len(),
            arguments,
        }
    }

    /// Returns the number of pages in the whole collection.
    ///
    /// An empty collection still has a single (empty) page.
    #[must_use]
    pub fn page_count(&self) -> usize {
        cmp::max(1, self.total_count.div_ceil(self.arguments.size.get()))
    }

    /// Indicates whether there are items after this [`Page`].
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.arguments
            .offset()
            .saturating_add(self.arguments.size.get())
            < self.total_count
    }

    /// Indicates whether there are pages before this [`Page`].
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.arguments.index > 0
    }

    /// Maps items of this [`Page`] with the provided function.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            arguments: self.arguments,
        }
    }
}

/// Sorting order.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Order {
    /// Ascending order.
    #[default]
    #[display("asc")]
    #[strum(serialize = "asc")]
    #[cfg_attr(feature = "serde", serde(rename = "asc"))]
    Ascending,

    /// Descending order.
    #[display("desc")]
    #[strum(serialize = "desc")]
    #[cfg_attr(feature = "serde", serde(rename = "desc"))]
    Descending,
}

impl Order {
    /// Returns the opposite [`Order`].
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Applies this [`Order`] to the [`cmp::Ordering`] of two ascending
    /// values.
    #[must_use]
    pub const fn apply(self, ordering: cmp::Ordering) -> cmp::Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}
