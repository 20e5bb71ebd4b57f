//! Stable sorting of [`Record`]s by a single field.

use common::text;

use super::{Record, Sort, Value};

/// Comparison key of a [`Value`].
///
/// Keys of different kinds order as `Integer < Date < Text`.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Key {
    /// Key of a [`Value::Integer`].
    Integer(i128),

    /// Key of a [`Value::Date`].
    Date(time::Date),

    /// [`text::fold`]ed [`Value::Text`].
    Text(String),
}

impl From<Value<'_>> for Key {
    fn from(value: Value<'_>) -> Self {
        match value {
            Value::Integer(i) => Self::Integer(i),
            Value::Date(d) => Self::Date(d),
            Value::Text(t) => Self::Text(text::fold(&t)),
        }
    }
}

/// Sorts the `records` according to the provided [`Sort`], if any.
///
/// The sort is stable in both directions: records with equal keys keep
/// their relative order. Records lacking the sorted field go first in
/// ascending order and last in descending one.
pub fn sort<R>(records: &mut [&R], sort: Option<&Sort>)
where
    R: Record,
{
    let Some(Sort { field, order }) = sort else {
        return;
    };

    let mut keyed = records
        .iter()
        .map(|r| (r.field(field).map(Key::from), *r))
        .collect::<Vec<_>>();
    keyed.sort_by(|(a, _), (b, _)| order.apply(a.cmp(b)));

    for (slot, (_, record)) in records.iter_mut().zip(keyed) {
        *slot = record;
    }
}
