//! [`User`] definitions.

use std::{borrow::Cow, fmt, sync::LazyLock};

use derive_more::{AsRef, Display, From, FromStr, Into};
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};
use time::macros::format_description;

use crate::collection::{Record, Value};

/// User of the directory.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// Full [`Name`] of this [`User`].
    pub name: Name,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// [`BirthDate`] of this [`User`], if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<BirthDate>,

    /// [`Role`] of this [`User`].
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Names of the fields a [`User`] can be sorted by.
    pub const FIELDS: &'static [&'static str] =
        &["id", "name", "email", "birth_date", "role"];
}

impl Record for User {
    type Id = Id;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name.as_ref())
    }

    fn email(&self) -> Option<&str> {
        Some(self.email.as_ref())
    }

    fn field(&self, name: &str) -> Option<Value<'_>> {
        Some(match name {
            "id" => Value::Integer(self.id.0.into()),
            "name" => Value::Text(Cow::Borrowed(self.name.as_ref())),
            "email" => Value::Text(Cow::Borrowed(self.email.as_ref())),
            "birth_date" => Value::Date(self.birth_date?.0),
            "role" => Value::Text(<&str>::from(self.role).into()),
            _ => return None,
        })
    }
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(u64);

impl Id {
    /// Returns the [`Id`] following the provided greatest one.
    ///
    /// The first [`Id`] in an empty directory is `1`.
    #[must_use]
    pub fn next_after(greatest: Option<Self>) -> Self {
        Self(greatest.map_or(1, |Self(id)| id.saturating_add(1)))
    }
}

/// Name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[as_ref(str, String)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`]: trimmed, at
    /// least 2 characters long and no longer than 512 bytes.
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && name.chars().count() >= 2 && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Self::new(String::deserialize(deserializer)?)
            .ok_or_else(|| serde::de::Error::custom("invalid `Name`"))
    }
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[as_ref(str, String)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format: a local part
        /// without whitespace and `@`, followed by a dotted domain.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$")
                .expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Self::new(String::deserialize(deserializer)?)
            .ok_or_else(|| serde::de::Error::custom("invalid `Email`"))
    }
}

/// Birth date of a [`User`] in `YYYY-MM-DD` format.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct BirthDate(time::Date);

impl BirthDate {
    /// Format of a [`BirthDate`] string representation.
    const FORMAT: &'static [time::format_description::BorrowedFormatItem<
        'static,
    >] = format_description!("[year]-[month]-[day]");

    /// Creates a new [`BirthDate`] out of the provided [`time::Date`].
    #[must_use]
    pub const fn new(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<BirthDate> for time::Date {
    fn from(date: BirthDate) -> Self {
        date.0
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(Self::FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl FromStr for BirthDate {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, Self::FORMAT).map(Self)
    }
}

impl Serialize for BirthDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BirthDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Role of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    strum::Display,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
)]
pub enum Role {
    /// Administrator of the directory.
    Admin,

    /// Regular user.
    #[default]
    User,
}

#[cfg(test)]
mod spec {
    use time::macros::date;

    use crate::collection::{Record as _, Value};

    use super::{BirthDate, Email, Id, Name, Role, User};

    fn user() -> User {
        User {
            id: Id::from(7),
            name: Name::new("Trần Thị Bình").unwrap(),
            email: Email::new("binh@example.com").unwrap(),
            birth_date: Some(BirthDate::new(date!(1999 - 03 - 14))),
            role: Role::Admin,
        }
    }

    #[test]
    fn validates_name() {
        assert!(Name::new("Nguyễn Văn An").is_some());
        assert!(Name::new("").is_none());
        assert!(Name::new("A").is_none());
        assert!(Name::new("Ân").is_some());
        assert!(Name::new(" padded ").is_none());
        assert!(Name::new("x".repeat(513)).is_none());
    }

    #[test]
    fn validates_email() {
        assert!(Email::new("Sincere@april.biz").is_some());
        assert!(Email::new("a.b@sub.example.org").is_some());
        assert!(Email::new("no-at-sign.com").is_none());
        assert!(Email::new("two@@example.com").is_none());
        assert!(Email::new("nodot@example").is_none());
        assert!(Email::new("spa ce@example.com").is_none());
    }

    #[test]
    fn next_id() {
        assert_eq!(Id::next_after(None), Id::from(1));
        assert_eq!(Id::next_after(Some(Id::from(10))), Id::from(11));
    }

    #[test]
    fn exposes_fields() {
        let user = user();

        assert_eq!(user.field("id"), Some(Value::Integer(7)));
        assert_eq!(user.field("name"), Some(Value::Text("Trần Thị Bình".into())));
        assert_eq!(user.field("birth_date"), Some(Value::Date(date!(1999 - 03 - 14))));
        assert_eq!(user.field("role"), Some(Value::Text("Admin".into())));
        assert_eq!(user.field("avatar"), None);
        assert_eq!(user.display_name(), "Trần Thị Bình");
        assert_eq!(user.email(), Some("binh@example.com"));
    }

    #[test]
    fn json_round_trip() {
        let json = r#"{
            "id": 7,
            "name": "Trần Thị Bình",
            "email": "binh@example.com",
            "birth_date": "1999-03-14",
            "role": "Admin"
        }"#;

        let parsed: User = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, user());

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["birth_date"], "1999-03-14");
        assert_eq!(value["role"], "Admin");
    }

    #[test]
    fn rejects_invalid_json() {
        let json = r#"{"id": 1, "name": "", "email": "a@b.c"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());

        let json = r#"{"id": 1, "name": "An", "email": "not-an-email"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());

        let json = r#"{"id": 1, "name": "An", "email": "an@b.co"}"#;
        let user = serde_json::from_str::<User>(json).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.birth_date, None);
    }
}
