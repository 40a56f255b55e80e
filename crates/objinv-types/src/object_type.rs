use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A `domain:role` object type, e.g. `py:module`, `cpp:type` or `std:term`.
///
/// The domain is everything before the first `:`, the role everything after
/// it, so roles may themselves contain colons. Neither part may be empty and
/// the whole value must not contain whitespace, since inventory records are
/// whitespace-delimited.
///
/// `ObjectType` borrows as `str`, so tables keyed by it can be queried with a
/// plain string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectType(String);

impl ObjectType {
    /// Build an object type from its two halves.
    pub fn new(domain: &str, role: &str) -> Result<Self, TypeError> {
        Self::parse(&format!("{domain}:{role}"))
    }

    /// Parse a `domain:role` string.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidObjectType {
            value: value.to_string(),
            reason: reason.into(),
        };

        if value.chars().any(char::is_whitespace) {
            return Err(invalid("must not contain whitespace"));
        }
        let (domain, role) = value
            .split_once(':')
            .ok_or_else(|| invalid("expected `domain:role`"))?;
        if domain.is_empty() {
            return Err(invalid("domain must not be empty"));
        }
        if role.is_empty() {
            return Err(invalid("role must not be empty"));
        }
        Ok(Self(value.to_string()))
    }

    /// The domain half, e.g. `py`.
    pub fn domain(&self) -> &str {
        self.split().0
    }

    /// The role half, e.g. `module`.
    pub fn role(&self) -> &str {
        self.split().1
    }

    /// The full `domain:role` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> (&str, &str) {
        // Validated on construction.
        self.0.split_once(':').unwrap_or((&self.0, ""))
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectType({})", self.0)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectType {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectType> for String {
    fn from(ty: ObjectType) -> Self {
        ty.0
    }
}

impl Borrow<str> for ObjectType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ObjectType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
