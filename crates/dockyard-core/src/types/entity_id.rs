//! Opaque record identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Identifier assigned to a record by the remote service.
///
/// Treated as opaque. Servers that hand out numeric ids are accepted on the
/// wire; the id is always carried and re-serialised as a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an id, rejecting empty strings, path separators and the
    /// relative segments `.` and `..`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        let reason = if s.trim().is_empty() {
            Some("must not be empty")
        } else if s.contains('/') {
            Some("must not contain '/'")
        } else if s == "." || s == ".." {
            Some("must not be a relative path segment")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidInputError::EntityId {
                value: s,
                reason: reason.to_string(),
            }
            .into()),
            None => Ok(Self(s)),
        }
    }

    /// An id from a server-style sequence number. Always valid.
    pub fn from_number(n: u64) -> Self {
        Self(n.to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = match WireId::deserialize(deserializer)? {
            WireId::Text(s) => s,
            WireId::Unsigned(n) => return Ok(EntityId::from_number(n)),
            WireId::Signed(n) => n.to_string(),
        };
        EntityId::new(raw).map_err(serde::de::Error::custom)
    }
}
