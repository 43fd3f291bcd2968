//! Cached user profile.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile returned by the login endpoint and cached beside the token.
///
/// The shape belongs to the remote service, so it is kept as raw JSON with a
/// few lookups for the fields the client displays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserInfo(Value);

impl UserInfo {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// First of `username`, `name`, `email` that is a string.
    pub fn display_name(&self) -> Option<&str> {
        ["username", "name", "email"]
            .into_iter()
            .find_map(|key| self.0.get(key).and_then(Value::as_str))
    }

    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_name_prefers_username() {
        let info = UserInfo::new(json!({"email": "a@b.c", "username": "dispatch"}));
        assert_eq!(info.display_name(), Some("dispatch"));

        let info = UserInfo::new(json!({"email": "a@b.c"}));
        assert_eq!(info.display_name(), Some("a@b.c"));

        assert_eq!(UserInfo::default().display_name(), None);
    }
}
