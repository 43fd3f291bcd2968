//! Dual-scope credential store.

use std::fmt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument, warn};

use crate::error::{AuthError, Error, StorageError};

use super::scope::{ACCESS_TOKEN_KEY, FileScope, MemoryScope, StorageScope, USER_INFO_KEY};
use super::{AccessToken, UserInfo};

/// Which scopes a new session is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persistence {
    /// Session scope only; gone when the process exits.
    SessionOnly,
    /// Session scope and durable scope.
    #[default]
    Durable,
}

struct Scopes {
    session: Box<dyn StorageScope>,
    durable: Box<dyn StorageScope>,
}

impl Scopes {
    /// Session scope first, then durable. A scope that fails to read is
    /// skipped with a warning.
    fn lookup(&self, key: &str) -> Option<String> {
        [&self.session, &self.durable]
            .into_iter()
            .find_map(|scope| match scope.get(key) {
                Ok(value) => value,
                Err(e) => {
                    warn!(scope = scope.name(), error = %e, "Failed to read credential scope");
                    None
                }
            })
    }

    fn remove_all(scope: &mut dyn StorageScope) -> Result<(), StorageError> {
        let token = scope.remove(ACCESS_TOKEN_KEY);
        let info = scope.remove(USER_INFO_KEY);
        token.and(info)
    }
}

/// Owner of the bearer token and cached user info.
///
/// Both scopes sit behind one mutex, so a concurrent login and logout can
/// never leave them disagreeing. Reads prefer the session scope over the
/// durable one. Share it as `Arc<CredentialStore>` with whatever issues
/// outbound calls.
pub struct CredentialStore {
    scopes: Mutex<Scopes>,
}

impl CredentialStore {
    pub fn new(session: impl StorageScope + 'static, durable: impl StorageScope + 'static) -> Self {
        Self {
            scopes: Mutex::new(Scopes {
                session: Box::new(session),
                durable: Box::new(durable),
            }),
        }
    }

    /// Both scopes in memory. Used by tests and one-shot tools.
    pub fn in_memory() -> Self {
        Self::new(MemoryScope::new("session"), MemoryScope::new("durable"))
    }

    /// In-memory session scope over a durable JSON file.
    pub fn with_durable_file(path: impl AsRef<Path>) -> Self {
        Self::new(MemoryScope::new("session"), FileScope::new(path))
    }

    fn lock(&self) -> MutexGuard<'_, Scopes> {
        self.scopes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current bearer token, if any scope holds one.
    pub fn token(&self) -> Option<AccessToken> {
        self.lock().lookup(ACCESS_TOKEN_KEY).map(AccessToken::new)
    }

    /// The cached user info, if any scope holds a readable copy.
    pub fn user_info(&self) -> Option<UserInfo> {
        let raw = self.lock().lookup(USER_INFO_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(error = %e, "Cached user info is not valid JSON");
                None
            }
        }
    }

    /// The current bearer token, or [`AuthError::NotAuthenticated`].
    pub fn require_token(&self) -> Result<AccessToken, Error> {
        self.token().ok_or(Error::Auth(AuthError::NotAuthenticated))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store a session in both scopes.
    pub fn set_session(&self, token: &AccessToken, user_info: &UserInfo) -> Result<(), Error> {
        self.set_session_with(token, user_info, Persistence::Durable)
    }

    /// Store a session in the scopes chosen by `persistence`.
    ///
    /// Any previous session is removed from both scopes first. If a write
    /// fails, both scopes are cleared before the error is returned.
    #[instrument(skip(self, token, user_info))]
    pub fn set_session_with(
        &self,
        token: &AccessToken,
        user_info: &UserInfo,
        persistence: Persistence,
    ) -> Result<(), Error> {
        let info = serde_json::to_string(user_info).map_err(|e| StorageError::Malformed {
            scope: "session",
            message: e.to_string(),
        })?;

        let mut scopes = self.lock();
        let result = (|| -> Result<(), StorageError> {
            Scopes::remove_all(scopes.durable.as_mut())?;
            scopes.session.set(ACCESS_TOKEN_KEY, token.as_str())?;
            scopes.session.set(USER_INFO_KEY, &info)?;
            if persistence == Persistence::Durable {
                scopes.durable.set(ACCESS_TOKEN_KEY, token.as_str())?;
                scopes.durable.set(USER_INFO_KEY, &info)?;
            }
            Ok(())
        })();

        if let Err(e) = result {
            warn!(error = %e, "Failed to store session, rolling back");
            let _ = Scopes::remove_all(scopes.session.as_mut());
            let _ = Scopes::remove_all(scopes.durable.as_mut());
            return Err(e.into());
        }

        info!(?persistence, "Session stored");
        Ok(())
    }

    /// Remove token and user info from both scopes.
    ///
    /// Idempotent. Every removal is attempted even when an earlier one fails;
    /// the first failure is returned.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), Error> {
        let mut scopes = self.lock();
        let session = Scopes::remove_all(scopes.session.as_mut());
        let durable = Scopes::remove_all(scopes.durable.as_mut());
        debug!("Credential scopes cleared");
        session.and(durable).map_err(Error::from)
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scopes = self.lock();
        f.debug_struct("CredentialStore")
            .field("session", &scopes.session.name())
            .field("durable", &scopes.durable.name())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn info() -> UserInfo {
        UserInfo::new(json!({"username": "dispatch", "role": "admin"}))
    }

    /// A scope whose writes always fail.
    struct BrokenScope;

    impl StorageScope for BrokenScope {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                scope: "broken",
                message: "disk full".to_string(),
            })
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn empty_store_has_no_token() {
        let store = CredentialStore::in_memory();
        assert!(store.token().is_none());
        assert!(store.user_info().is_none());
        assert!(!store.is_authenticated());
        assert!(matches!(
            store.require_token(),
            Err(Error::Auth(AuthError::NotAuthenticated))
        ));
    }

    #[test]
    fn set_session_writes_both_scopes() {
        let mut session = MemoryScope::new("session");
        let mut durable = MemoryScope::new("durable");
        session.set("unrelated", "x").unwrap();
        durable.set("unrelated", "y").unwrap();

        let store = CredentialStore::new(session, durable);
        store
            .set_session(&AccessToken::new("tok123"), &info())
            .unwrap();

        let scopes = store.lock();
        for scope in [&scopes.session, &scopes.durable] {
            assert_eq!(
                scope.get(ACCESS_TOKEN_KEY).unwrap().as_deref(),
                Some("tok123")
            );
            assert!(scope.get(USER_INFO_KEY).unwrap().is_some());
        }
    }

    #[test]
    fn session_scope_takes_precedence() {
        let mut session = MemoryScope::new("session");
        let mut durable = MemoryScope::new("durable");
        session.set(ACCESS_TOKEN_KEY, "from-session").unwrap();
        durable.set(ACCESS_TOKEN_KEY, "from-durable").unwrap();

        let store = CredentialStore::new(session, durable);
        assert_eq!(store.token().unwrap().as_str(), "from-session");
    }

    #[test]
    fn durable_scope_is_the_fallback() {
        let mut durable = MemoryScope::new("durable");
        durable.set(ACCESS_TOKEN_KEY, "from-durable").unwrap();

        let store = CredentialStore::new(MemoryScope::new("session"), durable);
        assert_eq!(store.token().unwrap().as_str(), "from-durable");
    }

    #[test]
    fn clear_empties_both_scopes_and_is_idempotent() {
        let store = CredentialStore::in_memory();
        store.set_session(&AccessToken::new("tok"), &info()).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();

        let scopes = store.lock();
        for scope in [&scopes.session, &scopes.durable] {
            assert!(scope.get(ACCESS_TOKEN_KEY).unwrap().is_none());
            assert!(scope.get(USER_INFO_KEY).unwrap().is_none());
        }
    }

    #[test]
    fn session_only_login_skips_durable_scope() {
        let store = CredentialStore::in_memory();
        store
            .set_session(&AccessToken::new("old"), &info())
            .unwrap();
        store
            .set_session_with(&AccessToken::new("new"), &info(), Persistence::SessionOnly)
            .unwrap();

        assert_eq!(store.token().unwrap().as_str(), "new");
        let scopes = store.lock();
        assert!(scopes.durable.get(ACCESS_TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn failed_write_leaves_no_half_session() {
        let store = CredentialStore::new(MemoryScope::new("session"), BrokenScope);
        let result = store.set_session(&AccessToken::new("tok"), &info());

        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(store.token().is_none());
    }

    #[test]
    fn user_info_roundtrips() {
        let store = CredentialStore::in_memory();
        store.set_session(&AccessToken::new("tok"), &info()).unwrap();
        assert_eq!(store.user_info().unwrap().display_name(), Some("dispatch"));
    }

    #[test]
    fn durable_file_survives_a_new_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        CredentialStore::with_durable_file(&path)
            .set_session(&AccessToken::new("tok"), &info())
            .unwrap();

        let reopened = CredentialStore::with_durable_file(&path);
        assert_eq!(reopened.token().unwrap().as_str(), "tok");

        reopened.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn clear_removes_corrupt_durable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "{\"access_token\": \"tok\"").unwrap();

        let store = CredentialStore::with_durable_file(&path);
        store.clear().unwrap();
        assert!(!path.exists());
        store.clear().unwrap();

        store.set_session(&AccessToken::new("fresh"), &info()).unwrap();
        assert_eq!(
            CredentialStore::with_durable_file(&path).token().unwrap().as_str(),
            "fresh"
        );
    }

    #[test]
    fn concurrent_login_and_logout_leave_scopes_consistent() {
        let store = Arc::new(CredentialStore::in_memory());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        if i % 2 == 0 {
                            store
                                .set_session(&AccessToken::new(format!("tok{i}")), &info())
                                .unwrap();
                        } else {
                            store.clear().unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let scopes = store.lock();
        assert_eq!(
            scopes.session.get(ACCESS_TOKEN_KEY).unwrap(),
            scopes.durable.get(ACCESS_TOKEN_KEY).unwrap()
        );
    }
}
