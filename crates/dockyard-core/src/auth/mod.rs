//! Authentication primitives.
//!
//! The [`CredentialStore`] is the single owner of the session: a bearer
//! token plus cached user info, kept in a session scope and a durable scope.

mod credentials;
mod scope;
mod store;
mod tokens;
mod user_info;

pub use credentials::Credentials;
pub use scope::{ACCESS_TOKEN_KEY, FileScope, MemoryScope, StorageScope, USER_INFO_KEY};
pub use store::{CredentialStore, Persistence};
pub use tokens::AccessToken;
pub use user_info::UserInfo;
