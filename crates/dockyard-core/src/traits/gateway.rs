//! Remote entity gateway trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::entity::{Entity, Record};
use crate::types::EntityId;

/// Uniform list/create/update/delete access to one remote collection.
///
/// Implementations do no local validation; the remote service is the
/// authority and its rejections come back as errors.
#[async_trait]
pub trait Gateway<E: Entity>: Send + Sync {
    /// Fetch the whole collection.
    async fn list(&self) -> Result<Vec<Record<E>>>;

    /// Create a record; the server assigns the id.
    async fn create(&self, draft: &E) -> Result<Record<E>>;

    /// Replace the fields of an existing record.
    async fn update(&self, id: &EntityId, draft: &E) -> Result<Record<E>>;

    /// Remove a record.
    async fn delete(&self, id: &EntityId) -> Result<()>;
}

#[async_trait]
impl<E, G> Gateway<E> for Arc<G>
where
    E: Entity,
    G: Gateway<E> + ?Sized,
{
    async fn list(&self) -> Result<Vec<Record<E>>> {
        (**self).list().await
    }

    async fn create(&self, draft: &E) -> Result<Record<E>> {
        (**self).create(draft).await
    }

    async fn update(&self, id: &EntityId, draft: &E) -> Result<Record<E>> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        (**self).delete(id).await
    }
}
