//! REST-backed gateway.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, instrument};

use dockyard_core::{Entity, EntityId, Gateway, Record, Result};

use crate::client::ApiClient;

/// Gateway over the REST collection `E::COLLECTION`.
///
/// | operation | request                         |
/// |-----------|---------------------------------|
/// | list      | `GET /{collection}`             |
/// | create    | `POST /{collection}`            |
/// | update    | `PUT /{collection}/{id}`        |
/// | delete    | `DELETE /{collection}/{id}`     |
pub struct RestGateway<E> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RestGateway<E> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for RestGateway<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for RestGateway<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestGateway")
            .field("collection", &E::COLLECTION)
            .field("api", self.client.api())
            .finish()
    }
}

#[async_trait]
impl<E: Entity> Gateway<E> for RestGateway<E> {
    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    async fn list(&self) -> Result<Vec<Record<E>>> {
        debug!("Listing records");
        self.client
            .request_json::<(), _>(Method::GET, E::COLLECTION, None)
            .await
    }

    #[instrument(skip(self, draft), fields(collection = E::COLLECTION))]
    async fn create(&self, draft: &E) -> Result<Record<E>> {
        debug!("Creating record");
        self.client
            .request_json(Method::POST, E::COLLECTION, Some(draft))
            .await
    }

    #[instrument(skip(self, draft), fields(collection = E::COLLECTION, %id))]
    async fn update(&self, id: &EntityId, draft: &E) -> Result<Record<E>> {
        debug!("Updating record");
        self.client
            .member_json(Method::PUT, E::COLLECTION, id, Some(draft))
            .await
    }

    #[instrument(skip(self), fields(collection = E::COLLECTION, %id))]
    async fn delete(&self, id: &EntityId) -> Result<()> {
        debug!("Deleting record");
        self.client
            .member_empty(Method::DELETE, E::COLLECTION, id)
            .await
    }
}
