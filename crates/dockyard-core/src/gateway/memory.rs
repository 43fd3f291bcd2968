//! In-memory gateway.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::Result;
use crate::entity::{Entity, Record};
use crate::error::{Error, ProtocolError};
use crate::traits::Gateway;
use crate::types::EntityId;

/// A gateway operation, used to count calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug)]
struct MemoryState<E> {
    records: Vec<Record<E>>,
    next_id: u64,
    calls: HashMap<Operation, usize>,
    failures: HashMap<Operation, VecDeque<u16>>,
}

/// A gateway over a `Vec` in memory.
///
/// Behaves like a well-mannered remote service: ids are assigned on create,
/// unknown ids answer 404. Failures can be queued per operation to exercise
/// error paths.
#[derive(Debug)]
pub struct MemoryGateway<E> {
    state: Mutex<MemoryState<E>>,
}

impl<E: Entity> Default for MemoryGateway<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MemoryGateway<E> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Start from existing field sets; ids are assigned in order from 1.
    pub fn with_records(fields: impl IntoIterator<Item = E>) -> Self {
        let records: Vec<_> = fields
            .into_iter()
            .zip(1..)
            .map(|(fields, n)| Record::new(EntityId::from_number(n), fields))
            .collect();
        let next_id = records.len() as u64 + 1;

        Self {
            state: Mutex::new(MemoryState {
                records,
                next_id,
                calls: HashMap::new(),
                failures: HashMap::new(),
            }),
        }
    }

    /// Make the next call of `op` fail with the given HTTP status.
    pub async fn fail_next(&self, op: Operation, status: u16) {
        let mut state = self.state.lock().await;
        state.failures.entry(op).or_default().push_back(status);
    }

    /// How many times `op` has been called, failed calls included.
    pub async fn calls(&self, op: Operation) -> usize {
        let state = self.state.lock().await;
        state.calls.get(&op).copied().unwrap_or(0)
    }

    /// Snapshot of the stored records.
    pub async fn records(&self) -> Vec<Record<E>> {
        self.state.lock().await.records.clone()
    }

    fn begin(state: &mut MemoryState<E>, op: Operation) -> Result<()> {
        *state.calls.entry(op).or_default() += 1;
        match state.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(status) => Err(Error::Protocol(ProtocolError::new(
                status,
                None,
                Some(format!("injected {:?} failure", op)),
            ))),
            None => Ok(()),
        }
    }

    fn not_found(id: &EntityId) -> Error {
        Error::Protocol(ProtocolError::new(
            404,
            Some("NotFound".to_string()),
            Some(format!("{} {} does not exist", E::LABEL, id)),
        ))
    }
}

#[async_trait]
impl<E: Entity> Gateway<E> for MemoryGateway<E> {
    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    async fn list(&self) -> Result<Vec<Record<E>>> {
        let mut state = self.state.lock().await;
        Self::begin(&mut state, Operation::List)?;
        Ok(state.records.clone())
    }

    #[instrument(skip(self, draft), fields(collection = E::COLLECTION))]
    async fn create(&self, draft: &E) -> Result<Record<E>> {
        let mut state = self.state.lock().await;
        Self::begin(&mut state, Operation::Create)?;

        let id = EntityId::from_number(state.next_id);
        state.next_id += 1;

        let record = Record::new(id, draft.clone());
        state.records.push(record.clone());
        debug!(id = %record.id, "Created record in memory");
        Ok(record)
    }

    #[instrument(skip(self, draft), fields(collection = E::COLLECTION))]
    async fn update(&self, id: &EntityId, draft: &E) -> Result<Record<E>> {
        let mut state = self.state.lock().await;
        Self::begin(&mut state, Operation::Update)?;

        let record = state
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        record.fields = draft.clone();
        Ok(record.clone())
    }

    #[instrument(skip(self), fields(collection = E::COLLECTION))]
    async fn delete(&self, id: &EntityId) -> Result<()> {
        let mut state = self.state.lock().await;
        Self::begin(&mut state, Operation::Delete)?;

        let before = state.records.len();
        state.records.retain(|r| &r.id != id);
        if state.records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
