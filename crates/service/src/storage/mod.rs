//! Datastore implementations of [`GenericRepository`](crate::GenericRepository).
//!
//! - `memory`: process-local, insertion ordered.
//! - `json_file`: same semantics, persisted to a JSON file after each mutation.
//! - `seaorm`: the sample `Item` entity in a SQL table.

pub mod json_file;
pub mod memory;
pub mod seaorm;

use models::{BaseEntity, GeneratedId};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Insertion-ordered record set shared by the in-process stores.
///
/// `next_id` only ever grows, so a generated id is never handed out twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: serde::de::DeserializeOwned"))]
pub(crate) struct Records<T> {
    next_id: u64,
    records: Vec<T>,
}

impl<T> Default for Records<T> {
    fn default() -> Self {
        Self { next_id: 0, records: Vec::new() }
    }
}

impl<T> Records<T>
where
    T: BaseEntity,
    T::Id: GeneratedId,
{
    fn position(&self, id: &T::Id) -> Option<usize> {
        self.records.iter().position(|r| r.id() == Some(id))
    }

    /// Next sequence value whose id is not already taken by an explicitly saved record.
    fn next_free_id(&mut self) -> Result<T::Id, ServiceError> {
        loop {
            let id = self
                .next_id
                .checked_add(1)
                .and_then(T::Id::generate)
                .ok_or_else(|| ServiceError::Storage("identifier space exhausted".into()))?;
            self.next_id += 1;
            if self.position(&id).is_none() {
                return Ok(id);
            }
        }
    }

    pub(crate) fn save(&mut self, mut entity: T) -> Result<T, ServiceError> {
        let id = match entity.id().cloned() {
            Some(id) => id,
            None => {
                let id = self.next_free_id()?;
                entity.set_id(Some(id.clone()));
                id
            }
        };
        match self.position(&id) {
            Some(i) => self.records[i] = entity.clone(),
            None => self.records.push(entity.clone()),
        }
        Ok(entity)
    }

    pub(crate) fn find(&self, id: &T::Id) -> Option<T> {
        self.records.iter().find(|r| r.id() == Some(id)).cloned()
    }

    pub(crate) fn all(&self) -> Vec<T> {
        self.records.clone()
    }

    /// Returns whether a record was removed.
    pub(crate) fn remove(&mut self, id: &T::Id) -> bool {
        match self.position(id) {
            Some(i) => {
                self.records.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> u64 {
        self.records.len() as u64
    }
}
