use std::fmt::{Debug, Display};

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// A record with exactly one identifier field.
///
/// Identity is the identifier alone: the CRUD layers never read any other
/// field. `None` means the record has not been persisted yet; it is not the
/// same thing as a lookup that found nothing (that is `Option<Self>`).
pub trait BaseEntity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identifier type. `Display` renders it in "not found" messages.
    type Id: Clone + PartialEq + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static;

    fn id(&self) -> Option<&Self::Id>;

    fn set_id(&mut self, id: Option<Self::Id>);
}

/// Identifier types a datastore can mint on its own.
pub trait GeneratedId: Sized {
    /// Identifier for the `sequence`-th generated record; sequences start at 1.
    ///
    /// `None` once `sequence` no longer fits the identifier type.
    fn generate(sequence: u64) -> Option<Self>;
}

/// Ceiling is `i32::MAX`.
impl GeneratedId for i32 {
    fn generate(sequence: u64) -> Option<Self> { i32::try_from(sequence).ok() }
}

/// Ceiling is `i64::MAX`.
impl GeneratedId for i64 {
    fn generate(sequence: u64) -> Option<Self> { i64::try_from(sequence).ok() }
}

impl GeneratedId for u64 {
    fn generate(sequence: u64) -> Option<Self> { Some(sequence) }
}

impl GeneratedId for String {
    fn generate(sequence: u64) -> Option<Self> { Some(sequence.to_string()) }
}

impl GeneratedId for Uuid {
    fn generate(_sequence: u64) -> Option<Self> { Some(Uuid::new_v4()) }
}
