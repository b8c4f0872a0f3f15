//! Service layer providing generic CRUD operations on top of a datastore.
//! - `generic::repository` is the datastore contract every backend implements.
//! - `generic::service` is the per-entity façade the HTTP layer talks to.
//! - `storage` holds the bundled datastore implementations.

pub mod errors;
pub mod generic;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use generic::repository::GenericRepository;
pub use generic::service::{GenericService, GenericServiceImpl};
