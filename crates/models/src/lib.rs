//! Entity definitions shared by the datastore, service and HTTP layers.
//!
//! - [`BaseEntity`] is the single capability the generic CRUD layers require.
//! - [`item`] is the sample entity the standalone server exposes.

pub mod errors;
pub mod db;
pub mod entity;
pub mod item;

pub use entity::{BaseEntity, GeneratedId};
