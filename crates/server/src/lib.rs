pub mod controller;
pub mod errors;
pub mod metrics;
pub mod response;
pub mod routes;
pub mod startup;

pub use controller::GenericController;
pub use startup::serve;
