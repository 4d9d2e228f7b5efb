pub mod error;
pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

pub use error::AvailabilityError;
pub use models::*;
pub use services::*;
