pub mod batch;
pub mod domain;
pub mod error;
pub mod rules;
pub mod service;

pub use batch::{run_batch, BatchProgress};
pub use domain::*;
pub use error::CoreError;
pub use rules::*;
pub use service::{AddressValidator, Geocoder, TokenProvider};
