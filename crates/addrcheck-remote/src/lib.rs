pub mod error;
pub mod http;
pub mod opencage;
pub mod usps;

pub use error::{RemoteError, Result};
pub use opencage::OpenCageGeocoder;
pub use usps::{UspsClient, UspsSettings};
