use crate::domain::{AccessToken, GeoPoint, ValidationRequest, ValidationVerdict};
use crate::error::CoreError;

pub trait TokenProvider {
    fn acquire_token(&self) -> Result<AccessToken, CoreError>;
}

/// Implementations must fold every failure into an invalid verdict; a row
/// never aborts the batch.
pub trait AddressValidator {
    fn normalize(&self, token: &AccessToken, request: &ValidationRequest) -> ValidationVerdict;
}

pub trait Geocoder {
    fn geocode(&self, standardized_address: &str) -> Option<GeoPoint>;
}
