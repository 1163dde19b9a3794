pub mod geo;
pub mod record;
pub mod report;
pub mod token;
pub mod verdict;

pub use geo::GeoPoint;
pub use record::{normalize_field, AddressRecord, ValidationRequest};
pub use report::{BatchReport, ReportRow, Tally};
pub use token::AccessToken;
pub use verdict::{StandardizedAddress, ValidationVerdict, VerdictStatus, ADDRESS_NOT_FOUND};
