use crate::rules::address::{join_full_address, join_street};
use serde::{Deserialize, Serialize};

/// One input row. Text fields are trimmed; optional fields that are empty
/// after trimming are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip5: Option<String>,
}

impl AddressRecord {
    pub fn from_raw(line1: &str, line2: &str, city: &str, state: &str, zip5: &str) -> Self {
        Self {
            line1: normalize_field(line1).unwrap_or_default(),
            line2: normalize_field(line2),
            city: normalize_field(city).unwrap_or_default(),
            state: normalize_field(state).unwrap_or_default(),
            zip5: normalize_field(zip5),
        }
    }

    /// Secondary line first, then the primary line.
    pub fn street(&self) -> String {
        join_street(self.line2.as_deref(), &self.line1)
    }

    pub fn full_address(&self) -> String {
        join_full_address(&self.street(), &self.city, &self.state, self.zip5.as_deref())
    }

    pub fn to_request(&self) -> ValidationRequest {
        ValidationRequest {
            street: self.street(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip5: self.zip5.clone(),
            original_full_address: self.full_address(),
        }
    }
}

/// Parameters of one address lookup, plus the caller's own rendering of the
/// address used for the needs-update comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip5: Option<String>,
    pub original_full_address: String,
}

pub fn normalize_field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_field, AddressRecord};

    #[test]
    fn normalize_field_trims_and_drops_empty() {
        assert_eq!(normalize_field("  62701 ").as_deref(), Some("62701"));
        assert_eq!(normalize_field("   "), None);
    }

    #[test]
    fn from_raw_treats_blank_optionals_as_absent() {
        let record = AddressRecord::from_raw(" 123 Main St ", "  ", "Springfield", "IL", "");
        assert_eq!(record.line1, "123 Main St");
        assert_eq!(record.line2, None);
        assert_eq!(record.zip5, None);
    }

    #[test]
    fn request_puts_secondary_line_before_primary() {
        let record =
            AddressRecord::from_raw("123 Main St", "Ste 100", "Springfield", "IL", "62701");
        let request = record.to_request();
        assert_eq!(request.street, "Ste 100 123 Main St");
        assert_eq!(request.zip5.as_deref(), Some("62701"));
        assert_eq!(
            request.original_full_address,
            "Ste 100 123 Main St, Springfield, IL 62701"
        );
    }

    #[test]
    fn missing_fields_build_from_whatever_is_present() {
        let record = AddressRecord::from_raw("", "", "Springfield", "", "");
        let request = record.to_request();
        assert_eq!(request.street, "");
        assert_eq!(request.original_full_address, ", Springfield,");
    }
}
