use crate::rules::address::needs_update;
use serde::{Deserialize, Serialize};

pub const ADDRESS_NOT_FOUND: &str = "Address Not Found";

/// Canonical address fields as returned by the validation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizedAddress {
    pub secondary_address: Option<String>,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl StandardizedAddress {
    pub fn to_line(&self) -> String {
        format!(
            "{} {}, {}, {} {}",
            self.secondary_address.as_deref().unwrap_or(""),
            self.street_address,
            self.city,
            self.state,
            self.zip_code
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub standardized_address: String,
    pub message: String,
    pub needs_update: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Valid,
    NeedsUpdate,
    Invalid,
}

impl ValidationVerdict {
    pub fn from_standardized(address: &StandardizedAddress, original_full_address: &str) -> Self {
        let standardized = address.to_line();
        let needs_update = needs_update(&standardized, original_full_address);
        Self {
            is_valid: true,
            standardized_address: standardized,
            message: String::new(),
            needs_update,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            standardized_address: String::new(),
            message: message.into(),
            needs_update: false,
        }
    }

    pub fn not_found() -> Self {
        Self::invalid(ADDRESS_NOT_FOUND)
    }

    pub fn status(&self) -> VerdictStatus {
        match (self.is_valid, self.needs_update) {
            (false, _) => VerdictStatus::Invalid,
            (true, true) => VerdictStatus::NeedsUpdate,
            (true, false) => VerdictStatus::Valid,
        }
    }
}

impl VerdictStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerdictStatus::Valid => "valid",
            VerdictStatus::NeedsUpdate => "needs update",
            VerdictStatus::Invalid => "invalid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StandardizedAddress, ValidationVerdict, VerdictStatus, ADDRESS_NOT_FOUND};

    fn springfield(secondary: Option<&str>) -> StandardizedAddress {
        StandardizedAddress {
            secondary_address: secondary.map(str::to_string),
            street_address: "123 MAIN ST".to_string(),
            city: "SPRINGFIELD".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
        }
    }

    #[test]
    fn to_line_trims_missing_secondary() {
        assert_eq!(springfield(None).to_line(), "123 MAIN ST, SPRINGFIELD, IL 62701");
        assert_eq!(
            springfield(Some("STE 200")).to_line(),
            "STE 200 123 MAIN ST, SPRINGFIELD, IL 62701"
        );
    }

    #[test]
    fn identical_address_does_not_need_update() {
        let verdict = ValidationVerdict::from_standardized(
            &springfield(None),
            "123 Main St, Springfield, IL 62701",
        );
        assert!(verdict.is_valid);
        assert!(!verdict.needs_update);
        assert!(verdict.message.is_empty());
        assert_eq!(verdict.status(), VerdictStatus::Valid);
    }

    #[test]
    fn different_suite_needs_update() {
        let verdict = ValidationVerdict::from_standardized(
            &springfield(Some("STE 200")),
            "Ste 100 123 Main St, Springfield, IL 62701",
        );
        assert!(verdict.is_valid);
        assert!(verdict.needs_update);
        assert_eq!(verdict.status(), VerdictStatus::NeedsUpdate);
    }

    #[test]
    fn not_found_is_invalid_without_standardized_form() {
        let verdict = ValidationVerdict::not_found();
        assert!(!verdict.is_valid);
        assert!(verdict.standardized_address.is_empty());
        assert_eq!(verdict.message, ADDRESS_NOT_FOUND);
        assert!(!verdict.needs_update);
        assert_eq!(verdict.status(), VerdictStatus::Invalid);
    }
}
