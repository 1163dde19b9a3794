use crate::error::CoreError;
use std::fmt;

/// Bearer token shared read-only by every row of one batch.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::MissingToken);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::AccessToken;
    use crate::error::CoreError;

    #[test]
    fn empty_token_is_rejected() {
        assert_eq!(AccessToken::new("  ").unwrap_err(), CoreError::MissingToken);
    }

    #[test]
    fn debug_output_hides_token() {
        let token = AccessToken::new("abc123").unwrap();
        assert!(!format!("{token:?}").contains("abc123"));
        assert_eq!(token.as_str(), "abc123");
    }
}
