//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};

use namelink_core::types::LookupOutcome;

/// JSON lookup request.
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    /// Raw mobile number, any common formatting
    pub mobile: String,
}

/// Browser form submission.
#[derive(Debug, Deserialize)]
pub struct LookupForm {
    /// Raw mobile number as typed into the form
    pub mobile: String,
}

/// JSON lookup response.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    /// Whether a name is linked to the number
    pub found: bool,
    /// Canonical form of the looked-up number
    pub mobile: String,
    /// The linked name, when found
    pub name: Option<String>,
    /// `"cache"` or `"upstream"`, when found
    pub source: Option<String>,
    /// Provider message on a no-match answer
    pub message: Option<String>,
}

impl LookupResponse {
    /// Renders an outcome for the given canonical number.
    pub fn from_outcome(mobile: String, outcome: LookupOutcome) -> Self {
        match outcome {
            LookupOutcome::Found { record, from_cache } => Self {
                found: true,
                mobile,
                name: Some(record.name),
                source: Some(if from_cache { "cache" } else { "upstream" }.into()),
                message: None,
            },
            LookupOutcome::NotFound { message } => Self {
                found: false,
                mobile,
                name: None,
                source: None,
                message: Some(message.unwrap_or_else(|| "No name found for this number".into())),
            },
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Records in the store
    pub records_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use namelink_core::types::{MobileNumber, NameRecord};

    #[test]
    fn test_found_response_shape() {
        let record = NameRecord::new(MobileNumber::parse("8318090007").unwrap(), "JOHN DOE");
        let response = LookupResponse::from_outcome(
            "8318090007".into(),
            LookupOutcome::Found {
                record,
                from_cache: true,
            },
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["name"], "JOHN DOE");
        assert_eq!(json["source"], "cache");
        assert_eq!(json["message"], serde_json::Value::Null);
    }

    #[test]
    fn test_not_found_gets_a_default_message() {
        let response =
            LookupResponse::from_outcome("8318090007".into(), LookupOutcome::NotFound {
                message: None,
            });

        assert!(!response.found);
        assert_eq!(response.message.as_deref(), Some("No name found for this number"));
    }
}
