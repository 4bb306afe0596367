//! Header checks against the recognized vocabulary.

use serde::{Deserialize, Serialize};

use crate::schema::classify;

use super::findings::ValidationFindings;
use super::vocabulary::{REQUIRED_HEADERS, is_recognized};

/// Result of checking a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFindings {
    /// Headers that are neither structural nor in the vocabulary, in table order.
    pub invalid: Vec<String>,
    /// Required headers that are absent, in vocabulary order.
    pub missing_required: Vec<String>,
}

impl HeaderFindings {
    /// Copy these findings into the run-wide set.
    pub fn record(self, findings: &mut ValidationFindings) {
        findings.invalid_headers.extend(self.invalid);
        findings.missing_required_headers.extend(self.missing_required);
    }
}

/// Validates a header row.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Check headers for vocabulary membership and required fields.
    ///
    /// Structural headers (file references, filegroups, collections) are
    /// accepted by role; every other header must be in the vocabulary.
    pub fn validate(headers: &[String]) -> HeaderFindings {
        let missing_required = REQUIRED_HEADERS
            .iter()
            .filter(|required| !headers.iter().any(|h| h == *required))
            .map(|s| s.to_string())
            .collect();

        let invalid = headers
            .iter()
            .filter(|h| !is_recognized(h) && !classify(h).is_structural())
            .cloned()
            .collect();

        HeaderFindings {
            invalid,
            missing_required,
        }
    }
}
