use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single error record, as returned in the `errors` array of a failed Square API call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareErrorDetail {
    pub category: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Display for SquareErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.code)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        if let Some(field) = &self.field {
            write!(f, " ({field})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SquareApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {}", join_details(.errors))]
    QueryError { status: u16, errors: Vec<SquareErrorDetail> },
    #[error("The response did not contain the expected object: {0}")]
    EmptyResponse(String),
    #[error("Invalid currency amount: {0}")]
    InvalidCurrencyAmount(String),
}

fn join_details(errors: &[SquareErrorDetail]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<String>>().join(", ")
}

impl SquareApiError {
    /// Builds a `QueryError` from the body of a failed response. Square answers with `{"errors": [...]}`; anything
    /// else (proxies, gateways) is kept verbatim as the detail of a single synthetic record.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            errors: Vec<SquareErrorDetail>,
        }
        let errors = match serde_json::from_str::<ErrorBody>(body) {
            Ok(b) if !b.errors.is_empty() => b.errors,
            _ => vec![SquareErrorDetail {
                category: "API_ERROR".to_string(),
                code: "UNPARSEABLE_RESPONSE".to_string(),
                detail: Some(body.to_string()),
                field: None,
            }],
        };
        Self::QueryError { status, errors }
    }
}
