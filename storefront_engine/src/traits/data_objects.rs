use sfg_common::Secret;
use square_tools::{SquareApiError, SquareErrorDetail};
use thiserror::Error;

/// The credentials and default location a single request runs under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellerScope {
    /// A seller's own access token. `None` means the platform credentials are used.
    pub access_token: Option<Secret<String>>,
    pub location_id: String,
}

impl SellerScope {
    pub fn platform<S: Into<String>>(location_id: S) -> Self {
        Self { access_token: None, location_id: location_id.into() }
    }

    pub fn seller<S: Into<String>>(access_token: Secret<String>, location_id: S) -> Self {
        Self { access_token: Some(access_token), location_id: location_id.into() }
    }

    /// True if calls in this scope act on behalf of a connected seller rather than the platform itself.
    pub fn is_seller(&self) -> bool {
        self.access_token.is_some()
    }
}

#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("The payment platform rejected the request with status {status}. {}", join_details(.details))]
    Remote { status: u16, details: Vec<SquareErrorDetail> },
    #[error("Could not reach the payment platform. {0}")]
    Transport(String),
    #[error("Unexpected response from the payment platform. {0}")]
    Decode(String),
}

fn join_details(details: &[SquareErrorDetail]) -> String {
    details.iter().map(|d| d.to_string()).collect::<Vec<String>>().join(", ")
}

impl From<SquareApiError> for PlatformError {
    fn from(e: SquareApiError) -> Self {
        match e {
            SquareApiError::QueryError { status, errors } => Self::Remote { status, details: errors },
            SquareApiError::Initialization(s) | SquareApiError::RestRequestError(s) | SquareApiError::RestResponseError(s) => {
                Self::Transport(s)
            },
            SquareApiError::JsonError(s) | SquareApiError::EmptyResponse(s) | SquareApiError::InvalidCurrencyAmount(s) => {
                Self::Decode(s)
            },
        }
    }
}
