use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sfg_common::{mask_secret, Secret};

use crate::traits::SellerScope;

/// The body of a request to connect a seller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSellerConnection {
    pub access_token: Secret<String>,
    /// When omitted, the seller's first active location is used.
    #[serde(default)]
    pub location_id: Option<String>,
    /// A free-form label for the seller, e.g. their business name.
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerCredentials {
    pub access_token: Secret<String>,
    pub location_id: String,
    pub label: Option<String>,
    pub connected_at: DateTime<Utc>,
}

impl SellerCredentials {
    pub fn scope(&self) -> SellerScope {
        SellerScope::seller(self.access_token.clone(), self.location_id.clone())
    }
}

/// What the outside world may see of the connected seller. The access token is masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerStatus {
    pub access_token: String,
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub connected_at: DateTime<Utc>,
}

impl From<&SellerCredentials> for SellerStatus {
    fn from(creds: &SellerCredentials) -> Self {
        Self {
            access_token: mask_secret(creds.access_token.reveal()),
            location_id: creds.location_id.clone(),
            label: creds.label.clone(),
            connected_at: creds.connected_at,
        }
    }
}
