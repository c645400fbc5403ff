use std::{fmt::Display, str::FromStr};

use log::*;
use sfg_common::Secret;

pub const DEFAULT_SQUARE_API_VERSION: &str = "2024-07-17";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SquareEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl SquareEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://connect.squareupsandbox.com",
            Self::Production => "https://connect.squareup.com",
        }
    }
}

impl FromStr for SquareEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("Unknown Square environment: {other}")),
        }
    }
}

impl Display for SquareEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SquareConfig {
    pub environment: SquareEnvironment,
    /// The platform's own access token. Connected sellers supply their own tokens per request.
    pub access_token: Secret<String>,
    pub api_version: String,
    /// The location that orders and payment links are created at when the caller does not supply one.
    pub location_id: String,
}

impl SquareConfig {
    pub fn new_from_env_or_default() -> Self {
        let environment = std::env::var("SFG_SQUARE_ENVIRONMENT")
            .map_err(|_| warn!("SFG_SQUARE_ENVIRONMENT not set, using sandbox as default"))
            .and_then(|s| s.parse::<SquareEnvironment>().map_err(|e| warn!("{e}. Using sandbox as default")))
            .unwrap_or_default();
        let api_version = std::env::var("SFG_SQUARE_API_VERSION").unwrap_or_else(|_| {
            warn!("SFG_SQUARE_API_VERSION not set, using {DEFAULT_SQUARE_API_VERSION} as default");
            DEFAULT_SQUARE_API_VERSION.to_string()
        });
        let access_token = Secret::new(std::env::var("SFG_SQUARE_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!("SFG_SQUARE_ACCESS_TOKEN not set, using (probably useless) default");
            "EAAA0000000000".to_string()
        }));
        let location_id = std::env::var("SFG_SQUARE_LOCATION_ID").unwrap_or_else(|_| {
            warn!("SFG_SQUARE_LOCATION_ID not set. Requests without an explicit location will be rejected upstream");
            String::default()
        });
        Self { environment, access_token, api_version, location_id }
    }
}
