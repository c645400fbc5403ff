use std::{env, fmt::Display, str::FromStr};

use log::*;
use square_tools::SquareConfig;
use storefront_engine::sf_api::{
    checkout_objects::{PlatformFee, BASIS_POINTS_PER_UNIT},
    common_objects::is_currency_code,
};

const DEFAULT_SFG_HOST: &str = "127.0.0.1";
const DEFAULT_SFG_PORT: u16 = 8380;
const DEFAULT_CURRENCY: &str = "USD";

/// Whose credentials storefront requests run under, unless a request carries its own seller token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TenancyMode {
    /// The platform's own Square account. The promo-code routes are available.
    #[default]
    Single,
    /// The seller connected through `POST /api/set`. Requests fail until a seller is connected.
    Connected,
}

impl FromStr for TenancyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "connected" | "multi" => Ok(Self::Connected),
            other => Err(format!("Unknown tenancy mode: {other}")),
        }
    }
}

impl Display for TenancyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub tenancy: TenancyMode,
    /// The application fee charged on payment links created for connected sellers.
    pub platform_fee: PlatformFee,
    /// The store currency, used for prices and fixed discounts that don't name one.
    pub currency: String,
    pub square: SquareConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SFG_HOST.to_string(),
            port: DEFAULT_SFG_PORT,
            tenancy: TenancyMode::default(),
            platform_fee: PlatformFee::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            square: SquareConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SFG_HOST").ok().unwrap_or_else(|| DEFAULT_SFG_HOST.into());
        let port = env::var("SFG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SFG_PORT. {e} Using the default, {DEFAULT_SFG_PORT}, instead."
                    );
                    DEFAULT_SFG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SFG_PORT);
        let tenancy = env::var("SFG_TENANCY_MODE")
            .map_err(|_| info!("🪛️ SFG_TENANCY_MODE is not set. Running in single-seller mode."))
            .and_then(|s| s.parse::<TenancyMode>().map_err(|e| warn!("🪛️ {e}. Running in single-seller mode.")))
            .unwrap_or_default();
        let platform_fee = configure_platform_fee();
        let currency = env::var("SFG_CURRENCY")
            .ok()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| is_currency_code(s))
            .unwrap_or_else(|| {
                info!("🪛️ SFG_CURRENCY is not set or invalid. Using {DEFAULT_CURRENCY}.");
                DEFAULT_CURRENCY.to_string()
            });
        let square = SquareConfig::new_from_env_or_default();
        if square.location_id.is_empty() && tenancy == TenancyMode::Single {
            warn!(
                "🪛️ SFG_SQUARE_LOCATION_ID is not set. Carts and quick-pay links will fail unless the request supplies \
                 a location."
            );
        }
        Self { host, port, tenancy, platform_fee, currency, square }
    }
}

fn configure_platform_fee() -> PlatformFee {
    let bps = env::var("SFG_PLATFORM_FEE_BPS")
        .map_err(|_| debug!("🪛️ SFG_PLATFORM_FEE_BPS is not set. No application fee will be charged."))
        .and_then(|s| {
            s.trim()
                .parse::<u32>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for SFG_PLATFORM_FEE_BPS. {e}. Using 0."))
        })
        .unwrap_or(0);
    if bps > BASIS_POINTS_PER_UNIT {
        warn!("🪛️ SFG_PLATFORM_FEE_BPS is {bps}, which is more than 100%. Capping it at {BASIS_POINTS_PER_UNIT}.");
    }
    PlatformFee::new(bps)
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that is used to configure the server's behaviour. Generally we try to keep this
/// as small as possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Debug, Default)]
pub struct ServerOptions {
    pub tenancy: TenancyMode,
    pub platform_fee: PlatformFee,
    /// The location requests run at in single mode, and for per-request seller tokens without a location header.
    pub default_location_id: String,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            tenancy: config.tenancy,
            platform_fee: config.platform_fee,
            default_location_id: config.square.location_id.clone(),
        }
    }
}
