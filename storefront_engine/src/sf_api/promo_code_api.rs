//! The in-memory promo-code table.
//!
//! Codes are case-insensitive: they are trimmed and upper-cased on the way in and on lookup. The table lives for the
//! lifetime of the process and is shared by every clone of the API.
use std::{collections::HashMap, sync::Arc};

use log::*;
use parking_lot::RwLock;

use crate::sf_api::{
    common_objects::{non_blank, require_non_blank},
    errors::PromoCodeError,
    promo_objects::{DiscountRule, NewPromoCode, PromoCode},
};

const MAX_CODE_LENGTH: usize = 64;

#[derive(Clone, Default)]
pub struct PromoCodeApi {
    codes: Arc<RwLock<HashMap<String, PromoCode>>>,
}

impl std::fmt::Debug for PromoCodeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PromoCodeApi ({} codes)", self.codes.read().len())
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

impl PromoCodeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a promo code, replacing any existing code with the same (normalised) name.
    pub fn upsert(&self, promo: NewPromoCode) -> Result<PromoCode, PromoCodeError> {
        let code = require_non_blank("code", &promo.code).map_err(PromoCodeError::InvalidRequest)?;
        let code = normalize_code(&code);
        if code.len() > MAX_CODE_LENGTH {
            return Err(PromoCodeError::InvalidRequest(format!("Codes are limited to {MAX_CODE_LENGTH} characters")));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(PromoCodeError::InvalidRequest(
                "Codes may only contain letters, digits, '-' and '_'".to_string(),
            ));
        }
        let rule = DiscountRule::new(promo.kind, &promo.value).map_err(PromoCodeError::InvalidRequest)?;
        let name = non_blank(promo.name.as_deref()).unwrap_or_else(|| code.clone());
        let promo = PromoCode { code: code.clone(), name, rule };
        let previous = self.codes.write().insert(code.clone(), promo.clone());
        match previous {
            Some(_) => info!("🏷️ Promo code {code} replaced ({} {})", rule.kind(), rule.display_value()),
            None => info!("🏷️ Promo code {code} added ({} {})", rule.kind(), rule.display_value()),
        }
        Ok(promo)
    }

    pub fn fetch(&self, code: &str) -> Option<PromoCode> {
        let code = normalize_code(code);
        let result = self.codes.read().get(&code).cloned();
        trace!("🏷️ Promo code lookup for {code}: {}", if result.is_some() { "hit" } else { "miss" });
        result
    }

    /// All promo codes, ordered by code.
    pub fn list(&self) -> Vec<PromoCode> {
        let mut codes = self.codes.read().values().cloned().collect::<Vec<_>>();
        codes.sort_by(|a, b| a.code.cmp(&b.code));
        codes
    }
}
