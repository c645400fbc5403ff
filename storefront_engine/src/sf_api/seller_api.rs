//! Connected-seller credentials.
//!
//! In connected mode the gateway acts on behalf of one seller at a time. [`ConnectedSeller`] holds that seller's
//! credentials; [`SellerApi`] validates and stores new connections.
use std::{fmt::Debug, sync::Arc};

use chrono::Utc;
use log::*;
use parking_lot::RwLock;

use crate::{
    sf_api::{
        common_objects::{non_blank, require_non_blank},
        errors::SellerError,
        seller_objects::{NewSellerConnection, SellerCredentials, SellerStatus},
    },
    traits::{LocationManagement, SellerScope},
};

/// The connected seller record. Cloning is cheap and all clones share the same record.
///
/// The record is replaced as a whole on every connection, so readers always see a consistent token/location pair.
/// Concurrent connections are last-writer-wins.
#[derive(Clone, Default)]
pub struct ConnectedSeller {
    inner: Arc<RwLock<Option<SellerCredentials>>>,
}

impl Debug for ConnectedSeller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connected = self.inner.read().is_some();
        write!(f, "ConnectedSeller (connected: {connected})")
    }
}

impl ConnectedSeller {
    pub fn set(&self, credentials: SellerCredentials) {
        *self.inner.write() = Some(credentials);
    }

    pub fn get(&self) -> Option<SellerCredentials> {
        self.inner.read().clone()
    }

    pub fn scope(&self) -> Option<SellerScope> {
        self.inner.read().as_ref().map(SellerCredentials::scope)
    }
}

pub struct SellerApi<B> {
    backend: B,
    connected: ConnectedSeller,
}

impl<B> Debug for SellerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SellerApi ({:?})", self.connected)
    }
}

impl<B> SellerApi<B>
where B: LocationManagement
{
    pub fn new(backend: B, connected: ConnectedSeller) -> Self {
        Self { backend, connected }
    }

    /// Replaces the connected seller. If no location is given, the seller's locations are fetched with the new token
    /// and the first active one is used.
    pub async fn connect(&self, connection: NewSellerConnection) -> Result<SellerStatus, SellerError> {
        let token = require_non_blank("access_token", connection.access_token.reveal())
            .map_err(SellerError::InvalidRequest)?;
        let access_token = sfg_common::Secret::new(token);
        let location_id = match non_blank(connection.location_id.as_deref()) {
            Some(id) => id,
            None => {
                debug!("🔌️ No location supplied for the new seller. Looking up their locations");
                let scope = SellerScope::seller(access_token.clone(), String::default());
                let locations = self.backend.fetch_locations(&scope).await?;
                locations.into_iter().find(|l| l.is_active()).map(|l| l.id).ok_or(SellerError::NoActiveLocation)?
            },
        };
        let credentials = SellerCredentials {
            access_token,
            location_id,
            label: non_blank(connection.label.as_deref()),
            connected_at: Utc::now(),
        };
        let status = SellerStatus::from(&credentials);
        self.connected.set(credentials);
        info!("🔌️ Seller connected at location {} ({})", status.location_id, status.access_token);
        Ok(status)
    }

    pub fn current(&self) -> Option<SellerStatus> {
        self.connected.get().as_ref().map(SellerStatus::from)
    }

    pub fn scope(&self) -> Option<SellerScope> {
        self.connected.scope()
    }
}
