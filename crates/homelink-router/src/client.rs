// Copyright (c) 2026 HOMELINK HUB
//
// This file is part of HomeLink.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@homelink-hub.io

//! Router client seam.
//!
//! The real protocol work (SOAP-over-HTTP against the router's management
//! endpoint) is delegated to the client library; business logic only sees
//! these traits. Every facet getter is independent of the others - no
//! ordering requirement exists between them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::config::RouterConfig;

/// One facet's worth of device state, keyed by the library's field names.
pub type FacetMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The call could not reach the device or the connection broke.
    #[error("transport error: {0}")]
    Transport(String),

    /// The device answered with something the library could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// LAN security section of the device configuration.
///
/// The hardware address is the device's stable identity and is used to
/// deduplicate setups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanConfigSecurity {
    #[serde(rename = "NewLANMACAddress")]
    pub mac_address: String,
}

/// Session-oriented router management client.
///
/// `login` authenticates the session; the facet getters each fetch one
/// independent piece of device state. Callers impose deadlines - the
/// client itself blocks for as long as the device takes.
#[async_trait]
pub trait RouterClient: Send + Sync {
    /// Authenticate against the device. `Ok(false)` means the device
    /// explicitly rejected the credentials.
    async fn login(&self) -> Result<bool, ClientError>;

    /// LAN configuration, carrying the device's hardware address.
    async fn lan_config_security(&self) -> Result<LanConfigSecurity, ClientError>;

    // ============= Facet getters =============

    async fn block_device_enable_status(&self) -> Result<FacetMap, ClientError>;
    async fn traffic_meter_statistics(&self) -> Result<FacetMap, ClientError>;
    async fn traffic_meter_enabled(&self) -> Result<FacetMap, ClientError>;
    async fn traffic_meter_options(&self) -> Result<FacetMap, ClientError>;
    async fn parental_control_enable_status(&self) -> Result<FacetMap, ClientError>;
    async fn all_mac_addresses(&self) -> Result<FacetMap, ClientError>;
    async fn dns_masq_device_id(&self) -> Result<FacetMap, ClientError>;
    async fn device_info(&self) -> Result<FacetMap, ClientError>;
    async fn support_feature_list(&self) -> Result<FacetMap, ClientError>;
    async fn qos_enable_status(&self) -> Result<FacetMap, ClientError>;
    async fn bandwidth_control_options(&self) -> Result<FacetMap, ClientError>;
    async fn guest_access_enabled(&self) -> Result<FacetMap, ClientError>;
    async fn guest_access_enabled_5g(&self) -> Result<FacetMap, ClientError>;
    async fn wifi_info_2g(&self) -> Result<FacetMap, ClientError>;
    async fn wifi_info_5g(&self) -> Result<FacetMap, ClientError>;
    async fn guest_access_network_info(&self) -> Result<FacetMap, ClientError>;
    async fn guest_access_network_info_5g(&self) -> Result<FacetMap, ClientError>;

    /// Firmware update check. Notably slower than the other facets; callers
    /// give it a longer deadline.
    async fn check_new_firmware(&self) -> Result<FacetMap, ClientError>;
}

/// Builds a client for a given configuration.
///
/// The setup wizard goes through this seam so that connection tests can be
/// exercised against a mock in tests.
pub trait RouterConnector: Send + Sync {
    fn connect(&self, config: &RouterConfig) -> Arc<dyn RouterClient>;
}
