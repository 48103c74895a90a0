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

//! Live connection test against an InfluxDB server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use homelink_core::ConnectError;

use crate::config::{ApiVersion, InfluxSettings};

/// Deadline for one connection attempt.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection-test capability used by the wizard.
///
/// Exactly one call per submission; the wizard converts every error variant
/// into a form error and never retries on its own.
#[async_trait]
pub trait InfluxProbe: Send + Sync {
    async fn attempt_connect(&self, settings: &InfluxSettings) -> Result<(), ConnectError>;
}

/// HTTP implementation of [`InfluxProbe`].
///
/// V1 servers are checked with `/ping` followed by an authenticated
/// `SHOW DATABASES` query; V2 servers with a token-authenticated bucket
/// listing. Both paths distinguish rejected credentials from an unreachable
/// host.
#[derive(Debug, Default)]
pub struct HttpInfluxProbe;

impl HttpInfluxProbe {
    pub fn new() -> Self {
        Self
    }

    fn build_client(settings: &InfluxSettings) -> Result<reqwest::Client, ConnectError> {
        reqwest::Client::builder()
            .timeout(ATTEMPT_TIMEOUT)
            .danger_accept_invalid_certs(!settings.verify_ssl)
            .build()
            .map_err(|e| ConnectError::Other(format!("Failed to build HTTP client: {e}")))
    }

    fn map_transport_error(e: reqwest::Error) -> ConnectError {
        if e.is_timeout() {
            ConnectError::Timeout(ATTEMPT_TIMEOUT.as_secs())
        } else if e.is_connect() {
            ConnectError::Unreachable(e.to_string())
        } else {
            ConnectError::Other(e.to_string())
        }
    }

    fn check_status(status: StatusCode) -> Result<(), ConnectError> {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ConnectError::AuthRejected),
            s if s.is_success() => Ok(()),
            s => Err(ConnectError::Other(format!("unexpected status {s}"))),
        }
    }

    async fn attempt_v1(
        &self,
        client: &reqwest::Client,
        settings: &InfluxSettings,
    ) -> Result<(), ConnectError> {
        let base = settings.base_url();

        let ping = client
            .get(format!("{base}/ping"))
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        Self::check_status(ping.status())?;
        debug!("InfluxDB V1 ping ok");

        // The ping endpoint is unauthenticated, so verify the credentials
        // with a harmless query.
        let mut query = client
            .get(format!("{base}/query"))
            .query(&[("q", "SHOW DATABASES")]);
        if let Some(username) = &settings.username {
            query = query.basic_auth(username, settings.password.as_deref());
        }
        let response = query.send().await.map_err(Self::map_transport_error)?;
        Self::check_status(response.status())
    }

    async fn attempt_v2(
        &self,
        client: &reqwest::Client,
        settings: &InfluxSettings,
    ) -> Result<(), ConnectError> {
        let base = settings.base_url();
        let token = settings.token.as_deref().unwrap_or_default();

        let mut request = client
            .get(format!("{base}/api/v2/buckets"))
            .header("Authorization", format!("Token {token}"))
            .query(&[("limit", "1")]);
        if let Some(org) = &settings.org {
            request = request.query(&[("org", org.as_str())]);
        }

        let response = request.send().await.map_err(Self::map_transport_error)?;
        Self::check_status(response.status())
    }
}

#[async_trait]
impl InfluxProbe for HttpInfluxProbe {
    async fn attempt_connect(&self, settings: &InfluxSettings) -> Result<(), ConnectError> {
        let client = Self::build_client(settings)?;
        debug!("Testing InfluxDB connection to {}", settings.base_url());

        let result = match settings.api_version {
            ApiVersion::V1 => self.attempt_v1(&client, settings).await,
            ApiVersion::V2 => self.attempt_v2(&client, settings).await,
        };

        if let Err(e) = &result {
            warn!("InfluxDB connection test failed: {e}");
        }
        result
    }
}
