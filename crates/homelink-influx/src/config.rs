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

//! Typed InfluxDB connection configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use homelink_core::FieldMap;

// ============= Field names (the wizard's external contract) =============

pub const CONF_API_VERSION: &str = "api_version";
pub const CONF_SSL: &str = "ssl";
pub const CONF_VERIFY_SSL: &str = "verify_ssl";
pub const CONF_HOST: &str = "host";
pub const CONF_PORT: &str = "port";
pub const CONF_PATH: &str = "path";
pub const CONF_USERNAME: &str = "username";
pub const CONF_PASSWORD: &str = "password";
pub const CONF_DATABASE: &str = "database";
pub const CONF_TOKEN: &str = "token";
pub const CONF_ORG: &str = "org";
pub const CONF_BUCKET: &str = "bucket";

// ============= Defaults =============

pub const DEFAULT_SSL_V1: bool = false;
pub const DEFAULT_SSL_V2: bool = true;
pub const DEFAULT_VERIFY_SSL: bool = true;
pub const DEFAULT_HOST_V1: &str = "localhost";
pub const DEFAULT_HOST_V2: &str = "us-west-2-1.aws.cloud2.influxdata.com";
pub const DEFAULT_PORT_V1: u16 = 8086;
pub const DEFAULT_DATABASE: &str = "home_assistant";
pub const DEFAULT_BUCKET: &str = "Home Assistant";

/// InfluxDB API generation, fixed at wizard start.
///
/// The choice selects which version-specific field subset is collected and
/// how the connection is authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "1")]
    V1,
    #[serde(rename = "2")]
    V2,
}

#[derive(Debug, Clone, Error)]
#[error("unknown API version: '{0}', supported versions: 1, 2")]
pub struct UnknownApiVersion(String);

impl ApiVersion {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::V1 => "InfluxDB V1.1 to V1.7",
            Self::V2 => "InfluxDB V1.8 or 2.x",
        }
    }

    pub fn to_config_value(&self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
        }
    }

    pub fn all() -> &'static [ApiVersion] {
        &[Self::V1, Self::V2]
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ApiVersion {
    type Err = UnknownApiVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::V1),
            "2" => Ok(Self::V2),
            other => Err(UnknownApiVersion(other.to_owned())),
        }
    }
}

/// Normalized InfluxDB connection record, the payload of a finished entry.
///
/// Exactly one version-specific subset is populated: `database` for V1,
/// `token`/`org`/`bucket` for V2. The shared fields are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluxSettings {
    pub api_version: ApiVersion,
    pub ssl: bool,
    pub verify_ssl: bool,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

impl InfluxSettings {
    /// Build settings from a schema-normalized field map.
    ///
    /// The map is expected to come out of the matching connection schema,
    /// so shared fields carry their defaults and the other version's fields
    /// are absent.
    pub fn from_fields(api_version: ApiVersion, fields: &FieldMap) -> Self {
        let text = |name: &str| fields.get(name).and_then(Value::as_str).map(str::to_owned);
        let flag = |name: &str, fallback: bool| {
            fields.get(name).and_then(Value::as_bool).unwrap_or(fallback)
        };

        Self {
            api_version,
            ssl: flag(CONF_SSL, matches!(api_version, ApiVersion::V2)),
            verify_ssl: flag(CONF_VERIFY_SSL, DEFAULT_VERIFY_SSL),
            host: text(CONF_HOST).unwrap_or_else(|| match api_version {
                ApiVersion::V1 => DEFAULT_HOST_V1.to_owned(),
                ApiVersion::V2 => DEFAULT_HOST_V2.to_owned(),
            }),
            port: fields
                .get(CONF_PORT)
                .and_then(Value::as_u64)
                .and_then(|p| u16::try_from(p).ok()),
            path: text(CONF_PATH),
            username: text(CONF_USERNAME),
            password: text(CONF_PASSWORD),
            database: text(CONF_DATABASE),
            token: text(CONF_TOKEN),
            org: text(CONF_ORG),
            bucket: text(CONF_BUCKET),
        }
    }

    /// Base URL of the server described by these settings.
    pub fn base_url(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        let mut url = match self.port {
            Some(port) => format!("{scheme}://{}:{port}", self.host),
            None => format!("{scheme}://{}", self.host),
        };
        if let Some(path) = &self.path {
            let trimmed = path.trim_matches('/');
            if !trimmed.is_empty() {
                url.push('/');
                url.push_str(trimmed);
            }
        }
        url
    }

    pub fn to_value(&self) -> Value {
        // Serialization of a plain struct cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
