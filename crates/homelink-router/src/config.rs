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

//! Router connection configuration and the wizard's field contracts.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use homelink_core::{FieldDefault, FieldKind, FieldMap, FieldSpec, FormSchema};

// ============= Field names =============

pub const CONF_SSL: &str = "ssl";
pub const CONF_HOST: &str = "host";
pub const CONF_PORT: &str = "port";
pub const CONF_USERNAME: &str = "username";
pub const CONF_PASSWORD: &str = "password";

// ============= Timing =============

/// Deadline for a login attempt, both in the wizard and per poll cycle.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for one facet fetch during a poll cycle.
pub const FACET_TIMEOUT: Duration = Duration::from_secs(5);

/// The firmware check is allowed to take much longer than other facets.
pub const FIRMWARE_TIMEOUT: Duration = Duration::from_secs(20);

/// Polling period.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(60);

/// Single combined schema of the setup wizard.
pub static DEVICE_SCHEMA: FormSchema = FormSchema::new(&[
    FieldSpec::optional(CONF_SSL, FieldKind::Bool).with_default(FieldDefault::Bool(false)),
    FieldSpec::optional(CONF_HOST, FieldKind::Text).with_default(FieldDefault::Text("")),
    FieldSpec::optional(CONF_PORT, FieldKind::Port),
    FieldSpec::optional(CONF_USERNAME, FieldKind::Text).with_default(FieldDefault::Text("")),
    FieldSpec::required(CONF_PASSWORD, FieldKind::Secret),
]);

/// Options flow schema: the credential subset of [`DEVICE_SCHEMA`].
pub static OPTIONS_SCHEMA: FormSchema = FormSchema::new(&[
    FieldSpec::optional(CONF_USERNAME, FieldKind::Text).with_default(FieldDefault::Text("")),
    FieldSpec::required(CONF_PASSWORD, FieldKind::Secret),
]);

/// Normalized router connection record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub ssl: bool,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
}

impl RouterConfig {
    /// Build a config from a schema-normalized field map.
    pub fn from_fields(fields: &FieldMap) -> Self {
        let text = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };

        Self {
            ssl: fields.get(CONF_SSL).and_then(Value::as_bool).unwrap_or(false),
            host: text(CONF_HOST),
            port: fields
                .get(CONF_PORT)
                .and_then(Value::as_u64)
                .and_then(|p| u16::try_from(p).ok()),
            username: text(CONF_USERNAME),
            password: text(CONF_PASSWORD),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
