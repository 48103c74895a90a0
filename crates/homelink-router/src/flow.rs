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

//! Single-step router setup wizard and the credentials-only options flow.
//!
//! One form collects the whole connection record; a successful submission
//! performs a live login, reads the device's hardware address and either
//! finishes or aborts when that address already belongs to an entry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use homelink_core::{ConfigEntry, EntryStore, ExecutorSlots, FieldMap, FormErrors, StepOutcome};

use crate::client::RouterConnector;
use crate::config::{DEVICE_SCHEMA, LOGIN_TIMEOUT, OPTIONS_SCHEMA, RouterConfig};

pub const STEP_USER: &str = "user";
pub const STEP_INIT: &str = "init";

pub const ABORT_ALREADY_CONFIGURED: &str = "already_configured";

// Message keys surfaced to the form; resolved by the host's translations.
const ERROR_CANNOT_CONNECT: &str = "cannot_connect";
const ERROR_TIMEOUT: &str = "timeout_error";
const ERROR_INVALID_INPUT: &str = "invalid_input";

/// One router setup attempt.
///
/// Device calls go through the same [`ExecutorSlots`] pool the coordinator
/// uses, so a setup attempt and a poll cycle never exceed the slot budget
/// together.
pub struct RouterConfigFlow {
    connector: Arc<dyn RouterConnector>,
    store: Arc<EntryStore>,
    slots: Arc<ExecutorSlots>,
    login_timeout: Duration,
}

impl std::fmt::Debug for RouterConfigFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterConfigFlow")
            .field("login_timeout", &self.login_timeout)
            .finish_non_exhaustive()
    }
}

impl RouterConfigFlow {
    pub fn new(
        connector: Arc<dyn RouterConnector>,
        store: Arc<EntryStore>,
        slots: Arc<ExecutorSlots>,
    ) -> Self {
        Self { connector, store, slots, login_timeout: LOGIN_TIMEOUT }
    }

    /// Override the login deadline, mainly for tests.
    pub fn with_login_timeout(mut self, timeout: Duration) -> Self {
        self.login_timeout = timeout;
        self
    }

    /// Handle one step invocation: no input renders the form, input processes
    /// a submission.
    pub async fn step(&mut self, input: Option<&FieldMap>) -> StepOutcome {
        match input {
            None => StepOutcome::form(STEP_USER, &DEVICE_SCHEMA),
            Some(input) => self.submit(input).await,
        }
    }

    async fn submit(&mut self, input: &FieldMap) -> StepOutcome {
        let normalized = match DEVICE_SCHEMA.normalize(input) {
            Ok(normalized) => normalized,
            Err(e) => {
                debug!("Router setup input rejected: {e}");
                return StepOutcome::form_with_errors(
                    STEP_USER,
                    &DEVICE_SCHEMA,
                    FormErrors::base(ERROR_INVALID_INPUT),
                );
            }
        };

        let config = RouterConfig::from_fields(&normalized);
        let client = self.connector.connect(&config);

        let authenticated = match self
            .slots
            .run_with_timeout("login", self.login_timeout, client.login())
            .await
        {
            Err(e) => {
                error!("⏱️ Router login did not finish in time: {e}");
                return StepOutcome::form_with_errors(
                    STEP_USER,
                    &DEVICE_SCHEMA,
                    FormErrors::base(ERROR_TIMEOUT),
                );
            }
            Ok(Err(e)) => {
                error!("Router login failed: {e}");
                return StepOutcome::form_with_errors(
                    STEP_USER,
                    &DEVICE_SCHEMA,
                    FormErrors::base(ERROR_CANNOT_CONNECT),
                );
            }
            Ok(Ok(authenticated)) => authenticated,
        };

        if !authenticated {
            error!("Router rejected the supplied credentials");
            return StepOutcome::form_with_errors(
                STEP_USER,
                &DEVICE_SCHEMA,
                FormErrors::base(ERROR_CANNOT_CONNECT),
            );
        }

        // The hardware address is the device's stable identity; without it
        // the setup cannot be deduplicated, so failing to read it fails the
        // attempt.
        let mac_address = match self.slots.run(client.lan_config_security()).await {
            Ok(lan) => lan.mac_address,
            Err(e) => {
                error!("Could not read the router's hardware address: {e}");
                return StepOutcome::form_with_errors(
                    STEP_USER,
                    &DEVICE_SCHEMA,
                    FormErrors::base(ERROR_CANNOT_CONNECT),
                );
            }
        };

        if self.store.has_unique_id(&mac_address) {
            info!("Router {mac_address} is already configured, aborting setup");
            return StepOutcome::Abort { reason: ABORT_ALREADY_CONFIGURED };
        }

        info!("✅ Router login verified for {}", config.host);
        StepOutcome::Entry(ConfigEntry {
            title: config.host.clone(),
            unique_id: Some(mac_address),
            data: config.to_value(),
        })
    }
}

/// Post-setup credential change, a single form over the credential subset
/// of the device schema. No live login is attempted here; the next poll
/// cycle surfaces bad credentials.
#[derive(Debug, Default)]
pub struct RouterOptionsFlow;

impl RouterOptionsFlow {
    pub fn new() -> Self {
        Self
    }

    pub fn step(&mut self, input: Option<&FieldMap>) -> StepOutcome {
        match input {
            None => StepOutcome::form(STEP_INIT, &OPTIONS_SCHEMA),
            Some(input) => match OPTIONS_SCHEMA.normalize(input) {
                Ok(normalized) => StepOutcome::Entry(ConfigEntry {
                    title: String::new(),
                    unique_id: None,
                    data: serde_json::Value::Object(normalized),
                }),
                Err(e) => {
                    debug!("Credential update rejected: {e}");
                    StepOutcome::form_with_errors(
                        STEP_INIT,
                        &OPTIONS_SCHEMA,
                        FormErrors::base(ERROR_INVALID_INPUT),
                    )
                }
            },
        }
    }
}
