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

//! The two-step InfluxDB connection wizard.
//!
//! `AwaitingVersionChoice` → `AwaitingConnectionDetails` → done. Flow state
//! lives only for one configuration attempt and is destroyed by the host on
//! completion or abandonment.

use std::sync::Arc;

use tracing::{debug, error};

use homelink_core::{
    ConfigEntry, ConnectError, FieldMap, FormErrors, FormSchema, StepOutcome,
};

use crate::config::{ApiVersion, CONF_API_VERSION, CONF_TOKEN, CONF_USERNAME, InfluxSettings};
use crate::probe::InfluxProbe;
use crate::schema::{API_VERSION_SCHEMA, CONNECTION_SCHEMA_V1, CONNECTION_SCHEMA_V2};

pub const STEP_USER: &str = "user";
pub const STEP_CONNECTION: &str = "connection";

// Message keys surfaced to the form; resolved by the host's translations.
const ERROR_WRITE_TOKEN: &str = "write_error_token";
const ERROR_WRITE_BASIC: &str = "write_error_basic";
const ERROR_CONNECTION: &str = "connection_error";
const ERROR_UNKNOWN: &str = "unknown";
const ERROR_INVALID_INPUT: &str = "invalid_input";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowState {
    AwaitingVersionChoice,
    AwaitingConnectionDetails,
}

/// One InfluxDB configuration attempt.
pub struct InfluxConfigFlow {
    probe: Arc<dyn InfluxProbe>,
    state: FlowState,
    version: ApiVersion,
}

impl std::fmt::Debug for InfluxConfigFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxConfigFlow")
            .field("state", &self.state)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl InfluxConfigFlow {
    pub fn new(probe: Arc<dyn InfluxProbe>) -> Self {
        Self {
            probe,
            state: FlowState::AwaitingVersionChoice,
            version: ApiVersion::default(),
        }
    }

    fn connection_schema(version: ApiVersion) -> &'static FormSchema {
        match version {
            ApiVersion::V1 => &CONNECTION_SCHEMA_V1,
            ApiVersion::V2 => &CONNECTION_SCHEMA_V2,
        }
    }

    /// Handle one step invocation: no input renders the current form, input
    /// processes a submission.
    pub async fn step(&mut self, input: Option<&FieldMap>) -> StepOutcome {
        match self.state {
            FlowState::AwaitingVersionChoice => match input {
                None => StepOutcome::form(STEP_USER, &API_VERSION_SCHEMA),
                Some(input) => self.choose_version(input),
            },
            FlowState::AwaitingConnectionDetails => match input {
                None => StepOutcome::form(STEP_CONNECTION, Self::connection_schema(self.version)),
                Some(input) => self.submit_connection(input).await,
            },
        }
    }

    fn choose_version(&mut self, input: &FieldMap) -> StepOutcome {
        let normalized = match API_VERSION_SCHEMA.normalize(input) {
            Ok(normalized) => normalized,
            Err(e) => {
                debug!("Version selection rejected: {e}");
                return StepOutcome::form_with_errors(
                    STEP_USER,
                    &API_VERSION_SCHEMA,
                    FormErrors::base(ERROR_INVALID_INPUT),
                );
            }
        };

        let raw = normalized
            .get(CONF_API_VERSION)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        match raw.parse::<ApiVersion>() {
            Ok(version) => {
                debug!("API version selected: {version}");
                self.version = version;
                self.state = FlowState::AwaitingConnectionDetails;
                StepOutcome::form(STEP_CONNECTION, Self::connection_schema(version))
            }
            Err(e) => {
                debug!("Version selection rejected: {e}");
                StepOutcome::form_with_errors(
                    STEP_USER,
                    &API_VERSION_SCHEMA,
                    FormErrors::base(ERROR_INVALID_INPUT),
                )
            }
        }
    }

    async fn submit_connection(&mut self, input: &FieldMap) -> StepOutcome {
        let schema = Self::connection_schema(self.version);

        let normalized = match schema.normalize(input) {
            Ok(normalized) => normalized,
            Err(e) => {
                // Malformed input never reaches the probe. The original
                // behavior here was to re-show the form silently; surfacing
                // a generic error instead is a deliberate fix.
                debug!("Connection details rejected: {e}");
                return StepOutcome::form_with_errors(
                    STEP_CONNECTION,
                    schema,
                    FormErrors::base(ERROR_INVALID_INPUT),
                );
            }
        };

        let settings = InfluxSettings::from_fields(self.version, &normalized);
        match self.probe.attempt_connect(&settings).await {
            Ok(()) => StepOutcome::Entry(ConfigEntry {
                title: format!("InfluxDB ({})", settings.host),
                unique_id: None,
                data: settings.to_value(),
            }),
            Err(ConnectError::AuthRejected) => {
                // The error key follows the selected version's credential
                // field, not whichever field the server actually disliked.
                let errors = match self.version {
                    ApiVersion::V1 => FormErrors::field(CONF_USERNAME, ERROR_WRITE_BASIC),
                    ApiVersion::V2 => FormErrors::field(CONF_TOKEN, ERROR_WRITE_TOKEN),
                };
                error!("InfluxDB rejected the supplied credentials");
                StepOutcome::form_with_errors(STEP_CONNECTION, schema, errors)
            }
            Err(e @ (ConnectError::Unreachable(_) | ConnectError::Timeout(_))) => {
                error!("InfluxDB unreachable: {e}");
                StepOutcome::form_with_errors(
                    STEP_CONNECTION,
                    schema,
                    FormErrors::base(ERROR_CONNECTION),
                )
            }
            Err(ConnectError::Other(detail)) => {
                // Full detail goes to the log only; the user sees a generic
                // message.
                error!("InfluxDB connection test failed: {detail}");
                StepOutcome::form_with_errors(
                    STEP_CONNECTION,
                    schema,
                    FormErrors::base(ERROR_UNKNOWN),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct ScriptedProbe {
        outcome: Mutex<Option<ConnectError>>,
        calls: AtomicUsize,
        last_settings: Mutex<Option<InfluxSettings>>,
    }

    impl ScriptedProbe {
        fn failing(error: ConnectError) -> Arc<Self> {
            Arc::new(Self { outcome: Mutex::new(Some(error)), ..Self::default() })
        }

        fn succeeding() -> Arc<Self> {
            Arc::new(Self::default())
        }
    }

    #[async_trait]
    impl InfluxProbe for ScriptedProbe {
        async fn attempt_connect(&self, settings: &InfluxSettings) -> Result<(), ConnectError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_settings.lock() = Some(settings.clone());
            match self.outcome.lock().clone() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    fn fields(value: serde_json::Value) -> FieldMap {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    async fn advance_to_connection(flow: &mut InfluxConfigFlow, version: &str) {
        let outcome = flow.step(None).await;
        assert!(matches!(outcome, StepOutcome::Form { step_id: STEP_USER, .. }));

        let outcome = flow
            .step(Some(&fields(json!({ CONF_API_VERSION: version }))))
            .await;
        assert!(matches!(outcome, StepOutcome::Form { step_id: STEP_CONNECTION, .. }));
    }

    #[tokio::test]
    async fn version_choice_selects_matching_schema() {
        let mut flow = InfluxConfigFlow::new(ScriptedProbe::succeeding());
        advance_to_connection(&mut flow, "2").await;

        let outcome = flow.step(None).await;
        let schema = outcome.shown_schema().unwrap();
        assert!(schema.field(CONF_TOKEN).is_some());
        assert!(schema.field("database").is_none());
    }

    #[tokio::test]
    async fn submitting_other_versions_fields_fails_validation() {
        let probe = ScriptedProbe::succeeding();
        let mut flow = InfluxConfigFlow::new(probe.clone());
        advance_to_connection(&mut flow, "1").await;

        // V2's required-only triple does not satisfy the V1 schema.
        let outcome = flow
            .step(Some(&fields(json!({
                "token": "t0ken", "org": "home", "bucket": "telemetry"
            }))))
            .await;

        let errors = outcome.errors().unwrap();
        assert_eq!(errors.get("base"), Some("invalid_input"));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submitting_v1_fields_to_the_v2_schema_fails_validation() {
        let probe = ScriptedProbe::succeeding();
        let mut flow = InfluxConfigFlow::new(probe.clone());
        advance_to_connection(&mut flow, "2").await;

        // V1's required-only set lacks the token/org/bucket triple.
        let outcome = flow.step(Some(&fields(json!({"database": "home"})))).await;
        assert_eq!(outcome.errors().unwrap().get("base"), Some("invalid_input"));

        // Even a complete V2 submission is rejected if a V1-only field tags
        // along; the V2 schema does not know a database field.
        let outcome = flow
            .step(Some(&fields(json!({
                "token": "t0ken", "org": "home", "bucket": "telemetry",
                "database": "home"
            }))))
            .await;
        assert_eq!(outcome.errors().unwrap().get("base"), Some("invalid_input"));

        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn auth_rejection_keys_error_by_version_credential_field() {
        for (version, expected_key, expected_message) in [
            ("1", CONF_USERNAME, "write_error_basic"),
            ("2", CONF_TOKEN, "write_error_token"),
        ] {
            let probe = ScriptedProbe::failing(ConnectError::AuthRejected);
            let mut flow = InfluxConfigFlow::new(probe);
            advance_to_connection(&mut flow, version).await;

            let input = if version == "1" {
                json!({"database": "home", "username": "writer", "password": "wrong"})
            } else {
                json!({"token": "bad", "org": "home", "bucket": "telemetry"})
            };
            let outcome = flow.step(Some(&fields(input))).await;

            assert!(matches!(outcome, StepOutcome::Form { step_id: STEP_CONNECTION, .. }));
            let errors = outcome.errors().unwrap();
            assert_eq!(errors.get(expected_key), Some(expected_message));
            assert_eq!(errors.get("base"), None);
        }
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_form_scoped_error() {
        let probe = ScriptedProbe::failing(ConnectError::Unreachable("refused".to_owned()));
        let mut flow = InfluxConfigFlow::new(probe);
        advance_to_connection(&mut flow, "1").await;

        let outcome = flow.step(Some(&fields(json!({"database": "home"})))).await;
        assert_eq!(outcome.errors().unwrap().get("base"), Some("connection_error"));
    }

    #[tokio::test]
    async fn unknown_failure_stays_generic() {
        let probe = ScriptedProbe::failing(ConnectError::Other("stack trace goes here".to_owned()));
        let mut flow = InfluxConfigFlow::new(probe);
        advance_to_connection(&mut flow, "1").await;

        let outcome = flow.step(Some(&fields(json!({"database": "home"})))).await;
        let errors = outcome.errors().unwrap();
        assert_eq!(errors.get("base"), Some("unknown"));
    }

    #[tokio::test]
    async fn success_creates_entry_with_normalized_data() {
        let probe = ScriptedProbe::succeeding();
        let mut flow = InfluxConfigFlow::new(probe.clone());
        advance_to_connection(&mut flow, "2").await;

        let outcome = flow
            .step(Some(&fields(json!({
                "host": "influx.lan",
                "token": "t0ken",
                "org": "home",
                "bucket": "telemetry"
            }))))
            .await;

        let StepOutcome::Entry(entry) = outcome else {
            panic!("expected an entry, got {outcome:?}");
        };
        assert_eq!(entry.title, "InfluxDB (influx.lan)");
        assert!(entry.unique_id.is_none());

        // Defaults applied for omitted optional fields.
        assert_eq!(entry.data["ssl"], json!(true));
        assert_eq!(entry.data["host"], json!("influx.lan"));
        assert_eq!(entry.data["token"], json!("t0ken"));
        assert_eq!(entry.data["api_version"], json!("2"));
        assert!(entry.data.get("database").is_none());

        // The entry payload matches what the probe was given.
        let probed = probe.last_settings.lock().clone().unwrap();
        assert_eq!(entry.data, probed.to_value());
    }

    #[tokio::test]
    async fn failed_attempt_keeps_flow_on_connection_step() {
        let probe = ScriptedProbe::failing(ConnectError::AuthRejected);
        let mut flow = InfluxConfigFlow::new(probe.clone());
        advance_to_connection(&mut flow, "1").await;

        let input = fields(json!({"database": "home", "username": "writer"}));
        let _ = flow.step(Some(&input)).await;

        // A corrected resubmission goes through the same step again.
        *probe.outcome.lock() = None;
        let outcome = flow.step(Some(&input)).await;
        assert!(matches!(outcome, StepOutcome::Entry(_)));
    }
}
