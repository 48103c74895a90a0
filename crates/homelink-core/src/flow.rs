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

//! Wizard step protocol.
//!
//! Each step invocation receives either no input (render the form) or a
//! submitted field map, and answers with one of the [`StepOutcome`]
//! variants. The host renders forms, persists entries and tears the flow
//! down on completion or abort; flow state never outlives one attempt.

use serde_json::Value;

use crate::form::{FormErrors, FormSchema};

/// A finished configuration record, persisted by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    /// Human-readable entry title, shown in the host UI.
    pub title: String,
    /// Stable identity used to deduplicate setups of the same device.
    pub unique_id: Option<String>,
    /// Normalized configuration payload.
    pub data: Value,
}

/// Answer of one wizard step invocation.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// Render (or re-render) a form. `errors` is empty on first render.
    Form {
        step_id: &'static str,
        schema: &'static FormSchema,
        errors: FormErrors,
    },
    /// The flow finished; the host persists the entry and destroys the flow.
    Entry(ConfigEntry),
    /// The flow cannot continue, e.g. the device is already configured.
    Abort { reason: &'static str },
}

impl StepOutcome {
    pub fn form(step_id: &'static str, schema: &'static FormSchema) -> Self {
        Self::Form { step_id, schema, errors: FormErrors::new() }
    }

    pub fn form_with_errors(
        step_id: &'static str,
        schema: &'static FormSchema,
        errors: FormErrors,
    ) -> Self {
        Self::Form { step_id, schema, errors }
    }

    /// The schema shown by this outcome, if it is a form.
    pub fn shown_schema(&self) -> Option<&'static FormSchema> {
        match self {
            Self::Form { schema, .. } => Some(schema),
            Self::Entry(_) | Self::Abort { .. } => None,
        }
    }

    pub fn errors(&self) -> Option<&FormErrors> {
        match self {
            Self::Form { errors, .. } => Some(errors),
            Self::Entry(_) | Self::Abort { .. } => None,
        }
    }
}
