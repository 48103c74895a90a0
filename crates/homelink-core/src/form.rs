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

//! Declarative field schemas for wizard forms.
//!
//! Each setup step publishes a `FormSchema` describing the exact field
//! contract (name, type, required/optional, default). Submissions are
//! normalized against the schema before the flow acts on them: defaults are
//! applied for omitted optional fields and malformed input is rejected with
//! a [`ValidationError`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ValidationError;

/// A submitted (or normalized) set of form fields.
pub type FieldMap = serde_json::Map<String, Value>;

/// Error key used for form-scoped (non-field) errors.
pub const BASE_ERROR_KEY: &str = "base";

/// Value type of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Text,
    /// Rendered masked by the host; otherwise identical to `Text`.
    Secret,
    /// TCP port, accepted as an integer or a digit string.
    Port,
}

/// Default applied when an optional field is omitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Bool(bool),
    Text(&'static str),
    Port(u16),
}

impl FieldDefault {
    fn to_value(self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b),
            Self::Text(s) => Value::String(s.to_owned()),
            Self::Port(p) => Value::Number(p.into()),
        }
    }
}

/// One field of a wizard form.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Applied when the field is omitted. Only meaningful for optional fields.
    pub default: Option<FieldDefault>,
    /// Pre-filled but editable value shown by the host, not applied silently.
    pub suggested: Option<&'static str>,
}

impl FieldSpec {
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false, default: None, suggested: None }
    }

    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true, default: None, suggested: None }
    }

    pub const fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn with_suggested(mut self, suggested: &'static str) -> Self {
        self.suggested = Some(suggested);
        self
    }

    fn coerce(&self, value: &Value) -> Result<Value, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidValue {
            field: self.name.to_owned(),
            reason: reason.to_owned(),
        };

        match self.kind {
            FieldKind::Bool => match value {
                Value::Bool(_) => Ok(value.clone()),
                _ => Err(invalid("expected a boolean")),
            },
            FieldKind::Text | FieldKind::Secret => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(invalid("expected a string")),
            },
            FieldKind::Port => {
                let port = match value {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.parse::<u64>().ok(),
                    _ => None,
                };
                match port {
                    Some(p) if (1..=65535).contains(&p) => Ok(Value::Number(p.into())),
                    _ => Err(invalid("expected a port number (1-65535)")),
                }
            }
        }
    }
}

/// Declarative schema for one wizard step.
#[derive(Debug, Clone, Copy)]
pub struct FormSchema {
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// Validate a submission against this schema.
    ///
    /// Returns the normalized field map: every supplied field type-checked
    /// and coerced, defaults filled in for omitted optional fields. Missing
    /// required fields and fields not in the schema are rejected.
    pub fn normalize(&self, input: &FieldMap) -> Result<FieldMap, ValidationError> {
        let mut normalized = FieldMap::new();

        for spec in self.fields {
            match input.get(spec.name) {
                Some(value) => {
                    normalized.insert(spec.name.to_owned(), spec.coerce(value)?);
                }
                None if spec.required => {
                    return Err(ValidationError::MissingField(spec.name.to_owned()));
                }
                None => {
                    if let Some(default) = spec.default {
                        normalized.insert(spec.name.to_owned(), default.to_value());
                    }
                }
            }
        }

        for key in input.keys() {
            if !self.fields.iter().any(|spec| spec.name == key) {
                return Err(ValidationError::UnknownField(key.clone()));
            }
        }

        Ok(normalized)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

/// Errors attached to a re-shown form, keyed by field name or [`BASE_ERROR_KEY`].
///
/// Values are message keys resolved by the host's translation layer, never
/// raw error text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(field: &str, message_key: &str) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message_key);
        errors
    }

    pub fn base(message_key: &str) -> Self {
        Self::field(BASE_ERROR_KEY, message_key)
    }

    pub fn insert(&mut self, key: &str, message_key: &str) {
        self.0.insert(key.to_owned(), message_key.to_owned());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
