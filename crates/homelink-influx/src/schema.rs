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

//! Literal field contracts of the two wizard steps.
//!
//! The two connection schemas have disjoint required-field sets: V1 requires
//! a database name, V2 requires the token/org/bucket triple.

use homelink_core::{FieldDefault, FieldKind, FieldSpec, FormSchema};

use crate::config::{
    CONF_API_VERSION, CONF_BUCKET, CONF_DATABASE, CONF_HOST, CONF_ORG, CONF_PASSWORD, CONF_PATH,
    CONF_PORT, CONF_SSL, CONF_TOKEN, CONF_USERNAME, CONF_VERIFY_SSL, DEFAULT_BUCKET,
    DEFAULT_DATABASE, DEFAULT_HOST_V1, DEFAULT_HOST_V2, DEFAULT_PORT_V1, DEFAULT_SSL_V1,
    DEFAULT_SSL_V2, DEFAULT_VERIFY_SSL,
};

/// Step 1: API version selector.
pub static API_VERSION_SCHEMA: FormSchema = FormSchema::new(&[
    FieldSpec::optional(CONF_API_VERSION, FieldKind::Text).with_default(FieldDefault::Text("1")),
]);

/// Step 2 for V1 servers: basic auth plus a required database name.
pub static CONNECTION_SCHEMA_V1: FormSchema = FormSchema::new(&[
    FieldSpec::optional(CONF_SSL, FieldKind::Bool).with_default(FieldDefault::Bool(DEFAULT_SSL_V1)),
    FieldSpec::optional(CONF_VERIFY_SSL, FieldKind::Bool)
        .with_default(FieldDefault::Bool(DEFAULT_VERIFY_SSL)),
    FieldSpec::optional(CONF_HOST, FieldKind::Text)
        .with_default(FieldDefault::Text(DEFAULT_HOST_V1)),
    FieldSpec::optional(CONF_PORT, FieldKind::Port)
        .with_default(FieldDefault::Port(DEFAULT_PORT_V1)),
    FieldSpec::optional(CONF_PATH, FieldKind::Text),
    FieldSpec::optional(CONF_USERNAME, FieldKind::Text),
    FieldSpec::optional(CONF_PASSWORD, FieldKind::Secret),
    FieldSpec::required(CONF_DATABASE, FieldKind::Text).with_suggested(DEFAULT_DATABASE),
]);

/// Step 2 for V2 servers: a required token/org/bucket triple.
pub static CONNECTION_SCHEMA_V2: FormSchema = FormSchema::new(&[
    FieldSpec::optional(CONF_SSL, FieldKind::Bool).with_default(FieldDefault::Bool(DEFAULT_SSL_V2)),
    FieldSpec::optional(CONF_HOST, FieldKind::Text)
        .with_default(FieldDefault::Text(DEFAULT_HOST_V2)),
    FieldSpec::optional(CONF_PORT, FieldKind::Port),
    FieldSpec::optional(CONF_PATH, FieldKind::Text),
    FieldSpec::required(CONF_TOKEN, FieldKind::Secret),
    FieldSpec::required(CONF_ORG, FieldKind::Text),
    FieldSpec::required(CONF_BUCKET, FieldKind::Text).with_suggested(DEFAULT_BUCKET),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_sets_are_disjoint() {
        let required = |schema: &FormSchema| {
            schema
                .fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name)
                .collect::<Vec<_>>()
        };

        assert_eq!(required(&CONNECTION_SCHEMA_V1), vec![CONF_DATABASE]);
        assert_eq!(required(&CONNECTION_SCHEMA_V2), vec![CONF_TOKEN, CONF_ORG, CONF_BUCKET]);
    }

    #[test]
    fn version_selector_defaults_to_v1() {
        let field = API_VERSION_SCHEMA.field(CONF_API_VERSION).unwrap();
        assert_eq!(field.default, Some(FieldDefault::Text("1")));
    }
}
