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

//! InfluxDB integration: a two-step connection wizard.
//!
//! Step one picks the API version, step two collects version-specific
//! connection and auth fields and attempts a live connection before the
//! entry is persisted.

pub mod config;
pub mod flow;
pub mod probe;
pub mod schema;

pub use config::{ApiVersion, InfluxSettings};
pub use flow::InfluxConfigFlow;
pub use probe::{HttpInfluxProbe, InfluxProbe};
pub use schema::{API_VERSION_SCHEMA, CONNECTION_SCHEMA_V1, CONNECTION_SCHEMA_V2};
