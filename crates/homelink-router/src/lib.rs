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

//! Router integration: a single-step setup wizard, a credentials-only
//! options flow and a fixed-interval polling coordinator.
//!
//! The router protocol itself lives in a client library behind the
//! [`RouterClient`] seam; this crate only decides when to call it, how long
//! to wait and what to do with the results.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod flow;
pub mod snapshot;

pub use client::{ClientError, FacetMap, LanConfigSecurity, RouterClient, RouterConnector};
pub use config::{DEVICE_SCHEMA, OPTIONS_SCHEMA, RouterConfig};
pub use coordinator::RouterCoordinator;
pub use flow::{RouterConfigFlow, RouterOptionsFlow};
pub use snapshot::RouterSnapshot;
