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

//! Tracing initialization.

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize tracing with env filter support.
///
/// Respects the RUST_LOG environment variable; defaults to `info`. Safe to
/// call more than once (subsequent calls are no-ops), so tests can call it
/// freely.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        info!("📋 Tracing initialized");
    }
}
