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

//! Error taxonomy shared by the setup flows and the polling coordinator.

use thiserror::Error;

/// Outcome of a live connection attempt made during a setup flow.
///
/// Wizards catch every variant locally and convert it into a form error;
/// none of these ever propagates out of a flow step.
#[derive(Debug, Clone, Error)]
pub enum ConnectError {
    /// The endpoint answered but rejected the supplied credentials.
    #[error("credentials rejected by endpoint")]
    AuthRejected,

    /// The endpoint could not be reached at all.
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    /// The bounded connection attempt ran past its deadline.
    #[error("connection attempt timed out after {0}s")]
    Timeout(u64),

    /// Anything else. The detail is for the log only, never for the form.
    #[error("connection attempt failed: {0}")]
    Other(String),
}

/// A failed polling cycle, handed to the host scheduler as one typed signal.
///
/// The host keeps the last good snapshot and marks the integration
/// unavailable; the coordinator itself never raises uncaught.
#[derive(Debug, Clone, Error)]
pub enum UpdateError {
    /// Device login did not report success at the start of the cycle.
    #[error("device login did not succeed, check configuration")]
    AuthFailed,

    /// One facet fetch exceeded its deadline, aborting the whole cycle.
    #[error("facet '{facet}' timed out after {secs}s")]
    Timeout { facet: String, secs: u64 },

    /// The client library reported a failure for one of the calls.
    #[error("client call '{facet}' failed: {message}")]
    Client { facet: String, message: String },
}

/// Malformed wizard input, caught before any connection attempt is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field '{0}' is missing")]
    MissingField(String),

    #[error("field '{field}' has an invalid value: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("unknown field '{0}'")]
    UnknownField(String),
}
