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

//! HomeLink core - shared plumbing for integration setup flows and polling.
//!
//! The host framework (entity registry, persisted entries, scheduler) is
//! abstracted here as small capability contracts so that the integration
//! crates never talk to host internals directly.

pub mod coordinator;
pub mod entry;
pub mod error;
pub mod flow;
pub mod form;
pub mod telemetry;

pub use coordinator::{
    DEFAULT_EXECUTOR_SLOTS, DEFAULT_UPDATE_INTERVAL, ExecutorSlots, PollDriver, PollSource,
};
pub use entry::{EntryId, EntryStore, EntryStoreError, StoredEntry};
pub use error::{ConnectError, UpdateError, ValidationError};
pub use flow::{ConfigEntry, StepOutcome};
pub use form::{BASE_ERROR_KEY, FieldDefault, FieldKind, FieldMap, FieldSpec, FormErrors, FormSchema};
pub use telemetry::init_tracing;
