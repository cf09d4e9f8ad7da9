// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `idlewave` - keep Z-Wave dimmer LED colors in sync with power state.
//!
//! This library implements the device-status reconciliation core of an
//! idle-light-colors integration for HS-WD200+ family dimmers: when a
//! managed dimmer turns on or off, its LED bar color is switched between a
//! user-configured active and idle color by writing the device's
//! normal-mode LED configuration parameter through the downstream Z-Wave
//! integration plugin.
//!
//! # What it handles
//!
//! - **Device catalog**: classifies the host's device registry snapshot
//!   down to the set of supported dimmers, keyed by device reference
//! - **Reconciliation**: a debounced, idempotent loop that pushes color
//!   updates in response to value-change events and settings edits
//! - **Protocol versioning**: transparently negotiates among three
//!   incompatible calling conventions of the downstream configuration
//!   API, self-healing when its assumption turns out wrong
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use idlewave::catalog::DeviceCatalog;
//! use idlewave::engine::ReconcileEngine;
//! use idlewave::types::DeviceRef;
//! # use idlewave::host::{CallArg, CallReply, StatusSource, ZWaveLink};
//! # struct MyHost;
//! # impl StatusSource for MyHost {
//! #     fn power_level(&self, _: DeviceRef) -> f64 { 0.0 }
//! # }
//! # impl ZWaveLink for MyHost {
//! #     fn plugin_version(&self) -> String { "4.0.0".to_string() }
//! #     fn invoke(&self, _: &str, _: &[CallArg]) -> Option<CallReply> { None }
//! # }
//! # fn enumerate_host_devices() -> Vec<idlewave::catalog::RawDeviceDescriptor> { Vec::new() }
//!
//! #[tokio::main]
//! async fn main() -> idlewave::Result<()> {
//!     let host = Arc::new(MyHost);
//!
//!     // Build the catalog once, from a startup snapshot of the registry.
//!     let catalog = DeviceCatalog::build(enumerate_host_devices())?;
//!
//!     let engine = ReconcileEngine::new(catalog, Arc::clone(&host), host);
//!
//!     // Wire the host's event callback to the engine; it filters
//!     // irrelevant devices itself.
//!     engine.on_device_value_changed(DeviceRef::new(100), 55.0);
//!     Ok(())
//! }
//! ```
//!
//! # Settings surface
//!
//! The settings page renders its color dropdowns from
//! [`settings::palette`] and commits choices with [`settings::save`]
//! followed by
//! [`ReconcileEngine::on_color_configuration_changed`](engine::ReconcileEngine::on_color_configuration_changed).
//! Rapid edits are debounced; only the settled configuration is pushed.

pub mod adapter;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod host;
pub mod policy;
pub mod settings;
pub mod types;

#[cfg(feature = "analytics")]
pub mod analytics;

pub use adapter::{AdapterMode, ConfigAdapter, LegacyConfigResult};
pub use catalog::{DeviceCatalog, DimmerDevice, MetadataBag, RawDeviceDescriptor};
pub use engine::{EngineConfig, ReconcileEngine};
pub use error::{AdapterError, CatalogError, Error, Result, ValueError};
pub use host::{CallArg, CallReply, SettingsStore, StatusSource, ZWaveLink};
pub use policy::ColorPolicy;
pub use types::{ConfigParam, DeviceRef, NodeAddress, NormalModeColor, StatusModeColor};
