// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Traits at the host plugin boundary.
//!
//! The embedding plugin implements these against the real host APIs. They
//! cover the three things the library needs from outside: live device
//! status, the downstream Z-Wave configuration call, and the INI-style
//! settings store. Everything behind them is a thin I/O wrapper with no
//! logic of its own.

use crate::adapter::LegacyConfigResult;
use crate::types::DeviceRef;

/// Source of live device status values.
pub trait StatusSource: Send + Sync {
    /// Returns the current power level of a device (0 when off, the dim
    /// percentage or 255 when on).
    fn power_level(&self, device_ref: DeviceRef) -> f64;
}

/// One argument of a downstream configuration call.
///
/// The downstream API takes an untyped argument tuple; the exact primitive
/// type of each slot is part of the calling convention and differs between
/// plugin generations.
#[derive(Debug, Clone, PartialEq)]
pub enum CallArg {
    /// A string argument (the home id).
    Str(String),
    /// A byte-typed argument (legacy conventions).
    Byte(u8),
    /// An int-typed argument.
    Int(i32),
}

/// Reply of a downstream configuration call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallReply {
    /// A string outcome description (modern plugin builds).
    Text(String),
    /// The older enumerated result type (pre-parameter-value builds).
    Legacy(LegacyConfigResult),
}

/// Invocation surface of the downstream Z-Wave integration plugin.
///
/// `invoke` models the host's untyped plugin-function call: `None` is the
/// downstream null result, which under the legacy convention is the
/// documented failure signature of builds that predate the modern
/// parameter-value operation.
pub trait ZWaveLink: Send + Sync {
    /// Returns the downstream plugin's self-reported version string
    /// (`"major.minor.patch..."`).
    fn plugin_version(&self) -> String;

    /// Invokes a named operation on the downstream plugin.
    fn invoke(&self, operation: &str, args: &[CallArg]) -> Option<CallReply>;
}

/// INI-style persistent settings store provided by the host.
pub trait SettingsStore: Send + Sync {
    /// Loads a setting, returning `default` when the key is absent.
    fn load(&self, key: &str, default: &str) -> String;

    /// Saves a setting.
    fn save(&self, key: &str, value: &str);
}
