// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Version-adaptive adapter for the downstream configuration API.
//!
//! Three generations of the downstream Z-Wave plugin expose the same
//! logical "set configuration parameter" operation under incompatible
//! calling conventions. The adapter detects the generation at runtime from
//! the plugin's version string and, for v3, self-heals when its assumption
//! turns out too modern:
//!
//! - `Unknown -> Hs4Native` (major version 4): modern operation, int-typed
//!   arguments, string result.
//! - `Unknown -> Legacy` (major version 3): modern operation name with the
//!   older byte-typed argument form.
//! - `Legacy -> LegacyPreParam`: a null reply under v3 is the documented
//!   signature of builds that predate the modern operation; the adapter
//!   downgrades once per process and immediately retries the same write
//!   under the legacy-named operation.
//!
//! Any other major version is fatal: the adapter refuses all further calls
//! until the process restarts.

mod legacy;

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::AdapterError;
use crate::host::{CallArg, CallReply, ZWaveLink};
use crate::types::{ConfigParam, NormalModeColor};

pub use legacy::LegacyConfigResult;

/// The modern parameter-write operation name.
const OP_SET_PARAMETER: &str = "SetDeviceParameterValue";

/// The legacy parameter-write operation name.
const OP_CONFIGURATION_SET: &str = "Configuration_Set";

/// All WD200-family parameters are written as single-byte values.
const PARAM_VALUE_SIZE: u8 = 1;

/// Outcome description used when a call unexpectedly returns no result.
const NO_REPLY: &str = "no result from Z-Wave plugin";

/// Detected calling convention of the downstream plugin.
///
/// `Hs4Native` and `LegacyPreParam` are terminal for the life of the
/// process; `Legacy` can downgrade once to `LegacyPreParam`. The mode is
/// never persisted and is rediscovered on every start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterMode {
    /// No call has been made yet; the version is undetected.
    Unknown,
    /// Downstream major version 4: modern convention.
    Hs4Native,
    /// Downstream major version 3 with the modern operation available.
    Legacy,
    /// Downstream major version 3 predating the modern operation.
    LegacyPreParam,
    /// Version detection failed; the adapter refuses all calls.
    Failed {
        /// The version string that failed to classify.
        version: String,
    },
}

/// Resolved convention for a single call. Unlike [`AdapterMode`] this can
/// only name the three callable shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Convention {
    Hs4Native,
    Legacy,
    LegacyPreParam,
}

/// Adapter that performs parameter writes against the downstream plugin,
/// masking the differences between its calling conventions.
#[derive(Debug)]
pub struct ConfigAdapter<L: ZWaveLink> {
    link: Arc<L>,
    mode: Mutex<AdapterMode>,
}

impl<L: ZWaveLink> ConfigAdapter<L> {
    /// Creates an adapter in the undetected state.
    #[must_use]
    pub fn new(link: Arc<L>) -> Self {
        Self {
            link,
            mode: Mutex::new(AdapterMode::Unknown),
        }
    }

    /// Returns the currently detected adapter mode.
    #[must_use]
    pub fn mode(&self) -> AdapterMode {
        self.mode.lock().clone()
    }

    /// Sets the normal-mode LED color of a dimmer.
    ///
    /// Returns a human-readable description of the downstream outcome.
    /// Downstream faults are folded into the description; the only error
    /// is the unrecoverable version-detection failure.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::UnsupportedVersion` when the downstream
    /// plugin version is neither major 3 nor major 4.
    pub fn set_color(
        &self,
        home_id: &str,
        node_id: u8,
        color: NormalModeColor,
    ) -> Result<String, AdapterError> {
        self.set_parameter(home_id, node_id, ConfigParam::NormalModeLedColor, color.value())
    }

    /// Writes a configuration parameter on a device.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::UnsupportedVersion` when the downstream
    /// plugin version is neither major 3 nor major 4.
    pub fn set_parameter(
        &self,
        home_id: &str,
        node_id: u8,
        param: ConfigParam,
        value: u8,
    ) -> Result<String, AdapterError> {
        let convention = self.resolve_convention()?;

        let outcome = match convention {
            Convention::Hs4Native => {
                let args = hs4_args(home_id, node_id, param, value);
                describe_reply(self.link.invoke(OP_SET_PARAMETER, &args))
            }
            Convention::Legacy => {
                let args = legacy_args(home_id, node_id, param, value);
                match self.link.invoke(OP_SET_PARAMETER, &args) {
                    Some(reply) => describe_reply(Some(reply)),
                    // The documented failure signature of pre-parameter-value
                    // builds. Downgrade and retry the same write once.
                    None => {
                        self.downgrade_to_pre_param();
                        describe_reply(self.link.invoke(OP_CONFIGURATION_SET, &args))
                    }
                }
            }
            Convention::LegacyPreParam => {
                let args = legacy_args(home_id, node_id, param, value);
                describe_reply(self.link.invoke(OP_CONFIGURATION_SET, &args))
            }
        };

        Ok(outcome)
    }

    /// Resolves the convention for the next call, detecting the downstream
    /// version on first use.
    fn resolve_convention(&self) -> Result<Convention, AdapterError> {
        let mut mode = self.mode.lock();
        match &*mode {
            AdapterMode::Unknown => {
                let version = self.link.plugin_version();
                match leading_major(&version) {
                    Some(3) => {
                        tracing::info!(version = %version, "Detected legacy Z-Wave plugin");
                        *mode = AdapterMode::Legacy;
                        Ok(Convention::Legacy)
                    }
                    Some(4) => {
                        tracing::info!(version = %version, "Detected HS4-native Z-Wave plugin");
                        *mode = AdapterMode::Hs4Native;
                        Ok(Convention::Hs4Native)
                    }
                    _ => {
                        tracing::error!(
                            version = %version,
                            "Unsupported Z-Wave plugin version; refusing all configuration calls"
                        );
                        *mode = AdapterMode::Failed {
                            version: version.clone(),
                        };
                        Err(AdapterError::UnsupportedVersion { version })
                    }
                }
            }
            AdapterMode::Hs4Native => Ok(Convention::Hs4Native),
            AdapterMode::Legacy => Ok(Convention::Legacy),
            AdapterMode::LegacyPreParam => Ok(Convention::LegacyPreParam),
            AdapterMode::Failed { version } => Err(AdapterError::UnsupportedVersion {
                version: version.clone(),
            }),
        }
    }

    /// One-way `Legacy -> LegacyPreParam` transition. Idempotent so a
    /// concurrent caller observing the same null reply cannot double-log.
    fn downgrade_to_pre_param(&self) {
        let mut mode = self.mode.lock();
        if *mode == AdapterMode::Legacy {
            tracing::warn!(
                "Modern parameter write returned no result; \
                 switching to the pre-parameter-value convention"
            );
            *mode = AdapterMode::LegacyPreParam;
        }
    }
}

/// Modern argument shape: everything int-typed.
fn hs4_args(home_id: &str, node_id: u8, param: ConfigParam, value: u8) -> [CallArg; 5] {
    [
        CallArg::Str(home_id.to_string()),
        CallArg::Int(i32::from(node_id)),
        CallArg::Int(i32::from(param.value())),
        CallArg::Int(i32::from(PARAM_VALUE_SIZE)),
        CallArg::Int(i32::from(value)),
    ]
}

/// Legacy argument shape: byte-typed node, parameter, and size.
fn legacy_args(home_id: &str, node_id: u8, param: ConfigParam, value: u8) -> [CallArg; 5] {
    [
        CallArg::Str(home_id.to_string()),
        CallArg::Byte(node_id),
        CallArg::Byte(param.value()),
        CallArg::Byte(PARAM_VALUE_SIZE),
        CallArg::Int(i32::from(value)),
    ]
}

/// Folds any reply shape into one human-readable outcome string.
fn describe_reply(reply: Option<CallReply>) -> String {
    match reply {
        Some(CallReply::Text(text)) => text,
        Some(CallReply::Legacy(result)) => result.to_string(),
        None => {
            tracing::warn!("Configuration call returned no result");
            NO_REPLY.to_string()
        }
    }
}

/// Parses the leading major component of a version string.
fn leading_major(version: &str) -> Option<u32> {
    version.split('.').next()?.trim().parse().ok()
}
