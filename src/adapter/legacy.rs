// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The enumerated result type of pre-parameter-value plugin builds.

use std::fmt;

/// Result code returned by the legacy `Configuration_Set` operation.
///
/// Older downstream builds report outcomes as this enumerated type rather
/// than a string. It is normalized to the same string representation used
/// by the modern conventions, so logging and comparison are uniform across
/// adapter modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyConfigResult {
    /// The parameter write was applied.
    Success,
    /// The write was queued for a sleeping device.
    Queued,
    /// The device did not acknowledge in time.
    Timeout,
    /// The write was rejected.
    Failed,
    /// The addressed node does not exist.
    InvalidNode,
    /// A result code outside the documented set.
    Unknown,
}

impl LegacyConfigResult {
    /// Decodes the raw downstream integer. Out-of-range codes map to
    /// [`Unknown`](Self::Unknown).
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Success,
            1 => Self::Queued,
            2 => Self::Timeout,
            3 => Self::Failed,
            4 => Self::InvalidNode,
            _ => Self::Unknown,
        }
    }

    /// Returns the normalized outcome string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Queued => "Queued",
            Self::Timeout => "Timeout",
            Self::Failed => "Failed",
            Self::InvalidNode => "InvalidNode",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for LegacyConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
