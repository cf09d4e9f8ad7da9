// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration parameter numbers for WD200-family dimmers.

use crate::error::ValueError;

/// A configuration parameter of a WD200-family dimmer.
///
/// The numeric values are the parameter numbers documented by the device
/// firmware. All of them are written as single-byte values.
///
/// # Examples
///
/// ```
/// use idlewave::types::ConfigParam;
///
/// assert_eq!(ConfigParam::NormalModeLedColor.value(), 14);
/// assert_eq!(ConfigParam::status_led(3).unwrap().value(), 23);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigParam {
    /// LED indication mode (normal vs. status).
    StatusModeLedMode,
    /// Invert the paddle's top/bottom orientation.
    InvertPaddle,
    /// Dimming ramp rate for remote (Z-Wave) control.
    RampRateRemote,
    /// Dimming ramp rate for local (paddle) control.
    RampRateLocal,
    /// Whether status mode is active.
    StatusModeActive,
    /// Normal-mode LED bar color.
    NormalModeLedColor,
    /// Status-mode color of LED 1 (bottom).
    StatusModeLed1Color,
    /// Status-mode color of LED 2.
    StatusModeLed2Color,
    /// Status-mode color of LED 3.
    StatusModeLed3Color,
    /// Status-mode color of LED 4.
    StatusModeLed4Color,
    /// Status-mode color of LED 5.
    StatusModeLed5Color,
    /// Status-mode color of LED 6.
    StatusModeLed6Color,
    /// Status-mode color of LED 7 (top).
    StatusModeLed7Color,
    /// Blink frequency in status mode.
    StatusModeBlinkFrequency,
    /// Bitmask selecting which status LEDs blink.
    StatusModeBlinkBitmask,
}

impl ConfigParam {
    /// Returns the raw parameter number the device expects.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::StatusModeLedMode => 3,
            Self::InvertPaddle => 4,
            Self::RampRateRemote => 11,
            Self::RampRateLocal => 12,
            Self::StatusModeActive => 13,
            Self::NormalModeLedColor => 14,
            Self::StatusModeLed1Color => 21,
            Self::StatusModeLed2Color => 22,
            Self::StatusModeLed3Color => 23,
            Self::StatusModeLed4Color => 24,
            Self::StatusModeLed5Color => 25,
            Self::StatusModeLed6Color => 26,
            Self::StatusModeLed7Color => 27,
            Self::StatusModeBlinkFrequency => 30,
            Self::StatusModeBlinkBitmask => 31,
        }
    }

    /// Returns the status-mode color parameter for an LED position (1-7,
    /// counted from the bottom of the bar).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidLedPosition` if `position` is 0 or
    /// greater than 7.
    pub const fn status_led(position: u8) -> Result<Self, ValueError> {
        match position {
            1 => Ok(Self::StatusModeLed1Color),
            2 => Ok(Self::StatusModeLed2Color),
            3 => Ok(Self::StatusModeLed3Color),
            4 => Ok(Self::StatusModeLed4Color),
            5 => Ok(Self::StatusModeLed5Color),
            6 => Ok(Self::StatusModeLed6Color),
            7 => Ok(Self::StatusModeLed7Color),
            other => Err(ValueError::InvalidLedPosition(other)),
        }
    }
}
