// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LED color palettes for HS-WD200+ family dimmers.
//!
//! The dimmer's LED bar supports two fixed palettes: the normal-mode color
//! (one color for the whole bar, written to the `NormalModeLedColor`
//! parameter) and the status-mode color (per-LED, written to the
//! `StatusModeLed*Color` parameters). Both are closed sets baked into the
//! device firmware.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Normal-mode LED color of a WD200-family dimmer.
///
/// This is the palette presented to the settings surface for the idle and
/// active color choices. The numeric values are the raw parameter values the
/// device expects.
///
/// # Examples
///
/// ```
/// use idlewave::types::NormalModeColor;
///
/// let color = NormalModeColor::Blue;
/// assert_eq!(color.value(), 3);
/// assert_eq!(color.as_str(), "Blue");
///
/// // Parsing is case-insensitive
/// let parsed: NormalModeColor = "cyan".parse().unwrap();
/// assert_eq!(parsed, NormalModeColor::Cyan);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NormalModeColor {
    /// White (device value 0, factory default).
    White,
    /// Red (device value 1).
    Red,
    /// Green (device value 2).
    Green,
    /// Blue (device value 3).
    Blue,
    /// Magenta (device value 4).
    Magenta,
    /// Yellow (device value 5).
    Yellow,
    /// Cyan (device value 6).
    Cyan,
}

impl NormalModeColor {
    /// The complete palette, in device-value order.
    ///
    /// Exposed so the settings surface can render the closed list of
    /// options.
    pub const ALL: [Self; 7] = [
        Self::White,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Magenta,
        Self::Yellow,
        Self::Cyan,
    ];

    /// Returns the raw parameter value the device expects.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Blue => 3,
            Self::Magenta => 4,
            Self::Yellow => 5,
            Self::Cyan => 6,
        }
    }

    /// Returns the canonical color name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Magenta => "Magenta",
            Self::Yellow => "Yellow",
            Self::Cyan => "Cyan",
        }
    }
}

impl fmt::Display for NormalModeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalModeColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValueError::UnknownColor(s.to_string()))
    }
}

impl TryFrom<String> for NormalModeColor {
    type Error = ValueError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<NormalModeColor> for String {
    fn from(color: NormalModeColor) -> Self {
        color.as_str().to_string()
    }
}

/// Status-mode LED color of a WD200-family dimmer.
///
/// Used with the per-LED `StatusModeLed1Color` through `StatusModeLed7Color`
/// parameters. Unlike the normal-mode palette it includes `Off`, and White
/// moves to the end of the value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusModeColor {
    /// LED off (device value 0).
    Off,
    /// Red (device value 1).
    Red,
    /// Green (device value 2).
    Green,
    /// Blue (device value 3).
    Blue,
    /// Magenta (device value 4).
    Magenta,
    /// Yellow (device value 5).
    Yellow,
    /// Cyan (device value 6).
    Cyan,
    /// White (device value 7).
    White,
}

impl StatusModeColor {
    /// The complete palette, in device-value order.
    pub const ALL: [Self; 8] = [
        Self::Off,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Magenta,
        Self::Yellow,
        Self::Cyan,
        Self::White,
    ];

    /// Returns the raw parameter value the device expects.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Blue => 3,
            Self::Magenta => 4,
            Self::Yellow => 5,
            Self::Cyan => 6,
            Self::White => 7,
        }
    }

    /// Returns the canonical color name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Magenta => "Magenta",
            Self::Yellow => "Yellow",
            Self::Cyan => "Cyan",
            Self::White => "White",
        }
    }
}

impl fmt::Display for StatusModeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusModeColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValueError::UnknownColor(s.to_string()))
    }
}

impl TryFrom<String> for StatusModeColor {
    type Error = ValueError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StatusModeColor> for String {
    fn from(color: StatusModeColor) -> Self {
        color.as_str().to_string()
    }
}
