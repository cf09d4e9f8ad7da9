// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color policy: mapping a power level to the idle or active color.

use crate::types::NormalModeColor;

/// Power levels with an absolute value below this are treated as idle.
///
/// The tolerance absorbs floating-point noise around exact zero in
/// host-reported values. It is fixed, not user-configurable.
pub const IDLE_THRESHOLD: f64 = 0.1;

/// The pair of user-configured LED colors applied based on power state.
///
/// # Examples
///
/// ```
/// use idlewave::policy::ColorPolicy;
/// use idlewave::types::NormalModeColor;
///
/// let policy = ColorPolicy::new(NormalModeColor::Blue, NormalModeColor::White);
/// assert_eq!(policy.color_for(0.0), NormalModeColor::Blue);
/// assert_eq!(policy.color_for(55.0), NormalModeColor::White);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPolicy {
    /// Color shown while the dimmer is off.
    pub idle: NormalModeColor,
    /// Color shown while the dimmer is on.
    pub active: NormalModeColor,
}

impl ColorPolicy {
    /// Creates a policy from an idle/active color pair.
    #[must_use]
    pub const fn new(idle: NormalModeColor, active: NormalModeColor) -> Self {
        Self { idle, active }
    }

    /// Returns the color a device at the given power level should show.
    #[must_use]
    pub fn color_for(&self, power_level: f64) -> NormalModeColor {
        if power_level.abs() < IDLE_THRESHOLD {
            self.idle
        } else {
            self.active
        }
    }
}

impl Default for ColorPolicy {
    /// Blue when idle, white when active.
    fn default() -> Self {
        Self::new(NormalModeColor::Blue, NormalModeColor::White)
    }
}
