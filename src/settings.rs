// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistence of the color configuration.
//!
//! The settings surface renders its dropdowns from [`palette`] and commits
//! the user's choices through [`save`]; [`load`] restores the policy at
//! startup. The page rendering itself lives outside this library.

use crate::host::SettingsStore;
use crate::policy::ColorPolicy;
use crate::types::NormalModeColor;

/// Store key for the idle color name.
pub const KEY_IDLE_COLOR: &str = "idle_color";

/// Store key for the active color name.
pub const KEY_ACTIVE_COLOR: &str = "active_color";

/// Returns the closed list of color options for the settings surface.
#[must_use]
pub fn palette() -> &'static [NormalModeColor] {
    &NormalModeColor::ALL
}

/// Loads the color policy from the store.
///
/// A stored name that no longer parses falls back to that color's default,
/// so a hand-edited or corrupted store degrades gracefully.
pub fn load(store: &impl SettingsStore) -> ColorPolicy {
    let defaults = ColorPolicy::default();
    ColorPolicy::new(
        load_color(store, KEY_IDLE_COLOR, defaults.idle),
        load_color(store, KEY_ACTIVE_COLOR, defaults.active),
    )
}

/// Saves the color policy to the store under the canonical color names.
pub fn save(store: &impl SettingsStore, policy: ColorPolicy) {
    store.save(KEY_IDLE_COLOR, policy.idle.as_str());
    store.save(KEY_ACTIVE_COLOR, policy.active.as_str());
}

fn load_color(
    store: &impl SettingsStore,
    key: &str,
    default: NormalModeColor,
) -> NormalModeColor {
    let raw = store.load(key, default.as_str());
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, %default, "Stored color name did not parse; using default");
        default
    })
}
