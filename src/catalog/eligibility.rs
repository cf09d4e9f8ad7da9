// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Eligibility classification for managed dimmers.

use super::MetadataBag;

/// HomeSeer Technologies' Z-Wave manufacturer id.
const MANUFACTURER_HOMESEER: u32 = 0x000C;

/// Product type shared by the WD200/WX300 wall switch family.
const PROD_TYPE_WALL_SWITCH: u32 = 0x4447;

/// Product ids with a configurable normal-mode LED color: HS-WD200+ and the
/// HS-WX300 in dimmer and switch builds.
const PROD_IDS: [u32; 3] = [0x3036, 0x4036, 0x4037];

/// Relationship code of a child end point device.
const RELATIONSHIP_CHILD: u32 = 4;

/// Binary Switch command class.
const CC_SWITCH_BINARY: u32 = 0x25;

/// Multilevel Switch command class.
const CC_SWITCH_MULTILEVEL: u32 = 0x26;

/// Returns `true` if the metadata describes a dimmer this library manages.
///
/// All five checks must pass: manufacturer, product type, one of the known
/// product ids, the child relationship code, and a switch command class
/// (binary or multilevel). Absent or malformed fields read as 0 and fail
/// their comparison; classification never errors.
///
/// # Examples
///
/// ```
/// use idlewave::catalog::{MetadataBag, is_dimmer};
/// use serde_json::json;
///
/// let metadata = MetadataBag::new()
///     .with("manufacturer_id", json!(0x000C))
///     .with("manufacturer_prod_id", json!(0x3036))
///     .with("manufacturer_prod_type", json!(0x4447))
///     .with("relationship", json!(4))
///     .with("commandclass", json!(0x26));
///
/// assert!(is_dimmer(&metadata));
/// assert!(!is_dimmer(&MetadataBag::new()));
/// ```
#[must_use]
pub fn is_dimmer(metadata: &MetadataBag) -> bool {
    let manufacturer_id = metadata.get_u32("manufacturer_id");
    let prod_id = metadata.get_u32("manufacturer_prod_id");
    let prod_type = metadata.get_u32("manufacturer_prod_type");
    let relationship = metadata.get_u32("relationship");
    let command_class = metadata.get_u32("commandclass");

    manufacturer_id == MANUFACTURER_HOMESEER
        && prod_type == PROD_TYPE_WALL_SWITCH
        && PROD_IDS.contains(&prod_id)
        && relationship == RELATIONSHIP_CHILD
        && (command_class == CC_SWITCH_BINARY || command_class == CC_SWITCH_MULTILEVEL)
}
