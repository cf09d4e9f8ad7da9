// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device addressing types.

use std::fmt;

use crate::error::CatalogError;

/// Opaque stable identifier for a device within the host registry.
///
/// Device references are assigned by the host and never change for the life
/// of a device. They are the key the reconciliation engine uses to match
/// value-change events to catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DeviceRef(u32);

impl DeviceRef {
    /// Creates a device reference from the host's raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw reference value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DeviceRef {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Mesh address of a Z-Wave node: home (network) id plus node id.
///
/// The host reports this as a single dash-separated string, e.g.
/// `"EF20D1A4-7"`. The node id is a small integer unique within its home
/// network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    /// Identifier of the mesh network the node belongs to.
    pub home_id: String,
    /// Node id within the home network.
    pub node_id: u8,
}

impl NodeAddress {
    /// Parses a `<home_id>-<node_id>` address string.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MalformedAddress` when the separator is
    /// missing, the home id is empty, or the node id does not parse as a
    /// byte. Malformed addresses are fatal for the catalog build step.
    pub fn parse(address: &str) -> Result<Self, CatalogError> {
        let malformed = |reason: &str| CatalogError::MalformedAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        };

        let (home_id, node_part) = address
            .rsplit_once('-')
            .ok_or_else(|| malformed("missing node id separator"))?;

        if home_id.is_empty() {
            return Err(malformed("empty home id"));
        }

        let node_id: u8 = node_part
            .parse()
            .map_err(|_| malformed("node id is not a valid byte"))?;

        Ok(Self {
            home_id: home_id.to_string(),
            node_id,
        })
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home_id, self.node_id)
    }
}
