// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device catalog: the set of dimmers eligible for color management.
//!
//! The catalog is built once at startup from a snapshot of the host's
//! device registry and is immutable afterwards. Lookups by device
//! reference are O(1).

mod eligibility;

use std::collections::{HashMap, HashSet};

use crate::error::CatalogError;
use crate::types::{DeviceRef, NodeAddress};

pub use eligibility::is_dimmer;

/// The interface name the host assigns to devices owned by the Z-Wave
/// integration.
pub const ZWAVE_INTERFACE: &str = "Z-Wave";

/// Key/value metadata bag attached to a raw device descriptor.
///
/// The host's plug-in extra data is JSON-shaped; fields may be absent,
/// string-encoded, or otherwise malformed. Numeric reads degrade to 0
/// instead of failing, so classification over a messy registry never
/// errors.
#[derive(Debug, Clone, Default)]
pub struct MetadataBag(HashMap<String, serde_json::Value>);

impl MetadataBag {
    /// Creates an empty metadata bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value under a key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.0.insert(key.into(), value);
    }

    /// Builder-style insert for test fixtures and descriptor assembly.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Reads a field as `u32`, treating absent or malformed values as 0.
    #[must_use]
    pub fn get_u32(&self, key: &str) -> u32 {
        match self.0.get(key) {
            Some(serde_json::Value::Number(n)) => {
                n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
            }
            Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

impl FromIterator<(String, serde_json::Value)> for MetadataBag {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A raw device descriptor as enumerated from the host registry.
#[derive(Debug, Clone)]
pub struct RawDeviceDescriptor {
    /// Name of the integration that owns the device.
    pub interface: String,
    /// Dash-separated `<home_id>-<node_id>` address string.
    pub address: String,
    /// Stable host registry reference.
    pub device_ref: DeviceRef,
    /// Plug-in extra data for the device.
    pub metadata: MetadataBag,
}

/// One managed dimmer. Created at catalog build time, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimmerDevice {
    /// Identifier of the mesh network the dimmer belongs to.
    pub home_id: String,
    /// Node id within the home network.
    pub node_id: u8,
    /// Stable host registry reference.
    pub device_ref: DeviceRef,
}

/// Immutable catalog of managed dimmers, keyed by device reference.
///
/// # Examples
///
/// ```
/// use idlewave::catalog::{DeviceCatalog, MetadataBag, RawDeviceDescriptor};
/// use idlewave::types::DeviceRef;
///
/// let descriptors = vec![RawDeviceDescriptor {
///     interface: "Virtual".to_string(),
///     address: "EF20D1A4-7".to_string(),
///     device_ref: DeviceRef::new(100),
///     metadata: MetadataBag::new(),
/// }];
///
/// // Non-Z-Wave devices are skipped without inspecting their metadata.
/// let catalog = DeviceCatalog::build(descriptors).unwrap();
/// assert!(catalog.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeviceCatalog {
    by_ref: HashMap<DeviceRef, DimmerDevice>,
}

impl DeviceCatalog {
    /// Builds the catalog from a snapshot of raw device descriptors.
    ///
    /// Devices are kept when they belong to the Z-Wave integration, their
    /// `(home_id, node_id)` pair is not already claimed (first discovered
    /// wins), and they classify as a supported dimmer.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MalformedAddress` when a Z-Wave device's
    /// address does not parse. This fails the whole build: a broken
    /// inventory would produce systematically wrong results.
    pub fn build<I>(descriptors: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = RawDeviceDescriptor>,
    {
        let mut by_ref = HashMap::new();
        let mut claimed: HashSet<(String, u8)> = HashSet::new();

        for descriptor in descriptors {
            if descriptor.interface != ZWAVE_INTERFACE {
                continue;
            }

            let address = NodeAddress::parse(&descriptor.address)?;

            if claimed.contains(&(address.home_id.clone(), address.node_id)) {
                tracing::debug!(
                    address = %address,
                    device_ref = %descriptor.device_ref,
                    "Skipping duplicate node"
                );
                continue;
            }

            if !is_dimmer(&descriptor.metadata) {
                continue;
            }

            claimed.insert((address.home_id.clone(), address.node_id));
            by_ref.insert(
                descriptor.device_ref,
                DimmerDevice {
                    home_id: address.home_id,
                    node_id: address.node_id,
                    device_ref: descriptor.device_ref,
                },
            );
        }

        tracing::info!(count = by_ref.len(), "Device catalog built");
        Ok(Self { by_ref })
    }

    /// Looks up a dimmer by its device reference.
    #[must_use]
    pub fn get(&self, device_ref: DeviceRef) -> Option<&DimmerDevice> {
        self.by_ref.get(&device_ref)
    }

    /// Iterates over all managed dimmers, in unspecified order.
    pub fn devices(&self) -> impl Iterator<Item = &DimmerDevice> {
        self.by_ref.values()
    }

    /// Returns the number of managed dimmers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_ref.len()
    }

    /// Returns `true` if the catalog holds no dimmers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_ref.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dimmer_metadata() -> MetadataBag {
        MetadataBag::new()
            .with("manufacturer_id", json!(0x000C))
            .with("manufacturer_prod_id", json!(0x3036))
            .with("manufacturer_prod_type", json!(0x4447))
            .with("relationship", json!(4))
            .with("commandclass", json!(0x26))
    }

    fn descriptor(address: &str, device_ref: u32) -> RawDeviceDescriptor {
        RawDeviceDescriptor {
            interface: ZWAVE_INTERFACE.to_string(),
            address: address.to_string(),
            device_ref: DeviceRef::new(device_ref),
            metadata: dimmer_metadata(),
        }
    }

    #[test]
    fn build_keeps_eligible_dimmer() {
        let catalog = DeviceCatalog::build(vec![descriptor("EF20D1A4-7", 100)]).unwrap();

        assert_eq!(catalog.len(), 1);
        let device = catalog.get(DeviceRef::new(100)).unwrap();
        assert_eq!(device.home_id, "EF20D1A4");
        assert_eq!(device.node_id, 7);
    }

    #[test]
    fn build_skips_other_interfaces() {
        let mut d = descriptor("EF20D1A4-7", 100);
        d.interface = "Insteon".to_string();

        let catalog = DeviceCatalog::build(vec![d]).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn build_skips_foreign_interface_with_bad_address() {
        // A malformed address only matters for Z-Wave devices; other
        // integrations use their own address formats.
        let mut d = descriptor("not an address", 100);
        d.interface = "Insteon".to_string();

        let catalog = DeviceCatalog::build(vec![d]).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn build_fails_on_malformed_zwave_address() {
        let err = DeviceCatalog::build(vec![descriptor("garbage", 100)]).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedAddress { .. }));
    }

    #[test]
    fn duplicate_node_first_wins() {
        let catalog = DeviceCatalog::build(vec![
            descriptor("EF20D1A4-7", 100),
            descriptor("EF20D1A4-7", 200),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(DeviceRef::new(100)).is_some());
        assert!(catalog.get(DeviceRef::new(200)).is_none());
    }

    #[test]
    fn same_node_id_on_different_networks_both_kept() {
        let catalog = DeviceCatalog::build(vec![
            descriptor("EF20D1A4-7", 100),
            descriptor("C0FFEE01-7", 200),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn ineligible_device_is_skipped() {
        let mut d = descriptor("EF20D1A4-7", 100);
        d.metadata = MetadataBag::new();

        let catalog = DeviceCatalog::build(vec![d]).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn ineligible_duplicate_does_not_claim_node() {
        // An ineligible device must not shadow a later eligible one on the
        // same node.
        let mut first = descriptor("EF20D1A4-7", 100);
        first.metadata = MetadataBag::new();

        let catalog =
            DeviceCatalog::build(vec![first, descriptor("EF20D1A4-7", 200)]).unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(DeviceRef::new(200)).is_some());
    }

    #[test]
    fn metadata_bag_reads_numbers_and_strings() {
        let bag = MetadataBag::new()
            .with("number", json!(38))
            .with("string", json!("38"))
            .with("padded", json!(" 38 "))
            .with("junk", json!("not a number"))
            .with("object", json!({"nested": true}))
            .with("negative", json!(-1));

        assert_eq!(bag.get_u32("number"), 38);
        assert_eq!(bag.get_u32("string"), 38);
        assert_eq!(bag.get_u32("padded"), 38);
        assert_eq!(bag.get_u32("junk"), 0);
        assert_eq!(bag.get_u32("object"), 0);
        assert_eq!(bag.get_u32("negative"), 0);
        assert_eq!(bag.get_u32("absent"), 0);
    }
}
