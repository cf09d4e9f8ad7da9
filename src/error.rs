// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `idlewave` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! value validation, catalog construction, and the Z-Wave configuration
//! adapter.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while building the device catalog.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error occurred in the configuration adapter.
    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A color name did not match any palette entry.
    #[error("unknown color name: {0:?}")]
    UnknownColor(String),

    /// A status LED position is outside the valid range (1-7).
    #[error("status LED position {0} is out of range [1, 7]")]
    InvalidLedPosition(u8),
}

/// Errors raised while building the device catalog.
///
/// A malformed address is fatal for the whole build: it indicates a broken
/// device inventory that would otherwise mis-key every lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A device address did not match the `<home_id>-<node_id>` form.
    #[error("malformed device address {address:?}: {reason}")]
    MalformedAddress {
        /// The address string as reported by the host.
        address: String,
        /// Description of the parsing failure.
        reason: String,
    },
}

/// Errors raised by the Z-Wave configuration adapter.
///
/// The only variant is the unrecoverable one. Every other downstream fault
/// is folded into the adapter's returned outcome description instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The downstream Z-Wave plugin reported a version this library cannot
    /// drive. Requires a process restart after the plugin is fixed.
    #[error("unsupported Z-Wave plugin version {version:?}")]
    UnsupportedVersion {
        /// The version string reported by the downstream plugin.
        version: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::UnknownColor("chartreuse".to_string());
        assert_eq!(err.to_string(), "unknown color name: \"chartreuse\"");
    }

    #[test]
    fn catalog_error_display() {
        let err = CatalogError::MalformedAddress {
            address: "F00BA4".to_string(),
            reason: "missing node id separator".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed device address \"F00BA4\": missing node id separator"
        );
    }

    #[test]
    fn error_from_adapter_error() {
        let adapter_err = AdapterError::UnsupportedVersion {
            version: "5.0.0".to_string(),
        };
        let err: Error = adapter_err.into();
        assert!(matches!(err, Error::Adapter(_)));
    }

    #[test]
    fn adapter_error_display() {
        let err = AdapterError::UnsupportedVersion {
            version: "5.0.0".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported Z-Wave plugin version \"5.0.0\"");
    }
}
