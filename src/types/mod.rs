// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types shared across the library.
//!
//! This module provides the value types for addressing devices and for the
//! fixed LED color palettes and configuration parameters of WD200-family
//! dimmers.

mod address;
mod color;
mod param;

pub use address::{DeviceRef, NodeAddress};
pub use color::{NormalModeColor, StatusModeColor};
pub use param::ConfigParam;
