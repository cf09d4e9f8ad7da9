// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Anonymous plugin usage reporting.
//!
//! Posts a small one-shot JSON report identifying the plugin build and
//! host version under a persisted random system id. Reporting is
//! fire-and-forget: every failure is logged at trace level and swallowed,
//! so it can never disturb the plugin.

use std::sync::Arc;
use std::time::Duration;

use crate::host::SettingsStore;

/// Default report endpoint.
const REPORT_URL: &str = "https://hsstats.doctormckay.com/report.php";

/// Store key for the persisted anonymous system id.
const KEY_SYSTEM_ID: &str = "system_id";

/// The usage report payload.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalyticsReport {
    /// Persisted random id identifying this installation anonymously.
    pub system_id: String,
    /// Plugin package name.
    pub plugin_name: &'static str,
    /// Plugin package version.
    pub plugin_version: &'static str,
    /// Host application version string.
    pub host_version: String,
}

/// Client for the one-shot usage report.
pub struct AnalyticsClient<T: SettingsStore + 'static> {
    store: Arc<T>,
    host_version: String,
    endpoint: String,
}

impl<T: SettingsStore + 'static> AnalyticsClient<T> {
    /// Creates a client reporting against the default endpoint.
    #[must_use]
    pub fn new(store: Arc<T>, host_version: impl Into<String>) -> Self {
        Self {
            store,
            host_version: host_version.into(),
            endpoint: REPORT_URL.to_string(),
        }
    }

    /// Overrides the report endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Returns the persisted anonymous system id, generating and saving a
    /// new one on first use.
    #[must_use]
    pub fn system_id(&self) -> String {
        let stored = self.store.load(KEY_SYSTEM_ID, "");
        if stored.is_empty() {
            let id = uuid::Uuid::new_v4().to_string();
            self.store.save(KEY_SYSTEM_ID, &id);
            id
        } else {
            stored
        }
    }

    /// Sends the usage report. Failures are logged at trace and swallowed.
    pub async fn report(&self) {
        let report = AnalyticsReport {
            system_id: self.system_id(),
            plugin_name: env!("CARGO_PKG_NAME"),
            plugin_version: env!("CARGO_PKG_VERSION"),
            host_version: self.host_version.clone(),
        };

        let client = reqwest::Client::new();
        match client.post(&self.endpoint).json(&report).send().await {
            Ok(response) => {
                tracing::trace!(status = %response.status(), "Analytics report sent");
            }
            Err(err) => {
                tracing::trace!(error = %err, "Analytics report failed");
            }
        }
    }

    /// Spawns a task sending the report after a delay, so startup traffic
    /// settles first.
    pub fn report_in(self: Arc<Self>, delay: Duration) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            self.report().await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
    }

    impl SettingsStore for MemoryStore {
        fn load(&self, key: &str, default: &str) -> String {
            self.values
                .lock()
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        }

        fn save(&self, key: &str, value: &str) {
            self.values.lock().insert(key.to_string(), value.to_string());
        }
    }

    #[test]
    fn system_id_is_generated_once_and_persisted() {
        let client = AnalyticsClient::new(Arc::new(MemoryStore::default()), "4.2.19.0");

        let first = client.system_id();
        let second = client.system_id();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn existing_system_id_is_reused() {
        let store = Arc::new(MemoryStore::default());
        store.save(KEY_SYSTEM_ID, "existing-id");

        let client = AnalyticsClient::new(store, "4.2.19.0");
        assert_eq!(client.system_id(), "existing-id");
    }

    #[test]
    fn report_payload_serializes_to_json() {
        let report = AnalyticsReport {
            system_id: "abc".to_string(),
            plugin_name: "idlewave",
            plugin_version: "0.1.0",
            host_version: "4.2.19.0".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["system_id"], "abc");
        assert_eq!(json["plugin_name"], "idlewave");
        assert_eq!(json["host_version"], "4.2.19.0");
    }
}
