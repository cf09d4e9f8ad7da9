// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The reconciliation engine.
//!
//! The engine is the single place that decides when, and for which
//! devices, to push color updates. It consumes device value-change events
//! from the host, holds the live color policy, and drives the
//! [`ConfigAdapter`].
//!
//! Two rules guard against premature or redundant updates:
//!
//! - The very first value event after startup is treated as a readiness
//!   signal from the downstream integration and triggers one full
//!   reconciliation of every known device. Later events reconcile only
//!   the device that changed.
//! - Color configuration changes schedule a debounced full reconciliation
//!   instead of reconciling immediately, so a user scrubbing through the
//!   settings dropdowns produces one downstream write per device, not one
//!   per edit. A newly scheduled reconciliation always supersedes a
//!   pending one.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::adapter::ConfigAdapter;
use crate::catalog::{DeviceCatalog, DimmerDevice};
use crate::error::AdapterError;
use crate::host::{StatusSource, ZWaveLink};
use crate::policy::ColorPolicy;
use crate::types::{DeviceRef, NormalModeColor};

/// Tunable engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Trailing-edge debounce delay for full reconciliations triggered by
    /// configuration changes.
    pub debounce: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(1),
        }
    }
}

/// A scheduled full reconciliation that has not fired yet.
#[derive(Debug)]
struct PendingReconciliation {
    /// Generation the task was scheduled under; a stale generation means
    /// the task was superseded between firing and taking the lock.
    generation: u64,
    handle: JoinHandle<()>,
}

/// Mutable engine state, all behind one lock.
#[derive(Debug)]
struct EngineState {
    initial_sync_done: bool,
    policy: ColorPolicy,
    pending: Option<PendingReconciliation>,
    generation: u64,
}

#[derive(Debug)]
struct EngineCore<S, L>
where
    S: StatusSource,
    L: ZWaveLink,
{
    catalog: DeviceCatalog,
    status: Arc<S>,
    adapter: ConfigAdapter<L>,
    state: Mutex<EngineState>,
    fatal_tx: watch::Sender<Option<String>>,
    runtime: tokio::runtime::Handle,
    debounce: Duration,
}

/// Engine keeping dimmer LED colors reconciled with device power state.
///
/// Cloning is cheap and shares the same engine instance, so the event
/// ingress and the settings surface can each hold a handle.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use idlewave::catalog::DeviceCatalog;
/// use idlewave::engine::ReconcileEngine;
/// use idlewave::types::{DeviceRef, NormalModeColor};
/// # use idlewave::host::{CallArg, CallReply, StatusSource, ZWaveLink};
/// # struct Host;
/// # impl StatusSource for Host {
/// #     fn power_level(&self, _: DeviceRef) -> f64 { 0.0 }
/// # }
/// # impl ZWaveLink for Host {
/// #     fn plugin_version(&self) -> String { "4.0.0".to_string() }
/// #     fn invoke(&self, _: &str, _: &[CallArg]) -> Option<CallReply> { None }
/// # }
///
/// #[tokio::main]
/// async fn main() {
///     let host = Arc::new(Host);
///     let catalog = DeviceCatalog::build(Vec::new()).unwrap();
///     let engine = ReconcileEngine::new(catalog, Arc::clone(&host), host);
///
///     // Wire these into the host's event and settings callbacks:
///     engine.on_device_value_changed(DeviceRef::new(100), 55.0);
///     engine.on_color_configuration_changed(NormalModeColor::Cyan, NormalModeColor::Red);
/// }
/// ```
#[derive(Debug)]
pub struct ReconcileEngine<S, L>
where
    S: StatusSource + 'static,
    L: ZWaveLink + 'static,
{
    core: Arc<EngineCore<S, L>>,
    fatal_rx: watch::Receiver<Option<String>>,
}

impl<S, L> ReconcileEngine<S, L>
where
    S: StatusSource + 'static,
    L: ZWaveLink + 'static,
{
    /// Creates an engine with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime; the engine captures the
    /// current runtime handle for its debounce timer.
    #[must_use]
    pub fn new(catalog: DeviceCatalog, status: Arc<S>, link: Arc<L>) -> Self {
        Self::with_config(catalog, status, link, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime; the engine captures the
    /// current runtime handle for its debounce timer.
    #[must_use]
    pub fn with_config(
        catalog: DeviceCatalog,
        status: Arc<S>,
        link: Arc<L>,
        config: EngineConfig,
    ) -> Self {
        let (fatal_tx, fatal_rx) = watch::channel(None);
        Self {
            core: Arc::new(EngineCore {
                catalog,
                status,
                adapter: ConfigAdapter::new(link),
                state: Mutex::new(EngineState {
                    initial_sync_done: false,
                    policy: ColorPolicy::default(),
                    pending: None,
                    generation: 0,
                }),
                fatal_tx,
                runtime: tokio::runtime::Handle::current(),
                debounce: config.debounce,
            }),
            fatal_rx,
        }
    }

    /// Handles a device value-change event from the host.
    ///
    /// Events for devices outside the catalog are ignored. The first
    /// relevant event after startup triggers a full reconciliation of
    /// every known device; later events reconcile only the named device
    /// using the event-carried value. Never panics or propagates errors
    /// across this boundary.
    pub fn on_device_value_changed(&self, device_ref: DeviceRef, new_value: f64) {
        if self.fatal_status().is_some() {
            return;
        }
        let Some(device) = self.core.catalog.get(device_ref) else {
            return;
        };

        let (first, policy) = {
            let mut state = self.core.state.lock();
            let first = !state.initial_sync_done;
            state.initial_sync_done = true;
            (first, state.policy)
        };

        if first {
            tracing::info!(
                %device_ref,
                "First value event after startup; reconciling all dimmers"
            );
            self.core.reconcile_all(policy);
        } else {
            tracing::debug!(%device_ref, value = new_value, "Dimmer value changed");
            self.core.reconcile_one(device, Some(new_value), policy);
        }
    }

    /// Handles a committed color configuration change from the settings
    /// surface.
    ///
    /// The policy is updated immediately; the resulting full
    /// reconciliation is debounced so a burst of edits collapses into one
    /// downstream push with the final colors. Before the initial sync
    /// there is nothing to reconcile yet.
    pub fn on_color_configuration_changed(
        &self,
        idle: NormalModeColor,
        active: NormalModeColor,
    ) {
        let ready = {
            let mut state = self.core.state.lock();
            state.policy = ColorPolicy::new(idle, active);
            state.initial_sync_done
        };

        if !ready {
            tracing::debug!(%idle, %active, "Colors changed before initial sync; deferring");
            return;
        }
        if self.fatal_status().is_some() {
            return;
        }

        tracing::info!(%idle, %active, "Colors changed; scheduling full reconciliation");
        EngineCore::schedule_full_reconciliation(&self.core);
    }

    /// Returns the fatal status message, if the engine has shut down.
    #[must_use]
    pub fn fatal_status(&self) -> Option<String> {
        self.core.fatal_tx.borrow().clone()
    }

    /// Returns a watch receiver the host can use to observe fatal status.
    #[must_use]
    pub fn watch_fatal(&self) -> watch::Receiver<Option<String>> {
        self.fatal_rx.clone()
    }

    /// Returns `true` once the first value event has been processed.
    #[must_use]
    pub fn is_initial_sync_done(&self) -> bool {
        self.core.state.lock().initial_sync_done
    }

    /// Returns `true` while a debounced full reconciliation is scheduled.
    #[must_use]
    pub fn has_pending_reconciliation(&self) -> bool {
        self.core.state.lock().pending.is_some()
    }

    /// Returns the device catalog the engine was built with.
    #[must_use]
    pub fn catalog(&self) -> &DeviceCatalog {
        &self.core.catalog
    }
}

impl<S, L> Clone for ReconcileEngine<S, L>
where
    S: StatusSource + 'static,
    L: ZWaveLink + 'static,
{
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            fatal_rx: self.fatal_rx.clone(),
        }
    }
}

impl<S, L> EngineCore<S, L>
where
    S: StatusSource + 'static,
    L: ZWaveLink + 'static,
{
    /// Cancel-and-replace scheduling of the debounced full
    /// reconciliation. Only unfired tasks are cancellable; a task that
    /// already entered [`fire_scheduled`](Self::fire_scheduled) runs to
    /// completion.
    fn schedule_full_reconciliation(core: &Arc<Self>) {
        let mut state = core.state.lock();

        if let Some(pending) = state.pending.take() {
            pending.handle.abort();
            tracing::debug!("Superseding pending full reconciliation");
        }

        state.generation += 1;
        let generation = state.generation;
        let task_core = Arc::clone(core);
        let delay = core.debounce;

        let handle = core.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            task_core.fire_scheduled(generation);
        });

        state.pending = Some(PendingReconciliation { generation, handle });
        tracing::debug!(?delay, "Scheduled debounced full reconciliation");
    }

    /// Entry point of the debounce task after its delay elapses.
    fn fire_scheduled(&self, generation: u64) {
        let policy = {
            let mut state = self.state.lock();
            match &state.pending {
                Some(pending) if pending.generation == generation => {
                    state.pending = None;
                }
                // Superseded in the window between timer expiry and
                // taking the lock.
                _ => return,
            }
            state.policy
        };

        self.reconcile_all(policy);
    }

    fn reconcile_all(&self, policy: ColorPolicy) {
        tracing::info!(devices = self.catalog.len(), "Reconciling all dimmers");
        for device in self.catalog.devices() {
            if self.fatal_tx.borrow().is_some() {
                return;
            }
            self.reconcile_one(device, None, policy);
        }
    }

    /// Pushes the target color for one device. The event-carried value is
    /// used when available to avoid a redundant status read. The engine
    /// lock is never held here; the downstream call may be slow.
    fn reconcile_one(&self, device: &DimmerDevice, known_value: Option<f64>, policy: ColorPolicy) {
        let level =
            known_value.unwrap_or_else(|| self.status.power_level(device.device_ref));
        let color = policy.color_for(level);

        match self
            .adapter
            .set_color(&device.home_id, device.node_id, color)
        {
            Ok(result) => tracing::info!(
                device_ref = %device.device_ref,
                node_id = device.node_id,
                %color,
                %result,
                "Set normal-mode color"
            ),
            Err(err @ AdapterError::UnsupportedVersion { .. }) => self.mark_fatal(&err),
        }
    }

    fn mark_fatal(&self, err: &AdapterError) {
        tracing::error!(error = %err, "Entering fatal status; reconciliation disabled");
        self.fatal_tx.send_replace(Some(err.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MetadataBag, RawDeviceDescriptor, ZWAVE_INTERFACE};
    use crate::host::{CallArg, CallReply};
    use parking_lot::Mutex as PlMutex;
    use serde_json::json;

    /// Recording fake for both host-side traits.
    struct FakeHost {
        version: String,
        power: PlMutex<f64>,
        power_reads: PlMutex<Vec<DeviceRef>>,
        calls: PlMutex<Vec<(String, Vec<CallArg>)>>,
    }

    impl FakeHost {
        fn new(version: &str) -> Arc<Self> {
            Arc::new(Self {
                version: version.to_string(),
                power: PlMutex::new(0.0),
                power_reads: PlMutex::new(Vec::new()),
                calls: PlMutex::new(Vec::new()),
            })
        }

        fn set_power(&self, level: f64) {
            *self.power.lock() = level;
        }

        fn calls(&self) -> Vec<(String, Vec<CallArg>)> {
            self.calls.lock().clone()
        }

        fn power_reads(&self) -> Vec<DeviceRef> {
            self.power_reads.lock().clone()
        }
    }

    impl StatusSource for FakeHost {
        fn power_level(&self, device_ref: DeviceRef) -> f64 {
            self.power_reads.lock().push(device_ref);
            *self.power.lock()
        }
    }

    impl ZWaveLink for FakeHost {
        fn plugin_version(&self) -> String {
            self.version.clone()
        }

        fn invoke(&self, operation: &str, args: &[CallArg]) -> Option<CallReply> {
            self.calls
                .lock()
                .push((operation.to_string(), args.to_vec()));
            Some(CallReply::Text("Success".to_string()))
        }
    }

    fn dimmer_descriptor(node_id: u8, device_ref: u32) -> RawDeviceDescriptor {
        RawDeviceDescriptor {
            interface: ZWAVE_INTERFACE.to_string(),
            address: format!("EF20D1A4-{node_id}"),
            device_ref: DeviceRef::new(device_ref),
            metadata: MetadataBag::new()
                .with("manufacturer_id", json!(0x000C))
                .with("manufacturer_prod_id", json!(0x3036))
                .with("manufacturer_prod_type", json!(0x4447))
                .with("relationship", json!(4))
                .with("commandclass", json!(0x26)),
        }
    }

    fn two_dimmer_catalog() -> DeviceCatalog {
        DeviceCatalog::build(vec![dimmer_descriptor(7, 100), dimmer_descriptor(8, 200)])
            .unwrap()
    }

    fn engine(host: &Arc<FakeHost>, catalog: DeviceCatalog) -> ReconcileEngine<FakeHost, FakeHost> {
        ReconcileEngine::new(catalog, Arc::clone(host), Arc::clone(host))
    }

    /// Extracts the written color value from a recorded HS4 call.
    fn written_color(args: &[CallArg]) -> i32 {
        match args[4] {
            CallArg::Int(value) => value,
            _ => panic!("expected int color value"),
        }
    }

    #[tokio::test]
    async fn first_event_reconciles_all_devices() {
        let host = FakeHost::new("4.0.0");
        let engine = engine(&host, two_dimmer_catalog());

        assert!(!engine.is_initial_sync_done());
        engine.on_device_value_changed(DeviceRef::new(100), 55.0);

        assert!(engine.is_initial_sync_done());
        assert_eq!(host.calls().len(), 2);
        // The full pass reads every device's live level instead of reusing
        // the event value.
        assert_eq!(host.power_reads().len(), 2);
    }

    #[tokio::test]
    async fn later_events_reconcile_only_the_target() {
        let host = FakeHost::new("4.0.0");
        let engine = engine(&host, two_dimmer_catalog());

        engine.on_device_value_changed(DeviceRef::new(100), 0.0);
        let calls_after_sync = host.calls().len();
        let reads_after_sync = host.power_reads().len();

        engine.on_device_value_changed(DeviceRef::new(200), 80.0);

        let calls = host.calls();
        assert_eq!(calls.len(), calls_after_sync + 1);
        // Active color (default White = 0) from the event-carried value,
        // with no extra status read for the target device.
        assert_eq!(written_color(&calls.last().unwrap().1), 0);
        assert_eq!(host.power_reads().len(), reads_after_sync);
    }

    #[tokio::test]
    async fn event_value_selects_idle_color() {
        let host = FakeHost::new("4.0.0");
        host.set_power(100.0);
        let engine = engine(&host, two_dimmer_catalog());

        engine.on_device_value_changed(DeviceRef::new(100), 0.0);
        engine.on_device_value_changed(DeviceRef::new(200), 0.05);

        // Default idle color Blue = 3.
        assert_eq!(written_color(&host.calls().last().unwrap().1), 3);
    }

    #[tokio::test]
    async fn unknown_device_ref_is_ignored() {
        let host = FakeHost::new("4.0.0");
        let engine = engine(&host, two_dimmer_catalog());

        engine.on_device_value_changed(DeviceRef::new(999), 55.0);

        assert!(!engine.is_initial_sync_done());
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn config_change_before_initial_sync_defers() {
        let host = FakeHost::new("4.0.0");
        let engine = engine(&host, two_dimmer_catalog());

        engine.on_color_configuration_changed(NormalModeColor::Cyan, NormalModeColor::Red);

        assert!(!engine.has_pending_reconciliation());
        assert!(host.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn config_change_burst_collapses_to_one_reconciliation() {
        let host = FakeHost::new("4.0.0");
        let engine = engine(&host, two_dimmer_catalog());

        engine.on_device_value_changed(DeviceRef::new(100), 0.0);
        let calls_after_sync = host.calls().len();

        engine.on_color_configuration_changed(NormalModeColor::Red, NormalModeColor::Green);
        tokio::time::sleep(Duration::from_millis(100)).await;
        engine.on_color_configuration_changed(NormalModeColor::Yellow, NormalModeColor::Green);
        tokio::time::sleep(Duration::from_millis(100)).await;
        engine.on_color_configuration_changed(NormalModeColor::Magenta, NormalModeColor::Cyan);
        assert!(engine.has_pending_reconciliation());

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let calls = host.calls();
        // One full pass over both devices, not three.
        assert_eq!(calls.len(), calls_after_sync + 2);
        assert!(!engine.has_pending_reconciliation());
        // Idle at power 0 under the final policy: Magenta = 4.
        assert_eq!(written_color(&calls.last().unwrap().1), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_schedule_never_fires() {
        let host = FakeHost::new("4.0.0");
        let engine = engine(&host, two_dimmer_catalog());

        engine.on_device_value_changed(DeviceRef::new(100), 0.0);
        let calls_after_sync = host.calls().len();

        engine.on_color_configuration_changed(NormalModeColor::Red, NormalModeColor::Green);
        tokio::time::sleep(Duration::from_millis(900)).await;
        engine.on_color_configuration_changed(NormalModeColor::Cyan, NormalModeColor::White);
        // 900ms later the first schedule would have fired; only the second
        // one does, at its own full delay.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(host.calls().len(), calls_after_sync);

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(host.calls().len(), calls_after_sync + 2);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_debounce_delay_is_honored() {
        let host = FakeHost::new("4.0.0");
        let engine = ReconcileEngine::with_config(
            two_dimmer_catalog(),
            Arc::clone(&host),
            Arc::clone(&host),
            EngineConfig {
                debounce: Duration::from_millis(50),
            },
        );

        engine.on_device_value_changed(DeviceRef::new(100), 0.0);
        let calls_after_sync = host.calls().len();

        engine.on_color_configuration_changed(NormalModeColor::Red, NormalModeColor::Green);
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(host.calls().len(), calls_after_sync + 2);
    }

    #[tokio::test]
    async fn unsupported_version_sets_fatal_status_and_stops() {
        let host = FakeHost::new("5.0.0");
        let engine = engine(&host, two_dimmer_catalog());

        engine.on_device_value_changed(DeviceRef::new(100), 55.0);

        let fatal = engine.fatal_status().unwrap();
        assert!(fatal.contains("5.0.0"));
        // Version detection failed before any configuration call went out,
        // and the second device was not attempted.
        assert!(host.calls().is_empty());

        // Everything afterwards is inert.
        engine.on_device_value_changed(DeviceRef::new(200), 55.0);
        engine.on_color_configuration_changed(NormalModeColor::Red, NormalModeColor::Green);
        assert!(host.calls().is_empty());
        assert!(!engine.has_pending_reconciliation());
    }

    #[tokio::test]
    async fn fatal_status_is_observable_via_watch() {
        let host = FakeHost::new("5.0.0");
        let engine = engine(&host, two_dimmer_catalog());
        let mut fatal_rx = engine.watch_fatal();

        engine.on_device_value_changed(DeviceRef::new(100), 55.0);

        fatal_rx.changed().await.unwrap();
        assert!(fatal_rx.borrow().is_some());
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let host = FakeHost::new("4.0.0");
        let engine = engine(&host, two_dimmer_catalog());
        let clone = engine.clone();

        engine.on_device_value_changed(DeviceRef::new(100), 55.0);
        assert!(clone.is_initial_sync_done());
    }
}
