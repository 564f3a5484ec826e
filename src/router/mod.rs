//! Routes raw host events to the panel and button they belong to.
//!
//! The router is the only place that knows which container shows which
//! panel. It keeps a weak binding per open container, so dropping a panel
//! is enough to make its containers unowned; clicks on them are then
//! ignored like clicks on any container the framework never opened.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Instant;

use serde_json::json;

use crate::error::{PanelError, Result};
use crate::host::{ClickEvent, CloseEvent, ContainerHost, ContainerId, ViewerId};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::RouterMetrics;
use crate::panel::{Panel, PanelId, PanelState, SharedPanel};

mod context;

pub use context::ClickContext;
use context::{ClickOutcome, CloseRequest};

const LOG_TARGET: &str = "panels::router";

/// Configuration knobs for the router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Optional structured logger used by the router.
    pub logger: Option<Logger>,
    /// Metrics accumulator; snapshots are emitted with [`ClickRouter::emit_metrics`].
    pub metrics: Option<Arc<Mutex<RouterMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_target: "panels::router.metrics".to_string(),
        }
    }
}

impl RouterConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RouterMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RouterMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// What happened to a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    /// The container is not owned by any live panel.
    Ignored,
    /// Owned container, but no button or no handler at that slot.
    Unhandled,
    /// A handler ran.
    Handled,
}

/// What happened to a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDisposition {
    Ignored,
    /// The panel was closing programmatically; its hook did not run.
    Suppressed,
    /// The panel's close hook (if any) ran.
    Notified,
}

struct Binding {
    panel: Weak<Mutex<Panel>>,
    panel_id: PanelId,
    viewer: ViewerId,
}

/// Owns the host and the container → panel registry.
pub struct ClickRouter<H: ContainerHost> {
    host: H,
    bindings: HashMap<ContainerId, Binding>,
    open: HashMap<ViewerId, ContainerId>,
    config: RouterConfig,
    started: Instant,
}

impl<H: ContainerHost> ClickRouter<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, RouterConfig::default())
    }

    pub fn with_config(host: H, config: RouterConfig) -> Self {
        Self {
            host,
            bindings: HashMap::new(),
            open: HashMap::new(),
            config,
            started: Instant::now(),
        }
    }

    pub fn config_mut(&mut self) -> &mut RouterConfig {
        &mut self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Container the router last opened for the viewer, if still bound.
    pub fn open_container(&self, viewer: &str) -> Option<ContainerId> {
        self.open.get(viewer).copied()
    }

    pub fn is_bound(&self, container: ContainerId) -> bool {
        self.bindings.contains_key(&container)
    }

    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// Render `panel` and open it for `viewer`.
    ///
    /// A container the viewer already had open is displaced: its binding is
    /// dropped and its panel's close hook runs unless that panel is closing
    /// programmatically.
    pub fn activate(&mut self, panel: &SharedPanel, viewer: &ViewerId) -> Result<ContainerId> {
        if let Some(previous) = self.open.get(viewer).copied() {
            self.release(&CloseEvent::new(previous, viewer.clone()), true)?;
        }
        self.open_fresh(panel, viewer, "panel_opened")
    }

    /// Close the viewer's container (if any) and reopen `panel` freshly rendered.
    ///
    /// Replacing the panel's own container runs no close hook. A container of
    /// another panel is displaced the way [`ClickRouter::activate`] does it.
    pub fn refresh(&mut self, panel: &SharedPanel, viewer: &ViewerId) -> Result<ContainerId> {
        if let Some(previous) = self.open.get(viewer).copied() {
            let own = lock(panel)?.id();
            let foreign = self
                .bindings
                .get(&previous)
                .is_some_and(|binding| binding.panel_id != own);
            self.release(&CloseEvent::new(previous, viewer.clone()), foreign)?;
        }
        self.host.close(viewer)?;
        self.open_fresh(panel, viewer, "panel_refreshed")
    }

    /// Close the viewer's container. The close hook runs once the host reports the close.
    pub fn close(&mut self, viewer: &ViewerId) -> Result<()> {
        self.host.close(viewer)
    }

    /// Close the viewer's container without running the panel's close hook.
    pub fn close_quietly(&mut self, viewer: &ViewerId) -> Result<()> {
        if let Some(panel) = self
            .open
            .get(viewer)
            .and_then(|container| self.bindings.get(container))
            .and_then(|binding| binding.panel.upgrade())
        {
            lock(&panel)?.set_state(PanelState::ClosingProgrammatically);
        }
        self.host.close(viewer)
    }

    /// Dispatch a raw click to the handler of the button under it.
    pub fn handle_click(&mut self, event: &mut ClickEvent) -> Result<ClickDisposition> {
        let Some(panel) = self.bound_panel(event.container) else {
            self.with_metrics(RouterMetrics::record_ignored_click);
            self.log(
                LogLevel::Trace,
                "click_ignored",
                [
                    json_kv("container", json!(event.container.0)),
                    json_kv("slot", json!(event.slot)),
                ],
            );
            return Ok(ClickDisposition::Ignored);
        };

        let viewer = event.viewer.clone();
        let slot = event.slot;
        let outcome = {
            let mut guard = lock(&panel)?;
            let handler = guard.get_button(slot).and_then(|b| b.handler().cloned());
            let Some(handler) = handler else {
                drop(guard);
                self.with_metrics(RouterMetrics::record_unhandled_click);
                return Ok(ClickDisposition::Unhandled);
            };
            let mut ctx = ClickContext::new(&mut *guard, event);
            handler(&mut ctx);
            ctx.into_outcome()
        };

        self.with_metrics(RouterMetrics::record_handled_click);
        self.log(
            LogLevel::Debug,
            "click_dispatched",
            [
                json_kv("viewer", json!(viewer)),
                json_kv("slot", json!(slot)),
                json_kv("cancelled", json!(event.is_cancelled())),
            ],
        );

        self.apply_outcome(&panel, &viewer, outcome)?;
        Ok(ClickDisposition::Handled)
    }

    /// Handle a close reported by the host.
    pub fn handle_close(&mut self, event: &CloseEvent) -> Result<CloseDisposition> {
        self.release(event, true)
    }

    /// Log a metrics snapshot if both a logger and metrics are configured.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let event = guard
                    .snapshot(self.started.elapsed())
                    .to_log_event(&self.config.metrics_target);
                let _ = logger.log_event(event);
            }
        }
    }

    fn open_fresh(
        &mut self,
        panel: &SharedPanel,
        viewer: &ViewerId,
        message: &str,
    ) -> Result<ContainerId> {
        let (rendered, panel_id) = {
            let mut guard = lock(panel)?;
            (guard.render(), guard.id())
        };

        let container = self.host.create_container(&rendered.title, rendered.size)?;
        for (slot, item) in &rendered.slots {
            self.host.set_slot_item(container, *slot, item)?;
        }
        self.host.open(container, viewer)?;

        self.bindings.insert(
            container,
            Binding {
                panel: Arc::downgrade(panel),
                panel_id,
                viewer: viewer.clone(),
            },
        );
        self.open.insert(viewer.clone(), container);
        lock(panel)?.set_state(PanelState::Active);

        self.with_metrics(RouterMetrics::record_render);
        self.log(
            LogLevel::Debug,
            message,
            [
                json_kv("panel", json!(panel_id.get())),
                json_kv("container", json!(container.0)),
                json_kv("viewer", json!(viewer)),
                json_kv("filled", json!(rendered.filled())),
            ],
        );
        Ok(container)
    }

    fn apply_outcome(
        &mut self,
        panel: &SharedPanel,
        viewer: &ViewerId,
        outcome: ClickOutcome,
    ) -> Result<()> {
        let ClickOutcome {
            refresh_requested,
            close_request,
            open_request,
        } = outcome;

        if let Some(next) = open_request {
            self.activate(&next, viewer)?;
            return Ok(());
        }

        match close_request {
            Some(CloseRequest::Quiet) => self.close_quietly(viewer),
            Some(CloseRequest::Notify) => self.close(viewer),
            None if refresh_requested => self.refresh(panel, viewer).map(|_| ()),
            None => Ok(()),
        }
    }

    // Drops the container's binding and settles the panel's state. With
    // `notify` unset (a panel replacing its own container) the close hook
    // never runs and nothing is counted or logged as a close.
    fn release(&mut self, event: &CloseEvent, notify: bool) -> Result<CloseDisposition> {
        let Some(binding) = self.bindings.remove(&event.container) else {
            return Ok(CloseDisposition::Ignored);
        };
        if self.open.get(&binding.viewer) == Some(&event.container) {
            self.open.remove(&binding.viewer);
        }
        let Some(panel) = binding.panel.upgrade() else {
            return Ok(CloseDisposition::Ignored);
        };

        let still_open = self
            .bindings
            .values()
            .any(|other| other.panel_id == binding.panel_id);

        let mut guard = lock(&panel)?;
        let suppressed = !notify || guard.state() == PanelState::ClosingProgrammatically;
        guard.set_state(if still_open {
            PanelState::Active
        } else {
            PanelState::Closed
        });

        let hook = guard.on_close().cloned();
        if let (false, Some(hook)) = (suppressed, hook) {
            hook(&mut *guard, event);
        }
        drop(guard);

        if notify {
            self.with_metrics(|metrics| metrics.record_close(suppressed));
            self.log(
                LogLevel::Debug,
                "close_handled",
                [
                    json_kv("panel", json!(binding.panel_id.get())),
                    json_kv("container", json!(event.container.0)),
                    json_kv("viewer", json!(binding.viewer)),
                    json_kv("suppressed", json!(suppressed)),
                ],
            );
        }

        Ok(if suppressed {
            CloseDisposition::Suppressed
        } else {
            CloseDisposition::Notified
        })
    }

    fn bound_panel(&mut self, container: ContainerId) -> Option<SharedPanel> {
        let panel = self.bindings.get(&container)?.panel.upgrade();
        if panel.is_none() {
            if let Some(stale) = self.bindings.remove(&container) {
                if self.open.get(&stale.viewer) == Some(&container) {
                    self.open.remove(&stale.viewer);
                }
            }
        }
        panel
    }

    fn with_metrics(&self, record: impl FnOnce(&mut RouterMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            if logger.enabled(level) {
                let event = event_with_fields(level, LOG_TARGET, message, fields);
                let _ = logger.log_event(event);
            }
        }
    }
}

fn lock(panel: &SharedPanel) -> Result<MutexGuard<'_, Panel>> {
    panel.lock().map_err(|_| PanelError::Poisoned)
}
