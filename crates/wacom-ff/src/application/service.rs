//! ServiceController: the signal-driven focus-following state machine.
//!
//! The controller owns the current [`MonitorLayout`] snapshot and reacts to
//! lifecycle events delivered through a single-consumer channel:
//!
//! ```text
//!             start() / Resume
//!   Stopped ───────────────────▶ Running ──┐
//!      ▲                           │   ▲    │ Alarm / ExplicitReload
//!      └───────────────────────────┘   └────┘ (poll cycle)
//!          stop() / Resume
//!
//!   Interrupt (any state) ──▶ stop() ──▶ run loop exits
//! ```
//!
//! # Serialisation
//!
//! [`ServiceController::run`] is the only consumer of the event channel and
//! awaits each event to completion before receiving the next one, so poll
//! cycles never overlap.  `stop()` takes effect synchronously inside the
//! consumer; alarm or reload events dequeued after it are dropped.
//!
//! # Failure isolation
//!
//! Only the initial monitor enumeration can fail the controller (see
//! [`ServiceController::new`]).  Every failure during a poll cycle is logged
//! and ends that cycle; the service stays `Running` and retries on the next
//! event.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use wacom_ff_core::{CursorPosition, MonitorLayout};

use super::resolve_focus::{CursorLocator, ExternalCallError, FocusResolver, ResolutionError};

/// Source of full monitor layout snapshots.
///
/// Implementations must preserve the order the system reports monitors in;
/// first-match resolution depends on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MonitorEnumerator: Send + Sync {
    /// Enumerates all active monitors as one atomic snapshot.
    async fn enumerate_monitors(&self) -> Result<MonitorLayout, ExternalCallError>;
}

/// Binds an input device's active area to a named monitor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceMapper: Send + Sync {
    /// Maps `device_id` onto the monitor output called `monitor_name`.
    async fn map_to_output(
        &self,
        device_id: &str,
        monitor_name: &str,
    ) -> Result<(), ExternalCallError>;
}

/// Errors that prevent the service from being constructed.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The initial monitor layout could not be loaded.
    #[error("failed to load the initial monitor layout: {0}")]
    Construction(#[source] ExternalCallError),
}

/// Runtime settings of one service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Input device to remap, as known to the mapping tool.
    pub device_id: String,
    /// Period of the internal poll timer.  Zero disables periodic polling;
    /// the service then only reacts to signals.
    pub poll_interval: Duration,
    /// Reload the monitor layout before every poll, not only on an explicit
    /// reload request.
    pub always_refresh_on_poll: bool,
}

impl ServiceSettings {
    /// Signal-driven settings for `device_id`: no timer, no forced refresh.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            poll_interval: Duration::ZERO,
            always_refresh_on_poll: false,
        }
    }
}

/// Lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    Running,
}

/// Asynchronous lifecycle events, normally produced by the signal bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceEvent {
    /// Periodic poll trigger.
    Alarm,
    /// Poll, reloading the monitor layout first.
    ExplicitReload,
    /// Leave `Stopped` and re-enter `Running`; pauses a running service.
    Resume,
    /// Stop and terminate.
    Interrupt,
}

impl fmt::Display for ServiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceEvent::Alarm => "alarm",
            ServiceEvent::ExplicitReload => "explicit-reload",
            ServiceEvent::Resume => "resume",
            ServiceEvent::Interrupt => "interrupt",
        };
        f.write_str(name)
    }
}

/// What started a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTrigger {
    Alarm,
    ExplicitReload,
}

/// How a poll cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The device was mapped to the named monitor.
    Mapped { monitor: String },
    /// The mapping tool reported failure for the named monitor.
    MappingFailed { monitor: String },
    /// The layout refresh failed; the previous snapshot was kept.
    RefreshFailed,
    /// Fewer than two monitors; nothing to remap.
    DegenerateLayout,
    /// The cursor position could not be obtained.
    CursorUnavailable,
    /// The cursor lies outside every known monitor.
    NoMonitorAtPoint(CursorPosition),
    /// The controller is stopped; the cycle did not run.
    Stopped,
}

impl From<&ResolutionError> for PollOutcome {
    fn from(err: &ResolutionError) -> Self {
        match err {
            ResolutionError::CursorUnavailable(_) => PollOutcome::CursorUnavailable,
            ResolutionError::NoMonitorAtPoint(position) => PollOutcome::NoMonitorAtPoint(*position),
        }
    }
}

/// The focus-following state machine.
pub struct ServiceController {
    settings: ServiceSettings,
    layout: MonitorLayout,
    state: ServiceState,
    /// Next firing of the internal poll timer; `None` while disarmed.
    poll_deadline: Option<Instant>,
    resolver: FocusResolver,
    monitors: Arc<dyn MonitorEnumerator>,
    mapper: Arc<dyn DeviceMapper>,
    span: Span,
}

impl ServiceController {
    /// Creates a stopped controller and loads the initial monitor layout.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Construction`] if the initial enumeration fails;
    /// the service cannot run without any monitor knowledge.
    pub async fn new(
        settings: ServiceSettings,
        cursor: Arc<dyn CursorLocator>,
        monitors: Arc<dyn MonitorEnumerator>,
        mapper: Arc<dyn DeviceMapper>,
    ) -> Result<Self, ServiceError> {
        let span = info_span!("service", device = %settings.device_id);

        let layout = monitors
            .enumerate_monitors()
            .instrument(span.clone())
            .await
            .map_err(ServiceError::Construction)?;
        span.in_scope(|| info!(monitors = layout.len(), "initial monitor layout loaded"));

        Ok(Self {
            settings,
            layout,
            state: ServiceState::Stopped,
            poll_deadline: None,
            resolver: FocusResolver::new(cursor),
            monitors,
            mapper,
            span,
        })
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// The current layout snapshot.
    pub fn layout(&self) -> &MonitorLayout {
        &self.layout
    }

    /// Next deadline of the internal poll timer, if armed.
    pub fn poll_deadline(&self) -> Option<Instant> {
        self.poll_deadline
    }

    /// Enters `Running` and arms the poll timer.  Idempotent.
    pub fn start(&mut self) {
        self.span.in_scope(|| info!("starting"));
        self.state = ServiceState::Running;
        self.arm_timer();
    }

    /// Enters `Stopped` and disarms the poll timer.  Idempotent.
    ///
    /// While stopped, alarm and reload events are dropped and a resume event
    /// re-enters [`start`](Self::start).
    pub fn stop(&mut self) {
        self.span.in_scope(|| info!("stopping"));
        self.state = ServiceState::Stopped;
        self.poll_deadline = None;
    }

    /// Stops the service ahead of process exit.
    pub fn terminate(&mut self) {
        self.stop();
        self.span.in_scope(|| info!("terminating"));
    }

    /// Dispatches one event according to the current state.
    ///
    /// Returns [`ControlFlow::Break`] once the service has terminated.
    pub async fn handle(&mut self, event: ServiceEvent) -> ControlFlow<()> {
        self.span.in_scope(|| debug!(%event, state = ?self.state, "handling event"));

        match (self.state, event) {
            (_, ServiceEvent::Interrupt) => {
                self.terminate();
                return ControlFlow::Break(());
            }
            (ServiceState::Running, ServiceEvent::Alarm) => {
                self.poll(PollTrigger::Alarm).await;
            }
            (ServiceState::Running, ServiceEvent::ExplicitReload) => {
                self.poll(PollTrigger::ExplicitReload).await;
            }
            (ServiceState::Running, ServiceEvent::Resume) => self.stop(),
            (ServiceState::Stopped, ServiceEvent::Resume) => self.start(),
            (ServiceState::Stopped, ServiceEvent::Alarm | ServiceEvent::ExplicitReload) => {
                self.span.in_scope(|| debug!(%event, "service stopped; event dropped"));
            }
        }
        ControlFlow::Continue(())
    }

    /// Runs one poll cycle: optional layout refresh, focus resolution, device
    /// mapping, timer re-arm.
    ///
    /// Never fails; every abort reason is logged and reported as a
    /// [`PollOutcome`].  The layout is only replaced by a fully built snapshot.
    pub async fn poll(&mut self, trigger: PollTrigger) -> PollOutcome {
        let span = self.span.clone();
        self.poll_cycle(trigger).instrument(span).await
    }

    /// Consumes events until an interrupt arrives or every sender is dropped.
    ///
    /// The internal poll timer is multiplexed with the channel; a timer expiry
    /// is handled exactly like an [`ServiceEvent::Alarm`].  Pending channel
    /// events are preferred over the timer so a queued `stop` is always seen
    /// first.
    pub async fn run(mut self, mut events: mpsc::Receiver<ServiceEvent>) {
        let span = self.span.clone();
        async move {
            loop {
                let event = match self.poll_deadline {
                    Some(deadline) => tokio::select! {
                        biased;
                        event = events.recv() => event,
                        () = tokio::time::sleep_until(deadline) => {
                            // Repeat even if the cycle aborts before re-arming.
                            self.arm_timer();
                            Some(ServiceEvent::Alarm)
                        }
                    },
                    None => events.recv().await,
                };

                let Some(event) = event else {
                    info!("event channel closed");
                    self.stop();
                    break;
                };

                if self.handle(event).await.is_break() {
                    break;
                }
            }
        }
        .instrument(span)
        .await
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    async fn poll_cycle(&mut self, trigger: PollTrigger) -> PollOutcome {
        if self.state == ServiceState::Stopped {
            debug!(?trigger, "service stopped; poll skipped");
            return PollOutcome::Stopped;
        }
        debug!(?trigger, "poll cycle started");

        // 1. Refresh the layout if asked to.
        if trigger == PollTrigger::ExplicitReload || self.settings.always_refresh_on_poll {
            info!("reloading monitor layout");
            match self.monitors.enumerate_monitors().await {
                Ok(layout) => self.replace_layout(layout),
                Err(e) => {
                    error!("failed to reload monitor layout: {e}");
                    return PollOutcome::RefreshFailed;
                }
            }
        }

        // 2. Nothing to remap on a single monitor.
        if self.layout.is_degenerate() {
            warn!(monitors = self.layout.len(), "fewer than two monitors; ignoring event");
            return PollOutcome::DegenerateLayout;
        }

        // 3. Find the focused monitor.
        let monitor = match self.resolver.resolve(&self.layout).await {
            Ok(monitor) => monitor.name().to_owned(),
            Err(e) => {
                error!("could not determine the focused monitor: {e}");
                return PollOutcome::from(&e);
            }
        };

        // 4. Map the device.
        debug!(%monitor, "mapping device");
        let outcome = match self
            .mapper
            .map_to_output(&self.settings.device_id, &monitor)
            .await
        {
            Ok(()) => PollOutcome::Mapped { monitor },
            Err(e) => {
                error!(%monitor, "device mapping failed: {e}");
                PollOutcome::MappingFailed { monitor }
            }
        };

        // 5. Re-arm the timer.
        self.arm_timer();
        outcome
    }

    fn replace_layout(&mut self, layout: MonitorLayout) {
        if layout != self.layout {
            info!(
                previous = self.layout.len(),
                current = layout.len(),
                "monitor layout changed"
            );
        }
        self.layout = layout;
    }

    /// An interval too large to be represented as a deadline never fires.
    fn arm_timer(&mut self) {
        let interval = self.settings.poll_interval;
        self.poll_deadline = if interval.is_zero() {
            None
        } else {
            let deadline = Instant::now().checked_add(interval);
            if deadline.is_none() {
                warn!(?interval, "poll interval out of range; timer disarmed");
            }
            deadline
        };
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
