//! Application layer use cases for the daemon.
//!
//! Use cases in this layer orchestrate the domain types from
//! `wacom_ff_core` and depend only on traits for everything that touches the
//! outside world, so they can be driven entirely by mocks in tests.
//!
//! # Sub-modules
//!
//! - **`resolve_focus`** – Asks a [`CursorLocator`] for the pointer position
//!   and finds the monitor containing it.
//!
//! - **`service`** – The [`ServiceController`] state machine: start, stop,
//!   poll and terminate transitions driven by lifecycle events.

pub mod resolve_focus;
pub mod service;

pub use resolve_focus::{CursorLocator, ExternalCallError, FocusResolver, ResolutionError};
pub use service::{
    DeviceMapper, MonitorEnumerator, PollOutcome, PollTrigger, ServiceController, ServiceError,
    ServiceEvent, ServiceSettings, ServiceState,
};
