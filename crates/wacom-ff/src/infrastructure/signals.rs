//! Bridges POSIX signals onto the service event channel.
//!
//! | Signal            | Event                           |
//! |-------------------|---------------------------------|
//! | `SIGALRM`         | [`ServiceEvent::Alarm`]         |
//! | `SIGPOLL`/`SIGIO` | [`ServiceEvent::ExplicitReload`] |
//! | `SIGUSR1`         | [`ServiceEvent::Resume`]        |
//! | `SIGINT`          | [`ServiceEvent::Interrupt`]     |
//! | `SIGTERM`         | [`ServiceEvent::Interrupt`]     |
//!
//! Signal handlers only enqueue.  All state changes happen in the single
//! consumer, [`ServiceController::run`](crate::application::ServiceController::run).

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::ServiceEvent;

/// One row of the signal → event table.
#[derive(Debug, Clone, Copy)]
pub struct SignalRoute {
    pub name: &'static str,
    pub kind: SignalKind,
    pub event: ServiceEvent,
}

/// The full signal → event table.
pub fn signal_routes() -> [SignalRoute; 5] {
    [
        SignalRoute {
            name: "SIGALRM",
            kind: SignalKind::alarm(),
            event: ServiceEvent::Alarm,
        },
        SignalRoute {
            name: "SIGPOLL",
            kind: SignalKind::io(),
            event: ServiceEvent::ExplicitReload,
        },
        SignalRoute {
            name: "SIGUSR1",
            kind: SignalKind::user_defined1(),
            event: ServiceEvent::Resume,
        },
        SignalRoute {
            name: "SIGINT",
            kind: SignalKind::interrupt(),
            event: ServiceEvent::Interrupt,
        },
        SignalRoute {
            name: "SIGTERM",
            kind: SignalKind::terminate(),
            event: ServiceEvent::Interrupt,
        },
    ]
}

/// Installs a handler for every routed signal and spawns one forwarding task
/// per signal.
///
/// Each task ends when the receiving side of `events` is dropped.
///
/// # Errors
///
/// Returns the underlying I/O error if a handler cannot be registered.
/// Must be called from within a Tokio runtime.
pub fn spawn_signal_bridge(
    events: mpsc::Sender<ServiceEvent>,
) -> std::io::Result<Vec<JoinHandle<()>>> {
    let mut handles = Vec::new();

    for route in signal_routes() {
        let mut stream = signal(route.kind)?;
        let events = events.clone();

        handles.push(tokio::spawn(async move {
            while stream.recv().await.is_some() {
                debug!(signal = route.name, event = %route.event, "caught signal");
                if events.send(route.event).await.is_err() {
                    warn!(signal = route.name, "event channel closed; signal ignored");
                    break;
                }
            }
        }));
    }

    debug!(handlers = handles.len(), "signal handlers installed");
    Ok(handles)
}
