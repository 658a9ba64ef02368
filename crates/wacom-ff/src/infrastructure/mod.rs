//! Infrastructure layer of the daemon.
//!
//! OS-facing adapters: the subprocess runner and the three X11 tools behind
//! the application traits, the signal bridge, and the configuration file.
//! `mock` provides in-memory adapters for tests.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `wacom_ff_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod command;
pub mod mock;
pub mod signals;
pub mod storage;
pub mod xdotool;
pub mod xrandr;
pub mod xsetwacom;

pub use command::{ExternalTool, DEFAULT_COMMAND_TIMEOUT};
pub use signals::spawn_signal_bridge;
pub use xdotool::XdotoolCursorLocator;
pub use xrandr::XrandrMonitorEnumerator;
pub use xsetwacom::XsetwacomMapper;
