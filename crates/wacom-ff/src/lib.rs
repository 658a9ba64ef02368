//! # wacom-ff
//!
//! Focus-following daemon for pen tablets: whenever it is polled, it finds the
//! monitor under the mouse cursor and maps the configured input device onto
//! that monitor.
//!
//! The crate is split the same way as the core:
//!
//! - [`application`] – the [`ServiceController`](application::ServiceController)
//!   state machine and the traits it needs from the outside world.
//! - [`infrastructure`] – `xdotool`, `xrandr` and `xsetwacom` adapters, the
//!   POSIX signal bridge and the configuration file.
//!
//! The binary (`src/main.rs`) parses the command line, sets up logging and
//! wires the two together.

pub mod application;
pub mod infrastructure;
