//! FocusResolver: works out which monitor currently has the cursor.
//!
//! The resolver asks a [`CursorLocator`] for the pointer position and looks it
//! up in a [`MonitorLayout`] snapshot.  It performs no retries; the service
//! controller treats every poll as an independent attempt.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use wacom_ff_core::{CursorPosition, MonitorGeometry, MonitorLayout};

/// Failure of one of the external system calls (cursor lookup, monitor
/// enumeration, device mapping).
#[derive(Debug, Error)]
pub enum ExternalCallError {
    /// The external program could not be started at all.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external program ran but reported failure.
    #[error("{program} exited with {status}: {output}")]
    Failed {
        program: String,
        status: String,
        output: String,
    },

    /// The external program did not finish in time and was killed.
    #[error("{program} did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    /// The external program succeeded but its output could not be understood.
    #[error("{program} returned unparsable output: {detail}")]
    InvalidOutput { program: String, detail: String },
}

/// Errors produced by [`FocusResolver::resolve`].
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The cursor position could not be obtained.
    #[error("cursor position unavailable: {0}")]
    CursorUnavailable(#[source] ExternalCallError),

    /// The cursor is outside every monitor of the current snapshot.
    #[error("no monitor contains the cursor at {0}")]
    NoMonitorAtPoint(CursorPosition),
}

/// Source of the current pointer location in virtual screen coordinates.
///
/// The production implementation shells out to `xdotool`; tests use mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CursorLocator: Send + Sync {
    /// Returns the current cursor position.
    async fn cursor_position(&self) -> Result<CursorPosition, ExternalCallError>;
}

/// Resolves the cursor position to a monitor of a layout snapshot.
pub struct FocusResolver {
    cursor: Arc<dyn CursorLocator>,
}

impl FocusResolver {
    pub fn new(cursor: Arc<dyn CursorLocator>) -> Self {
        Self { cursor }
    }

    /// Returns the monitor of `layout` that contains the cursor.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::CursorUnavailable`] if the cursor lookup fails.
    /// - [`ResolutionError::NoMonitorAtPoint`] if no monitor contains it.
    pub async fn resolve<'a>(
        &self,
        layout: &'a MonitorLayout,
    ) -> Result<&'a MonitorGeometry, ResolutionError> {
        let position = self
            .cursor
            .cursor_position()
            .await
            .map_err(ResolutionError::CursorUnavailable)?;
        debug!(%position, "cursor located");

        layout
            .resolve(position)
            .ok_or(ResolutionError::NoMonitorAtPoint(position))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
