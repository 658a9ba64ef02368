//! In-memory adapters for driving the service without an X session.
//!
//! Each mock can be reconfigured while the service holds it (through an
//! `Arc`), counts its calls, and can be told to fail.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use wacom_ff_core::{CursorPosition, MonitorLayout};

use crate::application::{CursorLocator, DeviceMapper, ExternalCallError, MonitorEnumerator};

fn mock_failure(program: &str) -> ExternalCallError {
    ExternalCallError::Failed {
        program: program.to_string(),
        status: "exit status: 1".to_string(),
        output: "mock failure".to_string(),
    }
}

// ── Cursor ────────────────────────────────────────────────────────────────────

/// A [`CursorLocator`] reporting a settable position.
pub struct MockCursorLocator {
    position: Mutex<CursorPosition>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockCursorLocator {
    pub fn new(position: CursorPosition) -> Self {
        Self {
            position: Mutex::new(position),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Moves the simulated pointer.
    pub fn set_position(&self, position: CursorPosition) {
        *self.position.lock().expect("lock poisoned") = position;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CursorLocator for MockCursorLocator {
    async fn cursor_position(&self) -> Result<CursorPosition, ExternalCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(mock_failure("mock-cursor"));
        }
        Ok(*self.position.lock().expect("lock poisoned"))
    }
}

// ── Monitors ──────────────────────────────────────────────────────────────────

/// A [`MonitorEnumerator`] returning a settable layout snapshot.
pub struct MockMonitorEnumerator {
    layout: Mutex<MonitorLayout>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockMonitorEnumerator {
    pub fn new(layout: MonitorLayout) -> Self {
        Self {
            layout: Mutex::new(layout),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the snapshot returned by the next enumeration.
    pub fn set_layout(&self, layout: MonitorLayout) {
        *self.layout.lock().expect("lock poisoned") = layout;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MonitorEnumerator for MockMonitorEnumerator {
    async fn enumerate_monitors(&self) -> Result<MonitorLayout, ExternalCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(mock_failure("mock-monitors"));
        }
        Ok(self.layout.lock().expect("lock poisoned").clone())
    }
}

// ── Mapper ────────────────────────────────────────────────────────────────────

/// A [`DeviceMapper`] that records every `(device, monitor)` request.
///
/// Failed requests are recorded too.
#[derive(Default)]
pub struct MockDeviceMapper {
    mappings: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl MockDeviceMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All requests so far, oldest first.
    pub fn mappings(&self) -> Vec<(String, String)> {
        self.mappings.lock().expect("lock poisoned").clone()
    }

    /// Monitor names of all requests so far, oldest first.
    pub fn mapped_monitors(&self) -> Vec<String> {
        self.mappings()
            .into_iter()
            .map(|(_, monitor)| monitor)
            .collect()
    }
}

#[async_trait]
impl DeviceMapper for MockDeviceMapper {
    async fn map_to_output(
        &self,
        device_id: &str,
        monitor_name: &str,
    ) -> Result<(), ExternalCallError> {
        self.mappings
            .lock()
            .expect("lock poisoned")
            .push((device_id.to_string(), monitor_name.to_string()));
        if self.failing.load(Ordering::SeqCst) {
            return Err(mock_failure("mock-mapper"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wacom_ff_core::MonitorGeometry;

    #[tokio::test]
    async fn test_mock_cursor_reports_updated_position() {
        // Arrange
        let cursor = MockCursorLocator::new(CursorPosition::new(0, 0));

        // Act
        cursor.set_position(CursorPosition::new(5, 6));
        let pos = cursor.cursor_position().await.unwrap();

        // Assert
        assert_eq!(pos, CursorPosition::new(5, 6));
        assert_eq!(cursor.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_enumerator_failure_still_counts_call() {
        let monitors = MockMonitorEnumerator::new(MonitorLayout::empty());
        monitors.set_failing(true);

        assert!(monitors.enumerate_monitors().await.is_err());
        assert_eq!(monitors.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_enumerator_returns_replaced_layout() {
        let monitors = MockMonitorEnumerator::new(MonitorLayout::empty());
        let layout =
            MonitorLayout::new(vec![MonitorGeometry::new(0, "DP-1", 10, 10, 0, 0).unwrap()]).unwrap();

        monitors.set_layout(layout.clone());

        assert_eq!(monitors.enumerate_monitors().await.unwrap(), layout);
    }

    #[tokio::test]
    async fn test_mock_mapper_records_requests_in_order() {
        let mapper = MockDeviceMapper::new();

        mapper.map_to_output("pen", "DP-1").await.unwrap();
        mapper.set_failing(true);
        let second = mapper.map_to_output("pen", "HDMI-1").await;

        assert!(second.is_err());
        assert_eq!(mapper.mapped_monitors(), ["DP-1", "HDMI-1"]);
        assert_eq!(mapper.mappings()[0].0, "pen");
    }
}
