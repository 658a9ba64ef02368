//! Device mapping via `xsetwacom set <device> MapToOutput <monitor>`.

use async_trait::async_trait;
use tracing::info;

use super::command::ExternalTool;
use crate::application::{DeviceMapper, ExternalCallError};

/// [`DeviceMapper`] backed by xsetwacom.
pub struct XsetwacomMapper {
    tool: ExternalTool,
}

impl XsetwacomMapper {
    pub fn new(tool: ExternalTool) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl DeviceMapper for XsetwacomMapper {
    async fn map_to_output(
        &self,
        device_id: &str,
        monitor_name: &str,
    ) -> Result<(), ExternalCallError> {
        self.tool
            .run(&["set", device_id, "MapToOutput", monitor_name])
            .await?;
        info!(device = device_id, monitor = monitor_name, "device mapped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_map_to_output_succeeds_on_zero_exit() {
        // `true` accepts any arguments and exits 0.
        let mapper = XsetwacomMapper::new(ExternalTool::new("true", None));

        let result = mapper.map_to_output("Wacom Intuos Pro M Pen stylus", "DP-1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_map_to_output_reports_failure() {
        let mapper = XsetwacomMapper::new(ExternalTool::new("false", None));

        let err = mapper.map_to_output("stylus", "DP-1").await.unwrap_err();

        assert!(matches!(err, ExternalCallError::Failed { ref program, .. } if program == "false"));
    }
}
