//! Status and confirmation message types for operation feedback.

use std::fmt;

/// Confirmation line printed after a command.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "**{label}** {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Pushed plan web");
        assert_eq!(success.to_string(), "**Success:** Pushed plan web\n");

        let failure = OperationStatus::failure("Plan 'web' not found");
        assert!(failure.to_string().contains("Error:"));
    }
}
