//! UI/backend events and error modeling for the storefront GUI.

use client_core::PurchaseOutcome;

pub enum UiEvent {
    WorkerReady,
    Info(String),
    PurchaseStarted,
    PurchaseSettled {
        outcome: PurchaseOutcome,
        fulfilled_count: u32,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Startup,
    Configuration,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    WorkerStartup,
    General,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Startup => "Startup",
        UiErrorCategory::Configuration => "Configuration",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("startup failure")
            || message_lower.contains("failed to build")
            || message_lower.contains("runtime")
        {
            UiErrorCategory::Startup
        } else if message_lower.contains("not configured")
            || message_lower.contains("invalid farm endpoint")
            || message_lower.contains("missing")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("connect")
            || message_lower.contains("network")
            || message_lower.contains("timeout")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_runtime_build_failures_as_startup() {
        let err = UiError::from_message(
            UiErrorContext::WorkerStartup,
            "backend worker startup failure: failed to build runtime: boom",
        );
        assert_eq!(err.category(), UiErrorCategory::Startup);
        assert_eq!(err.context(), UiErrorContext::WorkerStartup);
    }

    #[test]
    fn classifies_missing_endpoint_as_configuration() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Farm endpoint is not configured. Set CORN_FARM_URL (or farm_url in corn.toml) and retry.",
        );
        assert_eq!(err.category(), UiErrorCategory::Configuration);
    }

    #[test]
    fn classifies_connection_failures_as_transport() {
        // Startup keywords win by match order, even over "disconnected".
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Startup);

        let err = UiError::from_message(
            UiErrorContext::General,
            "Could not connect to Bob's farm. Is the server running?",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn unmatched_messages_fall_through_to_unknown() {
        let err = UiError::from_message(UiErrorContext::General, "something odd happened");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.message(), "something odd happened");
    }
}
