use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use shared::{
    error::FailureKind,
    protocol::{PurchaseFailure, PurchaseReceipt},
};
use tracing::{info, warn};
use url::Url;

pub mod controller;
pub mod settings;

pub use controller::{PurchaseController, PurchaseSession};
pub use settings::{load_settings, FarmSettings, SettingsError};

/// Fixed user-facing message for transport-level failures.
pub const FARM_UNREACHABLE_MESSAGE: &str =
    "Could not connect to Bob's farm. Is the server running?";

/// Fixed user-facing message when no farm endpoint is configured.
pub const ENDPOINT_NOT_CONFIGURED_MESSAGE: &str =
    "Farm endpoint is not configured. Set CORN_FARM_URL (or farm_url in corn.toml) and retry.";

/// Outcome of a single purchase attempt.
///
/// Exactly one of the success message or the failure error exists per
/// attempt; the variants make that unrepresentable rather than relying on
/// optional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Fulfilled {
        message: String,
        status: u16,
    },
    Rejected {
        kind: FailureKind,
        error: String,
        status: Option<u16>,
    },
}

impl PurchaseOutcome {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled { .. })
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                kind: FailureKind::RateLimited,
                ..
            }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fulfilled { status, .. } => Some(*status),
            Self::Rejected { status, .. } => *status,
        }
    }

    /// The text a presentation layer should show for this outcome.
    pub fn banner_text(&self) -> &str {
        match self {
            Self::Fulfilled { message, .. } => message,
            Self::Rejected { error, .. } => error,
        }
    }
}

#[derive(Debug, Serialize)]
struct PurchaseRequest {}

/// Seam between the purchase controller and the network. Lets the session
/// state machine be exercised against stub farms in tests.
#[async_trait]
pub trait FarmGateway: Send + Sync {
    async fn attempt_purchase(&self) -> PurchaseOutcome;
}

/// HTTP client for the corn-selling endpoint.
///
/// The endpoint is injected at construction; a missing endpoint is a valid
/// state that resolves to a configuration outcome instead of touching the
/// network. Each call is exactly one request, no retries, no backoff.
pub struct PurchaseClient {
    http: Client,
    endpoint: Option<Url>,
}

impl PurchaseClient {
    pub fn new(endpoint: Option<Url>) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    /// Builds a client from loaded settings. Fails only on an unparseable
    /// endpoint value; an absent endpoint produces an unconfigured client.
    pub fn from_settings(settings: &FarmSettings) -> Result<Self, SettingsError> {
        Ok(Self::new(settings.endpoint_url()?))
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Performs one purchase attempt. Never fails: every failure mode is
    /// folded into a rejected outcome.
    pub async fn attempt_purchase(&self) -> PurchaseOutcome {
        let Some(endpoint) = &self.endpoint else {
            warn!("purchase attempted without a configured farm endpoint");
            return PurchaseOutcome::Rejected {
                kind: FailureKind::Configuration,
                error: ENDPOINT_NOT_CONFIGURED_MESSAGE.to_string(),
                status: None,
            };
        };

        info!(endpoint = %endpoint, "corn purchase request");
        let response = match self
            .http
            .post(endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .json(&PurchaseRequest {})
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("corn purchase transport failure: {err}");
                return transport_outcome();
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                warn!(status = status.as_u16(), "failed to read farm response body: {err}");
                return transport_outcome();
            }
        };

        if status.is_success() {
            match serde_json::from_slice::<PurchaseReceipt>(&body) {
                Ok(receipt) => {
                    info!(status = status.as_u16(), "corn purchase fulfilled");
                    PurchaseOutcome::Fulfilled {
                        message: receipt.message,
                        status: status.as_u16(),
                    }
                }
                Err(_) => malformed_outcome(status, &body),
            }
        } else {
            match serde_json::from_slice::<PurchaseFailure>(&body) {
                Ok(failure) => {
                    warn!(status = status.as_u16(), "corn purchase rejected by farm");
                    PurchaseOutcome::Rejected {
                        kind: FailureKind::from_status(status.as_u16()),
                        error: failure.error,
                        status: Some(status.as_u16()),
                    }
                }
                Err(_) => malformed_outcome(status, &body),
            }
        }
    }
}

fn transport_outcome() -> PurchaseOutcome {
    PurchaseOutcome::Rejected {
        kind: FailureKind::Transport,
        error: FARM_UNREACHABLE_MESSAGE.to_string(),
        status: Some(500),
    }
}

fn malformed_outcome(status: StatusCode, body: &[u8]) -> PurchaseOutcome {
    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    let detail = if raw.is_empty() {
        status.canonical_reason().unwrap_or("unknown status")
    } else {
        raw
    };
    warn!(status = status.as_u16(), "farm returned an unparseable response body");
    PurchaseOutcome::Rejected {
        kind: FailureKind::MalformedResponse,
        error: format!("Server error: {detail}"),
        status: Some(status.as_u16()),
    }
}

#[async_trait]
impl FarmGateway for PurchaseClient {
    async fn attempt_purchase(&self) -> PurchaseOutcome {
        PurchaseClient::attempt_purchase(self).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
