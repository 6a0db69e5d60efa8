use serde::{Deserialize, Serialize};

/// Body of a successful purchase response from the farm endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub message: String,
}

/// Body of a failed purchase response from the farm endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseFailure {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_success_body_from_farm() {
        let receipt: PurchaseReceipt =
            serde_json::from_str(r#"{"message":"🌽 Corn successfully purchased!"}"#)
                .expect("receipt");
        assert_eq!(receipt.message, "🌽 Corn successfully purchased!");
    }

    #[test]
    fn deserializes_rate_limit_body_from_farm() {
        let failure: PurchaseFailure =
            serde_json::from_str(r#"{"error":"Too Many Requests. Please wait a minute."}"#)
                .expect("failure");
        assert_eq!(failure.error, "Too Many Requests. Please wait a minute.");
    }

    #[test]
    fn tolerates_unknown_fields_in_response_bodies() {
        let receipt: PurchaseReceipt =
            serde_json::from_str(r#"{"message":"ok","request_id":"abc-123"}"#).expect("receipt");
        assert_eq!(receipt.message, "ok");
    }
}
