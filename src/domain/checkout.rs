use serde::{Deserialize, Serialize};
use std::fmt;

pub type TransactionId = u64;

/// Confirmation sent back on a completed purchase.
pub const PURCHASE_CONFIRMATION: &str = "Purchase completed successfully.";

/// Progress of a single finalize-purchase request. Failures leave the
/// request at the last stage it reached.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutStage {
    #[default]
    Started,
    StockChecked,
    PriceComputed,
    PaymentAuthorized,
    StockDeducted,
    Completed,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStage::Started => "started",
            CheckoutStage::StockChecked => "stock-checked",
            CheckoutStage::PriceComputed => "price-computed",
            CheckoutStage::PaymentAuthorized => "payment-authorized",
            CheckoutStage::StockDeducted => "stock-deducted",
            CheckoutStage::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Result of the compensating payment cancellation issued when stock
/// deduction fails after the payment was authorized.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "outcome", content = "reason", rename_all = "lowercase")]
pub enum CompensationOutcome {
    Cancelled,
    Failed(String),
}

impl fmt::Display for CompensationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompensationOutcome::Cancelled => f.write_str("payment cancelled"),
            CompensationOutcome::Failed(reason) => write!(f, "cancellation failed: {reason}"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct FinalizePurchaseResult {
    pub success: bool,
    pub transaction_id: TransactionId,
    pub message: String,
}

impl FinalizePurchaseResult {
    pub fn completed(transaction_id: TransactionId) -> Self {
        Self {
            success: true,
            transaction_id,
            message: PURCHASE_CONFIRMATION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_are_ordered() {
        assert!(CheckoutStage::Started < CheckoutStage::StockChecked);
        assert!(CheckoutStage::PaymentAuthorized < CheckoutStage::Completed);
        assert_eq!(CheckoutStage::default(), CheckoutStage::Started);
    }

    #[test]
    fn test_compensation_serialization() {
        let json = serde_json::to_string(&CompensationOutcome::Failed("timeout".into())).unwrap();
        assert_eq!(json, r#"{"outcome":"failed","reason":"timeout"}"#);

        let json = serde_json::to_string(&CompensationOutcome::Cancelled).unwrap();
        assert_eq!(json, r#"{"outcome":"cancelled"}"#);
    }

    #[test]
    fn test_completed_result() {
        let result = FinalizePurchaseResult::completed(99999);
        assert!(result.success);
        assert_eq!(result.transaction_id, 99999);
        assert_eq!(result.message, PURCHASE_CONFIRMATION);
    }
}
