//! Payment processing for room charges.
//!
//! The hotel only ever talks to [`PaymentProcessor`]; the simulated processor
//! stands in for a real card gateway.

use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Payment processor result
pub type PaymentResult<T> = Result<T, PaymentError>;

/// Why a charge did not go through
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentError {
    /// The processor refused the charge
    #[error("{reason}")]
    Declined {
        /// Decline reason
        reason: String,
    },

    /// The processor could not be reached
    #[error("Payment processor unavailable: {message}")]
    Unavailable {
        /// Failure detail
        message: String,
    },
}

/// Proof of a successful charge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Processor transaction ID
    pub transaction_id: String,
    /// Amount charged
    pub amount: Money,
}

impl PaymentReceipt {
    /// Creates a receipt
    #[must_use]
    pub fn new(transaction_id: impl Into<String>, amount: Money) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount,
        }
    }
}

/// Payment processor trait
///
/// Abstraction over whatever charges the guest for a room.
pub trait PaymentProcessor: Send + Sync {
    /// Charge `amount`
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError`] if the charge fails.
    fn process_payment(
        &self,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = PaymentResult<PaymentReceipt>> + Send>>;
}

/// Simulated payment processor
///
/// Approves every charge unless built with [`SimulatedPaymentProcessor::declining`]
/// or [`SimulatedPaymentProcessor::unreachable`].
#[derive(Clone, Debug, Default)]
pub struct SimulatedPaymentProcessor {
    latency: Duration,
    decline_reason: Option<String>,
    outage: Option<String>,
}

impl SimulatedPaymentProcessor {
    /// Creates a processor that approves immediately
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            decline_reason: None,
            outage: None,
        }
    }

    /// Delay every charge by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Decline every charge with `reason`
    #[must_use]
    pub fn declining(mut self, reason: impl Into<String>) -> Self {
        self.decline_reason = Some(reason.into());
        self
    }

    /// Fail every charge as if the processor could not be reached
    #[must_use]
    pub fn unreachable(mut self, message: impl Into<String>) -> Self {
        self.outage = Some(message.into());
        self
    }

    /// Wraps the processor for sharing through the environment
    #[must_use]
    pub fn shared(self) -> Arc<dyn PaymentProcessor> {
        Arc::new(self)
    }
}

impl PaymentProcessor for SimulatedPaymentProcessor {
    fn process_payment(
        &self,
        amount: Money,
    ) -> Pin<Box<dyn Future<Output = PaymentResult<PaymentReceipt>> + Send>> {
        let latency = self.latency;
        let decline_reason = self.decline_reason.clone();
        let outage = self.outage.clone();

        Box::pin(async move {
            tracing::info!("Processing payment of {amount}");

            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }

            if let Some(message) = outage {
                tracing::error!(amount = amount.cents(), %message, "Simulated processor unreachable");
                return Err(PaymentError::Unavailable { message });
            }

            if let Some(reason) = decline_reason {
                tracing::warn!(amount = amount.cents(), %reason, "Simulated payment declined");
                return Err(PaymentError::Declined { reason });
            }

            let transaction_id = format!("sim_txn_{}", uuid::Uuid::new_v4());
            tracing::debug!(
                amount = amount.cents(),
                transaction_id = %transaction_id,
                "Simulated payment approved"
            );

            Ok(PaymentReceipt {
                transaction_id,
                amount,
            })
        })
    }
}
