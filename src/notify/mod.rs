//! Outbound notifications. All dispatch is best-effort: failures are logged
//! by callers and never affect request outcomes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Dispatch failed: {0}")]
    Failed(String),
}

/// Payment notice delivered to a seller when one of their orders is paid.
#[derive(Debug, Clone)]
pub struct PaymentNotice {
    pub seller_name: String,
    pub product_name: String,
    pub amount: Decimal,
    pub currency: String,
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify_seller_of_payment(
        &self,
        email: &str,
        notice: &PaymentNotice,
    ) -> Result<(), DispatchError>;

    async fn send_verification(&self, email: &str, verify_url: &str) -> Result<(), DispatchError>;

    async fn send_password_reset(&self, email: &str, reset_url: &str)
        -> Result<(), DispatchError>;
}

/// Default dispatcher: records every notification in the log instead of
/// talking to a mail provider, the behavior the server falls back to when no
/// provider is configured.
#[derive(Debug, Default)]
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn notify_seller_of_payment(
        &self,
        email: &str,
        notice: &PaymentNotice,
    ) -> Result<(), DispatchError> {
        tracing::info!(
            recipient = %email,
            seller = %notice.seller_name,
            product = %notice.product_name,
            amount = %notice.amount,
            currency = %notice.currency,
            "order paid notice"
        );
        Ok(())
    }

    async fn send_verification(&self, email: &str, verify_url: &str) -> Result<(), DispatchError> {
        tracing::info!(recipient = %email, url = %verify_url, "verification email");
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &str,
        reset_url: &str,
    ) -> Result<(), DispatchError> {
        tracing::info!(recipient = %email, url = %reset_url, "password reset email");
        Ok(())
    }
}
