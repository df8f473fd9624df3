//! Payment initiation and gateway webhook confirmation.

pub mod notification;
pub mod processor;
pub mod signature;

pub use notification::{ChargeNotification, ChargeOutcome, GatewayNotification};
pub use processor::{Confirmation, PaymentProcessor};
pub use signature::WebhookVerifier;
