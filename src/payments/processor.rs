use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PaymentConfig;
use crate::models::{
    CheckoutCustomer, CheckoutDescriptor, CheckoutProduct, Order, OrderStatus, TransactionRecord,
    User,
};
use crate::notify::{NotificationDispatcher, PaymentNotice};
use crate::store::{CatalogStore, IdentityStore, OrderStore, SettleOutcome, TransactionLedger};
use crate::utils::error::AppError;

use super::notification::{ChargeNotification, ChargeOutcome};

/// Upper bound on a single seller-notification attempt. The dispatch task is
/// detached, so a slow provider can never hold up a webhook acknowledgment.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// What a confirmation did, for logging and acknowledgment bookkeeping.
#[derive(Debug)]
pub enum Confirmation {
    Paid(Order),
    Failed(Order),
    AlreadySettled(OrderStatus),
    UnknownReference,
}

/// Owns the order lifecycle: creates pending orders at initiation and is the
/// only actor permitted to transition them to a terminal state.
pub struct PaymentProcessor {
    orders: Arc<OrderStore>,
    catalog: Arc<CatalogStore>,
    identity: Arc<IdentityStore>,
    ledger: Arc<TransactionLedger>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    config: PaymentConfig,
}

impl PaymentProcessor {
    pub fn new(
        orders: Arc<OrderStore>,
        catalog: Arc<CatalogStore>,
        identity: Arc<IdentityStore>,
        ledger: Arc<TransactionLedger>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            orders,
            catalog,
            identity,
            ledger,
            dispatcher,
            config,
        }
    }

    /// Creates a pending order and returns the checkout payload for the
    /// gateway's client-side widget. No payment has occurred yet; the only
    /// side effect is the stored pending order.
    pub async fn initiate(
        &self,
        buyer: &User,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CheckoutDescriptor, AppError> {
        if quantity < 1 {
            return Err(AppError::ValidationError(
                "quantity must be at least 1".to_string(),
            ));
        }
        let product = self
            .catalog
            .find(product_id)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
        let seller_id = product
            .seller_id
            .ok_or_else(|| AppError::ValidationError("Product has no seller".to_string()))?;
        if self.identity.find_seller(seller_id).is_none() {
            return Err(AppError::NotFound("Seller not found".to_string()));
        }

        let amount = product
            .price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| AppError::ValidationError("order amount too large".to_string()))?;
        let reference = new_reference();
        let now = Utc::now();
        let order = self.orders.create(Order {
            id: Uuid::new_v4(),
            product_id: product.id,
            seller_id,
            buyer_id: buyer.id,
            amount,
            currency: self.config.currency.clone(),
            quantity,
            status: OrderStatus::Pending,
            reference: reference.clone(),
            gateway_tx_id: None,
            metadata: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        })?;

        info!(order_id = %order.id, reference = %order.reference, %amount, "order initiated");

        Ok(CheckoutDescriptor {
            order_id: order.id,
            reference,
            amount,
            currency: order.currency,
            customer: CheckoutCustomer {
                name: buyer.name.clone(),
                email: buyer.email.clone(),
            },
            product: CheckoutProduct { name: product.name },
            gateway_public_key: self.config.gateway_public_key.clone(),
        })
    }

    /// Applies a verified gateway notification. The status transition is a
    /// single conditional update, so duplicate or concurrent deliveries of
    /// the same notification apply the success side effects exactly once.
    /// Everything here is absorbed: the webhook caller gets an
    /// acknowledgment no matter what this returns.
    pub async fn confirm(&self, charge: ChargeNotification) -> Confirmation {
        let target = match charge.outcome {
            ChargeOutcome::Success => OrderStatus::Paid,
            ChargeOutcome::Failure => OrderStatus::Failed,
        };

        match self
            .orders
            .settle(&charge.reference, target, charge.gateway_tx_id)
        {
            SettleOutcome::UnknownReference => {
                // Anomaly, not an error: the gateway may notify about
                // charges this deployment never initiated.
                info!(reference = %charge.reference, "notification for unknown reference");
                Confirmation::UnknownReference
            }
            SettleOutcome::AlreadySettled(status) => {
                info!(reference = %charge.reference, ?status, "duplicate notification ignored");
                Confirmation::AlreadySettled(status)
            }
            SettleOutcome::Applied(order) if order.status == OrderStatus::Paid => {
                self.apply_success_effects(&order).await;
                Confirmation::Paid(order)
            }
            SettleOutcome::Applied(order) => {
                info!(order_id = %order.id, reference = %order.reference, "order failed");
                Confirmation::Failed(order)
            }
        }
    }

    /// Side effects of a successful payment: stock decrement (clamped),
    /// write-once ledger entry, and a detached best-effort seller notice.
    async fn apply_success_effects(&self, order: &Order) {
        match self.catalog.decrement_stock(order.product_id, order.quantity) {
            Some(remaining) => {
                info!(order_id = %order.id, product_id = %order.product_id, remaining, "stock decremented");
            }
            None => {
                warn!(order_id = %order.id, product_id = %order.product_id, "paid order references missing product");
            }
        }

        if let Err(e) = self.ledger.record(TransactionRecord::from_order(order)) {
            warn!(order_id = %order.id, error = ?e, "ledger entry not recorded");
        }

        self.dispatch_seller_notice(order);
    }

    fn dispatch_seller_notice(&self, order: &Order) {
        let Some(seller) = self.identity.find_seller(order.seller_id) else {
            warn!(order_id = %order.id, seller_id = %order.seller_id, "paid order references missing seller");
            return;
        };
        let product_name = self
            .catalog
            .find(order.product_id)
            .map(|p| p.name)
            .unwrap_or_else(|| "Product".to_string());

        let notice = PaymentNotice {
            seller_name: seller.store_name,
            product_name,
            amount: order.amount,
            currency: order.currency.clone(),
        };
        let dispatcher = Arc::clone(&self.dispatcher);
        let order_id = order.id;
        tokio::spawn(async move {
            match tokio::time::timeout(
                NOTIFY_TIMEOUT,
                dispatcher.notify_seller_of_payment(&seller.email, &notice),
            )
            .await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(%order_id, error = ?e, "seller notice failed"),
                Err(_) => warn!(%order_id, "seller notice timed out"),
            }
        });
    }
}

/// Merchant transaction reference: cryptographically random, unique for the
/// life of the deployment. The order store additionally enforces uniqueness
/// with an index.
fn new_reference() -> String {
    format!("TL-{}", Uuid::new_v4().simple())
}
