use std::sync::Arc;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{
    auth, health_check, messages, payments, products, reviews, sellers, services, users,
};
use crate::notify::NotificationDispatcher;
use crate::payments::{PaymentProcessor, WebhookVerifier};
use crate::store::{
    CatalogStore, IdentityStore, MessageStore, OrderStore, ReviewStore, ServiceStore,
    TransactionLedger,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Arc<IdentityStore>,
    pub catalog: Arc<CatalogStore>,
    pub orders: Arc<OrderStore>,
    pub ledger: Arc<TransactionLedger>,
    pub services: Arc<ServiceStore>,
    pub messages: Arc<MessageStore>,
    pub reviews: Arc<ReviewStore>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    pub processor: Arc<PaymentProcessor>,
    pub verifier: Arc<WebhookVerifier>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        let identity = Arc::new(IdentityStore::new());
        let catalog = Arc::new(CatalogStore::new());
        let orders = Arc::new(OrderStore::new());
        let ledger = Arc::new(TransactionLedger::new());
        let verifier = Arc::new(WebhookVerifier::new(
            &config.payment.gateway_secret,
            config.payment.legacy_webhook_secret.clone(),
        ));
        let processor = Arc::new(PaymentProcessor::new(
            Arc::clone(&orders),
            Arc::clone(&catalog),
            Arc::clone(&identity),
            Arc::clone(&ledger),
            Arc::clone(&dispatcher),
            config.payment.clone(),
        ));

        Self {
            config: Arc::new(config),
            identity,
            catalog,
            orders,
            ledger,
            services: Arc::new(ServiceStore::new()),
            messages: Arc::new(MessageStore::new()),
            reviews: Arc::new(ReviewStore::new()),
            dispatcher,
            processor,
            verifier,
        }
    }
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/verify-email/:token", get(auth::verify_email))
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route("/api/v1/auth/reset-password", post(auth::reset_password))
        // Users
        .route(
            "/api/v1/users/profile",
            get(users::get_profile)
                .put(users::update_profile)
                .delete(users::delete_profile),
        )
        .route("/api/v1/users/password", put(users::change_password))
        // Sellers
        .route(
            "/api/v1/sellers/profile",
            get(sellers::get_profile).put(sellers::upsert_profile),
        )
        .route("/api/v1/sellers/dashboard", get(sellers::dashboard))
        // Products
        .route(
            "/api/v1/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/api/v1/products/:id", delete(products::remove_product))
        .route(
            "/api/v1/products/seller/:seller_id",
            get(products::list_by_seller),
        )
        // Services
        .route(
            "/api/v1/services",
            get(services::list_services).post(services::create_service),
        )
        .route("/api/v1/services/:id", delete(services::remove_service))
        .route(
            "/api/v1/services/seller/:seller_id",
            get(services::list_by_seller),
        )
        // Messages
        .route(
            "/api/v1/messages/conversations",
            get(messages::list_conversations),
        )
        .route(
            "/api/v1/messages/conversations/:user_id",
            get(messages::conversation_messages),
        )
        .route("/api/v1/messages/send", post(messages::send_message))
        .route("/api/v1/messages/read/:message_id", patch(messages::mark_read))
        // Reviews
        .route("/api/v1/reviews", post(reviews::create_review))
        .route(
            "/api/v1/reviews/seller/:seller_id",
            get(reviews::list_by_seller),
        )
        // Payments: initiation, gateway webhooks, query surfaces
        .route("/api/v1/payments/initiate", post(payments::initiate))
        .route("/api/v1/payments/webhook", post(payments::legacy_webhook))
        .route(
            "/api/v1/payments/gateway/webhook",
            post(payments::gateway_webhook),
        )
        .route("/api/v1/payments/orders", get(payments::my_orders))
        .route(
            "/api/v1/payments/transactions",
            get(payments::seller_transactions),
        )
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
