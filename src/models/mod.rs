pub mod message;
pub mod order;
pub mod product;
pub mod review;
pub mod seller;
pub mod service;
pub mod transaction;
pub mod user;

pub use message::{Conversation, Message};
pub use order::{CheckoutCustomer, CheckoutDescriptor, CheckoutProduct, Order, OrderStatus};
pub use product::Product;
pub use review::Review;
pub use seller::Seller;
pub use service::{Service, WorkingHours};
pub use transaction::TransactionRecord;
pub use user::{User, UserRole};
