pub mod error;
pub mod razorpay;
pub mod storage;

pub use error::GatewayError;
pub use razorpay::{CreateOrderRequest, GatewayOrder, OrderStatus, PaymentGateway, RazorpayClient};
pub use storage::{ImageStore, SupabaseStorage, UploadedImage};
