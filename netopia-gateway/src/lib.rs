//! Merchant SDK for the Netopia card-payment gateway.
//!
//! Builds the encrypted order post for the hosted payment page and
//! processes the encrypted confirm callback:
//! - order model and document rendering
//! - envelope sealing/opening via `netopia-crypto`
//! - callback parsing and the `<crc>` acknowledgement
//! - sandbox/live endpoint selection

pub mod config;
pub mod error;
pub mod order;
pub mod payment;
pub mod response;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use order::{BillingAddress, Invoice, PaymentRequest};
pub use payment::{NetopiaGateway, PaymentFormData};
pub use response::{PaymentResponse, ack_xml};
