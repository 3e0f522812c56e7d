//! Merchant configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one merchant account.
///
/// The signature and key files are issued by the gateway when the
/// merchant account is created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Merchant signature (identifier).
    pub signature: String,

    /// Path to the gateway-issued public key used to seal orders.
    pub public_key_path: PathBuf,

    /// Path to the merchant private key used to open callbacks.
    pub private_key_path: PathBuf,

    /// Post to the live endpoint when true, the sandbox otherwise.
    pub live_mode: bool,

    /// Currency used when a request does not name one.
    pub default_currency: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            signature: String::new(),
            public_key_path: PathBuf::from("keys/public.cer"),
            private_key_path: PathBuf::from("keys/private.key"),
            live_mode: false,
            default_currency: "RON".to_string(),
        }
    }
}

impl GatewayConfig {
    /// The endpoint the encrypted order is posted to.
    pub fn payment_url(&self) -> &'static str {
        if self.live_mode {
            "https://secure.mobilpay.ro"
        } else {
            "https://sandboxsecure.mobilpay.ro"
        }
    }
}
