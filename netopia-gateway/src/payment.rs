//! Gateway front: builds encrypted form posts and processes callbacks.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use netopia_crypto::{WireEnvelope, open_with_key_file, seal_with_key_file};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::order::{BillingAddress, Invoice, PaymentRequest};
use crate::response::{PaymentResponse, ack_xml};

/// Fields the merchant page posts to the gateway, plus the target URL.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentFormData {
    pub env_key: String,
    pub data: String,
    pub cipher: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    pub url: String,
}

/// Merchant-facing entry point.
///
/// Holds only configuration; every operation loads its own key material,
/// so one instance may be shared freely across threads.
pub struct NetopiaGateway {
    config: GatewayConfig,
}

impl NetopiaGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Assembles a [`PaymentRequest`] from scalars and seals it.
    ///
    /// `currency` falls back to the configured default when `None`.
    #[allow(clippy::too_many_arguments)]
    pub fn create_payment_request(
        &self,
        order_id: &str,
        amount: f64,
        currency: Option<&str>,
        return_url: &str,
        confirm_url: &str,
        billing: BillingAddress,
        description: &str,
    ) -> GatewayResult<PaymentFormData> {
        let request = PaymentRequest {
            order_id: order_id.to_string(),
            signature: self.config.signature.clone(),
            return_url: return_url.to_string(),
            confirm_url: confirm_url.to_string(),
            invoice: Invoice {
                currency: currency
                    .unwrap_or(&self.config.default_currency)
                    .to_string(),
                amount,
                details: description.to_string(),
                billing,
            },
        };
        self.payment_form_data(&request)
    }

    /// Renders and seals the order document, returning the form fields
    /// to post.
    pub fn payment_form_data(&self, request: &PaymentRequest) -> GatewayResult<PaymentFormData> {
        if self.config.signature.is_empty() {
            return Err(GatewayError::Config("merchant signature is not set".into()));
        }
        let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let xml = request.to_xml(&timestamp);

        let wire = seal_with_key_file(xml.as_bytes(), &self.config.public_key_path)?;
        debug!(
            order_id = %request.order_id,
            cipher = wire.cipher.as_deref().unwrap_or("rc4"),
            "prepared payment form data"
        );

        Ok(PaymentFormData {
            env_key: wire.env_key,
            data: wire.data,
            cipher: wire.cipher.unwrap_or_else(|| "rc4".to_string()),
            iv: wire.iv,
            url: self.config.payment_url().to_string(),
        })
    }

    /// Opens a confirm-callback envelope and parses the payment response.
    pub fn process_confirm(&self, wire: &WireEnvelope) -> GatewayResult<PaymentResponse> {
        let plaintext = open_with_key_file(wire, &self.config.private_key_path)?;
        let xml = String::from_utf8(plaintext).map_err(|_| {
            GatewayError::InvalidResponse("decrypted payload is not valid UTF-8".into())
        })?;

        let response = PaymentResponse::from_xml(&xml)?;
        debug!(order_id = %response.order_id, action = %response.action, "processed confirm callback");
        Ok(response)
    }

    /// The acknowledgement to return when a callback was handled.
    pub fn ack_ok(&self) -> String {
        ack_xml(0, 0, "OK")
    }

    /// Converts a processing failure into the negative acknowledgement
    /// the gateway expects instead of an unhandled error page.
    pub fn ack_for_error(&self, err: &GatewayError) -> String {
        ack_xml(1, 1, &err.to_string())
    }
}
