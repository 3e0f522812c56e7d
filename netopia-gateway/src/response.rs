//! Gateway callback parsing and the acknowledgement document.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};
use crate::order::xml_escape;

/// Parsed confirm-callback payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub order_id: String,
    /// Payment lifecycle action: `confirmed`, `confirmed_pending`,
    /// `paid_pending`, `paid`, `canceled` or `credit`.
    pub action: String,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub processed_amount: Option<f64>,
    pub original_amount: Option<f64>,
}

impl PaymentResponse {
    /// Parses the decrypted confirm-callback document.
    pub fn from_xml(xml: &str) -> GatewayResult<Self> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| GatewayError::InvalidResponse(format!("not valid XML: {e}")))?;

        let order = doc
            .descendants()
            .find(|n| n.has_tag_name("order"))
            .ok_or_else(|| GatewayError::InvalidResponse("missing <order> element".into()))?;
        let order_id = order.attribute("id").unwrap_or_default().to_string();

        let mobilpay = order
            .descendants()
            .find(|n| n.has_tag_name("mobilpay"))
            .ok_or_else(|| GatewayError::InvalidResponse("missing <mobilpay> element".into()))?;

        let action = child_text(&mobilpay, "action")
            .ok_or_else(|| GatewayError::InvalidResponse("missing <action> element".into()))?;

        let error = mobilpay.descendants().find(|n| n.has_tag_name("error"));
        let error_code = error
            .and_then(|n| n.attribute("code"))
            .filter(|code| !code.is_empty())
            .map(str::to_string);
        let error_message = error
            .and_then(|n| n.text())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(Self {
            order_id,
            action,
            error_code,
            error_message,
            processed_amount: child_amount(&mobilpay, "processed_amount"),
            original_amount: child_amount(&mobilpay, "original_amount"),
        })
    }

    pub fn is_successful(&self) -> bool {
        self.action == "confirmed" && self.error_code.is_none()
    }

    pub fn is_pending(&self) -> bool {
        self.action == "confirmed_pending"
    }

    pub fn is_paid(&self) -> bool {
        self.action == "paid"
    }

    pub fn is_canceled(&self) -> bool {
        self.action == "canceled"
    }

    pub fn is_credited(&self) -> bool {
        self.action == "credit"
    }
}

fn child_text(node: &roxmltree::Node<'_, '_>, tag: &str) -> Option<String> {
    node.descendants()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .map(str::to_string)
}

fn child_amount(node: &roxmltree::Node<'_, '_>, tag: &str) -> Option<f64> {
    child_text(node, tag).and_then(|text| text.trim().parse().ok())
}

/// Renders the `<crc>` acknowledgement the gateway expects back from the
/// confirm endpoint. Error attributes appear only on failures.
pub fn ack_xml(error_type: u32, error_code: u32, message: &str) -> String {
    if error_type > 0 {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<crc error_type=\"{error_type}\" error_code=\"{error_code}\">{}</crc>\n",
            xml_escape(message)
        )
    } else {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<crc>{}</crc>\n",
            xml_escape(message)
        )
    }
}
