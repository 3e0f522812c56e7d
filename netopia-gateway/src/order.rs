//! Payment order model and the XML document posted to the gateway.

use serde::{Deserialize, Serialize};

/// Billing contact attached to an invoice.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BillingAddress {
    /// `"person"` or `"company"`.
    pub kind: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub mobile_phone: String,
}

/// Invoice for one order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invoice {
    pub currency: String,
    pub amount: f64,
    pub details: String,
    pub billing: BillingAddress,
}

/// A card-payment order to be sealed and posted to the gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub order_id: String,
    /// Merchant signature, repeated inside the document.
    pub signature: String,
    pub return_url: String,
    pub confirm_url: String,
    pub invoice: Invoice,
}

impl PaymentRequest {
    /// Renders the `order` document the gateway expects.
    ///
    /// `timestamp` is the order creation time in `%Y%m%d%H%M%S` form; it
    /// is passed in rather than read from the clock so documents are
    /// reproducible.
    pub fn to_xml(&self, timestamp: &str) -> String {
        let billing = &self.invoice.billing;
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
                "<order type=\"card\" id=\"{order_id}\" timestamp=\"{timestamp}\">\n",
                "  <signature>{signature}</signature>\n",
                "  <invoice currency=\"{currency}\" amount=\"{amount:.2}\">\n",
                "    <details>{details}</details>\n",
                "    <contact_info>\n",
                "      <billing type=\"{billing_kind}\">\n",
                "        <first_name>{first_name}</first_name>\n",
                "        <last_name>{last_name}</last_name>\n",
                "        <email>{email}</email>\n",
                "        <address>{address}</address>\n",
                "        <mobile_phone>{mobile_phone}</mobile_phone>\n",
                "      </billing>\n",
                "    </contact_info>\n",
                "  </invoice>\n",
                "  <url>\n",
                "    <confirm>{confirm_url}</confirm>\n",
                "    <return>{return_url}</return>\n",
                "  </url>\n",
                "</order>\n",
            ),
            order_id = xml_escape(&self.order_id),
            timestamp = xml_escape(timestamp),
            signature = xml_escape(&self.signature),
            currency = xml_escape(&self.invoice.currency),
            amount = self.invoice.amount,
            details = xml_escape(&self.invoice.details),
            billing_kind = xml_escape(&billing.kind),
            first_name = xml_escape(&billing.first_name),
            last_name = xml_escape(&billing.last_name),
            email = xml_escape(&billing.email),
            address = xml_escape(&billing.address),
            mobile_phone = xml_escape(&billing.mobile_phone),
            confirm_url = xml_escape(&self.confirm_url),
            return_url = xml_escape(&self.return_url),
        )
    }
}

/// Escapes text for use in XML content and attribute values.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_request() -> PaymentRequest {
        PaymentRequest {
            order_id: "ORD-1001".to_string(),
            signature: "XXXX-XXXX-XXXX-XXXX-XXXX".to_string(),
            return_url: "https://shop.example/return".to_string(),
            confirm_url: "https://shop.example/confirm".to_string(),
            invoice: Invoice {
                currency: "RON".to_string(),
                amount: 19.9,
                details: "Abonament lunar".to_string(),
                billing: BillingAddress {
                    kind: "person".to_string(),
                    first_name: "Ion".to_string(),
                    last_name: "Popescu".to_string(),
                    email: "ion@example.com".to_string(),
                    address: "Str. Exemplu 1".to_string(),
                    mobile_phone: "0700000000".to_string(),
                },
            },
        }
    }

    #[test]
    fn order_document_shape() {
        let xml = sample_request().to_xml("20260805120000");

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains(
            "<order type=\"card\" id=\"ORD-1001\" timestamp=\"20260805120000\">"
        ));
        assert!(xml.contains("<signature>XXXX-XXXX-XXXX-XXXX-XXXX</signature>"));
        assert!(xml.contains("<billing type=\"person\">"));
        assert!(xml.contains("<confirm>https://shop.example/confirm</confirm>"));
        assert!(xml.contains("<return>https://shop.example/return</return>"));
    }

    #[test]
    fn amount_always_has_two_decimals() {
        let mut request = sample_request();
        request.invoice.amount = 1.0;
        assert!(request.to_xml("20260101000000").contains("amount=\"1.00\""));

        request.invoice.amount = 1234.5;
        assert!(request.to_xml("20260101000000").contains("amount=\"1234.50\""));
    }

    #[test]
    fn text_is_escaped() {
        let mut request = sample_request();
        request.invoice.details = "Cafea & <ceai> \"fierbinte\"".to_string();
        let xml = request.to_xml("20260101000000");

        assert!(xml.contains("Cafea &amp; &lt;ceai&gt; &quot;fierbinte&quot;"));
        assert!(!xml.contains("<ceai>"));
    }

    #[test]
    fn escape_covers_all_special_characters() {
        assert_eq!(xml_escape(r#"a&b<c>d"e'f"#), "a&amp;b&lt;c&gt;d&quot;e&apos;f");
        assert_eq!(xml_escape("plain"), "plain");
    }
}
