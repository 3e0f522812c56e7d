//! End-to-end gateway tests with a generated merchant keypair.
//!
//! Plays both sides: seals an order the way the merchant page does, then
//! simulates the gateway's confirm callback and opens it with the
//! merchant private key.

use std::io::Write;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};

use netopia_crypto::WireEnvelope;
use netopia_gateway::{BillingAddress, GatewayConfig, GatewayError, Invoice, NetopiaGateway, PaymentRequest};

struct TestKeys {
    _dir: tempfile::TempDir,
    public_key_path: PathBuf,
    private_key_path: PathBuf,
}

/// Writes a generated 2048-bit keypair as PEM files, the shape the
/// gateway hands to merchants.
fn write_test_keys() -> TestKeys {
    static KEY: std::sync::OnceLock<RsaPrivateKey> = std::sync::OnceLock::new();
    let private_key = KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("keygen"));
    let public_key = RsaPublicKey::from(private_key);

    let dir = tempfile::tempdir().unwrap();
    let public_key_path = dir.path().join("public.cer");
    let private_key_path = dir.path().join("private.key");

    let mut file = std::fs::File::create(&public_key_path).unwrap();
    file.write_all(public_key.to_public_key_pem(LineEnding::LF).unwrap().as_bytes())
        .unwrap();
    let mut file = std::fs::File::create(&private_key_path).unwrap();
    file.write_all(private_key.to_pkcs8_pem(LineEnding::LF).unwrap().as_bytes())
        .unwrap();

    TestKeys {
        _dir: dir,
        public_key_path,
        private_key_path,
    }
}

fn test_gateway(keys: &TestKeys) -> NetopiaGateway {
    NetopiaGateway::new(GatewayConfig {
        signature: "XXXX-XXXX-XXXX-XXXX-XXXX".to_string(),
        public_key_path: keys.public_key_path.clone(),
        private_key_path: keys.private_key_path.clone(),
        live_mode: false,
        default_currency: "RON".to_string(),
    })
}

fn sample_billing() -> BillingAddress {
    BillingAddress {
        kind: "person".to_string(),
        first_name: "Ion".to_string(),
        last_name: "Popescu".to_string(),
        email: "ion@example.com".to_string(),
        address: "Str. Exemplu 1".to_string(),
        mobile_phone: "0700000000".to_string(),
    }
}

#[test]
fn payment_form_data_is_sealed_with_the_block_cipher() {
    let keys = write_test_keys();
    let gateway = test_gateway(&keys);

    let form = gateway
        .create_payment_request(
            "ORD-1001",
            19.9,
            None,
            "https://shop.example/return",
            "https://shop.example/confirm",
            sample_billing(),
            "Abonament lunar",
        )
        .unwrap();

    assert_eq!(form.cipher, "aes-256-cbc");
    assert_eq!(form.url, "https://sandboxsecure.mobilpay.ro");
    assert_eq!(BASE64.decode(form.iv.as_deref().unwrap()).unwrap().len(), 16);

    // The sealed document opens back into the order we posted.
    let wire = WireEnvelope {
        env_key: form.env_key,
        data: form.data,
        cipher: Some(form.cipher),
        iv: form.iv,
    };
    let xml = netopia_crypto::open_with_key_file(&wire, &keys.private_key_path).unwrap();
    let xml = String::from_utf8(xml).unwrap();
    assert!(xml.contains("<order type=\"card\" id=\"ORD-1001\""));
    assert!(xml.contains("amount=\"19.90\""));
    assert!(xml.contains("<signature>XXXX-XXXX-XXXX-XXXX-XXXX</signature>"));
}

#[test]
fn explicit_payment_request_can_be_sealed_directly() {
    let keys = write_test_keys();
    let gateway = test_gateway(&keys);

    let request = PaymentRequest {
        order_id: "ORD-9".to_string(),
        signature: gateway.config().signature.clone(),
        return_url: "https://shop.example/return".to_string(),
        confirm_url: "https://shop.example/confirm".to_string(),
        invoice: Invoice {
            currency: "RON".to_string(),
            amount: 0.5,
            details: String::new(),
            billing: sample_billing(),
        },
    };

    let form = gateway.payment_form_data(&request).unwrap();
    assert_eq!(form.cipher, "aes-256-cbc");

    let wire = WireEnvelope {
        env_key: form.env_key,
        data: form.data,
        cipher: Some(form.cipher),
        iv: form.iv,
    };
    let xml = netopia_crypto::open_with_key_file(&wire, &keys.private_key_path).unwrap();
    assert!(String::from_utf8(xml).unwrap().contains("amount=\"0.50\""));
}

#[test]
fn confirm_callback_round_trip() {
    let keys = write_test_keys();
    let gateway = test_gateway(&keys);

    let callback_xml = r#"<?xml version="1.0" encoding="utf-8"?>
<order type="card" id="ORD-1001" timestamp="20260805120000">
  <mobilpay timestamp="20260805120501" crc="aabbcc">
    <action>confirmed</action>
    <original_amount>19.90</original_amount>
    <processed_amount>19.90</processed_amount>
  </mobilpay>
</order>"#;

    // The gateway seals callbacks with the same envelope scheme.
    let wire =
        netopia_crypto::seal_with_key_file(callback_xml.as_bytes(), &keys.public_key_path).unwrap();

    let response = gateway.process_confirm(&wire).unwrap();
    assert_eq!(response.order_id, "ORD-1001");
    assert!(response.is_successful());
    assert_eq!(response.processed_amount, Some(19.90));
}

#[test]
fn legacy_stream_callback_without_cipher_field() {
    let keys = write_test_keys();
    let gateway = test_gateway(&keys);

    let callback_xml = r#"<order id="ORD-7"><mobilpay><action>paid</action></mobilpay></order>"#;

    let public_key = netopia_crypto::keys::load_public_key(&keys.public_key_path).unwrap();
    let envelope = netopia_crypto::seal_with_suites(
        callback_xml.as_bytes(),
        &public_key,
        &[netopia_crypto::CipherSuite::Rc4],
    )
    .unwrap();

    // Legacy senders omit the cipher field entirely.
    let mut wire = WireEnvelope::from_envelope(&envelope);
    wire.cipher = None;

    let response = gateway.process_confirm(&wire).unwrap();
    assert_eq!(response.order_id, "ORD-7");
    assert!(response.is_paid());
}

#[test]
fn tampered_callback_is_rejected_and_acked_negatively() {
    let keys = write_test_keys();
    let gateway = test_gateway(&keys);

    let mut wire = netopia_crypto::seal_with_key_file(b"<order/>", &keys.public_key_path).unwrap();
    // Corrupt the wrapped key.
    wire.env_key = BASE64.encode([0u8; 256]);

    let err = gateway.process_confirm(&wire).unwrap_err();
    assert!(matches!(err, GatewayError::Crypto(_)));

    let ack = gateway.ack_for_error(&err);
    assert!(ack.contains("error_type=\"1\""));

    let ok = gateway.ack_ok();
    assert!(ok.contains("<crc>OK</crc>"));
}

#[test]
fn non_xml_callback_is_an_invalid_response() {
    let keys = write_test_keys();
    let gateway = test_gateway(&keys);

    let wire =
        netopia_crypto::seal_with_key_file(b"definitely not xml", &keys.public_key_path).unwrap();
    let err = gateway.process_confirm(&wire).unwrap_err();
    assert!(matches!(err, GatewayError::InvalidResponse(_)));
}

#[test]
fn form_data_respects_explicit_currency_and_live_mode() {
    let keys = write_test_keys();
    let mut config = test_gateway(&keys).config().clone();
    config.live_mode = true;
    let gateway = NetopiaGateway::new(config);

    let form = gateway
        .create_payment_request(
            "ORD-2",
            5.0,
            Some("EUR"),
            "https://shop.example/return",
            "https://shop.example/confirm",
            sample_billing(),
            "",
        )
        .unwrap();
    assert_eq!(form.url, "https://secure.mobilpay.ro");

    let wire = WireEnvelope {
        env_key: form.env_key,
        data: form.data,
        cipher: Some(form.cipher),
        iv: form.iv,
    };
    let xml = netopia_crypto::open_with_key_file(&wire, &keys.private_key_path).unwrap();
    assert!(String::from_utf8(xml).unwrap().contains("currency=\"EUR\""));
}

#[test]
fn empty_signature_is_a_config_error() {
    let keys = write_test_keys();
    let mut config = test_gateway(&keys).config().clone();
    config.signature = String::new();
    let gateway = NetopiaGateway::new(config);

    let err = gateway
        .create_payment_request(
            "ORD-4",
            1.0,
            None,
            "https://shop.example/return",
            "https://shop.example/confirm",
            sample_billing(),
            "",
        )
        .unwrap_err();
    assert!(matches!(err, GatewayError::Config(_)));
}

#[test]
fn missing_public_key_surfaces_as_crypto_error() {
    let keys = write_test_keys();
    let mut config = test_gateway(&keys).config().clone();
    config.public_key_path = PathBuf::from("/nonexistent/public.cer");
    let gateway = NetopiaGateway::new(config);

    let err = gateway
        .create_payment_request(
            "ORD-3",
            1.0,
            None,
            "https://shop.example/return",
            "https://shop.example/confirm",
            sample_billing(),
            "",
        )
        .unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Crypto(netopia_crypto::CryptoError::KeyLoad(_))
    ));
}
