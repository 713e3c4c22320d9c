use hmac::{Hmac, Mac};
use sha2::Sha512;
use wishwell::clients::paystack::PaystackClient;

fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn accepts_a_correctly_signed_payload() {
    let secret = "sk_test_webhook";
    let body = br#"{"event":"charge.success","data":{"reference":"pay-abc"}}"#;
    let signature = sign(secret, body);

    assert!(PaystackClient::verify_signature(secret, body, &signature).is_ok());
}

#[test]
fn rejects_a_tampered_body() {
    let secret = "sk_test_webhook";
    let body = br#"{"event":"charge.success","data":{"reference":"pay-abc"}}"#;
    let signature = sign(secret, body);

    let tampered = br#"{"event":"charge.success","data":{"reference":"pay-xyz"}}"#;
    assert!(PaystackClient::verify_signature(secret, tampered, &signature).is_err());
}

#[test]
fn rejects_a_signature_minted_with_the_wrong_secret() {
    let body = br#"{"event":"transfer.success","data":{"reference":"wd-1"}}"#;
    let signature = sign("some_other_secret", body);

    assert!(PaystackClient::verify_signature("sk_test_webhook", body, &signature).is_err());
}

#[test]
fn rejects_garbage_signatures() {
    let secret = "sk_test_webhook";
    let body = br#"{"event":"charge.success"}"#;

    assert!(PaystackClient::verify_signature(secret, body, "").is_err());
    assert!(PaystackClient::verify_signature(secret, body, "deadbeef").is_err());
}
