use ring::{constant_time, hmac};

/// Verifies webhook authenticity for both gateway schemes. This is the sole
/// authentication boundary for the webhook endpoints, which are reachable
/// without a user session; verification happens before any payload parsing
/// or store access.
pub struct WebhookVerifier {
    gateway_key: Option<hmac::Key>,
    legacy_secret: String,
}

impl WebhookVerifier {
    pub fn new(gateway_secret: &str, legacy_secret: impl Into<String>) -> Self {
        let gateway_key = if gateway_secret.is_empty() {
            None
        } else {
            Some(hmac::Key::new(hmac::HMAC_SHA512, gateway_secret.as_bytes()))
        };
        Self {
            gateway_key,
            legacy_secret: legacy_secret.into(),
        }
    }

    /// Current scheme: hex-encoded HMAC-SHA512 of the exact raw request body.
    /// The signature is recomputed over the received bytes, never over a
    /// re-serialized copy.
    pub fn verify_gateway(&self, raw_body: &[u8], signature_hex: Option<&str>) -> bool {
        let Some(key) = &self.gateway_key else {
            return false;
        };
        let Some(signature_hex) = signature_hex else {
            return false;
        };
        let Ok(signature) = hex::decode(signature_hex) else {
            return false;
        };
        hmac::verify(key, raw_body, &signature).is_ok()
    }

    /// Legacy scheme: the header carries the pre-shared secret itself,
    /// compared in constant time.
    pub fn verify_legacy(&self, header: Option<&str>) -> bool {
        if self.legacy_secret.is_empty() {
            return false;
        }
        let Some(header) = header else {
            return false;
        };
        constant_time::verify_slices_are_equal(header.as_bytes(), self.legacy_secret.as_bytes())
            .is_ok()
    }
}

/// Computes the hex HMAC-SHA512 signature for a body, as the gateway would.
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA512, secret.as_bytes());
    hex::encode(hmac::sign(&key, body).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_signature_passes() {
        let verifier = WebhookVerifier::new("s3cret", "");
        let body = br#"{"event":"charge.success"}"#;
        let signature = sign_body("s3cret", body);
        assert!(verifier.verify_gateway(body, Some(&signature)));
    }

    #[test]
    fn tampered_body_fails() {
        let verifier = WebhookVerifier::new("s3cret", "");
        let signature = sign_body("s3cret", br#"{"amount":1000}"#);
        assert!(!verifier.verify_gateway(br#"{"amount":9999}"#, Some(&signature)));
    }

    #[test]
    fn missing_signature_or_secret_fails() {
        let verifier = WebhookVerifier::new("s3cret", "");
        assert!(!verifier.verify_gateway(b"{}", None));

        let unconfigured = WebhookVerifier::new("", "");
        let signature = sign_body("", b"{}");
        assert!(!unconfigured.verify_gateway(b"{}", Some(&signature)));
    }

    #[test]
    fn non_hex_signature_fails() {
        let verifier = WebhookVerifier::new("s3cret", "");
        assert!(!verifier.verify_gateway(b"{}", Some("not-hex!")));
    }

    #[test]
    fn legacy_compare() {
        let verifier = WebhookVerifier::new("", "legacy-hash");
        assert!(verifier.verify_legacy(Some("legacy-hash")));
        assert!(!verifier.verify_legacy(Some("wrong")));
        assert!(!verifier.verify_legacy(None));

        let unconfigured = WebhookVerifier::new("", "");
        assert!(!unconfigured.verify_legacy(Some("")));
    }
}
