use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Token format version prefix.
const VERSION: &str = "007";

/// Role granted to both bot identities. Both the audio subscriber and the
/// text publisher join the channel as publishers.
const ROLE_PUBLISHER: u8 = 1;

/// Derives channel-scoped media tokens from the project credentials.
///
/// Derivation is a pure local computation: the canonical claim string is
/// signed with HMAC-SHA256 keyed on the app certificate and the signature
/// plus claims are base64-encoded under a version prefix. Identical inputs
/// and issue timestamp always produce the identical token.
#[derive(Clone)]
pub struct MediaTokenBuilder {
    app_id: String,
    app_certificate: String,
    token_expiry_secs: u32,
    privilege_expiry_secs: u32,
}

impl MediaTokenBuilder {
    pub fn new(
        app_id: impl Into<String>,
        app_certificate: impl Into<String>,
        token_expiry_secs: u32,
        privilege_expiry_secs: u32,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_certificate: app_certificate.into(),
            token_expiry_secs,
            privilege_expiry_secs,
        }
    }

    /// Derive a publisher token for `uid` in `channel`, valid from
    /// `issued_at` for the configured expiry windows.
    pub fn token_for(&self, channel: &str, uid: u32, issued_at: DateTime<Utc>) -> String {
        let issue_ts = issued_at.timestamp();
        let token_expire = issue_ts + i64::from(self.token_expiry_secs);
        let privilege_expire = issue_ts + i64::from(self.privilege_expiry_secs);

        let claims = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            self.app_id, channel, uid, ROLE_PUBLISHER, token_expire, privilege_expire
        );

        // The certificate is configuration, so a bad key length is a
        // programming error rather than a runtime condition.
        let mut mac = HmacSha256::new_from_slice(self.app_certificate.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(claims.as_bytes());
        let signature = mac.finalize().into_bytes();

        let mut packed = Vec::with_capacity(signature.len() + claims.len());
        packed.extend_from_slice(&signature);
        packed.extend_from_slice(claims.as_bytes());

        format!(
            "{}{}",
            VERSION,
            base64::engine::general_purpose::STANDARD.encode(&packed)
        )
    }

    /// Derive a token issued at the current time.
    pub fn token_now(&self, channel: &str, uid: u32) -> String {
        self.token_for(channel, uid, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn builder() -> MediaTokenBuilder {
        MediaTokenBuilder::new("test-app-id", "test-certificate", 3600, 3600)
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = builder().token_for("room42", 111, fixed_time());
        let b = builder().token_for("room42", 111, fixed_time());
        assert_eq!(a, b);
        assert!(a.starts_with(VERSION));
    }

    #[test]
    fn tokens_differ_per_uid_and_channel() {
        let audio = builder().token_for("room42", 111, fixed_time());
        let text = builder().token_for("room42", 222, fixed_time());
        let other_channel = builder().token_for("room43", 111, fixed_time());
        assert_ne!(audio, text);
        assert_ne!(audio, other_channel);
    }

    #[test]
    fn tokens_differ_per_issue_time() {
        let early = builder().token_for("room42", 111, fixed_time());
        let late = builder().token_for(
            "room42",
            111,
            fixed_time() + chrono::Duration::seconds(60),
        );
        assert_ne!(early, late);
    }

    #[test]
    fn certificate_keys_the_signature() {
        let a = builder().token_for("room42", 111, fixed_time());
        let b = MediaTokenBuilder::new("test-app-id", "other-certificate", 3600, 3600)
            .token_for("room42", 111, fixed_time());
        assert_ne!(a, b);
    }
}
