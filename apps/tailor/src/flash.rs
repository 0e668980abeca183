//! One-shot notices carried across the redirect back to the form.
//!
//! The message travels in a signed cookie: `base64url(message).hex(hmac)`,
//! HMAC-SHA-256 keyed with `SESSION_SECRET`, verified in constant time.

use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{digest::InvalidLength, Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const NOTICE_COOKIE: &str = "notice";
const NOTICE_MAX_AGE_SECS: u32 = 300;
const MAX_NOTICE_CHARS: usize = 1000;

#[derive(Clone)]
pub struct FlashSigner {
    mac: HmacSha256,
}

impl FlashSigner {
    pub fn new(secret: &str) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret.as_bytes())?,
        })
    }

    /// Encodes and signs a notice. Long messages are cut at `MAX_NOTICE_CHARS`.
    pub fn seal(&self, message: &str) -> String {
        let message: String = message.chars().take(MAX_NOTICE_CHARS).collect();
        let payload = URL_SAFE_NO_PAD.encode(message.as_bytes());
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let tag = hex::encode(mac.finalize().into_bytes());
        format!("{payload}.{tag}")
    }

    /// Verifies and decodes a sealed notice. Anything tampered or malformed is `None`.
    pub fn open(&self, sealed: &str) -> Option<String> {
        let (payload, tag) = sealed.split_once('.')?;
        let tag = hex::decode(tag).ok()?;
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&tag).ok()?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        String::from_utf8(bytes).ok()
    }

    /// `Set-Cookie` value carrying `message`.
    pub fn set_cookie(&self, message: &str) -> String {
        format!(
            "{NOTICE_COOKIE}={}; Path=/; Max-Age={NOTICE_MAX_AGE_SECS}; HttpOnly; SameSite=Lax",
            self.seal(message)
        )
    }

    /// Reads and verifies the notice cookie from request headers.
    pub fn take_notice(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == NOTICE_COOKIE)
            .and_then(|(_, value)| self.open(value))
    }
}

/// `Set-Cookie` value that expires the notice.
pub fn clear_cookie() -> String {
    format!("{NOTICE_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}
